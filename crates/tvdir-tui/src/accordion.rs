//! Accordion controller: explicit per-panel state machine.
//!
//! # States
//! ```text
//!  Closed ──toggle──▶ Opening ──complete_open──▶ Open
//!    ▲                   │                         │
//!    │                toggle                    toggle
//!    │                   ▼                         │
//!    └──transition_end── Closing ◀─────────────────┘
//! ```
//!
//! Transitions never touch the screen. Each returns the `Effect`s the caller
//! applies to the panel views, so the ordering can be tested without layout.
//! At most one panel is `Opening` or `Open` at a time: opening a panel closes
//! every other one first.

/// Extra rows added to the measured content height.
pub const HEIGHT_MARGIN: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl PanelState {
    /// Opening or open. This is what a trigger's "expanded" flag reflects.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

/// Visual side effect of a transition, addressed by panel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Put the panel's content region back into the layout.
    Display(usize),
    SetExpanded(usize, bool),
    ShowLoading(usize),
    HideLoading(usize),
    /// Channel data is required before the panel can finish opening.
    EnsureChannels(usize),
    SetHeightBound(usize, u16),
    SetShown(usize, bool),
    /// Remove the content region from the layout (after the close animation).
    HideFromLayout(usize),
}

#[derive(Debug, Clone)]
pub struct Accordion {
    states: Vec<PanelState>,
}

impl Accordion {
    pub fn new(panels: usize) -> Self {
        Self {
            states: vec![PanelState::Closed; panels],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, idx: usize) -> PanelState {
        self.states.get(idx).copied().unwrap_or_default()
    }

    /// Panels waiting for `complete_open`.
    pub fn opening(&self) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == PanelState::Opening)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn toggle(&mut self, idx: usize) -> Vec<Effect> {
        if idx >= self.states.len() {
            return Vec::new();
        }
        if self.states[idx].is_open() {
            return self.close(idx);
        }

        let mut effects = Vec::new();
        for other in 0..self.states.len() {
            if other != idx && self.states[other].is_open() {
                effects.extend(self.close(other));
            }
        }
        self.states[idx] = PanelState::Opening;
        effects.extend([
            Effect::Display(idx),
            Effect::SetExpanded(idx, true),
            Effect::ShowLoading(idx),
            Effect::EnsureChannels(idx),
        ]);
        effects
    }

    /// Finish opening once the content is rendered and measured. Ignored when
    /// the panel was closed again while its data was loading.
    pub fn complete_open(&mut self, idx: usize, measured_height: u16) -> Vec<Effect> {
        if self.state(idx) != PanelState::Opening {
            tracing::debug!("stale open completion for panel {}", idx);
            return Vec::new();
        }
        self.states[idx] = PanelState::Open;
        vec![
            Effect::SetHeightBound(idx, measured_height.saturating_add(HEIGHT_MARGIN)),
            Effect::SetShown(idx, true),
            Effect::HideLoading(idx),
        ]
    }

    pub fn close(&mut self, idx: usize) -> Vec<Effect> {
        if !self.state(idx).is_open() {
            return Vec::new();
        }
        self.states[idx] = PanelState::Closing;
        vec![
            Effect::SetShown(idx, false),
            Effect::SetHeightBound(idx, 0),
            Effect::SetExpanded(idx, false),
        ]
    }

    /// The close animation of `idx` finished.
    pub fn transition_end(&mut self, idx: usize) -> Vec<Effect> {
        if self.state(idx) != PanelState::Closing {
            return Vec::new();
        }
        self.states[idx] = PanelState::Closed;
        vec![Effect::HideFromLayout(idx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_count(acc: &Accordion) -> usize {
        (0..acc.len()).filter(|&i| acc.state(i).is_open()).count()
    }

    #[test]
    fn all_panels_start_closed() {
        let acc = Accordion::new(5);
        assert!((0..5).all(|i| acc.state(i) == PanelState::Closed));
        assert_eq!(open_count(&acc), 0);
    }

    #[test]
    fn opening_sequence_effects_in_order() {
        let mut acc = Accordion::new(3);
        assert_eq!(
            acc.toggle(1),
            vec![
                Effect::Display(1),
                Effect::SetExpanded(1, true),
                Effect::ShowLoading(1),
                Effect::EnsureChannels(1),
            ]
        );
        assert_eq!(acc.state(1), PanelState::Opening);
        assert_eq!(acc.opening(), vec![1]);

        assert_eq!(
            acc.complete_open(1, 9),
            vec![
                Effect::SetHeightBound(1, 9 + HEIGHT_MARGIN),
                Effect::SetShown(1, true),
                Effect::HideLoading(1),
            ]
        );
        assert_eq!(acc.state(1), PanelState::Open);
    }

    #[test]
    fn opening_b_closes_a_first() {
        let mut acc = Accordion::new(3);
        acc.toggle(0);
        acc.complete_open(0, 3);

        let effects = acc.toggle(2);
        assert_eq!(
            &effects[..3],
            &[
                Effect::SetShown(0, false),
                Effect::SetHeightBound(0, 0),
                Effect::SetExpanded(0, false),
            ]
        );
        assert_eq!(effects[3], Effect::Display(2));
        assert_eq!(acc.state(0), PanelState::Closing);
        assert_eq!(acc.state(2), PanelState::Opening);
        assert_eq!(open_count(&acc), 1);
    }

    #[test]
    fn at_most_one_open_across_random_toggles() {
        let mut acc = Accordion::new(5);
        let sequence = [0, 3, 3, 1, 4, 4, 4, 2, 0, 1, 1, 3];
        for (step, idx) in sequence.into_iter().enumerate() {
            acc.toggle(idx);
            if step % 2 == 0 {
                acc.complete_open(idx, 2);
            }
            for i in 0..5 {
                acc.transition_end(i);
            }
            assert!(open_count(&acc) <= 1, "step {}", step);
        }
    }

    #[test]
    fn toggle_open_panel_closes_it() {
        let mut acc = Accordion::new(2);
        acc.toggle(0);
        acc.complete_open(0, 1);
        acc.toggle(0);
        assert_eq!(acc.state(0), PanelState::Closing);
        assert_eq!(acc.transition_end(0), vec![Effect::HideFromLayout(0)]);
        assert_eq!(acc.state(0), PanelState::Closed);
        assert!(acc.transition_end(0).is_empty());
    }

    #[test]
    fn completion_after_close_is_ignored() {
        let mut acc = Accordion::new(2);
        acc.toggle(0);
        acc.toggle(0); // closed again while loading
        assert_eq!(acc.state(0), PanelState::Closing);
        assert!(acc.complete_open(0, 4).is_empty());
        assert_eq!(acc.state(0), PanelState::Closing);
    }

    #[test]
    fn transition_end_ignored_unless_closing() {
        let mut acc = Accordion::new(1);
        assert!(acc.transition_end(0).is_empty());
        acc.toggle(0);
        assert!(acc.transition_end(0).is_empty());
        assert_eq!(acc.state(0), PanelState::Opening);
    }

    #[test]
    fn reopening_while_closing() {
        let mut acc = Accordion::new(1);
        acc.toggle(0);
        acc.complete_open(0, 1);
        acc.toggle(0);
        let effects = acc.toggle(0);
        assert_eq!(effects[0], Effect::Display(0));
        assert_eq!(acc.state(0), PanelState::Opening);
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut acc = Accordion::new(1);
        assert!(acc.toggle(7).is_empty());
        assert!(acc.close(7).is_empty());
        assert_eq!(acc.state(7), PanelState::Closed);
    }
}
