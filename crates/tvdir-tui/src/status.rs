//! Status presenter: what a panel's content region currently shows.
//!
//! A region is in exactly one of three visible states: loading, empty, or
//! populated (links present). A load error stored with `set_error` overrides
//! all of them for the rest of the session.

use crate::render::ChannelLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indicator {
    #[default]
    None,
    Loading,
    Empty,
}

/// What the region draws, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionView<'a> {
    Error(&'a str),
    Loading,
    Empty,
    Links(&'a [ChannelLink]),
    Blank,
}

#[derive(Debug, Clone, Default)]
pub struct PanelContent {
    indicator: Indicator,
    links: Vec<ChannelLink>,
    error: Option<String>,
}

impl PanelContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate the loading indicator. Always drops previously rendered links
    /// so nothing stale survives a re-open.
    pub fn show_loading(&mut self) {
        self.indicator = Indicator::Loading;
        self.links.clear();
    }

    pub fn hide_loading(&mut self) {
        if self.indicator == Indicator::Loading {
            self.indicator = Indicator::None;
        }
    }

    pub fn show_empty(&mut self) {
        self.indicator = Indicator::Empty;
    }

    /// Clear the loading and empty indicators, keeping links.
    pub fn clear(&mut self) {
        self.indicator = Indicator::None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.links.clear();
        self.indicator = Indicator::None;
    }

    pub fn push_link(&mut self, link: ChannelLink) {
        self.links.push(link);
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn links(&self) -> &[ChannelLink] {
        &self.links
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> RegionView<'_> {
        if let Some(err) = self.error.as_deref() {
            return RegionView::Error(err);
        }
        match self.indicator {
            Indicator::Loading => RegionView::Loading,
            Indicator::Empty => RegionView::Empty,
            Indicator::None if !self.links.is_empty() => RegionView::Links(&self.links),
            Indicator::None => RegionView::Blank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvdir_proto::catalog::Channel;

    fn link(name: &str) -> ChannelLink {
        ChannelLink::from_channel(&Channel {
            name: name.to_string(),
            ..Channel::default()
        })
    }

    #[test]
    fn show_loading_drops_links() {
        let mut content = PanelContent::new();
        content.push_link(link("A"));
        content.push_link(link("B"));
        assert!(matches!(content.view(), RegionView::Links(l) if l.len() == 2));

        content.show_loading();
        assert!(content.links().is_empty());
        assert_eq!(content.view(), RegionView::Loading);

        // idempotent
        content.show_loading();
        assert_eq!(content.indicator(), Indicator::Loading);
    }

    #[test]
    fn empty_replaces_loading() {
        let mut content = PanelContent::new();
        content.show_loading();
        content.show_empty();
        assert_eq!(content.view(), RegionView::Empty);

        content.hide_loading();
        assert_eq!(content.view(), RegionView::Empty, "hide_loading leaves empty alone");

        content.clear();
        assert_eq!(content.view(), RegionView::Blank);
    }

    #[test]
    fn error_takes_precedence_and_persists() {
        let mut content = PanelContent::new();
        content.set_error("boom");
        content.show_loading();
        assert_eq!(content.view(), RegionView::Error("boom"));
        content.hide_loading();
        content.show_empty();
        assert_eq!(content.error(), Some("boom"));
        assert_eq!(content.view(), RegionView::Error("boom"));
    }
}
