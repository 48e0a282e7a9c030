//! Directory: the accordion of category panels and their channel tiles.
//!
//! The `Accordion` decides state; this component owns what the terminal
//! shows. It applies the returned effects to each panel's view, animates the
//! content height toward its bound on every tick, and reports the end of a
//! close animation back to the accordion.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use tvdir_proto::catalog::{Channel, PanelSpec};
use tvdir_proto::config::TextConfig;

use crate::{
    accordion::{Accordion, Effect, PanelState},
    action::Action,
    analytics::ChannelClick,
    app_state::AppState,
    component::Component,
    render::{self, wrap_text, ChannelLink, TILE_HEIGHT, TILE_WIDTH},
    status::{PanelContent, RegionView},
    theme::{style_error, style_secondary, C_LOADING},
    widgets::pane_chrome::{tile_block, trigger_line},
};

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
/// Columns between the left edge and the content region.
const INDENT: u16 = 3;

/// Presentation flags of one content region, mirroring the effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelView {
    /// In the layout at all.
    pub displayed: bool,
    /// Trigger reports expanded.
    pub expanded: bool,
    /// Content visible (target height is the bound).
    pub shown: bool,
    pub height_bound: u16,
    /// Current animated height in rows.
    pub height: u16,
}

pub struct CategoryPanel {
    pub spec: PanelSpec,
    pub label: String,
    pub content: PanelContent,
    pub view: PanelView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Trigger(usize),
    Link(usize, usize),
}

pub struct Directory {
    panels: Vec<CategoryPanel>,
    accordion: Accordion,
    cursor: Cursor,
    scroll: u16,
    /// Content width used for the last measurement.
    content_width: u16,
    spinner: usize,
    loading_message: String,
    empty_message: String,
    /// Screen rects of the last draw, for mouse hits.
    hits: Vec<(Rect, Cursor)>,
}

impl Directory {
    pub fn new(specs: &[PanelSpec], text: &TextConfig) -> Self {
        let panels: Vec<CategoryPanel> = specs
            .iter()
            .map(|spec| CategoryPanel {
                label: spec.label(),
                spec: spec.clone(),
                content: PanelContent::new(),
                view: PanelView::default(),
            })
            .collect();
        tracing::debug!(
            "directory panels: {:?}",
            panels.iter().map(|p| p.label.as_str()).collect::<Vec<_>>()
        );
        Self {
            accordion: Accordion::new(panels.len()),
            panels,
            cursor: Cursor::Trigger(0),
            scroll: 0,
            content_width: 80 - INDENT,
            spinner: 0,
            loading_message: text.loading_message.clone(),
            empty_message: text.empty_message.clone(),
            hits: Vec::new(),
        }
    }

    pub fn panels(&self) -> &[CategoryPanel] {
        &self.panels
    }

    pub fn state(&self, idx: usize) -> PanelState {
        self.accordion.state(idx)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Panels waiting for channel data.
    pub fn opening(&self) -> Vec<usize> {
        self.accordion.opening()
    }

    pub fn toggle(&mut self, idx: usize) -> Vec<Action> {
        let effects = self.accordion.toggle(idx);
        let actions = self.apply(effects);
        self.normalize_cursor();
        actions
    }

    /// Render, measure and finish opening `idx` with the loaded (or empty)
    /// channel list.
    ///
    /// An empty list is what a failed load leaves behind, so it is treated
    /// the same way: the status is cleared and no empty message is shown.
    pub fn finish_open(&mut self, idx: usize, channels: &[Channel]) -> Vec<Action> {
        if self.accordion.state(idx) != PanelState::Opening {
            return Vec::new();
        }
        let Some(panel) = self.panels.get_mut(idx) else {
            return Vec::new();
        };
        // The loading indicator must be gone before the region is measured.
        panel.content.clear();
        if !channels.is_empty()
            && render::render(&mut panel.content, &panel.label, channels) == 0
        {
            panel.content.show_empty();
        }
        let height = render::measure(&panel.content, self.content_width);
        let effects = self.accordion.complete_open(idx, height);
        self.apply(effects)
    }

    /// A failed channel load: every region shows `message` for the session.
    pub fn show_load_error(&mut self, message: &str) {
        for panel in &mut self.panels {
            panel.content.set_error(message);
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Action> {
        let mut actions = Vec::new();
        for effect in effects {
            tracing::trace!("accordion effect {:?}", effect);
            match effect {
                Effect::Display(i) => self.panels[i].view.displayed = true,
                Effect::SetExpanded(i, expanded) => self.panels[i].view.expanded = expanded,
                Effect::ShowLoading(i) => self.panels[i].content.show_loading(),
                Effect::HideLoading(i) => self.panels[i].content.hide_loading(),
                Effect::EnsureChannels(i) => actions.push(Action::EnsureChannels(i)),
                Effect::SetHeightBound(i, h) => self.panels[i].view.height_bound = h,
                Effect::SetShown(i, shown) => self.panels[i].view.shown = shown,
                Effect::HideFromLayout(i) => {
                    let view = &mut self.panels[i].view;
                    view.displayed = false;
                    view.height = 0;
                }
            }
        }
        actions
    }

    /// Move the animated heights one step and finish close animations.
    fn animate(&mut self) {
        for i in 0..self.panels.len() {
            let view = &mut self.panels[i].view;
            let target = if view.shown { view.height_bound } else { 0 };
            if view.height < target {
                view.height += (target - view.height).div_ceil(2);
            } else if view.height > target {
                view.height -= (view.height - target).div_ceil(2);
            }
            if view.height == 0 && self.accordion.state(i) == PanelState::Closing {
                let effects = self.accordion.transition_end(i);
                self.apply(effects);
            }
        }
    }

    /// Re-measure open panels when the width changes.
    fn set_content_width(&mut self, width: u16) {
        if width == self.content_width {
            return;
        }
        self.content_width = width;
        for i in 0..self.panels.len() {
            if self.accordion.state(i) == PanelState::Open {
                let panel = &mut self.panels[i];
                panel.view.height_bound = render::measure(&panel.content, width)
                    .saturating_add(crate::accordion::HEIGHT_MARGIN);
            }
        }
    }

    fn columns(&self) -> usize {
        render::columns(self.content_width)
    }

    /// Links that can take the cursor: only those of a fully open panel.
    fn links_of(&self, idx: usize) -> &[ChannelLink] {
        if self.accordion.state(idx) != PanelState::Open {
            return &[];
        }
        match self.panels[idx].content.view() {
            RegionView::Links(links) => links,
            _ => &[],
        }
    }

    fn normalize_cursor(&mut self) {
        if let Cursor::Link(i, l) = self.cursor {
            if l >= self.links_of(i).len() {
                self.cursor = Cursor::Trigger(i);
            }
        }
        if let Cursor::Trigger(i) = self.cursor {
            if i >= self.panels.len() {
                self.cursor = Cursor::Trigger(self.panels.len().saturating_sub(1));
            }
        }
    }

    fn move_down(&mut self) {
        let cols = self.columns();
        let last = self.panels.len().saturating_sub(1);
        self.cursor = match self.cursor {
            Cursor::Trigger(i) if !self.links_of(i).is_empty() => Cursor::Link(i, 0),
            Cursor::Trigger(i) => Cursor::Trigger((i + 1).min(last)),
            Cursor::Link(i, l) if l + cols < self.links_of(i).len() => Cursor::Link(i, l + cols),
            Cursor::Link(i, _) if i < last => Cursor::Trigger(i + 1),
            other => other,
        };
    }

    fn move_up(&mut self) {
        let cols = self.columns();
        self.cursor = match self.cursor {
            Cursor::Trigger(0) => Cursor::Trigger(0),
            Cursor::Trigger(i) => {
                let n = self.links_of(i - 1).len();
                if n > 0 {
                    Cursor::Link(i - 1, (n - 1) / cols * cols)
                } else {
                    Cursor::Trigger(i - 1)
                }
            }
            Cursor::Link(i, l) if l >= cols => Cursor::Link(i, l - cols),
            Cursor::Link(i, _) => Cursor::Trigger(i),
        };
    }

    fn move_horizontal(&mut self, forward: bool) {
        if let Cursor::Link(i, l) = self.cursor {
            let n = self.links_of(i).len();
            if forward && l + 1 < n {
                self.cursor = Cursor::Link(i, l + 1);
            } else if !forward && l > 0 {
                self.cursor = Cursor::Link(i, l - 1);
            }
        }
    }

    fn selected_link(&self) -> Option<(usize, &ChannelLink)> {
        match self.cursor {
            Cursor::Link(i, l) => self.links_of(i).get(l).map(|link| (i, link)),
            Cursor::Trigger(_) => None,
        }
    }

    fn activate(&mut self) -> Vec<Action> {
        match self.cursor {
            Cursor::Trigger(i) => self.toggle(i),
            Cursor::Link(..) => match self.selected_link() {
                Some((i, link)) => vec![Action::OpenChannel(ChannelClick {
                    channel_name: link.image.alt.clone(),
                    category: self.panels[i].label.clone(),
                    link_url: link.href.clone(),
                })],
                None => Vec::new(),
            },
        }
    }

    /// Rows the content region of `idx` takes right now.
    fn region_rows(&self, idx: usize) -> u16 {
        let view = &self.panels[idx].view;
        if !view.displayed {
            return 0;
        }
        if self.accordion.state(idx) == PanelState::Opening {
            return view.height.max(1);
        }
        view.height
    }

    /// Virtual row of the cursor, from the top of the list.
    fn cursor_row(&self) -> u16 {
        let (target, tile_row) = match self.cursor {
            Cursor::Trigger(i) => (i, None),
            Cursor::Link(i, l) => (i, Some((l / self.columns()) as u16)),
        };
        let mut y = 0u16;
        for i in 0..target.min(self.panels.len()) {
            y += 1 + self.region_rows(i);
        }
        match tile_row {
            None => y,
            Some(r) => y + 1 + r * TILE_HEIGHT,
        }
    }

    fn scroll_into_view(&mut self, height: u16) {
        let row = self.cursor_row();
        let extent = match self.cursor {
            Cursor::Trigger(_) => 1,
            Cursor::Link(..) => TILE_HEIGHT,
        };
        if row < self.scroll {
            self.scroll = row;
        } else if row + extent > self.scroll + height {
            self.scroll = (row + extent).saturating_sub(height);
        }
    }

    fn draw_region(&mut self, frame: &mut Frame, idx: usize, region: Rect, virtual_top: i32) {
        let rows = self.region_rows(idx) as i32;
        let top = region.y as i32;
        let bottom = (region.y + region.height) as i32;
        let x = region.x + INDENT;
        let width = region.width.saturating_sub(INDENT);

        // Screen row of content line `k`, if it is inside the window and bound.
        let screen_row = |k: i32| -> Option<u16> {
            let y = virtual_top + k;
            (k < rows && y >= top && y < bottom).then_some(y as u16)
        };

        let spinner = SPINNER_FRAMES[self.spinner % SPINNER_FRAMES.len()];
        let panel = &self.panels[idx];
        let text_lines: Vec<Line> = match panel.content.view() {
            RegionView::Error(message) => wrap_text(message, width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, style_error())))
                .collect(),
            RegionView::Loading => vec![Line::from(vec![
                Span::styled(format!("{} ", spinner), Style::default().fg(C_LOADING)),
                Span::styled(self.loading_message.clone(), Style::default().fg(C_LOADING)),
            ])],
            RegionView::Empty => vec![Line::from(Span::styled(
                self.empty_message.clone(),
                style_secondary().add_modifier(Modifier::ITALIC),
            ))],
            RegionView::Blank => Vec::new(),
            RegionView::Links(links) => {
                let cols = render::columns(width);
                let mut hits = Vec::new();
                for (l, link) in links.iter().enumerate() {
                    let k = ((l / cols) as u16 * TILE_HEIGHT) as i32;
                    // A tile is drawn only when all of its rows are visible.
                    let (Some(y0), Some(_)) =
                        (screen_row(k), screen_row(k + TILE_HEIGHT as i32 - 1))
                    else {
                        continue;
                    };
                    let rect = Rect {
                        x: x + (l % cols) as u16 * TILE_WIDTH,
                        y: y0,
                        width: TILE_WIDTH.min(width),
                        height: TILE_HEIGHT,
                    };
                    let focused = self.cursor == Cursor::Link(idx, l);
                    let block = tile_block(focused);
                    let inner = block.inner(rect);
                    frame.render_widget(block, rect);
                    let title = fit(link.title(), inner.width as usize);
                    let style = if focused {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    frame.render_widget(Paragraph::new(Span::styled(title, style)), inner);
                    hits.push((rect, Cursor::Link(idx, l)));
                }
                self.hits.extend(hits);
                return;
            }
        };

        for (k, line) in text_lines.into_iter().enumerate() {
            if let Some(y) = screen_row(k as i32) {
                frame.render_widget(
                    Paragraph::new(line),
                    Rect {
                        x,
                        y,
                        width,
                        height: 1,
                    },
                );
            }
        }
    }
}

/// Truncate to `width` display columns, marking the cut with `…`.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

impl Component for Directory {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Right | KeyCode::Char('l') => self.move_horizontal(true),
            KeyCode::Left | KeyCode::Char('h') => self.move_horizontal(false),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = Cursor::Trigger(0),
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate(),
            KeyCode::Char('y') => {
                if let Some((_, link)) = self.selected_link() {
                    return vec![Action::CopyToClipboard(link.href.clone())];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollDown => {
                self.move_down();
                Vec::new()
            }
            MouseEventKind::ScrollUp => {
                self.move_up();
                Vec::new()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self.hits.iter().find(|(r, _)| {
                    event.column >= r.x
                        && event.column < r.x + r.width
                        && event.row >= r.y
                        && event.row < r.y + r.height
                });
                match hit {
                    Some((_, cursor)) => {
                        self.cursor = *cursor;
                        self.activate()
                    }
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        self.spinner = self.spinner.wrapping_add(1);
        self.animate();
        self.normalize_cursor();
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &AppState) {
        self.hits.clear();
        if area.height == 0 || area.width == 0 {
            return;
        }
        self.set_content_width(area.width.saturating_sub(INDENT));
        self.scroll_into_view(area.height);

        let mut virtual_y: i32 = area.y as i32 - self.scroll as i32;
        let bottom = (area.y + area.height) as i32;
        for idx in 0..self.panels.len() {
            if virtual_y >= bottom {
                break;
            }
            if virtual_y >= area.y as i32 {
                let rect = Rect {
                    x: area.x,
                    y: virtual_y as u16,
                    width: area.width,
                    height: 1,
                };
                let panel = &self.panels[idx];
                let focused = self.cursor == Cursor::Trigger(idx);
                frame.render_widget(
                    Paragraph::new(trigger_line(&panel.spec.trigger, panel.view.expanded, focused)),
                    rect,
                );
                self.hits.push((rect, Cursor::Trigger(idx)));
            }
            virtual_y += 1;

            let rows = self.region_rows(idx);
            if rows > 0 {
                self.draw_region(frame, idx, area, virtual_y);
                virtual_y += rows as i32;
            }
        }
    }

    fn height(&self) -> u16 {
        (0..self.panels.len()).map(|i| 1 + self.region_rows(i)).sum()
    }
}
