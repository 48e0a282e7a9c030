//! Footer: the footer text above the keys bar.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    app_state::AppState,
    component::Component,
    theme::{style_secondary, C_MUTED, C_SEPARATOR},
    widgets::status_bar,
};

pub struct Footer;

impl Footer {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Footer {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height < 2 {
            status_bar::draw_keys_bar(frame, area);
            return;
        }
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(C_SEPARATOR));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_style = if state.text_loaded {
            style_secondary()
        } else {
            Style::default().fg(C_MUTED)
        };
        let text_area = Rect { height: 1, ..inner };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(state.footer_text.as_str(), text_style)))
                .alignment(Alignment::Center),
            text_area,
        );
        if inner.height > 1 {
            let keys_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            status_bar::draw_keys_bar(frame, keys_area);
        }
    }

    fn height(&self) -> u16 {
        3
    }
}
