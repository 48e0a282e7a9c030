//! Ticker: the running announcement text, scrolling right to left.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_TICKER_FG},
};

/// A display cell: one base character plus any zero-width marks after it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    text: String,
    width: usize,
}

fn cells(text: &str) -> Vec<Cell> {
    let mut out: Vec<Cell> = Vec::new();
    for ch in text.chars() {
        if ch == '\n' || ch == '\t' {
            out.push(Cell {
                text: " ".into(),
                width: 1,
            });
            continue;
        }
        let w = ch.width().unwrap_or(0);
        match out.last_mut() {
            Some(last) if w == 0 => last.text.push(ch),
            _ if w == 0 => {}
            _ => out.push(Cell {
                text: ch.to_string(),
                width: w,
            }),
        }
    }
    out
}

/// Visible `width` columns of the strip "`width` blanks, then `text`" at
/// `offset`, wrapping once the text has fully left the left edge.
pub fn marquee_frame(text: &str, width: usize, offset: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let cells = cells(text);
    let text_w: usize = cells.iter().map(|c| c.width).sum();
    let cycle = width + text_w;
    let start = offset % cycle;
    let end = start + width;

    let mut out = String::new();
    let mut used = 0usize;
    let mut col = width; // text starts after the leading blanks
    if start < width {
        let blanks = width - start;
        out.push_str(&" ".repeat(blanks));
        used = blanks;
    }
    for cell in &cells {
        let cell_end = col + cell.width;
        if cell_end > end {
            break;
        }
        if col >= start {
            out.push_str(&cell.text);
            used += cell.width;
        } else if cell_end > start {
            // wide cell cut by the left edge
            out.push_str(&" ".repeat(cell_end - start));
            used += cell_end - start;
        }
        col = cell_end;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub struct Ticker {
    offset: usize,
    last_text: String,
}

impl Ticker {
    pub fn new() -> Self {
        Self {
            offset: 0,
            last_text: String::new(),
        }
    }
}

impl Component for Ticker {
    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if state.running_text != self.last_text {
            self.last_text = state.running_text.clone();
            self.offset = 0;
        } else {
            self.offset = self.offset.wrapping_add(1);
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let style = if state.text_loaded {
            Style::default().fg(C_TICKER_FG)
        } else {
            Style::default().fg(C_MUTED)
        };
        let visible = marquee_frame(&state.running_text, area.width as usize, self.offset);
        frame.render_widget(Paragraph::new(Line::from(Span::styled(visible, style))), area);
    }
}
