//! Shared chrome for the directory: trigger rows and channel tile frames.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
};

use crate::theme::{
    style_focused_border, style_unfocused_border, C_ACCENT, C_PRIMARY, C_SECONDARY,
    C_SELECTION_BG, C_TILE_BORDER,
};

/// One accordion trigger: `▸ 📺 ทีวีดิจิตอล` collapsed, `▾ …` expanded.
pub fn trigger_line(text: &str, expanded: bool, focused: bool) -> Line<'static> {
    let arrow = if expanded { "▾" } else { "▸" };
    let arrow_style = if expanded {
        Style::default().fg(C_ACCENT)
    } else {
        Style::default().fg(C_SECONDARY)
    };
    let mut text_style = Style::default().fg(C_PRIMARY);
    if expanded {
        text_style = text_style.add_modifier(Modifier::BOLD);
    }
    let mut line = Line::from(vec![
        Span::styled(format!(" {} ", arrow), arrow_style),
        Span::styled(text.to_string(), text_style),
    ]);
    if focused {
        line = line.style(Style::default().bg(C_SELECTION_BG));
    }
    line
}

/// Frame around a channel tile.
pub fn tile_block<'a>(focused: bool) -> Block<'a> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border().fg(C_TILE_BORDER)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(border_style)
}
