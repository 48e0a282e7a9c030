//! Component trait: the interface every screen region implements.
//!
//! Components own their state and render themselves. They read `AppState`
//! for data they don't own and return `Vec<Action>` instead of touching
//! anything else; the App event loop dispatches those actions.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::app_state::AppState;

pub trait Component {
    /// Handle a key event. Returns actions to be dispatched.
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Handle a mouse event inside `area`, the rect of the last draw.
    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Called each UI tick (~100ms) for animations.
    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Rows the component wants in the outer layout.
    fn height(&self) -> u16 {
        1
    }
}
