//! AppState: shared read-only data passed to components during render/event.
//!
//! Only the App event loop writes to it.

use tvdir_proto::catalog::TextBundle;
use tvdir_proto::config::TextConfig;

use crate::clock::ClockReading;

pub struct AppState {
    pub clock: ClockReading,
    /// Ticker text: placeholder until the text bundle arrives.
    pub running_text: String,
    pub footer_text: String,
    pub text_loaded: bool,
}

impl AppState {
    pub fn new(text: &TextConfig, clock: ClockReading) -> Self {
        Self {
            clock,
            running_text: text.running_placeholder.clone(),
            footer_text: text.footer_placeholder.clone(),
            text_loaded: false,
        }
    }

    /// Apply the present fields of a loaded bundle; absent ones keep the
    /// current text.
    pub fn apply_texts(&mut self, bundle: &TextBundle) {
        if let Some(running) = &bundle.running_text {
            self.running_text = running.clone();
        }
        if let Some(footer) = &bundle.footer_text {
            self.footer_text = footer.clone();
        }
        self.text_loaded = true;
    }

    pub fn apply_text_error(&mut self) {
        self.running_text = RUNNING_TEXT_ERROR.to_string();
        self.footer_text = FOOTER_TEXT_ERROR.to_string();
        self.text_loaded = true;
    }
}

pub const RUNNING_TEXT_ERROR: &str = "เกิดข้อผิดพลาดในการโหลดข้อความประกาศ!";
pub const FOOTER_TEXT_ERROR: &str = "เกิดข้อผิดพลาดในการโหลดข้อความท้ายหน้า!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_bundle_keeps_placeholder() {
        let text = TextConfig::default();
        let mut state = AppState::new(&text, ClockReading::default());
        state.apply_texts(&TextBundle {
            running_text: Some("ข่าวด่วน".into()),
            footer_text: None,
        });
        assert_eq!(state.running_text, "ข่าวด่วน");
        assert_eq!(state.footer_text, text.footer_placeholder);
        assert!(state.text_loaded);
    }

    #[test]
    fn failure_replaces_both_texts() {
        let mut state = AppState::new(&TextConfig::default(), ClockReading::default());
        state.apply_text_error();
        assert_eq!(state.running_text, RUNNING_TEXT_ERROR);
        assert_eq!(state.footer_text, FOOTER_TEXT_ERROR);
    }
}
