//! Channel directory data model: channels, the text bundle and panel identities.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One streaming link entry as it appears in `channels.json`.
///
/// Every field defaults to an empty string so a partially filled entry still
/// produces a (degraded) link instead of failing the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img_src: String,
    #[serde(default)]
    pub data_url: String,
    #[serde(default)]
    pub aria_label: String,
}

impl Channel {
    /// Convert the elements of an already shape-checked JSON array.
    /// Elements that are not objects are skipped; missing or non-string
    /// fields become empty strings.
    pub fn list_from_values(values: Vec<Value>) -> Vec<Channel> {
        let total = values.len();
        let channels: Vec<Channel> = values
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| match value.as_object() {
                Some(obj) => Some(Channel::from_object(obj)),
                None => {
                    tracing::warn!("skipping channel entry #{}: not an object", idx);
                    None
                }
            })
            .collect();
        tracing::debug!("parsed {} of {} channel entries", channels.len(), total);
        channels
    }

    fn from_object(obj: &Map<String, Value>) -> Channel {
        let field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Channel {
            category: field("category"),
            name: field("name"),
            img_src: field("img_src"),
            data_url: field("data_url"),
            aria_label: field("aria_label"),
        }
    }
}

/// Freeform page strings (ticker and footer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBundle {
    pub running_text: Option<String>,
    pub footer_text: Option<String>,
}

impl TextBundle {
    /// Pick the known keys out of a JSON object. Non-string and empty values
    /// count as absent so they never blank out placeholder text.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            running_text: text("runningText"),
            footer_text: text("footerText"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.running_text.is_none() && self.footer_text.is_none()
    }
}

/// A category panel as configured: the visible trigger text (usually an
/// emoji followed by the category name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSpec {
    pub trigger: String,
}

impl PanelSpec {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
        }
    }

    /// Category label used to match `Channel::category`.
    pub fn label(&self) -> String {
        category_label(&self.trigger)
    }
}

/// The built-in panel set, in display order.
pub fn default_panels() -> Vec<PanelSpec> {
    [
        "📺 ทีวีดิจิตอล",
        "⚽ กีฬา",
        "🎬 หนังทีวี",
        "🌍 สารคดี",
        "📡 IPTV",
    ]
    .into_iter()
    .map(PanelSpec::new)
    .collect()
}

fn decoration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\x{1F000}-\x{1FFFF}\x{2000}-\x{2BFF}]").expect("static decoration regex")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace regex"))
}

/// Strip decorative glyphs (emoji and symbol blocks) from a trigger text,
/// collapse runs of whitespace and trim.
pub fn category_label(trigger: &str) -> String {
    let stripped = decoration_re().replace_all(trigger, "");
    whitespace_re()
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_strips_emoji_and_whitespace() {
        assert_eq!(category_label("📺 ทีวีดิจิตอล"), "ทีวีดิจิตอล");
        assert_eq!(category_label("  ⚽   กีฬา  "), "กีฬา");
        assert_eq!(category_label("📡 IPTV"), "IPTV");
        assert_eq!(category_label("★ Live\t\tNow ☆"), "Live Now");
    }

    #[test]
    fn default_panel_labels() {
        let labels: Vec<String> = default_panels().iter().map(PanelSpec::label).collect();
        assert_eq!(
            labels,
            vec!["ทีวีดิจิตอล", "กีฬา", "หนังทีวี", "สารคดี", "IPTV"]
        );
    }

    #[test]
    fn channel_list_skips_non_objects_and_blanks_bad_fields() {
        let values = vec![
            json!({"category": "กีฬา", "name": "ESPN", "img_src": "a.png",
                   "data_url": "http://x/espn", "aria_label": "ESPN"}),
            json!(42),
            json!({"category": "IPTV", "name": "Only name"}),
            json!({"category": 7}),
        ];
        let channels = Channel::list_from_values(values);
        assert_eq!(channels.len(), 3);
        assert_eq!(channels[0].data_url, "http://x/espn");
        assert_eq!(channels[1].name, "Only name");
        assert!(channels[1].data_url.is_empty());
        assert_eq!(channels[2], Channel::default());
    }

    #[test]
    fn text_bundle_ignores_empty_and_non_string_values() {
        let value = json!({"runningText": "", "footerText": 5, "extra": "x"});
        let bundle = TextBundle::from_map(value.as_object().unwrap());
        assert!(bundle.is_empty());

        let value = json!({"runningText": "ข่าวด่วน", "footerText": "© tvdir"});
        let bundle = TextBundle::from_map(value.as_object().unwrap());
        assert_eq!(bundle.running_text.as_deref(), Some("ข่าวด่วน"));
        assert_eq!(bundle.footer_text.as_deref(), Some("© tvdir"));
    }
}
