//! Channel renderer: turns the matching channels of a category into links,
//! and measures how many rows a region needs at a given width.

use unicode_width::UnicodeWidthStr;

use tvdir_proto::catalog::Channel;

use crate::status::{PanelContent, RegionView};

/// Columns taken by one channel tile, borders included.
pub const TILE_WIDTH: u16 = 22;
/// Rows taken by one row of tiles (top border, name, bottom border).
pub const TILE_HEIGHT: u16 = 3;

/// Channel logo. Loading is lazy: `src` is only carried along, nothing
/// fetches it while the directory renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkImage {
    pub src: String,
    pub alt: String,
}

/// One rendered channel link. Values are carried over from the channel as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLink {
    pub href: String,
    pub aria_label: String,
    pub image: LinkImage,
}

impl ChannelLink {
    pub fn from_channel(channel: &Channel) -> Self {
        Self {
            href: channel.data_url.clone(),
            aria_label: channel.aria_label.clone(),
            image: LinkImage {
                src: channel.img_src.clone(),
                alt: channel.name.clone(),
            },
        }
    }

    /// Text shown on the tile: the image alt, falling back to the accessible label.
    pub fn title(&self) -> &str {
        if !self.image.alt.is_empty() {
            &self.image.alt
        } else if !self.aria_label.is_empty() {
            &self.aria_label
        } else {
            "?"
        }
    }
}

/// Channels whose category equals `label` exactly, in input order.
pub fn matching<'a>(label: &'a str, channels: &'a [Channel]) -> impl Iterator<Item = &'a Channel> {
    channels.iter().filter(move |ch| ch.category == label)
}

/// Append one link per matching channel to `content`. Returns the number added.
pub fn render(content: &mut PanelContent, label: &str, channels: &[Channel]) -> usize {
    let mut added = 0;
    for channel in matching(label, channels) {
        content.push_link(ChannelLink::from_channel(channel));
        added += 1;
    }
    tracing::debug!("rendered {} channel(s) for {:?}", added, label);
    added
}

/// Number of tiles per row at `width` columns (at least one).
pub fn columns(width: u16) -> usize {
    (width / TILE_WIDTH).max(1) as usize
}

/// Natural height of the region content in rows, before any margin.
pub fn measure(content: &PanelContent, width: u16) -> u16 {
    match content.view() {
        RegionView::Error(message) => wrap_text(message, width).len() as u16,
        RegionView::Loading | RegionView::Empty => 1,
        RegionView::Links(links) => {
            let rows = links.len().div_ceil(columns(width));
            rows as u16 * TILE_HEIGHT
        }
        RegionView::Blank => 0,
    }
}

/// Break `text` into lines no wider than `width` display columns. Explicit
/// newlines are kept; words longer than a line are split by character.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_w = 0usize;
        for word in paragraph.split(' ') {
            let word_w = word.width();
            let sep = usize::from(!line.is_empty());
            if line_w + sep + word_w <= width {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_w += sep + word_w;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_w = 0;
            }
            for ch in word.chars() {
                let ch_w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
                if line_w + ch_w > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_w = 0;
                }
                line.push(ch);
                line_w += ch_w;
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(category: &str, name: &str, url: &str) -> Channel {
        Channel {
            category: category.to_string(),
            name: name.to_string(),
            img_src: format!("{}.png", name),
            data_url: url.to_string(),
            aria_label: name.to_string(),
        }
    }

    #[test]
    fn single_sports_channel_becomes_one_link() {
        let channels = vec![Channel {
            category: "กีฬา".into(),
            name: "ESPN".into(),
            img_src: "a.png".into(),
            data_url: "http://x/espn".into(),
            aria_label: "ESPN".into(),
        }];
        let mut content = PanelContent::new();
        assert_eq!(render(&mut content, "กีฬา", &channels), 1);

        let link = &content.links()[0];
        assert_eq!(link.href, "http://x/espn");
        assert_eq!(link.image.alt, "ESPN");
        assert_eq!(link.image.src, "a.png");
        assert_eq!(link.aria_label, "ESPN");
    }

    #[test]
    fn filter_is_exact_and_keeps_order() {
        let channels = vec![
            channel("IPTV", "B", "http://b"),
            channel("iptv", "lower", "http://l"),
            channel("กีฬา", "S", "http://s"),
            channel(" IPTV", "padded", "http://p"),
            channel("IPTV", "A", "http://a"),
        ];
        let mut content = PanelContent::new();
        assert_eq!(render(&mut content, "IPTV", &channels), 2);
        let names: Vec<&str> = content.links().iter().map(|l| l.title()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn no_match_renders_nothing() {
        let channels = vec![channel("IPTV", "A", "http://a")];
        let mut content = PanelContent::new();
        assert_eq!(render(&mut content, "สารคดี", &channels), 0);
        assert!(content.links().is_empty());
    }

    #[test]
    fn malformed_urls_pass_through() {
        let channels = vec![channel("IPTV", "Odd", "not a url <>")];
        let mut content = PanelContent::new();
        render(&mut content, "IPTV", &channels);
        assert_eq!(content.links()[0].href, "not a url <>");
    }

    #[test]
    fn reopening_with_new_data_leaves_no_stale_links() {
        let first = vec![channel("IPTV", "Old1", "http://o1"), channel("IPTV", "Old2", "http://o2")];
        let second = vec![channel("IPTV", "New", "http://n")];
        let mut content = PanelContent::new();

        content.show_loading();
        render(&mut content, "IPTV", &first);
        content.hide_loading();
        assert_eq!(content.links().len(), 2);

        content.show_loading();
        assert!(content.links().is_empty());
        render(&mut content, "IPTV", &second);
        content.hide_loading();
        let hrefs: Vec<&str> = content.links().iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["http://n"]);
    }

    #[test]
    fn measure_counts_tile_rows() {
        let channels: Vec<Channel> = (0..5)
            .map(|i| channel("IPTV", &format!("C{}", i), "http://c"))
            .collect();
        let mut content = PanelContent::new();
        render(&mut content, "IPTV", &channels);

        // 2 tiles per row at 44..65 columns → 3 rows
        assert_eq!(measure(&content, TILE_WIDTH * 2), 3 * TILE_HEIGHT);
        // narrower than one tile still fits one per row
        assert_eq!(measure(&content, 5), 5 * TILE_HEIGHT);

        content.show_empty();
        assert_eq!(measure(&content, 80), 1);
    }

    #[test]
    fn measure_wraps_error_text() {
        let mut content = PanelContent::new();
        content.set_error("aaaa bbbb\ncccc");
        assert_eq!(measure(&content, 80), 2);
        assert_eq!(measure(&content, 4), 3);
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
