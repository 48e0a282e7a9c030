//! Action enum: user intents produced by components, dispatched by the App.

use crate::analytics::ChannelClick;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Directory ────────────────────────────────────────────────────────────
    /// Panel `i` started opening and needs the channel list.
    EnsureChannels(usize),
    /// A channel tile was activated.
    OpenChannel(ChannelClick),

    // ── UI ───────────────────────────────────────────────────────────────────
    CopyToClipboard(String), // text to copy

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
