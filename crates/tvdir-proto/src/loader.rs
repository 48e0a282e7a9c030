//! Data loader: fetches and memoizes the two directory resources.
//!
//! Each resource has one `LoadState` slot:
//! ```text
//!  Unloaded ──begin──▶ Loading ──finish(Ok)──▶ Loaded(T)
//!                              └─finish(Err)─▶ Failed { error, empty }
//! ```
//! `Loaded` and `Failed` are terminal for the session. A failure stores the
//! empty value (empty list / empty bundle) so later readers get something to
//! work with, and the slot is never fetched again.
//!
//! The loader does not spawn anything itself: `begin_*` hands out a `'static`
//! future that the owner can await inline (`ensure_*`) or run on a background
//! task and report back through `finish_*`.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{Channel, TextBundle};
use crate::source::ResourceSource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("{resource} not found (HTTP 404). Please ensure the file exists at the root of your server.")]
    NotFound { resource: String },

    #[error("Failed to load {resource}: HTTP error! status: {status}")]
    Http { resource: String, status: u16 },

    #[error("{resource} is not valid JSON: {detail}")]
    Parse { resource: String, detail: String },

    #[error("Fetched data from {resource} is not {expected}.")]
    Shape {
        resource: String,
        expected: &'static str,
    },

    #[error("Failed to load {resource}: {detail}")]
    Transport { resource: String, detail: String },
}

impl LoadError {
    pub fn resource(&self) -> &str {
        match self {
            Self::NotFound { resource }
            | Self::Http { resource, .. }
            | Self::Parse { resource, .. }
            | Self::Shape { resource, .. }
            | Self::Transport { resource, .. } => resource,
        }
    }
}

/// Per-resource load progress.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Unloaded,
    Loading,
    Loaded(T),
    Failed { error: LoadError, empty: T },
}

impl<T> LoadState<T> {
    /// The memoized value: the data after success, the empty value after failure.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            Self::Failed { empty, .. } => Some(empty),
            Self::Unloaded | Self::Loading => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// True once the slot reached `Loaded` or `Failed`.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Resource file names, relative to the source base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub channels: String,
    pub texts: String,
}

impl Default for ResourceNames {
    fn default() -> Self {
        Self {
            channels: "channels.json".to_string(),
            texts: "texts.json".to_string(),
        }
    }
}

/// Fetch a resource and parse it as JSON, whatever its shape.
pub async fn fetch_json(source: &dyn ResourceSource, name: &str) -> Result<Value, LoadError> {
    let bytes = source.fetch(name).await?;
    serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
        resource: name.to_string(),
        detail: e.to_string(),
    })
}

/// Fetch the channel list; the top level must be a JSON array.
pub async fn fetch_channels(
    source: &dyn ResourceSource,
    name: &str,
) -> Result<Vec<Channel>, LoadError> {
    match fetch_json(source, name).await? {
        Value::Array(values) => Ok(Channel::list_from_values(values)),
        _ => Err(LoadError::Shape {
            resource: name.to_string(),
            expected: "an array of channel objects",
        }),
    }
}

/// Fetch the text bundle; the top level must be a JSON object.
pub async fn fetch_texts(source: &dyn ResourceSource, name: &str) -> Result<TextBundle, LoadError> {
    match fetch_json(source, name).await? {
        Value::Object(map) => Ok(TextBundle::from_map(&map)),
        _ => Err(LoadError::Shape {
            resource: name.to_string(),
            expected: "a valid object",
        }),
    }
}

pub type ChannelsFuture = BoxFuture<'static, Result<Vec<Channel>, LoadError>>;
pub type TextsFuture = BoxFuture<'static, Result<TextBundle, LoadError>>;

/// Owns the source and the two memoized resource slots.
pub struct DataLoader {
    source: Arc<dyn ResourceSource>,
    names: ResourceNames,
    channels: LoadState<Vec<Channel>>,
    texts: LoadState<TextBundle>,
}

impl DataLoader {
    pub fn new(source: Arc<dyn ResourceSource>, names: ResourceNames) -> Self {
        Self {
            source,
            names,
            channels: LoadState::Unloaded,
            texts: LoadState::Unloaded,
        }
    }

    pub fn channels(&self) -> &LoadState<Vec<Channel>> {
        &self.channels
    }

    pub fn texts(&self) -> &LoadState<TextBundle> {
        &self.texts
    }

    /// Start the channel load if nothing has been attempted yet.
    /// Returns `None` while loading and after resolution.
    pub fn begin_channels(&mut self) -> Option<ChannelsFuture> {
        if !matches!(self.channels, LoadState::Unloaded) {
            return None;
        }
        self.channels = LoadState::Loading;
        let source = Arc::clone(&self.source);
        let name = self.names.channels.clone();
        Some(Box::pin(async move {
            fetch_channels(source.as_ref(), &name).await
        }))
    }

    /// Record the outcome of a channel load started with `begin_channels`.
    pub fn finish_channels(
        &mut self,
        result: Result<Vec<Channel>, LoadError>,
    ) -> &LoadState<Vec<Channel>> {
        if self.channels.is_resolved() {
            tracing::debug!("ignoring duplicate channel load result");
            return &self.channels;
        }
        self.channels = match result {
            Ok(channels) => {
                tracing::info!(
                    "loaded {} channels from {}",
                    channels.len(),
                    self.source.describe()
                );
                LoadState::Loaded(channels)
            }
            Err(error) => {
                tracing::error!("channel list unavailable: {}", error);
                LoadState::Failed {
                    error,
                    empty: Vec::new(),
                }
            }
        };
        &self.channels
    }

    pub fn begin_texts(&mut self) -> Option<TextsFuture> {
        if !matches!(self.texts, LoadState::Unloaded) {
            return None;
        }
        self.texts = LoadState::Loading;
        let source = Arc::clone(&self.source);
        let name = self.names.texts.clone();
        Some(Box::pin(async move { fetch_texts(source.as_ref(), &name).await }))
    }

    pub fn finish_texts(&mut self, result: Result<TextBundle, LoadError>) -> &LoadState<TextBundle> {
        if self.texts.is_resolved() {
            tracing::debug!("ignoring duplicate text bundle result");
            return &self.texts;
        }
        self.texts = match result {
            Ok(bundle) => {
                tracing::info!("loaded text bundle from {}", self.source.describe());
                LoadState::Loaded(bundle)
            }
            Err(error) => {
                tracing::error!("text bundle unavailable: {}", error);
                LoadState::Failed {
                    error,
                    empty: TextBundle::default(),
                }
            }
        };
        &self.texts
    }

    /// Await the channel list if it was never requested, then return the
    /// memoized list (empty after a failure). Returns `None` while a load
    /// started with `begin_channels` is still in flight: that caller owns the
    /// future and reports through `finish_channels`.
    pub async fn ensure_channels(&mut self) -> Option<&[Channel]> {
        if let Some(load) = self.begin_channels() {
            let result = load.await;
            self.finish_channels(result);
        }
        self.channels.value().map(Vec::as_slice)
    }

    /// Same as `ensure_channels`, for the text bundle.
    pub async fn ensure_texts(&mut self) -> Option<&TextBundle> {
        if let Some(load) = self.begin_texts() {
            let result = load.await;
            self.finish_texts(result);
        }
        self.texts.value()
    }
}
