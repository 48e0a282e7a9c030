//! Channel click analytics.
//!
//! Every activated link is reported as a `channel_click` event. Reporting is
//! fire-and-forget: sinks run in the background and never surface errors to
//! the user.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use tvdir_proto::config::AnalyticsConfig;

/// Event parameters for one link activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelClick {
    pub channel_name: String,
    pub category: String,
    pub link_url: String,
}

#[derive(Serialize)]
struct Beacon<'a> {
    event: &'static str,
    #[serde(flatten)]
    params: &'a ChannelClick,
}

pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, click: &ChannelClick);
}

/// POSTs each event as JSON to a fixed endpoint.
pub struct BeaconSink {
    client: reqwest::Client,
    endpoint: String,
}

impl BeaconSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn payload(click: &ChannelClick) -> serde_json::Value {
        serde_json::to_value(Beacon {
            event: "channel_click",
            params: click,
        })
        .unwrap_or(serde_json::Value::Null)
    }
}

impl AnalyticsSink for BeaconSink {
    fn emit(&self, click: &ChannelClick) {
        let request = self.client.post(&self.endpoint).json(&Self::payload(click));
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("analytics beacon accepted by {}", endpoint);
                }
                Ok(resp) => warn!("analytics endpoint {} answered {}", endpoint, resp.status()),
                Err(e) => warn!("analytics beacon to {} failed: {}", endpoint, e),
            }
        });
    }
}

/// The app-facing handle. With no sink configured `track` does nothing.
#[derive(Clone, Default)]
pub struct Analytics {
    sink: Option<Arc<dyn AnalyticsSink>>,
}

impl Analytics {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &AnalyticsConfig) -> Self {
        match cfg.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => {
                Self::with_sink(Arc::new(BeaconSink::new(endpoint)))
            }
            _ => Self::none(),
        }
    }

    pub fn with_sink(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn track(&self, click: &ChannelClick) {
        if let Some(sink) = &self.sink {
            sink.emit(click);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Sink that keeps every event in memory.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub events: Mutex<Vec<ChannelClick>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn emit(&self, click: &ChannelClick) {
            self.events.lock().unwrap().push(click.clone());
        }
    }

    fn espn() -> ChannelClick {
        ChannelClick {
            channel_name: "ESPN".into(),
            category: "กีฬา".into(),
            link_url: "http://x/espn".into(),
        }
    }

    #[test]
    fn no_sink_is_silent() {
        let analytics = Analytics::from_config(&AnalyticsConfig::default());
        assert!(!analytics.is_enabled());
        analytics.track(&espn());
    }

    #[test]
    fn blank_endpoint_disables_analytics() {
        let cfg = AnalyticsConfig {
            endpoint: Some("  ".into()),
        };
        assert!(!Analytics::from_config(&cfg).is_enabled());
    }

    #[test]
    fn track_forwards_to_sink() {
        let sink = Arc::new(RecordingSink::default());
        let analytics = Analytics::with_sink(sink.clone());
        analytics.track(&espn());
        assert_eq!(*sink.events.lock().unwrap(), vec![espn()]);
    }

    #[test]
    fn beacon_payload_shape() {
        let payload = BeaconSink::payload(&espn());
        assert_eq!(
            payload,
            serde_json::json!({
                "event": "channel_click",
                "channel_name": "ESPN",
                "category": "กีฬา",
                "link_url": "http://x/espn",
            })
        );
    }
}
