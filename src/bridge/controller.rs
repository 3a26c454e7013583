use crate::bridge::events::HostEvent;
use crate::bridge::payload::SettingsPayload;
use async_trait::async_trait;
use derive_builder::Builder;
use serde_json::{Map, Value};
use std::string::FromUtf8Error;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use url::Url;

pub const DEFAULT_VERSION: &str = "1.6";

const DEFAULT_CONFIG_URL: &str =
    "https://dl.dropboxusercontent.com/u/10824180/pebble%20config%20pages/thin-config.html";

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Response is not valid percent-encoded UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
    #[error("Response is not a JSON object: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejection detail reported by the host message-delivery subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DispatchError(pub String);

/// Terminal state of one settings dispatch, once the host runtime delivers
/// the ack or rejection callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Acknowledged,
    Rejected(DispatchError),
}

/// Shell primitive for opening the hosted configuration page. Whether the
/// page actually opens is owned by the host environment, not the bridge.
pub trait HostEnvironment: Send + Sync {
    fn open_url(&self, url: &Url);
}

/// Outbound message channel to the watch app. The future resolves when the
/// host delivers the delivery outcome; a future that never resolves is a
/// forgotten dispatch and must not block anything.
#[async_trait]
pub trait AppMessageTransport: Send + Sync {
    async fn send_message(&self, payload: SettingsPayload) -> Result<(), DispatchError>;
}

#[derive(Builder, Clone, Debug)]
pub struct BridgeOptions {
    /// Bridge version, logged on ready and passed to the configuration page
    /// so it can branch on compatibility.
    #[builder(default = "DEFAULT_VERSION.to_string()")]
    pub version: String,
    /// Base URL of the hosted configuration page, without query parameters.
    #[builder(default = "default_config_url()")]
    pub config_url: Url,
}

impl BridgeOptions {
    pub fn builder() -> BridgeOptionsBuilder {
        BridgeOptionsBuilder::default()
    }
}

impl Default for BridgeOptions {
    fn default() -> Self {
        BridgeOptions {
            version: DEFAULT_VERSION.to_string(),
            config_url: default_config_url(),
        }
    }
}

fn default_config_url() -> Url {
    Url::parse(DEFAULT_CONFIG_URL).expect("default config page URL is a valid literal")
}

pub struct BridgeController {
    options: BridgeOptions,
    host: Arc<dyn HostEnvironment>,
    transport: Arc<dyn AppMessageTransport>,
}

impl BridgeController {
    pub fn new(
        options: BridgeOptions,
        host: Arc<dyn HostEnvironment>,
        transport: Arc<dyn AppMessageTransport>,
    ) -> Self {
        BridgeController {
            options,
            host,
            transport,
        }
    }

    /// Consumes host events until the channel closes. Events are handled one
    /// at a time; a failed cycle is logged and never affects the next one.
    pub async fn run(&self, mut events: mpsc::Receiver<HostEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                HostEvent::Ready => self.on_ready(),
                HostEvent::ShowConfiguration => self.on_show_configuration(),
                HostEvent::WebviewClosed { response } => {
                    if let Err(e) = self.on_webview_closed(&response) {
                        error!("Dropping settings update: {e}");
                    }
                }
            }
        }
        debug!("Host event channel closed");
    }

    pub fn on_ready(&self) {
        info!("Watch bridge ready! Version: {}", self.options.version);
    }

    pub fn on_show_configuration(&self) {
        let url = self.config_page_url();
        debug!("Opening configuration page: {url}");
        self.host.open_url(&url);
    }

    /// Configuration page URL with the running bridge's version attached as
    /// a query parameter.
    pub fn config_page_url(&self) -> Url {
        let mut url = self.options.config_url.clone();
        url.query_pairs_mut()
            .append_pair("version", &self.options.version);
        url
    }

    /// Decodes and parses the closed-page response, then hands the payload
    /// to the transport. A response that cannot be decoded or is not a JSON
    /// object aborts the cycle: nothing is dispatched. Fields absent from a
    /// well-formed response are coerced to `"undefined"` instead.
    pub fn on_webview_closed(
        &self,
        response: &str,
    ) -> Result<JoinHandle<DispatchOutcome>, BridgeError> {
        let decoded = urlencoding::decode(response)?;
        let record: Map<String, Value> = serde_json::from_str(&decoded)?;
        Ok(self.dispatch(SettingsPayload::from_record(&record)))
    }

    // Fire-and-forget: the spawned task waits for the delivery outcome and
    // logs exactly one line for it. Nothing downstream blocks on the handle,
    // so cycles stay independent of in-flight dispatches.
    fn dispatch(&self, payload: SettingsPayload) -> JoinHandle<DispatchOutcome> {
        debug!("Dispatching settings: {payload:?}");
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            match transport.send_message(payload).await {
                Ok(()) => {
                    info!("Settings update successful!");
                    DispatchOutcome::Acknowledged
                }
                Err(e) => {
                    error!("Settings update failed: {e}");
                    DispatchOutcome::Rejected(e)
                }
            }
        })
    }
}
