use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use thin_config_rs::{
    AppMessageTransport, BridgeController, BridgeOptions, DispatchError, HostEnvironment,
    SettingsPayload, settings_form,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the settings form the hosted configuration page renders
    Schema,
    /// Print the configuration page URL the bridge would open
    Url,
    /// Run one configuration cycle against a loopback transport
    Simulate {
        /// URL-component-encoded JSON result of the configuration page
        #[arg(long)]
        response: String,
    },
}

#[derive(Parser, Debug)]
struct Params {
    /// Override the bridge version reported to the configuration page
    #[clap(long)]
    version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

struct Shell;

impl HostEnvironment for Shell {
    fn open_url(&self, url: &Url) {
        println!("open: {url}");
    }
}

/// Stand-in for the watch: prints the payload and acknowledges it.
struct LoopbackTransport;

#[async_trait]
impl AppMessageTransport for LoopbackTransport {
    async fn send_message(&self, payload: SettingsPayload) -> Result<(), DispatchError> {
        let json =
            serde_json::to_string_pretty(&payload).map_err(|e| DispatchError(e.to_string()))?;
        println!("{json}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let params = Params::parse();

    let mut builder = BridgeOptions::builder();
    if let Some(version) = params.version.clone() {
        builder.version(version);
    }
    let controller = BridgeController::new(
        builder.build()?,
        Arc::new(Shell),
        Arc::new(LoopbackTransport),
    );

    match params.command {
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&settings_form())?);
        }
        Commands::Url => {
            println!("{}", controller.config_page_url());
        }
        Commands::Simulate { response } => {
            controller.on_ready();
            controller.on_show_configuration();
            let outcome = controller.on_webview_closed(&response)?.await?;
            info!("Dispatch outcome: {outcome:?}");
        }
    }

    Ok(())
}
