use std::env;

use anyhow::Result;
use tf_provider::serve;
use tracing_subscriber::EnvFilter;

use terraform_provider_metalcloud::MetalCloudProvider;

/// Variable holding the log filter, when Terraform does not redirect logs to a file
const LOG_ENV: &str = "TF_LOG_PROVIDER_METALCLOUD";

#[tokio::main]
async fn main() -> Result<()> {
    // With PLUGIN_LOG_FILE, `serve` installs its own subscriber
    if env::var_os("PLUGIN_LOG_FILE").is_none() {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    }

    serve("metalcloud", MetalCloudProvider::new()).await
}
