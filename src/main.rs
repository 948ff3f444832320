use clap::Parser;
use kube_image_inventory::cli::{Cli, Platform};
use kube_image_inventory::envelope::EnvelopeBuilder;
use kube_image_inventory::sink::Sink;
use kube_image_inventory::{collector, config, pipeline};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    kube_image_inventory::init_logging();
    info!("Starting kube-image-inventory {}", env!("CARGO_PKG_VERSION"));

    let config = config::load_optional_config(cli.config.as_deref())?;
    let sink = Sink::new(&config.sink, &config.tls)?;
    let builder = EnvelopeBuilder::new(config.account);

    let summary = match cli.platform {
        Platform::K8s => {
            let client = match collector::create_client().await {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Failed to load kubeconfig: {:?}", e);
                    None
                }
            };
            pipeline::run(client.as_ref(), &builder, &sink, &mut std::io::stdout()).await?
        }
    };

    info!(
        "Finished: {} container images collected, {} unique, delivery {}",
        summary.collected,
        summary.unique,
        if summary.delivery.is_ok() { "succeeded" } else { "failed" }
    );

    Ok(())
}
