use kube_image_inventory::mock_server;
use std::env;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    kube_image_inventory::init_logging();

    let addr: SocketAddr = env::var("MOCK_SERVER_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
        .parse()?;
    info!("Starting mock inventory endpoint on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, mock_server::create_app()).await?;

    Ok(())
}
