use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use video_review_hosting::{server, CredentialSigner, HostingConfig};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = HostingConfig::from_env()?;
    config.validate_server()?;

    let bind: SocketAddr = std::env::var("VIDEO_REVIEW_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_string())
        .parse()?;

    let signer = Arc::new(CredentialSigner::new(
        config.api_secret.clone(),
        config.tag.clone(),
        config.signature_algorithm,
    ));

    let listener = TcpListener::bind(bind).await?;
    server::serve(listener, signer).await?;
    Ok(())
}
