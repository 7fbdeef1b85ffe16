use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ax = ward_server::build().await?;

    let host = ax
        .state
        .config
        .get_string("http.host")
        .unwrap_or_else(|| "127.0.0.1".to_string());

    let port = ax.state.config.get_u16("http.port").unwrap_or(3000);

    let addr = format!("{host}:{port}");

    ax.listen(addr).await?;

    Ok(())
}
