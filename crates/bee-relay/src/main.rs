use bee_relay::env::SystemEnv;
use bee_relay::{RelayConfig, serve};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::from_env(&SystemEnv);

    serve(config).await.expect("Server failed");
}
