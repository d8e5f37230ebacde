use tubely_core::Config;
use tubely_infra::{init_telemetry, LogFormat};

// mimalloc keeps fragmentation low under large concurrent uploads, notably on musl.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Loads .env as well, so RUST_LOG and LOG_FORMAT may come from there
    let config = Config::from_env()?;

    init_telemetry(LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
