use beta_stack_api::setup;
use beta_stack_core::Config;
use tokio_util::sync::CancellationToken;

// mimalloc keeps fragmentation low under many concurrent chunked writes
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Cancelled on SIGINT/SIGTERM; every upload copy listens to a child of it
    let shutdown = CancellationToken::new();

    let (_state, router) = setup::initialize_app(config.clone(), shutdown.clone()).await?;

    setup::server::start_server(&config, router, shutdown).await?;

    Ok(())
}
