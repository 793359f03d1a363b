use dishpatch_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    let log_level = std::env::var("LOG_LEVEL").ok();
    let logs_dir = config.logs_dir();
    dishpatch_server::init_logger_with_file(
        log_level.as_deref(),
        logs_dir.to_str(),
    );

    tracing::info!("Dishpatch server starting...");

    // 2. State (database, services)
    let state = ServerState::initialize(&config).await?;

    // 3. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
