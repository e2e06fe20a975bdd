use std::sync::Arc;

use staticd::config::ServerConfig;
use staticd::handler::StaticFiles;
use staticd::logger;
use staticd::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ServerConfig::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    // A taken port or missing bind permission is fatal: report the cause
    // and exit non-zero.
    let listener =
        server::bind_listener(addr).map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    let handler = Arc::new(StaticFiles::new(&cfg));

    // The startup line goes out after a successful bind, before the first
    // accept.
    logger::log_server_start(&cfg);

    server::run(listener, handler).await;
    Ok(())
}
