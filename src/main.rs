use std::process::ExitCode;

use vinovault_server::config::{self, Config};
use vinovault_server::error::ServerError;
use vinovault_server::logger;
use vinovault_server::server::{Server, ShutdownSignals};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging).map_err(ServerError::Logger)?;

    // Tokio runtime, worker count from config when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build().map_err(ServerError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), ServerError> {
    let mut signals = ShutdownSignals::register()?;

    // Bind failure returns here and the process exits non-zero
    let server = Server::from_config(&cfg)?;
    logger::log_server_start(&server.local_addr(), server.document_root(), &cfg);

    let handle = server.start();

    let signal = signals.recv().await;
    logger::log_shutdown_requested(signal);

    handle.stop().await?;
    logger::log_shutdown_complete();
    Ok(())
}
