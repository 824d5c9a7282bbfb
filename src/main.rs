use heart_survival::config::{self, AppState};
use heart_survival::logger;
use heart_survival::server::{create_reusable_listener, shutdown_signal, start_server_loop};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path without extension
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Artifacts must be in place before anything listens
    let state = AppState::load(cfg).inspect_err(|e| logger::log_error(&e.to_string()))?;
    logger::log_artifacts_loaded(&state.config, &state.predictor);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async move {
        let addr = state.config.get_socket_addr()?;
        let listener = create_reusable_listener(addr)?;
        logger::log_server_start(&addr, &state.config);

        start_server_loop(listener, state, shutdown_signal()).await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
