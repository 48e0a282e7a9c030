mod accordion;
mod action;
mod analytics;
mod app;
mod app_state;
mod clock;
mod component;
mod components;
mod navigate;
mod render;
mod status;
mod theme;
mod widgets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = tvdir_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    std::fs::create_dir_all(tvdir_proto::platform::config_dir())?;

    let log_path = data_dir.join("tvdir.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; HTTP client internals are noisy at debug.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("tvdir log: {}", log_path.display());
    tracing::info!("tvdir starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = tvdir_proto::config::Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {:#}", e);
        tvdir_proto::config::Config::default()
    });

    // ── Data loader ──────────────────────────────────────────────────────────
    let source = tvdir_proto::source::source_from_base(&config.source.base)?;
    tracing::info!("reading directory data from {}", source.describe());
    let loader = tvdir_proto::loader::DataLoader::new(source, config.source.resource_names());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(&config, loader).run().await
}
