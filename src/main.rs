use pulsetool::{app::App, config::AppConfig, logging, tui};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Held until exit so the file writer flushes.
    let _log_guard = logging::init();

    std::panic::set_hook(Box::new(|panic_info| {
        let _ = tui::restore();
        tracing::error!("panic: {}", panic_info);
        eprintln!("{}", panic_info);
    }));

    let config = AppConfig::load();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        refresh_ms = config.refresh_interval_ms,
        theme = ?config.color_scheme,
        "PulseTool starting"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut app = App::new(config).await?;
        app.run().await
    })
}
