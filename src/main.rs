use anyhow::Context as _;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use cs2_price_board::config::Config;
use cs2_price_board::loader::{HttpProvider, Loader};
use cs2_price_board::ui::{self, PriceBoardApp};

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("cs2_price_board={level},reqwest=warn").into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing(&config.log_level);
    tracing::info!(api_url = %config.api_url, health_probe = !config.skip_health, "starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let provider = HttpProvider::new(config.api_url.clone(), config.timeout())?;
    let loader = Loader::new(provider).with_health_probe(!config.skip_health);
    let refresh_every = config.refresh_interval();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CS2 Price Board",
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(PriceBoardApp::new(
                &cc.egui_ctx,
                runtime,
                loader,
                refresh_every,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
