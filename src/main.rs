mod app;
mod config;
mod coordinator;
mod error;
mod event;
mod provider;
mod report;
mod theme;
mod tracker;
mod ui;

use app::ReportApp;
use config::Config;
use coordinator::FetchCoordinator;
use eframe::egui;
use provider::{ContentService, GeminiProvider};
use report::SessionState;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::simulator::IdeaSimulator;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("report_viewer=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        warn!("API_KEY is not set; every section will show an error notice");
    }
    info!(model = %config.model, "starting report viewer");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("report-runtime")
        .build()?;

    let provider = GeminiProvider::new(&config)?;
    let service = ContentService::new(Arc::new(provider));
    let model_name = service.provider_name().to_string();
    let outline = report::post_labor_outline();
    let (tx, rx) = mpsc::channel();

    let mut coordinator = FetchCoordinator::new(
        outline.clone(),
        SessionState::new(),
        service.clone(),
        tx.clone(),
        runtime.handle().clone(),
        config.prefetch,
    );
    coordinator.start();

    let simulator = IdeaSimulator::new(service, runtime.handle().clone(), tx);
    let app = ReportApp::new(rx, outline, coordinator, simulator, model_name);
    let font_path = config.font_path.clone();
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1360.0, 860.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Post-Labor Society Report",
        native_options,
        Box::new(move |creation_context| {
            theme::install_hangul_font(&creation_context.egui_ctx, font_path.as_deref());
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
