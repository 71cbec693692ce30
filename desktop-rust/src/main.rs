mod app;
mod io;

use anyhow::Context;
use app::DesktopApp;
use posture_review::client::HttpAnalysisService;
use posture_review::config::Config;
use posture_review::logging;

fn main() -> anyhow::Result<()> {
    logging::init(false);
    let config = Config::load().context("load config")?;
    let service = HttpAnalysisService::new(&config).context("create analysis client")?;
    tracing::info!(endpoint = %service.endpoint(), "desktop viewer starting");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Posture Review",
        options,
        Box::new(|_cc| Box::new(DesktopApp::new(service))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
