mod app;
use flipcards_app::*;

use app::FlipCardsApp;
use config::Config;
use database::db;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    let dotenv = config::load_dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    let config = Config::from_env();
    tracing::info!(
        cards_per_round = config.cards_per_round,
        database = %config.database_path.display(),
        "starting flipcards"
    );

    // Preferences are optional: without them the app runs on defaults
    let conn = match db::init_database(&config.database_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            tracing::warn!(error = %e, "preferences unavailable, using in-memory store");
            db::init_in_memory().ok()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "FlipCards",
        options,
        Box::new(move |cc| Ok(Box::new(FlipCardsApp::new(cc, &config, conn)))),
    )
}
