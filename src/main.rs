//! Terminal dashboard.
//!
//! ```text
//! mosaic-dashboard [DASHBOARD.json]
//! ```
//!
//! Without a file a sample summary is shown. Type a card number and Enter to
//! flip its info panel, `click X Y` to click, `q` to quit.
//! `MOSAIC_ROLE=admin` shows the admin menu, `MOSAIC_SEED=<n>` fixes the
//! mosaics. `RUST_LOG` controls logging.

use mosaic::dashboard::{DashboardSpec, SummaryMetrics};
use mosaic::navigation::Role;
use mosaic::{App, AppConfig};

fn sample_summary() -> SummaryMetrics {
    SummaryMetrics {
        total_revenue: 48250.0,
        total_expense: 12062.5,
        net_profit: 36187.5,
        current_balance: 36187.5,
        risk_exposure: Some("Low (Stable)".to_string()),
    }
}

fn main() -> mosaic::Result<()> {
    env_logger::init();

    let dashboard = match std::env::args().nth(1) {
        Some(path) => DashboardSpec::load(path)?,
        None => DashboardSpec::from_summary(&sample_summary()),
    };

    let mut config = AppConfig::default();
    if let Ok(role) = std::env::var("MOSAIC_ROLE") {
        config = config.role(role.parse::<Role>().unwrap_or_default());
    }
    if let Ok(seed) = std::env::var("MOSAIC_SEED") {
        match seed.parse::<u64>() {
            Ok(seed) => config = config.seed(seed),
            Err(_) => log::warn!("Ignoring MOSAIC_SEED={seed:?}"),
        }
    }

    App::with_config(&dashboard, config).run()
}
