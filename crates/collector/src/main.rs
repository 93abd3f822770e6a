use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use collector::routes::routes;
use collector::state::AppState;
use collector::store::ReportStore;
use common::{init_logging, settings::Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[arg(short = 'C', long, default_value = "config")]
    config_dir: String,
}

struct CollectorApp {
    settings: Arc<Settings>,
}

impl CollectorApp {
    fn new(config_dir: &str) -> Self {
        Self {
            settings: Arc::new(
                Settings::with_config_dir(config_dir).expect("Failed to load settings"),
            ),
        }
    }

    async fn run(&self) {
        let _guard = init_logging(&self.settings);

        info!("Starting collector on port {}", self.settings.server.port);

        let store = ReportStore::from_settings(&self.settings).expect("Failed to open report store");
        match &self.settings.store.path {
            Some(path) => info!(path, "Persisting reports to local store"),
            None => info!("No store path configured, reports are kept in memory"),
        }

        let state = AppState {
            store,
            settings: self.settings.clone(),
        };

        let routes_all = routes(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.settings.server.port));
        axum_server::bind(addr)
            .serve(routes_all.into_make_service())
            .await
            .unwrap();
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let app = CollectorApp::new(&args.config_dir);
    app.run().await;
}
