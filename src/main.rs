mod config;
mod csv;
mod db;
mod routes;
mod services;
mod state;
mod voice;

use std::sync::Arc;

use crate::csv::{CsvCache, HttpCsvSource};
use crate::voice::{RetellClient, VoiceAgent};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cfg = config::AppConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&cfg.database_url, cfg.db_max_connections)
        .await
        .expect("database init failed");

    let csv_source = HttpCsvSource::new(cfg.http).expect("CSV HTTP client init failed");
    let csv = CsvCache::new(Arc::new(csv_source), &cfg.csv_base_url);

    let voice: Option<Arc<dyn VoiceAgent>> = match cfg.retell.api_key.clone() {
        Some(api_key) => {
            let client: Arc<dyn VoiceAgent> = Arc::new(
                RetellClient::new(api_key, &cfg.retell.base_url, cfg.http).expect("voice client init failed"),
            );
            Some(client)
        }
        None => {
            tracing::warn!("RETELL_API_KEY not set; voice agent endpoints disabled");
            None
        }
    };

    let state = state::AppState::new(pool, csv, voice);

    if cfg.machine_status.enabled {
        let _simulation = services::machine_status::spawn_simulation_task(state.clone(), cfg.machine_status.interval);
    }

    let app = routes::app(state);
    let port = cfg.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "auro-admin listening");
    axum::serve(listener, app).await.expect("server failed");
}
