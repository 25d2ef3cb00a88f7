use vocab_store::config::Config;
use vocab_store::db::{WordStatus, WordStore};
use vocab_store::logging;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let store = match WordStore::open(&config.store).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, path = %config.store.path.display(), "failed to open word store");
            std::process::exit(1);
        }
    };

    match store.count_by_status().await {
        Ok(counts) => {
            for status in WordStatus::ALL {
                tracing::info!(status = %status, words = counts.get(status), "vocabulary summary");
            }
            tracing::info!(total = counts.total(), "word store ready");
        }
        Err(err) => tracing::warn!(error = %err, "failed to summarise vocabulary"),
    }

    store.close().await;
}
