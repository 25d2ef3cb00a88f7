#![allow(dead_code)]

use std::time::Duration;

use tempfile::TempDir;
use vocab_store::db::config::{SqliteJournalMode, SqliteSynchronous};
use vocab_store::db::{NewWord, StoreConfig, WordId, WordStore};

/// On-disk store in a fresh temp dir. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn create_file_store() -> (WordStore, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let config = StoreConfig {
        path: temp_dir.path().join("vocabulary.db"),
        max_connections: 5,
        journal_mode: SqliteJournalMode::Wal,
        synchronous: SqliteSynchronous::Normal,
        busy_timeout: Duration::from_secs(30),
    };
    let store = WordStore::open(&config).await.expect("failed to open store");
    (store, temp_dir)
}

pub fn apple() -> NewWord {
    NewWord::new("apple")
        .with_definition("a fruit", Some("noun"))
        .with_example("She ate an apple.", Some("彼女はりんごを食べた。"))
        .with_etymology("Old English æppel")
        .with_related_word("pear", Some("cohyponym"))
}

pub async fn count_rows(store: &WordStore, table: &str, word_id: WordId) -> i64 {
    let sql = format!(r#"SELECT COUNT(*) FROM "{table}" WHERE "word_id" = ?"#);
    sqlx::query_scalar(&sql)
        .bind(word_id)
        .fetch_one(store.pool())
        .await
        .expect("count query failed")
}

pub async fn count_words(store: &WordStore) -> i64 {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "words""#)
        .fetch_one(store.pool())
        .await
        .expect("count query failed")
}

/// Makes any insert of an example with text `boom` abort.
pub async fn install_failing_example_trigger(store: &WordStore) {
    sqlx::query(
        r#"
        CREATE TRIGGER "reject_boom_example" BEFORE INSERT ON "examples"
        WHEN NEW."example" = 'boom'
        BEGIN
            SELECT RAISE(ABORT, 'example rejected');
        END
        "#,
    )
    .execute(store.pool())
    .await
    .expect("failed to install trigger");
}
