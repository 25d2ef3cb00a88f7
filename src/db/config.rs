use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteJournalMode as SqlxJournalMode, SqliteSynchronous as SqlxSynchronous};

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub journal_mode: SqliteJournalMode,
    pub synchronous: SqliteSynchronous,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let path = std::env::var("VOCAB_DB_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let journal_mode = std::env::var("SQLITE_JOURNAL_MODE")
            .ok()
            .as_deref()
            .and_then(SqliteJournalMode::parse)
            .unwrap_or(SqliteJournalMode::Wal);

        let synchronous = std::env::var("SQLITE_SYNCHRONOUS")
            .ok()
            .as_deref()
            .and_then(SqliteSynchronous::parse)
            .unwrap_or(SqliteSynchronous::Normal);

        Self {
            path,
            max_connections: env_u32("SQLITE_MAX_CONNECTIONS", 5).max(1),
            journal_mode,
            synchronous,
            busy_timeout: Duration::from_millis(env_u64("SQLITE_BUSY_TIMEOUT_MS", 30_000)),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: 5,
            journal_mode: SqliteJournalMode::Wal,
            synchronous: SqliteSynchronous::Normal,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-store")
        .join("vocabulary.db")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteJournalMode {
    Wal,
    Delete,
    Truncate,
    Persist,
    Memory,
}

impl SqliteJournalMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WAL" => Some(Self::Wal),
            "DELETE" => Some(Self::Delete),
            "TRUNCATE" => Some(Self::Truncate),
            "PERSIST" => Some(Self::Persist),
            "MEMORY" => Some(Self::Memory),
            _ => None,
        }
    }

    pub(crate) fn to_sqlx(self) -> SqlxJournalMode {
        match self {
            SqliteJournalMode::Wal => SqlxJournalMode::Wal,
            SqliteJournalMode::Delete => SqlxJournalMode::Delete,
            SqliteJournalMode::Truncate => SqlxJournalMode::Truncate,
            SqliteJournalMode::Persist => SqlxJournalMode::Persist,
            SqliteJournalMode::Memory => SqlxJournalMode::Memory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteSynchronous {
    Off,
    Normal,
    Full,
    Extra,
}

impl SqliteSynchronous {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OFF" => Some(Self::Off),
            "NORMAL" => Some(Self::Normal),
            "FULL" => Some(Self::Full),
            "EXTRA" => Some(Self::Extra),
            _ => None,
        }
    }

    pub(crate) fn to_sqlx(self) -> SqlxSynchronous {
        match self {
            SqliteSynchronous::Off => SqlxSynchronous::Off,
            SqliteSynchronous::Normal => SqlxSynchronous::Normal,
            SqliteSynchronous::Full => SqlxSynchronous::Full,
            SqliteSynchronous::Extra => SqlxSynchronous::Extra,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_mode_parse_is_case_insensitive() {
        assert_eq!(SqliteJournalMode::parse("wal"), Some(SqliteJournalMode::Wal));
        assert_eq!(SqliteJournalMode::parse(" Delete "), Some(SqliteJournalMode::Delete));
        assert_eq!(SqliteJournalMode::parse("off"), None);
    }

    #[test]
    fn synchronous_parse_rejects_unknown() {
        assert_eq!(SqliteSynchronous::parse("full"), Some(SqliteSynchronous::Full));
        assert_eq!(SqliteSynchronous::parse("fast"), None);
    }

    #[test]
    fn with_path_keeps_defaults() {
        let config = StoreConfig::with_path("/tmp/words.db");
        assert_eq!(config.path, PathBuf::from("/tmp/words.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.journal_mode, SqliteJournalMode::Wal);
        assert_eq!(config.busy_timeout, Duration::from_secs(30));
    }

    #[test]
    fn default_path_ends_with_database_file() {
        assert!(default_db_path().ends_with("vocab-store/vocabulary.db"));
    }
}
