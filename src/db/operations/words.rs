use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::models::{NewWord, StatusCounts, Word, WordDetails, WordDetailsUpdate, WordId, WordStatus};
use crate::db::operations::details::{self, DetailTable};
use crate::db::{StoreError, WordStore};

const WORD_COLUMNS: &str = r#""id", "word", "phonetic", "part_of_speech", "status", "created_at", "updated_at", "last_reviewed_at", "review_count""#;

impl WordStore {
    /// Inserts the word row and every child row in one transaction and
    /// returns the new id.
    pub async fn create_word(&self, new_word: &NewWord) -> Result<WordId, StoreError> {
        if new_word.word.trim().is_empty() {
            return Err(StoreError::Validation("word must not be empty".to_string()));
        }

        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        let word_id = sqlx::query(
            r#"
            INSERT INTO "words" ("word", "phonetic", "part_of_speech", "status", "created_at", "updated_at", "review_count")
            VALUES (?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&new_word.word)
        .bind(&new_word.phonetic)
        .bind(&new_word.part_of_speech)
        .bind(new_word.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::from_insert(e, &new_word.word))?
        .last_insert_rowid();

        details::insert_definitions(&mut tx, word_id, &new_word.definitions).await?;
        details::insert_examples(&mut tx, word_id, &new_word.examples).await?;
        details::insert_etymologies(&mut tx, word_id, &new_word.etymologies).await?;
        details::insert_related_words(&mut tx, word_id, &new_word.related_words).await?;

        tx.commit().await?;

        tracing::info!(
            word_id,
            word = %new_word.word,
            definitions = new_word.definitions.len(),
            examples = new_word.examples.len(),
            etymologies = new_word.etymologies.len(),
            related_words = new_word.related_words.len(),
            "word created"
        );
        Ok(word_id)
    }

    pub async fn get_all_words(&self) -> Result<Vec<Word>, StoreError> {
        let sql = format!(r#"SELECT {WORD_COLUMNS} FROM "words" ORDER BY "word" ASC"#);
        let rows = sqlx::query(&sql).fetch_all(self.pool()).await?;
        Ok(rows.iter().map(map_word).collect::<Result<Vec<_>, _>>()?)
    }

    /// `None` when no word has this id. All five tables are read inside one
    /// transaction so the aggregate is a single committed snapshot.
    pub async fn get_word_details(&self, word_id: WordId) -> Result<Option<WordDetails>, StoreError> {
        let mut tx = self.pool().begin().await?;

        let sql = format!(r#"SELECT {WORD_COLUMNS} FROM "words" WHERE "id" = ?"#);
        let Some(row) = sqlx::query(&sql)
            .bind(word_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tracing::debug!(word_id, "word details requested for missing word");
            return Ok(None);
        };
        let word = map_word(&row)?;

        let definitions = details::fetch_definitions(&mut *tx, word_id).await?;
        let examples = details::fetch_examples(&mut *tx, word_id).await?;
        let etymologies = details::fetch_etymologies(&mut *tx, word_id).await?;
        let related_words = details::fetch_related_words(&mut *tx, word_id).await?;

        tx.commit().await?;

        Ok(Some(WordDetails {
            word,
            definitions,
            examples,
            etymologies,
            related_words,
        }))
    }

    /// Substring match on `word`. ASCII letters compare case-insensitively
    /// (SQLite `LIKE`); `%`, `_` and `\` in `term` match literally.
    pub async fn search_words(&self, term: &str) -> Result<Vec<Word>, StoreError> {
        let pattern = format!("%{}%", escape_like(term));
        let sql = format!(
            r#"SELECT {WORD_COLUMNS} FROM "words" WHERE "word" LIKE ? ESCAPE '\' ORDER BY "word" ASC"#
        );
        let rows = sqlx::query(&sql).bind(pattern).fetch_all(self.pool()).await?;
        tracing::debug!(term, matches = rows.len(), "word search");
        Ok(rows.iter().map(map_word).collect::<Result<Vec<_>, _>>()?)
    }

    /// Exact, case-sensitive lookup by word text.
    pub async fn find_word(&self, text: &str) -> Result<Option<Word>, StoreError> {
        let sql = format!(r#"SELECT {WORD_COLUMNS} FROM "words" WHERE "word" = ?"#);
        let row = sqlx::query(&sql).bind(text).fetch_optional(self.pool()).await?;
        Ok(row.as_ref().map(map_word).transpose()?)
    }

    pub async fn update_word_status(&self, word_id: WordId, status: WordStatus) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE "words"
            SET "status" = ?,
                "last_reviewed_at" = ?,
                "review_count" = "review_count" + 1
            WHERE "id" = ?
            "#,
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(word_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound(word_id));
        }

        tx.commit().await?;

        tracing::info!(word_id, status = %status, "word status updated");
        Ok(())
    }

    /// Child rows go with the word through `ON DELETE CASCADE`.
    pub async fn delete_word(&self, word_id: WordId) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;

        let affected = sqlx::query(r#"DELETE FROM "words" WHERE "id" = ?"#)
            .bind(word_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound(word_id));
        }

        tx.commit().await?;

        tracing::info!(word_id, "word deleted");
        Ok(())
    }

    pub async fn get_words_by_status(&self, status: WordStatus) -> Result<Vec<Word>, StoreError> {
        let sql = format!(r#"SELECT {WORD_COLUMNS} FROM "words" WHERE "status" = ? ORDER BY "word" ASC"#);
        let rows = sqlx::query(&sql)
            .bind(status.as_str())
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(map_word).collect::<Result<Vec<_>, _>>()?)
    }

    /// Rewrites `phonetic` and `part_of_speech`, then replaces each collection
    /// present in `update`. The word-row update doubles as the existence
    /// check: an unknown id writes nothing and returns `NotFound`.
    pub async fn update_word_details(
        &self,
        word_id: WordId,
        update: &WordDetailsUpdate,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;

        let affected = sqlx::query(
            r#"
            UPDATE "words"
            SET "phonetic" = ?,
                "part_of_speech" = ?,
                "updated_at" = ?
            WHERE "id" = ?
            "#,
        )
        .bind(update.phonetic.as_deref().unwrap_or(""))
        .bind(update.part_of_speech.as_deref().unwrap_or(""))
        .bind(Utc::now())
        .bind(word_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound(word_id));
        }

        if let Some(definitions) = &update.definitions {
            details::clear_details(&mut tx, DetailTable::Definitions, word_id).await?;
            details::insert_definitions(&mut tx, word_id, definitions).await?;
        }
        if let Some(examples) = &update.examples {
            details::clear_details(&mut tx, DetailTable::Examples, word_id).await?;
            details::insert_examples(&mut tx, word_id, examples).await?;
        }
        if let Some(etymologies) = &update.etymologies {
            details::clear_details(&mut tx, DetailTable::Etymologies, word_id).await?;
            details::insert_etymologies(&mut tx, word_id, etymologies).await?;
        }
        if let Some(related_words) = &update.related_words {
            details::clear_details(&mut tx, DetailTable::RelatedWords, word_id).await?;
            details::insert_related_words(&mut tx, word_id, related_words).await?;
        }

        tx.commit().await?;

        tracing::info!(
            word_id,
            definitions = update.definitions.is_some(),
            examples = update.examples.is_some(),
            etymologies = update.etymologies.is_some(),
            related_words = update.related_words.is_some(),
            "word details replaced"
        );
        Ok(())
    }

    pub async fn count_by_status(&self) -> Result<StatusCounts, StoreError> {
        let rows = sqlx::query(r#"SELECT "status", COUNT(*) AS "total" FROM "words" GROUP BY "status""#)
            .fetch_all(self.pool())
            .await?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let status: String = row.try_get("status")?;
            let total: i64 = row.try_get("total")?;
            match status.parse::<WordStatus>()? {
                WordStatus::Unknown => counts.unknown = total,
                WordStatus::Learning => counts.learning = total,
                WordStatus::Mastered => counts.mastered = total,
            }
        }
        Ok(counts)
    }
}

fn map_word(row: &SqliteRow) -> Result<Word, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<WordStatus>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Word {
        id: row.try_get("id")?,
        word: row.try_get("word")?,
        phonetic: row.try_get("phonetic")?,
        part_of_speech: row.try_get("part_of_speech")?,
        status,
        created_at,
        updated_at,
        last_reviewed_at: row.try_get("last_reviewed_at")?,
        review_count: row.try_get("review_count")?,
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn create_then_read_apple() {
        let store = WordStore::in_memory().await.unwrap();
        let id = store
            .create_word(&NewWord::new("apple").with_definition("a fruit", None))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let details = store.get_word_details(id).await.unwrap().unwrap();
        assert_eq!(details.word.word, "apple");
        assert_eq!(details.word.status, WordStatus::Unknown);
        assert_eq!(details.word.review_count, 0);
        assert!(details.word.last_reviewed_at.is_none());
        assert_eq!(details.definitions.len(), 1);
        assert_eq!(details.definitions[0].definition, "a fruit");
        assert!(details.examples.is_empty());
    }

    #[tokio::test]
    async fn status_update_on_missing_word_is_not_found() {
        let store = WordStore::in_memory().await.unwrap();
        let err = store
            .update_word_status(42, WordStatus::Learning)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn empty_word_is_rejected() {
        let store = WordStore::in_memory().await.unwrap();
        let err = store.create_word(&NewWord::new("   ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.get_all_words().await.unwrap().is_empty());
    }
}
