use crate::db::models::{ImportFailure, ImportReport, NewWord};
use crate::db::{StoreError, WordStore};

impl WordStore {
    /// Bulk-loads words that were kept outside the database.
    ///
    /// Each word is created in its own transaction. Words already present are
    /// reported as skipped and payloads failing validation as failed; any
    /// storage error stops the import and is returned, leaving the words
    /// imported so far in place.
    pub async fn import_words(&self, words: &[NewWord]) -> Result<ImportReport, StoreError> {
        let mut report = ImportReport::default();

        for word in words {
            match self.create_word(word).await {
                Ok(word_id) => report.imported.push(word_id),
                Err(StoreError::Conflict(existing)) => {
                    tracing::debug!(word = %existing, "import skipped existing word");
                    report.skipped.push(existing);
                }
                Err(StoreError::Validation(reason)) => {
                    tracing::warn!(word = %word.word, %reason, "import rejected word");
                    report.failed.push(ImportFailure {
                        word: word.word.clone(),
                        reason,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "word import finished"
        );
        Ok(report)
    }
}
