//! Child-collection helpers shared by the word operations.
//!
//! Write helpers take the caller's open transaction, read helpers take any
//! connection, so one aggregate is always read or written through a single
//! transaction scope.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqliteConnection, Transaction};

use crate::db::models::{
    Definition, Etymology, Example, NewDefinition, NewEtymology, NewExample, NewRelatedWord,
    RelatedWord, WordId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DetailTable {
    Definitions,
    Examples,
    Etymologies,
    RelatedWords,
}

impl DetailTable {
    pub(crate) const fn table_name(self) -> &'static str {
        match self {
            DetailTable::Definitions => "definitions",
            DetailTable::Examples => "examples",
            DetailTable::Etymologies => "etymologies",
            DetailTable::RelatedWords => "related_words",
        }
    }
}

pub(crate) async fn clear_details(
    tx: &mut Transaction<'_, Sqlite>,
    table: DetailTable,
    word_id: WordId,
) -> Result<u64, sqlx::Error> {
    let sql = format!(r#"DELETE FROM "{}" WHERE "word_id" = ?"#, table.table_name());
    let result = sqlx::query(&sql).bind(word_id).execute(&mut **tx).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn insert_definitions(
    tx: &mut Transaction<'_, Sqlite>,
    word_id: WordId,
    definitions: &[NewDefinition],
) -> Result<(), sqlx::Error> {
    for def in definitions {
        sqlx::query(
            r#"INSERT INTO "definitions" ("word_id", "definition", "part_of_speech") VALUES (?, ?, ?)"#,
        )
        .bind(word_id)
        .bind(&def.definition)
        .bind(&def.part_of_speech)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub(crate) async fn insert_examples(
    tx: &mut Transaction<'_, Sqlite>,
    word_id: WordId,
    examples: &[NewExample],
) -> Result<(), sqlx::Error> {
    for ex in examples {
        sqlx::query(r#"INSERT INTO "examples" ("word_id", "example", "translation") VALUES (?, ?, ?)"#)
            .bind(word_id)
            .bind(&ex.example)
            .bind(&ex.translation)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub(crate) async fn insert_etymologies(
    tx: &mut Transaction<'_, Sqlite>,
    word_id: WordId,
    etymologies: &[NewEtymology],
) -> Result<(), sqlx::Error> {
    for ety in etymologies {
        sqlx::query(r#"INSERT INTO "etymologies" ("word_id", "etymology") VALUES (?, ?)"#)
            .bind(word_id)
            .bind(&ety.etymology)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub(crate) async fn insert_related_words(
    tx: &mut Transaction<'_, Sqlite>,
    word_id: WordId,
    related_words: &[NewRelatedWord],
) -> Result<(), sqlx::Error> {
    for rel in related_words {
        sqlx::query(
            r#"INSERT INTO "related_words" ("word_id", "related_word", "relationship_type") VALUES (?, ?, ?)"#,
        )
        .bind(word_id)
        .bind(&rel.related_word)
        .bind(&rel.relationship_type)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub(crate) async fn fetch_definitions(
    conn: &mut SqliteConnection,
    word_id: WordId,
) -> Result<Vec<Definition>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT "id", "word_id", "definition", "part_of_speech" FROM "definitions" WHERE "word_id" = ? ORDER BY "id" ASC"#,
    )
    .bind(word_id)
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(map_definition).collect()
}

pub(crate) async fn fetch_examples(
    conn: &mut SqliteConnection,
    word_id: WordId,
) -> Result<Vec<Example>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT "id", "word_id", "example", "translation" FROM "examples" WHERE "word_id" = ? ORDER BY "id" ASC"#,
    )
    .bind(word_id)
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(map_example).collect()
}

pub(crate) async fn fetch_etymologies(
    conn: &mut SqliteConnection,
    word_id: WordId,
) -> Result<Vec<Etymology>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT "id", "word_id", "etymology" FROM "etymologies" WHERE "word_id" = ? ORDER BY "id" ASC"#,
    )
    .bind(word_id)
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(map_etymology).collect()
}

pub(crate) async fn fetch_related_words(
    conn: &mut SqliteConnection,
    word_id: WordId,
) -> Result<Vec<RelatedWord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT "id", "word_id", "related_word", "relationship_type" FROM "related_words" WHERE "word_id" = ? ORDER BY "id" ASC"#,
    )
    .bind(word_id)
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(map_related_word).collect()
}

fn map_definition(row: &SqliteRow) -> Result<Definition, sqlx::Error> {
    Ok(Definition {
        id: row.try_get("id")?,
        word_id: row.try_get("word_id")?,
        definition: row.try_get("definition")?,
        part_of_speech: row.try_get("part_of_speech")?,
    })
}

fn map_example(row: &SqliteRow) -> Result<Example, sqlx::Error> {
    Ok(Example {
        id: row.try_get("id")?,
        word_id: row.try_get("word_id")?,
        example: row.try_get("example")?,
        translation: row.try_get("translation")?,
    })
}

fn map_etymology(row: &SqliteRow) -> Result<Etymology, sqlx::Error> {
    Ok(Etymology {
        id: row.try_get("id")?,
        word_id: row.try_get("word_id")?,
        etymology: row.try_get("etymology")?,
    })
}

fn map_related_word(row: &SqliteRow) -> Result<RelatedWord, sqlx::Error> {
    Ok(RelatedWord {
        id: row.try_get("id")?,
        word_id: row.try_get("word_id")?,
        related_word: row.try_get("related_word")?,
        relationship_type: row.try_get("relationship_type")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_tables_match_schema_names() {
        let names: Vec<_> = [
            DetailTable::Definitions,
            DetailTable::Examples,
            DetailTable::Etymologies,
            DetailTable::RelatedWords,
        ]
        .iter()
        .map(|t| t.table_name())
        .collect();
        assert_eq!(names, vec!["definitions", "examples", "etymologies", "related_words"]);
    }
}
