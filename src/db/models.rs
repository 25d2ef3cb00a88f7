use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

pub type WordId = i64;

/// Learner's self-assessed proficiency. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    #[default]
    Unknown,
    Learning,
    Mastered,
}

impl WordStatus {
    pub const ALL: [WordStatus; 3] = [WordStatus::Unknown, WordStatus::Learning, WordStatus::Mastered];

    pub const fn as_str(self) -> &'static str {
        match self {
            WordStatus::Unknown => "unknown",
            WordStatus::Learning => "learning",
            WordStatus::Mastered => "mastered",
        }
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordStatus {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unknown" => Ok(WordStatus::Unknown),
            "learning" => Ok(WordStatus::Learning),
            "mastered" => Ok(WordStatus::Mastered),
            other => Err(StoreError::Validation(format!(
                "invalid status '{other}', expected one of unknown, learning, mastered"
            ))),
        }
    }
}

/// Summary row of the `words` table, without child collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub word: String,
    pub phonetic: Option<String>,
    pub part_of_speech: Option<String>,
    pub status: WordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub review_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub id: i64,
    pub word_id: WordId,
    pub definition: String,
    pub part_of_speech: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: i64,
    pub word_id: WordId,
    pub example: String,
    pub translation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etymology {
    pub id: i64,
    pub word_id: WordId,
    pub etymology: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedWord {
    pub id: i64,
    pub word_id: WordId,
    pub related_word: String,
    pub relationship_type: Option<String>,
}

/// A word together with all four detail collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetails {
    #[serde(flatten)]
    pub word: Word,
    pub definitions: Vec<Definition>,
    pub examples: Vec<Example>,
    pub etymologies: Vec<Etymology>,
    pub related_words: Vec<RelatedWord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDefinition {
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExample {
    pub example: String,
    #[serde(default)]
    pub translation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEtymology {
    pub etymology: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRelatedWord {
    pub related_word: String,
    #[serde(default)]
    pub relationship_type: Option<String>,
}

/// Payload for creating a word and its initial detail rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWord {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub status: WordStatus,
    #[serde(default)]
    pub definitions: Vec<NewDefinition>,
    #[serde(default)]
    pub examples: Vec<NewExample>,
    #[serde(default)]
    pub etymologies: Vec<NewEtymology>,
    #[serde(default)]
    pub related_words: Vec<NewRelatedWord>,
}

impl NewWord {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>, part_of_speech: Option<&str>) -> Self {
        self.definitions.push(NewDefinition {
            definition: definition.into(),
            part_of_speech: part_of_speech.map(str::to_string),
        });
        self
    }

    pub fn with_example(mut self, example: impl Into<String>, translation: Option<&str>) -> Self {
        self.examples.push(NewExample {
            example: example.into(),
            translation: translation.map(str::to_string),
        });
        self
    }

    pub fn with_etymology(mut self, etymology: impl Into<String>) -> Self {
        self.etymologies.push(NewEtymology {
            etymology: etymology.into(),
        });
        self
    }

    pub fn with_related_word(mut self, related_word: impl Into<String>, relationship_type: Option<&str>) -> Self {
        self.related_words.push(NewRelatedWord {
            related_word: related_word.into(),
            relationship_type: relationship_type.map(str::to_string),
        });
        self
    }
}

/// Partial details update.
///
/// `phonetic` and `part_of_speech` are always written (absent becomes an
/// empty string). A collection set to `Some` replaces every stored row of
/// that collection, `Some(vec![])` clears it, `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDetailsUpdate {
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Option<Vec<NewDefinition>>,
    #[serde(default)]
    pub examples: Option<Vec<NewExample>>,
    #[serde(default)]
    pub etymologies: Option<Vec<NewEtymology>>,
    #[serde(default)]
    pub related_words: Option<Vec<NewRelatedWord>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub unknown: i64,
    pub learning: i64,
    pub mastered: i64,
}

impl StatusCounts {
    pub fn get(&self, status: WordStatus) -> i64 {
        match status {
            WordStatus::Unknown => self.unknown,
            WordStatus::Learning => self.learning,
            WordStatus::Mastered => self.mastered,
        }
    }

    pub fn total(&self) -> i64 {
        self.unknown + self.learning + self.mastered
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: Vec<WordId>,
    pub skipped: Vec<String>,
    pub failed: Vec<ImportFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    pub word: String,
    pub reason: String,
}
