use serde::{Deserialize, Serialize};

use crate::utils::{cmp_ignore_case, contains_ignore_case};

use super::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: i64,
    pub word: String,
    pub translation: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "isFavorite", default)]
    pub favorite: bool,
    #[serde(default)]
    pub learned: bool,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl VocabularyEntry {
    /// In-memory search across the word and its glosses
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        contains_ignore_case(&self.word, query)
            || self
                .translation
                .as_deref()
                .map(|t| contains_ignore_case(t, query))
                .unwrap_or(false)
            || self
                .definition
                .as_deref()
                .map(|d| contains_ignore_case(d, query))
                .unwrap_or(false)
    }
}

/// Alphabetical sort used by every vocabulary list view
pub fn sort_by_word(entries: &mut [VocabularyEntry]) {
    entries.sort_by(|a, b| cmp_ignore_case(&a.word, &b.word));
}

/// Payload for `POST /vocabulary` and `PUT /vocabulary/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct NewVocabularyEntry {
    pub word: String,
    pub translation: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyStats {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub learned: i64,
    #[serde(default)]
    pub favorites: i64,
}
