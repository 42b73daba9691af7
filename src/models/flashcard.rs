use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub front: String,
    pub back: String,
    pub deck: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    #[serde(rename = "timesReviewed", default)]
    pub times_reviewed: i64,
    #[serde(default)]
    pub learned: bool,
}

/// Payload for `POST /flashcards` and `PUT /flashcards/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    pub deck: Option<String>,
}
