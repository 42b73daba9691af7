//! Data models for LinguaNote entities.
//!
//! This module contains the data structures exchanged with the notebook
//! backend:
//!
//! - `User`, `AuthResponse`, `VerifyResponse`: account and session types
//! - `VocabularyEntry`, `VocabularyStats`: the vocabulary notebook
//! - `Flashcard`: spaced-practice cards
//! - `DailyPhrase`, `DashboardSummary`: the landing dashboard

use serde::{Deserialize, Serialize};

pub mod flashcard;
pub mod phrase;
pub mod user;
pub mod vocabulary;

pub use flashcard::{Flashcard, NewFlashcard};
pub use phrase::DailyPhrase;
pub use user::{AuthResponse, DashboardSummary, User, VerifyResponse};
pub use vocabulary::{NewVocabularyEntry, VocabularyEntry, VocabularyStats};

/// Difficulty band shared by vocabulary entries and flashcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "Beginner"),
            Difficulty::Intermediate => write!(f, "Intermediate"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}
