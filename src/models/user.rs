use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
    #[serde(rename = "nativeLanguage")]
    pub native_language: Option<String>,
    #[serde(rename = "englishLevel")]
    pub english_level: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl User {
    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        &self.username
    }
}

/// Response from `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Response from `GET /auth/verify-token`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: Option<User>,
}

/// Aggregate counts for the dashboard landing view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(rename = "vocabularyCount", default)]
    pub vocabulary_count: i64,
    #[serde(rename = "flashcardsDue", default)]
    pub flashcards_due: i64,
    #[serde(rename = "streakDays", default)]
    pub streak_days: i64,
    #[serde(rename = "achievementsUnlocked", default)]
    pub achievements_unlocked: i64,
}
