use serde::{Deserialize, Serialize};

/// Phrase of the day shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPhrase {
    pub id: i64,
    pub phrase: String,
    pub translation: Option<String>,
    pub explanation: Option<String>,
    pub date: Option<String>,
}
