use super::entry::{Entry, RankedEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[serde(alias = "string")]
    Text,
    Number,
    Date,
    Boolean,
    Image,
    #[serde(other)]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Column {
    pub fn new(name: &str, kind: ColumnType) -> Self {
        Column {
            name: name.to_string(),
            kind,
            sortable: false,
            required: false,
            display_name: None,
        }
    }
}

/// A leaderboard as stored, with entries in insertion order.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    pub id: String,
    pub view_id: String,
    pub edit_id: String,
    pub title: String,
    pub subheading: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub note: Option<String>,
    pub template_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub columns: Vec<Column>,
    pub sort_by_column: Option<String>,
    pub entries: Vec<Entry>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response of `GET /api/leaderboards/{id}`: entries are ranked.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardDetail {
    pub id: String,
    pub view_id: String,
    pub edit_id: String,
    pub title: String,
    pub subheading: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub note: Option<String>,
    pub template_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub columns: Vec<Column>,
    pub sort_by_column: Option<String>,
    pub entries: Vec<RankedEntry>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSummary {
    pub id: String,
    pub view_id: String,
    pub edit_id: String,
    pub title: String,
    pub subheading: Option<String>,
    pub description: Option<String>,
    pub template_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub entry_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaderboardRequest {
    pub title: String,
    pub subheading: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub note: Option<String>,
    pub template_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    pub sort_by_column: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub template: Option<String>,
    pub limit: Option<usize>,
}
