use crate::templates::TemplateConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCell {
    pub column: String,
    pub display_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    pub id: String,
    pub rank: u32,
    pub rank_label: String,
    pub medal: Option<Medal>,
    pub highlighted: bool,
    pub name: String,
    pub avatar: Option<String>,
    pub primary_value: String,
    pub primary_short: Option<String>,
    pub cells: Vec<RenderedCell>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLeaderboard {
    pub title: String,
    pub subheading: Option<String>,
    pub description: Option<String>,
    pub template: &'static TemplateConfig,
    pub sort_by_column: Option<String>,
    pub primary_display_name: Option<String>,
    pub headers: Vec<String>,
    pub podium: Vec<RenderedRow>,
    pub rows: Vec<RenderedRow>,
    pub total_entries: usize,
}
