use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Computed on every read; never stored on an entry.
pub const RANK_FIELD: &str = "rank";

/// One participant row of a leaderboard.
///
/// Column values may live in any of three places: directly on the entry,
/// in the `data` bag, or in the `metadata` bag. Lookup order is fixed, see
/// [`crate::ranking::resolver::resolve_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entry {
    pub fn new(id: impl Into<String>) -> Self {
        Entry {
            id: id.into(),
            data: None,
            metadata: None,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_data(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn with_metadata(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), value.into());
        self
    }
}

/// An entry stamped with its 1-based position after ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: Entry,
}

/// Body of `POST /api/leaderboards/{id}/entries`.
///
/// Any extra top-level keys are kept on the entry so custom columns can be
/// filled without going through `metadata`.
#[derive(Debug, Deserialize)]
pub struct NewEntry {
    pub name: Option<String>,
    pub score: Option<Value>,
    pub avatar: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub data: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryLeaderboardRef {
    pub id: String,
    pub view_id: String,
    pub edit_id: String,
    pub title: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct EntryMutationResult {
    pub success: bool,
    pub entry: Entry,
    pub leaderboard: EntryLeaderboardRef,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRemovalResult {
    pub success: bool,
    pub removed_entry: Entry,
    pub leaderboard: EntryLeaderboardRef,
}
