use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A form as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,

    /// Published forms accept submissions and no longer accept edits
    #[serde(default)]
    pub published: bool,

    /// Public link token for the submission page
    pub share_url: String,

    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub submissions: u64,

    pub created_at_ms: u64,

    /// Element sequence in its wire shape (JSON array)
    #[serde(default = "empty_content")]
    pub content: String,
}

fn empty_content() -> String {
    "[]".to_string()
}

impl FormRecord {
    pub fn new(id: u64, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            published: false,
            share_url: uuid::Uuid::new_v4().to_string(),
            visits: 0,
            submissions: 0,
            created_at_ms: now_ms(),
            content: empty_content(),
        }
    }
}

/// One filled-in form, keyed by element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub form_id: u64,
    pub created_at_ms: u64,
    pub values: BTreeMap<String, String>,
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
