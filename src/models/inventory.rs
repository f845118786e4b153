use serde::Deserialize;

/// A shortened URL as the backend stores it, joined with its author.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Inventory {
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub description: Option<String>,
    pub visits: u64,
    pub created_at: String,
    pub expire_at: String,

    pub author_id: String,
    pub avatar_url: Option<String>,
    pub email: String,
    pub username: String,
}

/// Body of `GET /v1/url/{slug}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Status { status: u16 },
    Links(Vec<LinkEntry>),
}

/// One element of a lookup array. Older backends return trimmed rows, so a
/// full record is not required to resolve a link.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LinkEntry {
    Record(Box<Inventory>),
    Partial {
        #[serde(default)]
        original_url: Option<String>,
    },
}

impl LinkEntry {
    pub fn original_url(&self) -> Option<&str> {
        let url = match self {
            LinkEntry::Record(record) => Some(record.original_url.as_str()),
            LinkEntry::Partial { original_url } => original_url.as_deref(),
        };
        url.filter(|u| !u.is_empty())
    }
}

impl LookupResponse {
    /// Target of the first link in the response, if the backend found one.
    pub fn first_target(&self) -> Option<&str> {
        match self {
            LookupResponse::Links(links) => links.first().and_then(LinkEntry::original_url),
            LookupResponse::Status { .. } => None,
        }
    }
}
