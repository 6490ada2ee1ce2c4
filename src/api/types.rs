//! DigitalOcean API payload types.

use serde::Deserialize;

use crate::error::DroplanError;

/// A droplet record as returned by the droplets listing endpoint.
///
/// Only the fields the reconciliation needs are deserialized; everything
/// else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Droplet {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub region: Region,
    pub networks: Networks,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
    #[serde(default)]
    pub v6: Vec<NetworkV6>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkV4 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub kind: NetworkKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkV6 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub kind: NetworkKind,
}

/// Address visibility as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Private,
    Public,
    #[serde(other)]
    Unknown,
}

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pages {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}

impl PageLinks {
    /// True when the response carries no further pages.
    pub fn is_last_page(&self) -> bool {
        match &self.pages {
            None => true,
            Some(pages) => pages.next.as_deref().map_or(true, str::is_empty),
        }
    }

    /// Page number to request next, derived from the `next` link URL.
    ///
    /// A `next` link that is not a URL, or that carries no `page` query
    /// parameter, is a malformed response and surfaces as an error rather
    /// than ending pagination early.
    pub fn next_page(&self) -> Result<u32, DroplanError> {
        let next = self
            .pages
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DroplanError::PaginationLink("missing next link".to_string()))?;

        let url = url::Url::parse(next)
            .map_err(|_| DroplanError::PaginationLink(next.to_string()))?;

        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok())
            .ok_or_else(|| DroplanError::PaginationLink(next.to_string()))
    }
}
