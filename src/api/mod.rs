//! DigitalOcean API client.

pub mod droplets;
pub mod types;

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::SecureString;
use crate::error::DroplanError;

pub use droplets::{fetch_all, DropletLister, DropletPage, DropletsService};
pub use types::{Droplet, NetworkKind, PageLinks};

const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com/";
const TIMEOUT_SECS: u64 = 30;

/// Droplets per page; the API maximum, to keep page counts low.
const PER_PAGE: u32 = 200;

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DropletListResponse {
    droplets: Vec<Droplet>,
    #[serde(default)]
    links: Option<PageLinks>,
}

/// Authenticated client for the DigitalOcean v2 API.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: SecureString,
}

impl ApiClient {
    pub fn new(token: SecureString) -> Result<Self, DroplanError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Client against an alternative endpoint, used by tests.
    pub fn with_base_url(token: SecureString, base_url: &str) -> Result<Self, DroplanError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(concat!("droplan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            token,
        })
    }

    /// Lister over every droplet visible to the token.
    pub fn droplets(&self) -> DropletsService<'_> {
        DropletsService {
            client: self,
            tag: None,
        }
    }

    /// Lister narrowed server-side to droplets carrying `tag`.
    pub fn droplets_by_tag(&self, tag: &str) -> DropletsService<'_> {
        DropletsService {
            client: self,
            tag: Some(tag.to_string()),
        }
    }

    async fn list_droplets(
        &self,
        page: u32,
        tag: Option<&str>,
    ) -> Result<DropletPage, DroplanError> {
        let mut url = self.base_url.join("v2/droplets")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            query.append_pair("per_page", &PER_PAGE.to_string());
            if let Some(tag) = tag {
                query.append_pair("tag_name", tag);
            }
        }

        let response = self
            .http
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_default();
            return Err(DroplanError::Api { status, message });
        }

        let body: DropletListResponse = response.json().await?;
        Ok(DropletPage {
            droplets: body.droplets,
            links: body.links,
        })
    }
}
