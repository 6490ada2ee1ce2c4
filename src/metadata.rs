//! Droplet metadata service client.
//!
//! Every droplet can reach a link-local metadata endpoint describing itself:
//! its region and the addresses bound to its private and public interfaces.
//! That is all the local identity this tool needs.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::DroplanError;

const DEFAULT_BASE_URL: &str = "http://169.254.169.254/";
const TIMEOUT_SECS: u64 = 5;

/// Local droplet metadata snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub region: String,
    #[serde(default)]
    pub interfaces: MetadataInterfaces,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataInterfaces {
    #[serde(default)]
    pub private: Vec<MetadataInterface>,
    #[serde(default)]
    pub public: Vec<MetadataInterface>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataInterface {
    #[serde(default)]
    pub ipv4: Option<MetadataIpv4>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataIpv4 {
    pub ip_address: String,
}

/// Client for the link-local metadata service.
pub struct MetadataClient {
    http: Client,
    base_url: Url,
}

impl MetadataClient {
    pub fn new() -> Result<Self, DroplanError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternative endpoint, used by tests.
    pub fn with_base_url(base_url: &str) -> Result<Self, DroplanError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(concat!("droplan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Fetch the full metadata document for this droplet.
    pub async fn fetch(&self) -> Result<Metadata, DroplanError> {
        let url = self.base_url.join("metadata/v1.json")?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DroplanError::Api {
                status,
                message: "metadata service error".to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

/// The droplet's own private IPv4 address, from the first private interface.
pub fn private_address(metadata: &Metadata) -> Result<&str, DroplanError> {
    let iface = metadata
        .interfaces
        .private
        .first()
        .ok_or(DroplanError::NoPrivateInterfaces)?;

    iface
        .ipv4
        .as_ref()
        .map(|ipv4| ipv4.ip_address.as_str())
        .ok_or(DroplanError::NoPrivateIpv4)
}

/// The droplet's own public IPv4 address, from the first public interface.
pub fn public_address(metadata: &Metadata) -> Result<&str, DroplanError> {
    let iface = metadata
        .interfaces
        .public
        .first()
        .ok_or(DroplanError::NoPublicInterfaces)?;

    iface
        .ipv4
        .as_ref()
        .map(|ipv4| ipv4.ip_address.as_str())
        .ok_or(DroplanError::NoPublicIpv4)
}
