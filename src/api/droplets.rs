//! Paginated droplet retrieval.
//!
//! The listing endpoint returns droplets a page at a time with a `links`
//! block pointing at the next page. [`fetch_all`] follows those links until
//! the API reports the last page, accumulating records in arrival order.

use async_trait::async_trait;

use super::types::{Droplet, PageLinks};
use super::ApiClient;
use crate::error::DroplanError;

/// One page of droplet results.
#[derive(Debug, Default)]
pub struct DropletPage {
    pub droplets: Vec<Droplet>,
    /// Absent links mean this was the only page.
    pub links: Option<PageLinks>,
}

/// A capability that serves droplet pages by page number.
#[async_trait]
pub trait DropletLister {
    async fn list_page(&self, page: u32) -> Result<DropletPage, DroplanError>;
}

/// Droplet listing scoped to an [`ApiClient`], optionally narrowed by tag.
pub struct DropletsService<'a> {
    pub(super) client: &'a ApiClient,
    pub(super) tag: Option<String>,
}

#[async_trait]
impl DropletLister for DropletsService<'_> {
    async fn list_page(&self, page: u32) -> Result<DropletPage, DroplanError> {
        self.client.list_droplets(page, self.tag.as_deref()).await
    }
}

/// Retrieve the complete droplet inventory behind `lister`.
///
/// Pagination stops only when a response carries no links or its links
/// report the last page. Any retrieval error, including a next link that
/// cannot be parsed, aborts immediately with no partial result.
pub async fn fetch_all(lister: &dyn DropletLister) -> Result<Vec<Droplet>, DroplanError> {
    let mut droplets = Vec::new();
    let mut page = 1;

    loop {
        let result = lister.list_page(page).await?;
        droplets.extend(result.droplets);

        match result.links {
            Some(links) if !links.is_last_page() => page = links.next_page()?,
            _ => break,
        }
    }

    Ok(droplets)
}
