//! One reconciliation run: discover peers, program the firewall.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::{fetch_all, ApiClient, Droplet};
use crate::cmd::RealCommandExecutor;
use crate::config::Config;
use crate::error::DroplanError;
use crate::firewall::{
    check_root, setup_chain, sync_peers, IptablesBackend, PacketFilter, PRIVATE_CHAIN,
    PUBLIC_CHAIN,
};
use crate::interfaces::{find_interface_name, local_interfaces, Interface};
use crate::metadata::{self, MetadataClient};
use crate::peers::{all_public, group_private_by_region};

/// Execute a single reconciliation run.
///
/// Every collaborator failure is fatal, with one exception: a droplet that
/// has no private interface at all is tolerated when public-interface
/// management was requested, so public-only hosts can run with `PUBLIC=true`
/// from the same timer unit as everything else.
pub async fn run(config: &Config) -> Result<()> {
    check_root()?;

    let metadata_client = MetadataClient::new()?;
    let api = ApiClient::new(config.access_token.clone())?;
    let executor = RealCommandExecutor::new();
    let filter = IptablesBackend::new(executor.clone());

    let metadata = metadata_client
        .fetch()
        .await
        .context("failed to fetch droplet metadata")?;

    let droplets = fetch_inventory(&api, config)
        .await
        .context("failed to list droplets")?;
    info!("Found {} droplets", droplets.len());

    let interfaces = local_interfaces(&executor)?;

    if config.manage_public {
        reconcile_public(&filter, &interfaces, &metadata, &droplets)?;
    }

    let private_address = match metadata::private_address(&metadata) {
        Err(DroplanError::NoPrivateInterfaces) if config.manage_public => {
            info!("No private interfaces; skipping {}", PRIVATE_CHAIN);
            return Ok(());
        }
        other => other?,
    };

    let region_peers = group_private_by_region(&droplets)
        .remove(&metadata.region)
        .unwrap_or_else(|| {
            warn!("No droplets listed in region [{}]", metadata.region);
            Vec::new()
        });

    let interface = find_interface_name(&interfaces, private_address)?;
    setup_chain(&filter, interface, PRIVATE_CHAIN)?;
    sync_peers(&filter, PRIVATE_CHAIN, &region_peers)?;
    info!("Added {} peers to {}", region_peers.len(), PRIVATE_CHAIN);

    Ok(())
}

async fn fetch_inventory(api: &ApiClient, config: &Config) -> Result<Vec<Droplet>, DroplanError> {
    match &config.peer_tag {
        Some(tag) => fetch_all(&api.droplets_by_tag(tag)).await,
        None => fetch_all(&api.droplets()).await,
    }
}

fn reconcile_public(
    filter: &dyn PacketFilter,
    interfaces: &[Interface],
    metadata: &crate::metadata::Metadata,
    droplets: &[Droplet],
) -> Result<()> {
    let public_peers = all_public(droplets);
    let public_address = metadata::public_address(metadata)?;
    let interface = find_interface_name(interfaces, public_address)?;

    setup_chain(filter, interface, PUBLIC_CHAIN)?;
    sync_peers(filter, PUBLIC_CHAIN, &public_peers)?;
    info!("Added {} peers to {}", public_peers.len(), PUBLIC_CHAIN);

    Ok(())
}
