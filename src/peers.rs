//! Grouping of droplet records into peer address sets.

use std::collections::HashMap;

use crate::api::types::{Droplet, NetworkKind};

/// Map every private IPv4 address onto its droplet's region slug.
///
/// Droplets without a private IPv4 address contribute nothing; regions with
/// no contributing droplet are absent from the map rather than present with
/// an empty list. Region slugs are taken as-is from the API. A droplet with
/// several private addresses contributes all of them. Order within a region
/// follows discovery order.
pub fn group_private_by_region(droplets: &[Droplet]) -> HashMap<String, Vec<String>> {
    let mut by_region: HashMap<String, Vec<String>> = HashMap::new();

    for droplet in droplets {
        for net in &droplet.networks.v4 {
            if net.kind == NetworkKind::Private {
                by_region
                    .entry(droplet.region.slug.clone())
                    .or_default()
                    .push(net.ip_address.clone());
            }
        }
    }

    by_region
}

/// Every public IPv4 address across all droplets, in discovery order.
pub fn all_public(droplets: &[Droplet]) -> Vec<String> {
    let mut addresses = Vec::new();

    for droplet in droplets {
        for net in &droplet.networks.v4 {
            if net.kind == NetworkKind::Public {
                addresses.push(net.ip_address.clone());
            }
        }
    }

    addresses
}
