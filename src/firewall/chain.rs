//! Idempotent reconciliation of the peer allow-list chains.

use crate::cmd::args_to_strings;
use crate::error::FirewallError;

use super::PacketFilter;

pub const FILTER_TABLE: &str = "filter";

/// Chain holding the same-region private peers.
pub const PRIVATE_CHAIN: &str = "droplan-peers";

/// Chain holding all public peers, managed only with `PUBLIC=true`.
pub const PUBLIC_CHAIN: &str = "droplan-peers-public";

const INPUT_CHAIN: &str = "INPUT";

/// Ensure `chain` exists and is wired into INPUT for `interface` with
/// default-deny semantics.
///
/// The three INPUT rules are ordered so the conntrack accept sits between
/// the jump into `chain` and the final drop: established connections keep
/// flowing during the window where [`sync_peers`] has flushed the chain but
/// not yet repopulated it. A chain that already exists is fine; that is what
/// makes repeated runs idempotent. Failures abort at the failing step with
/// no rollback of the steps before it.
pub fn setup_chain(
    filter: &dyn PacketFilter,
    interface: &str,
    chain: &str,
) -> Result<(), FirewallError> {
    match filter.new_chain(FILTER_TABLE, chain) {
        Err(FirewallError::ChainExists { .. }) => {}
        other => other?,
    }

    filter.append_unique(
        FILTER_TABLE,
        INPUT_CHAIN,
        &args_to_strings(&["-i", interface, "-j", chain]),
    )?;

    filter.append_unique(
        FILTER_TABLE,
        INPUT_CHAIN,
        &args_to_strings(&[
            "-i",
            interface,
            "-m",
            "conntrack",
            "--ctstate",
            "ESTABLISHED,RELATED",
            "-j",
            "ACCEPT",
        ]),
    )?;

    filter.append_unique(
        FILTER_TABLE,
        INPUT_CHAIN,
        &args_to_strings(&["-i", interface, "-j", "DROP"]),
    )?;

    Ok(())
}

/// Replace the rules in `chain` with one accept per peer address.
///
/// Full flush then repopulate, not a diff: peer sets are small and this
/// guarantees no stale rule survives. Appends that happened before a failure
/// stay in the chain.
pub fn sync_peers(
    filter: &dyn PacketFilter,
    chain: &str,
    peers: &[String],
) -> Result<(), FirewallError> {
    filter.clear_chain(FILTER_TABLE, chain)?;

    for peer in peers {
        filter.append(
            FILTER_TABLE,
            chain,
            &args_to_strings(&["-s", peer, "-j", "ACCEPT"]),
        )?;
    }

    Ok(())
}
