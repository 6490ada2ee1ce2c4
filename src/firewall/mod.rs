//! Packet-filter orchestration.
//!
//! The filtering itself lives in the kernel; this module only drives it
//! through the four iptables primitives the reconciler needs. The trait is
//! deliberately that narrow so tests can substitute an in-memory recorder.

mod chain;
mod iptables;

use anyhow::Result;

pub use chain::{setup_chain, sync_peers, FILTER_TABLE, PRIVATE_CHAIN, PUBLIC_CHAIN};
pub use iptables::IptablesBackend;

use crate::error::FirewallError;

/// The packet-filter primitives the reconciler is built on.
///
/// Each call is scoped to a table and a chain (or built-in rule set) and
/// carries an ordered rule argument list whose encoding is the backend's
/// business.
pub trait PacketFilter {
    /// Create a new chain. Reports [`FirewallError::ChainExists`] when the
    /// chain is already present.
    fn new_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError>;

    /// Remove every rule from a chain.
    fn clear_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError>;

    /// Append a rule to the end of a chain.
    fn append(&self, table: &str, chain: &str, rule: &[String]) -> Result<(), FirewallError>;

    /// Append a rule only if an identical rule is not already present.
    fn append_unique(&self, table: &str, chain: &str, rule: &[String])
        -> Result<(), FirewallError>;
}

/// Check if running as root (effective UID == 0).
///
/// iptables needs CAP_NET_ADMIN; checking for UID 0 up front gives a clear
/// error before any chain is touched.
pub fn check_root() -> Result<()> {
    // SAFETY: geteuid() reads the effective user ID, has no preconditions
    // and cannot fail.
    let euid = unsafe { libc::geteuid() };

    if euid != 0 {
        anyhow::bail!("droplan must run as root to manage iptables rules");
    }
    Ok(())
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Recording filter for reconciler tests.
    ///
    /// Calls are rendered as flat strings so ordering assertions stay
    /// readable. An optional failure index makes the Nth call (0-based)
    /// return a command error; `chain_exists` makes every `new_chain`
    /// report [`FirewallError::ChainExists`].
    #[derive(Default)]
    pub struct RecordingFilter {
        pub calls: Mutex<Vec<String>>,
        pub fail_at: Mutex<Option<usize>>,
        pub chain_exists: Mutex<bool>,
    }

    impl RecordingFilter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Mutex::new(Some(index)),
                ..Self::default()
            }
        }

        pub fn recorded(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), FirewallError> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(call.clone());

            if *self.fail_at.lock().unwrap() == Some(index) {
                return Err(FirewallError::Command {
                    program: "iptables".to_string(),
                    args: call,
                    stderr: "injected failure".to_string(),
                });
            }
            Ok(())
        }
    }

    impl PacketFilter for RecordingFilter {
        fn new_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError> {
            self.record(format!("new_chain {table} {chain}"))?;
            if *self.chain_exists.lock().unwrap() {
                return Err(FirewallError::ChainExists {
                    table: table.to_string(),
                    chain: chain.to_string(),
                });
            }
            Ok(())
        }

        fn clear_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError> {
            self.record(format!("clear_chain {table} {chain}"))
        }

        fn append(&self, table: &str, chain: &str, rule: &[String]) -> Result<(), FirewallError> {
            self.record(format!("append {table} {chain} {}", rule.join(" ")))
        }

        fn append_unique(
            &self,
            table: &str,
            chain: &str,
            rule: &[String],
        ) -> Result<(), FirewallError> {
            self.record(format!("append_unique {table} {chain} {}", rule.join(" ")))
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_root_matches_euid() {
        let euid = unsafe { libc::geteuid() };
        assert_eq!(check_root().is_ok(), euid == 0);
    }
}
