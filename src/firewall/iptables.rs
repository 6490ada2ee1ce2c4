//! iptables backend implementation.

use crate::cmd::{CommandExecutor, CommandOutput};
use crate::error::FirewallError;

use super::PacketFilter;

const IPTABLES_BIN: &str = "iptables";

/// Marker iptables prints on stderr when `-N` hits an existing chain.
const CHAIN_EXISTS_MARKER: &str = "Chain already exists";

/// [`PacketFilter`] implementation that shells out to `iptables`.
pub struct IptablesBackend<E: CommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> IptablesBackend<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    fn run(&self, args: Vec<String>) -> Result<CommandOutput, FirewallError> {
        self.executor
            .execute(IPTABLES_BIN, &args)
            .map_err(|e| FirewallError::Exec {
                program: IPTABLES_BIN.to_string(),
                message: e.to_string(),
            })
    }

    fn run_checked(&self, args: Vec<String>) -> Result<(), FirewallError> {
        let rendered = args.join(" ");
        let output = self.run(args)?;
        if output.success {
            Ok(())
        } else {
            Err(FirewallError::Command {
                program: IPTABLES_BIN.to_string(),
                args: rendered,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

fn base_args(table: &str, action: &str, chain: &str) -> Vec<String> {
    vec![
        "-t".to_string(),
        table.to_string(),
        action.to_string(),
        chain.to_string(),
    ]
}

impl<E: CommandExecutor> PacketFilter for IptablesBackend<E> {
    fn new_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError> {
        let args = base_args(table, "-N", chain);
        let rendered = args.join(" ");
        let output = self.run(args)?;

        if output.success {
            Ok(())
        } else if output.stderr.contains(CHAIN_EXISTS_MARKER) {
            Err(FirewallError::ChainExists {
                table: table.to_string(),
                chain: chain.to_string(),
            })
        } else {
            Err(FirewallError::Command {
                program: IPTABLES_BIN.to_string(),
                args: rendered,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    fn clear_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError> {
        self.run_checked(base_args(table, "-F", chain))
    }

    fn append(&self, table: &str, chain: &str, rule: &[String]) -> Result<(), FirewallError> {
        let mut args = base_args(table, "-A", chain);
        args.extend(rule.iter().cloned());
        self.run_checked(args)
    }

    fn append_unique(
        &self,
        table: &str,
        chain: &str,
        rule: &[String],
    ) -> Result<(), FirewallError> {
        let mut check = base_args(table, "-C", chain);
        check.extend(rule.iter().cloned());
        let output = self.run(check.clone())?;

        if output.success {
            // identical rule already present
            return Ok(());
        }

        // -C exits 1 when the rule is absent; anything else is a real error
        if output.code != Some(1) {
            return Err(FirewallError::Command {
                program: IPTABLES_BIN.to_string(),
                args: check.join(" "),
                stderr: output.stderr.trim().to_string(),
            });
        }

        self.append(table, chain, rule)
    }
}
