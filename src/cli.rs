//! CLI argument parsing with clap.

use clap::Parser;

/// Restrict inbound traffic on a droplet's interfaces to its peer droplets.
///
/// Configuration comes from the environment: `DO_KEY` (required API token),
/// `DO_TAG` (optional tag filter for the peer inventory) and `PUBLIC=true`
/// (also manage an allow-list on the public interface).
#[derive(Parser)]
#[command(name = "droplan")]
#[command(author, version, about = "Peer allow-list firewall for DigitalOcean droplets")]
pub struct Cli {
    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["droplan", "--quiet"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["droplan"]);
        assert!(!cli.quiet);
        assert!(!cli.verbose);
    }
}
