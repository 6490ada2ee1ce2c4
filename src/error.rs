//! Error types for droplan.

use thiserror::Error;

/// Errors produced while discovering peers and reconciling the firewall.
#[derive(Error, Debug)]
pub enum DroplanError {
    #[error("Usage: DO_KEY environment variable must be set")]
    MissingToken,

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("API returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("malformed pagination link: {0}")]
    PaginationLink(String),

    #[error("no private interfaces")]
    NoPrivateInterfaces,

    #[error("no ipv4 private iface")]
    NoPrivateIpv4,

    #[error("no public interfaces")]
    NoPublicInterfaces,

    #[error("no ipv4 public iface")]
    NoPublicIpv4,

    #[error("local interface could not be found")]
    InterfaceNotFound,

    #[error("failed to list local interfaces: {0}")]
    Interfaces(String),

    #[error(transparent)]
    Firewall(#[from] FirewallError),
}

/// Errors from the packet-filter backend.
///
/// "Chain already exists" is a distinct kind rather than a string the caller
/// has to match: the reconciler treats it as success when creating its own
/// chain on a host that has already been set up.
#[derive(Error, Debug)]
pub enum FirewallError {
    #[error("chain {chain} already exists in table {table}")]
    ChainExists { table: String, chain: String },

    #[error("{program} {args} failed: {stderr}")]
    Command {
        program: String,
        args: String,
        stderr: String,
    },

    #[error("failed to execute {program}: {message}")]
    Exec { program: String, message: String },
}
