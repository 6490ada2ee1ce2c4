//! # droplan - peer allow-list firewall for DigitalOcean droplets
//!
//! droplan discovers the droplets that belong to the same region as the host
//! it runs on (optionally narrowed to a tag) and programs iptables so that
//! only those peers may reach the host on its private interface; everything
//! else inbound on that interface is dropped. With `PUBLIC=true` it manages
//! a second chain on the public interface allowing the public addresses of
//! all peers.
//!
//! It runs once per invocation, typically from a systemd timer, and
//! reconciles the chains idempotently: re-running against an already
//! configured host changes nothing.
//!
//! ## Pipeline
//!
//! ```text
//! metadata service ──▶ own region + addresses
//! droplets API ──────▶ paginated inventory ──▶ peer sets (peers)
//! ip addr ───────────▶ interface for each local address (interfaces)
//! iptables ──────────▶ droplan-peers / droplan-peers-public (firewall)
//! ```
//!
//! ## Modules
//!
//! - [`api`] - DigitalOcean API client and paginated droplet retrieval
//! - [`metadata`] - link-local droplet metadata client
//! - [`peers`] - grouping of droplets into peer address sets
//! - [`interfaces`] - local interface enumeration and resolution
//! - [`firewall`] - packet-filter primitives and chain reconciliation
//! - [`run`] - the per-invocation orchestration
//! - [`cli`], [`config`], [`cmd`], [`error`] - process surface and plumbing

pub mod api;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod firewall;
pub mod interfaces;
pub mod metadata;
pub mod peers;
pub mod run;
