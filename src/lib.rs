//! Declarative binary dependency fetcher.
//!
//! Reads `DEPS.toml` manifests, downloads every artifact they declare,
//! verifies its SHA-1, extracts `.tar.xz` archives, and deletes whatever a
//! previous run fetched that the manifests no longer mention.
//!
//! The public API is organised into layers:
//!
//! - **[`manifest`]**: parse `DEPS.toml` and resolve linked manifests
//! - **[`resources`]**: idempotent `check + apply` primitives (checksum, fetch, archive)
//! - **[`sync`]**: the orchestrator and garbage collection over [`record`]
//! - **[`commands`]**: top-level subcommands (`sync`, `force-extract`, `update`, `clean`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod record;
pub mod resources;
pub mod sync;
