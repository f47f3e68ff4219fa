//! Idempotent backup-and-symlink installer for dotfiles repositories.
//!
//! Links every file declared in a repository's `dotlink.toml` into the home
//! directory. Anything already sitting at a target path that is not the
//! expected symlink is moved into a timestamped `backup-*` directory first,
//! so a run never deletes user data and can always be repeated.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: parse and validate the manifest into managed files
//! - **[`resources`]**: idempotent `inspect + apply` filesystem primitives
//! - **[`tasks`]**: the installer and inspector, driven by an explicit context
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `status`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod resources;
pub mod tasks;
