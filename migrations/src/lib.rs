//! Scripts for deploying and configuring the v2 exchange contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod asset_data;
pub mod chain;
pub mod cli;
mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod migration;
mod solidity;
pub mod types;
pub mod utils;
