// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Shared identifiers, enums, id derivation, and configuration for the points ledger workspace.

pub mod config;
pub mod types;
pub mod uid;

pub use self::config::AppConfig;
