//! Configuration loading, parsing, and validation for fleetcheck.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use fleetcheck::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".fleetcheck");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "profile:\n  min_clock_mhz: 1400\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.profile.min_clock_mhz, 1400);
//! ```
//!
//! # Configuration File Locations
//!
//! fleetcheck discovers and merges configuration in this order:
//! 1. User global config (`~/.fleetcheck/config.yml`)
//! 2. Project config (`.fleetcheck/config.yml`)
//! 3. Local overrides (`.fleetcheck/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{
    FleetConfig, InvokerSettings, OutputMode, RequirementProfile, Settings, TransportSettings,
};

pub use loader::{
    load_config, load_config_file, load_config_value, load_merged_config, parse_config,
    ConfigPaths,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};
