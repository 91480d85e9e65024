//! # Flowsynth - Synthetic cluster flow records for ingestion fixtures
//!
//! This library synthesizes plausible flow-visibility records, the kind a
//! cluster flow exporter emits, for feeding downstream ingestion pipelines
//! in tests. No packets are sent or captured.
//!
//! ## Overview
//!
//! A run simulates a small cluster: a pool of endpoints (pods) with
//! addresses, labels and node placement. Two kinds of traffic are emitted:
//!
//! - **Normal flows**: long-lived, heavy flows between random endpoint pairs
//! - **Attack episodes**: bursts of short, light flows converging on one victim
//!
//! The output is a single CSV artifact with a fixed 49-column schema.
//!
//! ## Architecture
//!
//! - `config`: Run parameters, defaults and validation
//! - `config_loader`: YAML loading and CLI overrides
//! - `ip`: Subnet parsing and address derivation
//! - `topology`: Endpoint pool construction
//! - `flow`: Flow record shape and synthesis of normal and attack flows
//! - `schema`: Ordered column table, header and row encoding
//! - `orchestrator`: Drives a complete run and writes the artifact
//! - `utils`: Timestamp formatting
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use flowsynth::config::GeneratorConfig;
//! use flowsynth::orchestrator;
//! use std::path::Path;
//!
//! let config = GeneratorConfig {
//!     num_ddos_flow: 200,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let output = orchestrator::run(&config, Path::new("."), chrono::Utc::now())?;
//! println!("{}", output.path.display());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Reproducibility
//!
//! Every random draw comes from one seeded `StdRng`. Passing the same seed
//! and the same clock reading reproduces a run byte for byte.
//!
//! ## Error Handling
//!
//! Modules report typed `thiserror` errors; the run-level API returns
//! `color_eyre::Result` so callers get the full context chain.

pub mod config;
pub mod config_loader;
pub mod flow;
pub mod ip;
pub mod orchestrator;
pub mod schema;
pub mod topology;
pub mod utils;
