//! Simulated cluster topology.
//!
//! A topology is the fixed pool of endpoints (address, port, labels,
//! identity, node placement) every flow record is drawn between.

pub mod builder;
pub mod types;

pub use builder::{build_from_config, build_topology, label_fragment, TopologyError};
pub use types::{Endpoint, Topology};
