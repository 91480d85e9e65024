//! IP address handling for the simulated cluster.
//!
//! Endpoint addresses are carved out of a single configured IPv4 subnet.

pub mod subnet;

pub use subnet::{Subnet, SubnetError};
