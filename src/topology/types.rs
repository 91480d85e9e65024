//! Topology type definitions.

use std::net::Ipv4Addr;

use crate::ip::Subnet;

/// A simulated workload endpoint (pod)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Zero-based identity within the topology
    pub index: usize,
    pub address: Ipv4Addr,
    pub port: u16,
    /// Pre-quoted label fragment, e.g. `'{"app":"appA"}'`
    pub labels: String,
    pub name: String,
    pub namespace: String,
    pub node: String,
}

/// The full, immutable set of endpoints for one generation run
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) subnet: Subnet,
    pub(crate) endpoints: Vec<Endpoint>,
}

impl Topology {
    pub fn subnet(&self) -> &Subnet {
        &self.subnet
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Endpoint at `index`.
    ///
    /// Panics if the index is out of range; callers derive indices from `len()`.
    pub fn endpoint(&self, index: usize) -> &Endpoint {
        &self.endpoints[index]
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Number of distinct nodes that host at least one endpoint
    pub fn node_count(&self) -> usize {
        let mut nodes: Vec<&str> = self.endpoints.iter().map(|e| e.node.as_str()).collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes.len()
    }
}
