//! Topology construction.
//!
//! Addresses, names and namespaces are deterministic in the endpoint index.
//! Ports, labels and node placement are drawn independently per endpoint.

use log::{debug, info};
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::ip::{Subnet, SubnetError};
use super::types::{Endpoint, Topology};

/// Destination ports an endpoint may listen on
pub const ENDPOINT_PORTS: [u16; 3] = [80, 443, 8080];

/// Label key carried by every endpoint
pub const LABEL_KEY: &str = "app";

/// Values the `app` label is drawn from
pub const LABEL_VALUES: [&str; 5] = ["appA", "appB", "appC", "appD", "appE"];

const NAMESPACE_ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Errors raised while building a topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Subnet {subnet} holds {capacity} addresses, not enough for {requested} endpoints")]
    SubnetTooSmall {
        subnet: Subnet,
        requested: usize,
        capacity: u64,
    },

    #[error("Topology needs at least one node to place endpoints on")]
    NoNodes,

    #[error(transparent)]
    InvalidSubnet(#[from] SubnetError),
}

/// Render a single-key label map as the quoted fragment used in flow records
pub fn label_fragment(key: &str, value: &str) -> String {
    let mut map = serde_json::Map::new();
    map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    format!("'{}'", serde_json::Value::Object(map))
}

/// Name of the `n`-th node
pub fn node_name(n: usize) -> String {
    format!("node-{}", n)
}

/// Build `count` endpoints inside `subnet`, spread over `num_nodes` nodes.
///
/// The capacity check happens once, before any endpoint is generated.
pub fn build_topology<R: Rng + ?Sized>(
    count: usize,
    subnet: &Subnet,
    num_nodes: usize,
    rng: &mut R,
) -> Result<Topology, TopologyError> {
    if count as u64 > subnet.capacity() {
        return Err(TopologyError::SubnetTooSmall {
            subnet: *subnet,
            requested: count,
            capacity: subnet.capacity(),
        });
    }
    if num_nodes == 0 {
        return Err(TopologyError::NoNodes);
    }

    let mut endpoints = Vec::with_capacity(count);
    for index in 0..count {
        let address = subnet
            .address_for(index as u64)
            .ok_or_else(|| TopologyError::SubnetTooSmall {
                subnet: *subnet,
                requested: count,
                capacity: subnet.capacity(),
            })?;

        let port = ENDPOINT_PORTS[rng.gen_range(0..ENDPOINT_PORTS.len())];
        let value = LABEL_VALUES[rng.gen_range(0..LABEL_VALUES.len())];
        let node = rng.gen_range(0..num_nodes);

        let endpoint = Endpoint {
            index,
            address,
            port,
            labels: label_fragment(LABEL_KEY, value),
            name: format!("pod-{}", index),
            namespace: format!(
                "namespace-{}",
                NAMESPACE_ALPHABET[index % NAMESPACE_ALPHABET.len()] as char
            ),
            node: node_name(node),
        };
        debug!(
            "Endpoint {} -> {} ({}, {})",
            endpoint.name, endpoint.address, endpoint.namespace, endpoint.node
        );
        endpoints.push(endpoint);
    }

    let topology = Topology {
        subnet: *subnet,
        endpoints,
    };
    info!(
        "Built topology with {} endpoints on {} nodes in {}",
        topology.len(),
        topology.node_count(),
        subnet
    );
    Ok(topology)
}

/// Build the topology described by a configuration
pub fn build_from_config<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Topology, TopologyError> {
    let subnet: Subnet = config.subnet.parse()?;
    build_topology(config.number_of_pods, &subnet, config.num_nodes, rng)
}
