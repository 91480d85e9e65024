//! Flow record shape.

use chrono::{DateTime, Utc};
use std::fmt;
use std::net::Ipv4Addr;

/// Locality classification of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowType {
    /// Source and destination share a node
    IntraNode,
    /// Source and destination sit on different nodes
    InterNode,
    /// Traffic leaving the simulated cluster
    External,
}

impl FlowType {
    /// Numeric code written to the `FlowType` column
    pub fn code(&self) -> u8 {
        match self {
            FlowType::IntraNode => 1,
            FlowType::InterNode => 2,
            FlowType::External => 3,
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowType::IntraNode => "intra-node",
            FlowType::InterNode => "inter-node",
            FlowType::External => "external",
        };
        f.write_str(name)
    }
}

/// One synthesized observation of traffic between two endpoints.
///
/// Totals equal deltas: each record stands for a single reporting interval.
/// Policy fields are reserved for schema compatibility and always left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord {
    pub inserted_time: DateTime<Utc>,
    pub flow_start_seconds: DateTime<Utc>,
    pub flow_end_seconds: DateTime<Utc>,
    pub flow_end_seconds_from_source_node: DateTime<Utc>,
    pub flow_end_seconds_from_destination_node: DateTime<Utc>,
    pub flow_end_reason: u8,
    pub source_ip: Ipv4Addr,
    pub destination_ip: Ipv4Addr,
    pub source_transport_port: u16,
    pub destination_transport_port: u16,
    pub protocol_identifier: u8,
    pub packet_total_count: u64,
    pub octet_total_count: u64,
    pub packet_delta_count: u64,
    pub octet_delta_count: u64,
    pub reverse_packet_total_count: u64,
    pub reverse_octet_total_count: u64,
    pub reverse_packet_delta_count: u64,
    pub reverse_octet_delta_count: u64,
    pub source_pod_name: String,
    pub source_pod_namespace: String,
    pub source_node_name: String,
    pub destination_pod_name: String,
    pub destination_pod_namespace: String,
    pub destination_node_name: String,
    pub destination_cluster_ip: String,
    pub destination_service_port: u16,
    pub destination_service_port_name: String,
    pub ingress_network_policy_name: String,
    pub ingress_network_policy_namespace: String,
    pub ingress_network_policy_rule_name: String,
    pub ingress_network_policy_rule_action: u8,
    pub ingress_network_policy_type: u8,
    pub egress_network_policy_name: String,
    pub egress_network_policy_namespace: String,
    pub egress_network_policy_rule_name: String,
    pub egress_network_policy_rule_action: u8,
    pub egress_network_policy_type: u8,
    pub tcp_state: String,
    pub flow_type: FlowType,
    pub source_pod_labels: String,
    pub destination_pod_labels: String,
    pub throughput: u64,
    pub reverse_throughput: u64,
    pub throughput_from_source_node: u64,
    pub throughput_from_destination_node: u64,
    pub reverse_throughput_from_source_node: u64,
    pub reverse_throughput_from_destination_node: u64,
    pub cluster_uuid: String,
}

impl FlowRecord {
    /// Flow duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.flow_end_seconds - self.flow_start_seconds).num_milliseconds()
    }
}

/// Bits per second for `octets` transferred over `duration_ms`.
///
/// # Panics
///
/// Panics if `duration_ms` is zero. Synthesized flows always last at least
/// one millisecond.
pub fn throughput_bps(octets: u64, duration_ms: u64) -> u64 {
    octets * 8 * 1000 / duration_ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_formula() {
        // 100 packets of 1500 bytes over one second
        assert_eq!(throughput_bps(150_000, 1000), 1_200_000);
        assert_eq!(throughput_bps(250, 3), 666_666);
        assert_eq!(throughput_bps(0, 10), 0);
    }

    #[test]
    #[should_panic]
    fn test_throughput_needs_duration() {
        throughput_bps(1500, 0);
    }

    #[test]
    fn test_flow_type_codes() {
        assert_eq!(FlowType::IntraNode.code(), 1);
        assert_eq!(FlowType::InterNode.code(), 2);
        assert_eq!(FlowType::External.code(), 3);
        assert_eq!(FlowType::External.to_string(), "external");
    }
}
