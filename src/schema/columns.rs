//! Ordered column table of the flow record artifact.
//!
//! Header and rows are both rendered from `COLUMNS`, so the two can never
//! disagree on field order or count.

use crate::flow::FlowRecord;
use crate::utils::timestamp::format_timestamp;

/// One output column: its header name and how to render it from a record
#[derive(Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub render: fn(&FlowRecord) -> String,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column").field("name", &self.name).finish()
    }
}

pub const COLUMN_COUNT: usize = 49;

pub static COLUMNS: [Column; COLUMN_COUNT] = [
    Column {
        name: "InsertedTime",
        render: |r| format_timestamp(&r.inserted_time),
    },
    Column {
        name: "FlowStartSeconds",
        render: |r| format_timestamp(&r.flow_start_seconds),
    },
    Column {
        name: "FlowEndSeconds",
        render: |r| format_timestamp(&r.flow_end_seconds),
    },
    Column {
        name: "FlowEndSecondsFromSourceNode",
        render: |r| format_timestamp(&r.flow_end_seconds_from_source_node),
    },
    Column {
        name: "FlowEndSecondsFromDestinationNode",
        render: |r| format_timestamp(&r.flow_end_seconds_from_destination_node),
    },
    Column {
        name: "FlowEndReason",
        render: |r| r.flow_end_reason.to_string(),
    },
    Column {
        name: "SourceIP",
        render: |r| r.source_ip.to_string(),
    },
    Column {
        name: "DestinationIP",
        render: |r| r.destination_ip.to_string(),
    },
    Column {
        name: "SourceTransportPort",
        render: |r| r.source_transport_port.to_string(),
    },
    Column {
        name: "DestinationTransportPort",
        render: |r| r.destination_transport_port.to_string(),
    },
    Column {
        name: "ProtocolIdentifier",
        render: |r| r.protocol_identifier.to_string(),
    },
    Column {
        name: "PacketTotalCount",
        render: |r| r.packet_total_count.to_string(),
    },
    Column {
        name: "OctetTotalCount",
        render: |r| r.octet_total_count.to_string(),
    },
    Column {
        name: "PacketDeltaCount",
        render: |r| r.packet_delta_count.to_string(),
    },
    Column {
        name: "OctetDeltaCount",
        render: |r| r.octet_delta_count.to_string(),
    },
    Column {
        name: "ReversePacketTotalCount",
        render: |r| r.reverse_packet_total_count.to_string(),
    },
    Column {
        name: "ReverseOctetTotalCount",
        render: |r| r.reverse_octet_total_count.to_string(),
    },
    Column {
        name: "ReversePacketDeltaCount",
        render: |r| r.reverse_packet_delta_count.to_string(),
    },
    Column {
        name: "ReverseOctetDeltaCount",
        render: |r| r.reverse_octet_delta_count.to_string(),
    },
    Column {
        name: "SourcePodName",
        render: |r| r.source_pod_name.clone(),
    },
    Column {
        name: "SourcePodNamespace",
        render: |r| r.source_pod_namespace.clone(),
    },
    Column {
        name: "SourceNodeName",
        render: |r| r.source_node_name.clone(),
    },
    Column {
        name: "DestinationPodName",
        render: |r| r.destination_pod_name.clone(),
    },
    Column {
        name: "DestinationPodNamespace",
        render: |r| r.destination_pod_namespace.clone(),
    },
    Column {
        name: "DestinationNodeName",
        render: |r| r.destination_node_name.clone(),
    },
    Column {
        name: "DestinationClusterIP",
        render: |r| r.destination_cluster_ip.clone(),
    },
    Column {
        name: "DestinationServicePort",
        render: |r| r.destination_service_port.to_string(),
    },
    Column {
        name: "DestinationServicePortName",
        render: |r| r.destination_service_port_name.clone(),
    },
    Column {
        name: "IngressNetworkPolicyName",
        render: |r| r.ingress_network_policy_name.clone(),
    },
    Column {
        name: "IngressNetworkPolicyNamespace",
        render: |r| r.ingress_network_policy_namespace.clone(),
    },
    Column {
        name: "IngressNetworkPolicyRuleName",
        render: |r| r.ingress_network_policy_rule_name.clone(),
    },
    Column {
        name: "IngressNetworkPolicyRuleAction",
        render: |r| r.ingress_network_policy_rule_action.to_string(),
    },
    Column {
        name: "IngressNetworkPolicyType",
        render: |r| r.ingress_network_policy_type.to_string(),
    },
    Column {
        name: "EgressNetworkPolicyName",
        render: |r| r.egress_network_policy_name.clone(),
    },
    Column {
        name: "EgressNetworkPolicyNamespace",
        render: |r| r.egress_network_policy_namespace.clone(),
    },
    Column {
        name: "EgressNetworkPolicyRuleName",
        render: |r| r.egress_network_policy_rule_name.clone(),
    },
    Column {
        name: "EgressNetworkPolicyRuleAction",
        render: |r| r.egress_network_policy_rule_action.to_string(),
    },
    Column {
        name: "EgressNetworkPolicyType",
        render: |r| r.egress_network_policy_type.to_string(),
    },
    Column {
        name: "TcpState",
        render: |r| r.tcp_state.clone(),
    },
    Column {
        name: "FlowType",
        render: |r| r.flow_type.code().to_string(),
    },
    Column {
        name: "SourcePodLabels",
        render: |r| r.source_pod_labels.clone(),
    },
    Column {
        name: "DestinationPodLabels",
        render: |r| r.destination_pod_labels.clone(),
    },
    Column {
        name: "Throughput",
        render: |r| r.throughput.to_string(),
    },
    Column {
        name: "ReverseThroughput",
        render: |r| r.reverse_throughput.to_string(),
    },
    Column {
        name: "ThroughputFromSourceNode",
        render: |r| r.throughput_from_source_node.to_string(),
    },
    Column {
        name: "ThroughputFromDestinationNode",
        render: |r| r.throughput_from_destination_node.to_string(),
    },
    Column {
        name: "ReverseThroughputFromSourceNode",
        render: |r| r.reverse_throughput_from_source_node.to_string(),
    },
    Column {
        name: "ReverseThroughputFromDestinationNode",
        render: |r| r.reverse_throughput_from_destination_node.to_string(),
    },
    Column {
        name: "ClusterUUID",
        render: |r| r.cluster_uuid.clone(),
    },
];

/// Position of a column by header name
pub fn column_index(name: &str) -> Option<usize> {
    COLUMNS.iter().position(|c| c.name == name)
}
