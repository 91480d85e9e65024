//! Flow synthesis.
//!
//! Normal flows model steady-state traffic: long, heavy, full-size packets.
//! Attack flows are short and light and converge on one victim per episode;
//! the attack signal is the number of flows, not their size.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::topology::{label_fragment, Topology};
use super::record::{throughput_bps, FlowRecord, FlowType};

pub const MIN_FLOW_DURATION_MS: u64 = 500;
pub const MAX_FLOW_DURATION_MS: u64 = 120_000;
pub const MIN_DDOS_FLOW_DURATION_MS: u64 = 1;

pub const MIN_PACKET_COUNT: u64 = 1;
pub const MAX_PACKET_COUNT: u64 = 10_000;
pub const MIN_DDOS_PACKET_COUNT: u64 = 5;
pub const MAX_DDOS_PACKET_COUNT: u64 = 20;

/// Assumed average packet size of normal traffic (bytes)
pub const NORMAL_PACKET_SIZE: u64 = 1500;
/// Assumed average packet size of attack traffic (bytes)
pub const DDOS_PACKET_SIZE: u64 = 50;

/// One normal flow in this many leaves the cluster
pub const EXTERNAL_FLOW_ODDS: u32 = 10_000;

pub const NORMAL_TCP_STATE: &str = "TIME_WAIT";
pub const FLOW_END_REASON: u8 = 3;
pub const PROTOCOL_TCP: u8 = 6;

/// Label key of the synthetic attack indicator on the source side
pub const DDOS_LABEL_KEY: &str = "DDOS";

/// Errors raised when a synthesizer cannot be set up
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("Flows need at least 2 endpoints so source and destination differ, got {0}")]
    TopologyTooSmall(usize),

    #[error("Invalid flow parameters: {0}")]
    InvalidParameters(String),
}

/// The flow-shaping subset of the run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParameters {
    pub num_attack_pods: usize,
    pub time_range_minutes: u64,
    pub ddos_duration_ms: u64,
    pub tcp_state: Option<String>,
    pub cluster_id: String,
}

impl From<&GeneratorConfig> for FlowParameters {
    fn from(config: &GeneratorConfig) -> Self {
        FlowParameters {
            num_attack_pods: config.num_attack_pods,
            time_range_minutes: config.time_range_minutes(),
            ddos_duration_ms: config.ddos_duration_ms(),
            tcp_state: config.tcp_state.clone(),
            cluster_id: config.cluster_id.clone(),
        }
    }
}

/// A burst of attack flows sharing one victim and one anchor time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackEpisode {
    /// Index of the victim endpoint
    pub victim: usize,
    pub anchor: DateTime<Utc>,
}

/// Volume and timing drawn for one flow
struct FlowShape {
    duration_ms: u64,
    packets: u64,
    reverse_packets: u64,
    packet_size: u64,
}

/// Produces flow records over a fixed topology
#[derive(Debug)]
pub struct FlowSynthesizer<'a> {
    topology: &'a Topology,
    params: FlowParameters,
    inserted_time: DateTime<Utc>,
}

impl<'a> FlowSynthesizer<'a> {
    /// Create a synthesizer for a run started at `now`.
    ///
    /// Every record gets the same insertion time: `now` pushed past the
    /// latest possible flow end.
    pub fn new(
        topology: &'a Topology,
        params: FlowParameters,
        now: DateTime<Utc>,
    ) -> Result<Self, SynthesisError> {
        if topology.len() < 2 {
            return Err(SynthesisError::TopologyTooSmall(topology.len()));
        }
        if params.num_attack_pods == 0 {
            return Err(SynthesisError::InvalidParameters(
                "num_attack_pods must be at least 1".to_string(),
            ));
        }
        if params.time_range_minutes == 0 {
            return Err(SynthesisError::InvalidParameters(
                "time range must be at least 1 minute".to_string(),
            ));
        }
        if params.ddos_duration_ms <= MIN_DDOS_FLOW_DURATION_MS {
            return Err(SynthesisError::InvalidParameters(format!(
                "ddos duration must exceed {}ms",
                MIN_DDOS_FLOW_DURATION_MS
            )));
        }
        if params.ddos_duration_ms > MAX_FLOW_DURATION_MS {
            return Err(SynthesisError::InvalidParameters(format!(
                "ddos duration must be at most {}ms",
                MAX_FLOW_DURATION_MS
            )));
        }

        // Every anchor falls before the insertion time, so this bounds all flow times
        let inserted_time = i64::try_from(params.time_range_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .and_then(|range| now.checked_add_signed(range))
            .and_then(|t| t.checked_add_signed(Duration::milliseconds(MAX_FLOW_DURATION_MS as i64)))
            .ok_or_else(|| {
                SynthesisError::InvalidParameters(format!(
                    "time range of {} minutes runs past the representable time range",
                    params.time_range_minutes
                ))
            })?;

        Ok(FlowSynthesizer {
            topology,
            params,
            inserted_time,
        })
    }

    pub fn topology(&self) -> &Topology {
        self.topology
    }

    pub fn params(&self) -> &FlowParameters {
        &self.params
    }

    /// Anchor time a whole number of minutes within the time range after `now`
    pub fn anchor_time<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> DateTime<Utc> {
        let offset = rng.gen_range(0..self.params.time_range_minutes);
        now + Duration::minutes(offset as i64)
    }

    /// Draw a fresh victim and anchor time for an attack episode
    pub fn sample_episode<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> AttackEpisode {
        let victim = rng.gen_range(0..self.topology.len());
        let anchor = self.anchor_time(rng, now);
        debug!(
            "Attack episode on {} ({}) anchored at {}",
            self.topology.endpoint(victim).name,
            self.topology.endpoint(victim).address,
            anchor
        );
        AttackEpisode { victim, anchor }
    }

    /// Synthesize one steady-state flow centered on `anchor`
    pub fn normal_flow<R: Rng + ?Sized>(&self, rng: &mut R, anchor: DateTime<Utc>) -> FlowRecord {
        let dest = rng.gen_range(0..self.topology.len());
        let shape = FlowShape {
            duration_ms: rng.gen_range(MIN_FLOW_DURATION_MS..MAX_FLOW_DURATION_MS),
            packets: rng.gen_range(MIN_PACKET_COUNT..MAX_PACKET_COUNT),
            reverse_packets: rng.gen_range(MIN_PACKET_COUNT..MAX_PACKET_COUNT),
            packet_size: NORMAL_PACKET_SIZE,
        };
        let source = self.pick_source(rng, dest);

        let mut record = self.build_record(
            rng,
            source,
            dest,
            anchor,
            &shape,
            NORMAL_TCP_STATE.to_string(),
            label_fragment(DDOS_LABEL_KEY, "0"),
        );

        if rng.gen_range(0..EXTERNAL_FLOW_ODDS) == 0 {
            record.flow_type = FlowType::External;
            record.destination_pod_name.clear();
            record.destination_pod_namespace.clear();
            record.destination_node_name.clear();
        }

        record
    }

    /// Synthesize one member flow of an attack episode
    pub fn attack_flow<R: Rng + ?Sized>(&self, rng: &mut R, episode: &AttackEpisode) -> FlowRecord {
        let dest = episode.victim;
        let shape = FlowShape {
            duration_ms: rng.gen_range(MIN_DDOS_FLOW_DURATION_MS..self.params.ddos_duration_ms),
            packets: rng.gen_range(MIN_DDOS_PACKET_COUNT..MAX_DDOS_PACKET_COUNT),
            reverse_packets: rng.gen_range(MIN_DDOS_PACKET_COUNT..MAX_DDOS_PACKET_COUNT),
            packet_size: DDOS_PACKET_SIZE,
        };
        let source = self.pick_source(rng, dest);

        self.build_record(
            rng,
            source,
            dest,
            episode.anchor,
            &shape,
            self.params.tcp_state.clone().unwrap_or_default(),
            label_fragment(DDOS_LABEL_KEY, "1"),
        )
    }

    /// Pick a source in the neighborhood just after `dest`, wrapping around.
    ///
    /// The window is capped so the source never equals the destination;
    /// `new` guarantees at least two endpoints.
    fn pick_source<R: Rng + ?Sized>(&self, rng: &mut R, dest: usize) -> usize {
        let n = self.topology.len();
        let window = self.params.num_attack_pods.min(n - 1);
        (dest + 1 + rng.gen_range(0..window)) % n
    }

    #[allow(clippy::too_many_arguments)]
    fn build_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        source: usize,
        dest: usize,
        anchor: DateTime<Utc>,
        shape: &FlowShape,
        tcp_state: String,
        source_pod_labels: String,
    ) -> FlowRecord {
        let src = self.topology.endpoint(source);
        let dst = self.topology.endpoint(dest);

        let half = Duration::microseconds((shape.duration_ms * 500) as i64);
        let start = anchor - half;
        let end = anchor + half;

        let octets = shape.packets * shape.packet_size;
        let reverse_octets = shape.reverse_packets * shape.packet_size;
        let throughput = throughput_bps(octets, shape.duration_ms);
        let reverse_throughput = throughput_bps(reverse_octets, shape.duration_ms);

        let flow_type = if src.node == dst.node {
            FlowType::IntraNode
        } else {
            FlowType::InterNode
        };

        FlowRecord {
            inserted_time: self.inserted_time,
            flow_start_seconds: start,
            flow_end_seconds: end,
            flow_end_seconds_from_source_node: end,
            flow_end_seconds_from_destination_node: end,
            flow_end_reason: FLOW_END_REASON,
            source_ip: src.address,
            destination_ip: dst.address,
            source_transport_port: rng.gen_range(1..u16::MAX),
            destination_transport_port: dst.port,
            protocol_identifier: PROTOCOL_TCP,
            packet_total_count: shape.packets,
            octet_total_count: octets,
            packet_delta_count: shape.packets,
            octet_delta_count: octets,
            reverse_packet_total_count: shape.reverse_packets,
            reverse_octet_total_count: reverse_octets,
            reverse_packet_delta_count: shape.reverse_packets,
            reverse_octet_delta_count: reverse_octets,
            source_pod_name: src.name.clone(),
            source_pod_namespace: src.namespace.clone(),
            source_node_name: src.node.clone(),
            destination_pod_name: dst.name.clone(),
            destination_pod_namespace: dst.namespace.clone(),
            destination_node_name: dst.node.clone(),
            destination_cluster_ip: String::new(),
            destination_service_port: 0,
            destination_service_port_name: String::new(),
            ingress_network_policy_name: String::new(),
            ingress_network_policy_namespace: String::new(),
            ingress_network_policy_rule_name: String::new(),
            ingress_network_policy_rule_action: 0,
            ingress_network_policy_type: 0,
            egress_network_policy_name: String::new(),
            egress_network_policy_namespace: String::new(),
            egress_network_policy_rule_name: String::new(),
            egress_network_policy_rule_action: 0,
            egress_network_policy_type: 0,
            tcp_state,
            flow_type,
            source_pod_labels,
            destination_pod_labels: dst.labels.clone(),
            throughput,
            reverse_throughput,
            throughput_from_source_node: throughput,
            throughput_from_destination_node: throughput,
            reverse_throughput_from_source_node: reverse_throughput,
            reverse_throughput_from_destination_node: reverse_throughput,
            cluster_uuid: self.params.cluster_id.clone(),
        }
    }
}
