use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ip::Subnet;

/// Default number of endpoints in the simulated cluster
pub const DEFAULT_NUMBER_OF_PODS: usize = 20;
/// Default number of nodes endpoints are scattered over
pub const DEFAULT_NUM_NODES: usize = 10;
pub const DEFAULT_NUM_NORMAL_FLOW: usize = 100;
pub const DEFAULT_NUM_DDOS_FLOW: usize = 0;
/// Window over which flow anchor times are scattered (minutes)
pub const DEFAULT_TIME_RANGE_MINUTES: u64 = 10;
/// Largest accepted anchor window (one year, minutes)
pub const MAX_TIME_RANGE_MINUTES: u64 = 365 * 24 * 60;
/// Upper bound of attack flow duration (milliseconds)
pub const DEFAULT_DDOS_TIME_DURATION_MS: u64 = 50;
/// Attack flows never outlast the longest normal flow (milliseconds)
pub const MAX_DDOS_TIME_DURATION_MS: u64 = 120_000;
pub const DEFAULT_NUM_ATTACK_PODS: usize = 5;
pub const DEFAULT_NUM_ATTACK: usize = 1;
pub const DEFAULT_SUBNET: &str = "10.0.0.0/16";
pub const DEFAULT_CLUSTER_ID: &str = "7e2e1de2-c85f-476e-ab1a-fce1bf83ee2c";

/// Run parameters for one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of endpoints (pods) in the topology
    pub number_of_pods: usize,
    /// Number of normal flow records
    pub num_normal_flow: usize,
    /// Number of attack flow records per episode
    pub num_ddos_flow: usize,
    /// Window after "now" in which anchor times fall (whole minutes)
    #[serde(with = "humantime_serde")]
    pub time_range: Duration,
    /// Exclusive upper bound of attack flow duration
    #[serde(with = "humantime_serde")]
    pub ddos_time_duration: Duration,
    /// Size of the neighborhood a flow source is picked from
    pub num_attack_pods: usize,
    /// Number of attack episodes
    pub num_attack: usize,
    /// TCP state written on attack flows (empty when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_state: Option<String>,
    /// Subnet endpoint addresses are allocated from
    pub subnet: String,
    /// Number of nodes endpoints are placed on
    pub num_nodes: usize,
    /// Cluster identifier written on every record
    pub cluster_id: String,
    /// RNG seed; a random seed is drawn (and logged) when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Validate the configuration before any generation starts
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number_of_pods < 2 {
            return Err(ValidationError::InvalidTopology(format!(
                "number_of_pods must be at least 2, got {}",
                self.number_of_pods
            )));
        }
        if self.num_nodes == 0 {
            return Err(ValidationError::InvalidTopology(
                "num_nodes must be at least 1".to_string(),
            ));
        }

        let subnet = self.parse_subnet()?;
        if self.number_of_pods as u64 > subnet.capacity() {
            return Err(ValidationError::InvalidTopology(format!(
                "subnet {} holds {} addresses, cannot fit {} pods",
                subnet,
                subnet.capacity(),
                self.number_of_pods
            )));
        }

        if self.num_attack_pods == 0 {
            return Err(ValidationError::InvalidFlow(
                "num_attack_pods must be at least 1".to_string(),
            ));
        }
        if self.time_range_minutes() == 0 {
            return Err(ValidationError::InvalidFlow(format!(
                "time_range must be at least 1 minute, got {:?}",
                self.time_range
            )));
        }
        if self.time_range.as_secs() / 60 > MAX_TIME_RANGE_MINUTES {
            return Err(ValidationError::InvalidFlow(format!(
                "time_range must be at most {} minutes, got {:?}",
                MAX_TIME_RANGE_MINUTES, self.time_range
            )));
        }
        if self.ddos_duration_ms() < 2 {
            return Err(ValidationError::InvalidFlow(format!(
                "ddos_time_duration must be at least 2ms, got {:?}",
                self.ddos_time_duration
            )));
        }
        if self.ddos_time_duration > Duration::from_millis(MAX_DDOS_TIME_DURATION_MS) {
            return Err(ValidationError::InvalidFlow(format!(
                "ddos_time_duration must be at most {}ms, got {:?}",
                MAX_DDOS_TIME_DURATION_MS, self.ddos_time_duration
            )));
        }
        if let Some(state) = &self.tcp_state {
            if state.contains(',') || state.contains('\n') {
                return Err(ValidationError::InvalidFlow(format!(
                    "tcp_state '{}' cannot contain a delimiter",
                    state
                )));
            }
        }
        if self.cluster_id.is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "cluster_id cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse the configured subnet
    pub fn parse_subnet(&self) -> Result<Subnet, ValidationError> {
        self.subnet
            .parse::<Subnet>()
            .map_err(|e| ValidationError::InvalidTopology(e.to_string()))
    }

    /// Anchor window in whole minutes
    pub fn time_range_minutes(&self) -> u64 {
        self.time_range.as_secs() / 60
    }

    /// Attack duration upper bound in milliseconds
    pub fn ddos_duration_ms(&self) -> u64 {
        self.ddos_time_duration.as_millis() as u64
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
    #[error("Invalid flow configuration: {0}")]
    InvalidFlow(String),
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            number_of_pods: DEFAULT_NUMBER_OF_PODS,
            num_normal_flow: DEFAULT_NUM_NORMAL_FLOW,
            num_ddos_flow: DEFAULT_NUM_DDOS_FLOW,
            time_range: Duration::from_secs(DEFAULT_TIME_RANGE_MINUTES * 60),
            ddos_time_duration: Duration::from_millis(DEFAULT_DDOS_TIME_DURATION_MS),
            num_attack_pods: DEFAULT_NUM_ATTACK_PODS,
            num_attack: DEFAULT_NUM_ATTACK,
            tcp_state: None,
            subnet: DEFAULT_SUBNET.to_string(),
            num_nodes: DEFAULT_NUM_NODES,
            cluster_id: DEFAULT_CLUSTER_ID.to_string(),
            seed: None,
        }
    }
}
