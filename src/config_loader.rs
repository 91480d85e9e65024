use crate::config::{GeneratorConfig, ValidationError};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Load and parse a generator configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<GeneratorConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: GeneratorConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that override values from the YAML file or the defaults
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub number_of_pods: Option<usize>,
    pub num_normal_flow: Option<usize>,
    pub num_ddos_flow: Option<usize>,
    /// Minutes
    pub time_range: Option<u64>,
    /// Milliseconds
    pub ddos_time_duration: Option<u64>,
    pub num_attack_pods: Option<usize>,
    pub num_attack: Option<usize>,
    pub tcp_state: Option<String>,
    pub subnet: Option<String>,
    pub num_nodes: Option<usize>,
    pub seed: Option<u64>,
}

/// Apply CLI overrides to a configuration and re-validate it
pub fn apply_cli_overrides(config: &mut GeneratorConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(pods) = overrides.number_of_pods {
        info!("Overriding number_of_pods: {}", pods);
        config.number_of_pods = pods;
    }
    if let Some(flows) = overrides.num_normal_flow {
        config.num_normal_flow = flows;
    }
    if let Some(flows) = overrides.num_ddos_flow {
        config.num_ddos_flow = flows;
    }
    if let Some(minutes) = overrides.time_range {
        let seconds = minutes.checked_mul(60).ok_or_else(|| {
            ValidationError::InvalidFlow(format!(
                "time_range of {} minutes is out of range",
                minutes
            ))
        })?;
        config.time_range = Duration::from_secs(seconds);
    }
    if let Some(millis) = overrides.ddos_time_duration {
        config.ddos_time_duration = Duration::from_millis(millis);
    }
    if let Some(pods) = overrides.num_attack_pods {
        config.num_attack_pods = pods;
    }
    if let Some(attacks) = overrides.num_attack {
        config.num_attack = attacks;
    }
    if let Some(state) = &overrides.tcp_state {
        config.tcp_state = Some(state.clone());
    }
    if let Some(subnet) = &overrides.subnet {
        info!("Overriding subnet: {}", subnet);
        config.subnet = subnet.clone();
    }
    if let Some(nodes) = overrides.num_nodes {
        config.num_nodes = nodes;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }

    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
number_of_pods: 8
num_ddos_flow: 40
num_attack: 2
ddos_time_duration: 20ms
subnet: 172.16.0.0/24
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.number_of_pods, 8);
        assert_eq!(config.num_ddos_flow, 40);
        assert_eq!(config.num_attack, 2);
        assert_eq!(config.ddos_duration_ms(), 20);
        assert_eq!(config.subnet, "172.16.0.0/24");
        assert_eq!(config.num_normal_flow, 100);
    }

    #[test]
    fn test_load_config_rejects_oversized_topology() {
        let yaml = r#"
number_of_pods: 10
subnet: 10.0.0.0/29
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_config(Path::new("/nonexistent/flowsynth.yaml")).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = GeneratorConfig::default();
        let overrides = CliOverrides {
            number_of_pods: Some(5),
            num_normal_flow: Some(0),
            num_ddos_flow: Some(3),
            time_range: Some(1),
            tcp_state: Some("SYN_SENT".to_string()),
            seed: Some(99),
            ..Default::default()
        };

        apply_cli_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.number_of_pods, 5);
        assert_eq!(config.num_normal_flow, 0);
        assert_eq!(config.num_ddos_flow, 3);
        assert_eq!(config.time_range_minutes(), 1);
        assert_eq!(config.tcp_state.as_deref(), Some("SYN_SENT"));
        assert_eq!(config.seed, Some(99));
        // Untouched values keep their defaults
        assert_eq!(config.num_attack_pods, 5);
        assert_eq!(config.ddos_duration_ms(), 50);
    }

    #[test]
    fn test_apply_huge_time_range() {
        let mut config = GeneratorConfig::default();
        let overrides = CliOverrides {
            time_range: Some(1_000_000_000_000),
            ..Default::default()
        };
        assert!(apply_cli_overrides(&mut config, &overrides).is_err());

        let overrides = CliOverrides {
            time_range: Some(u64::MAX),
            ..Default::default()
        };
        assert!(apply_cli_overrides(&mut config, &overrides).is_err());
    }

    #[test]
    fn test_apply_invalid_override() {
        let mut config = GeneratorConfig::default();
        let overrides = CliOverrides {
            ddos_time_duration: Some(1),
            ..Default::default()
        };
        assert!(apply_cli_overrides(&mut config, &overrides).is_err());
    }
}
