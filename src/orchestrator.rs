//! Generation orchestrator.
//!
//! This module coordinates one generation run: validate the configuration,
//! seed the randomness source, build the topology, then emit the header,
//! the normal flows and the attack episodes, in that order.

use crate::config::GeneratorConfig;
use crate::flow::{AttackEpisode, FlowParameters, FlowSynthesizer};
use crate::schema::{write_header, write_record};
use crate::topology::{build_from_config, Topology};
use chrono::{DateTime, Utc};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix and suffix of the generated artifact's file name
const RECORDS_PREFIX: &str = "records-";
const RECORDS_SUFFIX: &str = ".csv";

/// What a generation run emitted
#[derive(Debug, Clone, Default)]
pub struct GenerationSummary {
    pub normal_flows: usize,
    pub attack_flows: usize,
    pub episodes: Vec<AttackEpisode>,
}

impl GenerationSummary {
    /// Number of data rows (header excluded)
    pub fn total_records(&self) -> usize {
        self.normal_flows + self.attack_flows
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub path: PathBuf,
    pub seed: u64,
    pub summary: GenerationSummary,
}

/// Write the header, normal flows and attack episodes to `writer`
pub fn generate_records<W: Write + ?Sized, R: Rng + ?Sized>(
    writer: &mut W,
    topology: &Topology,
    config: &GeneratorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<GenerationSummary> {
    let synth = FlowSynthesizer::new(topology, FlowParameters::from(config), now)?;
    let mut summary = GenerationSummary::default();

    write_header(writer).wrap_err("Failed to write header row")?;

    for _ in 0..config.num_normal_flow {
        let anchor = synth.anchor_time(rng, now);
        let record = synth.normal_flow(rng, anchor);
        write_record(writer, &record)
            .wrap_err("Failed to write normal flow record")?;
        summary.normal_flows += 1;
    }
    debug!("Wrote {} normal flows", summary.normal_flows);

    for _ in 0..config.num_attack {
        let episode = synth.sample_episode(rng, now);
        for _ in 0..config.num_ddos_flow {
            let record = synth.attack_flow(rng, &episode);
            write_record(writer, &record)
                .wrap_err("Failed to write attack flow record")?;
            summary.attack_flows += 1;
        }
        summary.episodes.push(episode);
    }
    debug!(
        "Wrote {} attack flows over {} episodes",
        summary.attack_flows,
        summary.episodes.len()
    );

    Ok(summary)
}

/// Generate records into a new `records-*.csv` file inside `output_dir`
pub fn generate_records_file<R: Rng + ?Sized>(
    output_dir: &Path,
    topology: &Topology,
    config: &GeneratorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<(PathBuf, GenerationSummary)> {
    let mut file = tempfile::Builder::new()
        .prefix(RECORDS_PREFIX)
        .suffix(RECORDS_SUFFIX)
        .tempfile_in(output_dir)
        .wrap_err_with(|| format!("Failed to create records file in '{}'", output_dir.display()))?;

    let summary = {
        let mut writer = BufWriter::new(file.as_file_mut());
        let summary = generate_records(&mut writer, topology, config, rng, now)?;
        writer.flush().wrap_err("Failed to flush records file")?;
        summary
    };

    let (_, path) = file.keep().wrap_err("Failed to persist records file")?;
    info!("Wrote {} flow records to {}", summary.total_records(), path.display());

    Ok((path, summary))
}

/// Run a full generation: validate, seed, build the topology and write the artifact
pub fn run(config: &GeneratorConfig, output_dir: &Path, now: DateTime<Utc>) -> Result<RunOutput> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Using RNG seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let topology = build_from_config(config, &mut rng)?;
    let (path, summary) = generate_records_file(output_dir, &topology, config, &mut rng, now)?;

    Ok(RunOutput { path, seed, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_records_ordering() {
        let config = GeneratorConfig {
            number_of_pods: 10,
            num_normal_flow: 7,
            num_ddos_flow: 4,
            num_attack: 3,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(41);
        let topology = build_from_config(&config, &mut rng).unwrap();

        let mut out = Vec::new();
        let summary =
            generate_records(&mut out, &topology, &config, &mut rng, now()).unwrap();
        assert_eq!(summary.normal_flows, 7);
        assert_eq!(summary.attack_flows, 12);
        assert_eq!(summary.episodes.len(), 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 7 + 12);
        assert!(lines[0].starts_with("InsertedTime,"));
        assert!(lines[1..8].iter().all(|l| l.contains(r#"'{"DDOS":"0"}'"#)));
        assert!(lines[8..].iter().all(|l| l.contains(r#"'{"DDOS":"1"}'"#)));
    }

    #[test]
    fn test_generate_records_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            number_of_pods: 5,
            num_normal_flow: 2,
            seed: Some(5),
            ..Default::default()
        };

        let output = run(&config, dir.path(), now()).unwrap();
        assert_eq!(output.seed, 5);
        assert_eq!(output.path.parent(), Some(dir.path()));
        let name = output.path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(RECORDS_PREFIX) && name.ends_with(RECORDS_SUFFIX));

        let content = std::fs::read_to_string(&output.path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_run_rejects_invalid_config_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            number_of_pods: 20,
            subnet: "10.0.0.0/28".to_string(),
            ..Default::default()
        };

        assert!(run(&config, dir.path(), now()).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_fails_on_missing_directory() {
        let config = GeneratorConfig::default();
        assert!(run(&config, Path::new("/nonexistent/flowsynth-out"), now()).is_err());
    }
}
