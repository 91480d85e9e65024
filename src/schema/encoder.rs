//! Row encoding.
//!
//! Fields are joined with a fixed delimiter and never escaped; label
//! fragments are quoted when the endpoint is built.

use std::io::{self, Write};

use crate::flow::FlowRecord;
use super::columns::COLUMNS;

pub const DELIMITER: &str = ",";

/// Header row with the column names in schema order
pub fn header() -> String {
    COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

/// Render one record as a row, in the same order as `header()`
pub fn encode(record: &FlowRecord) -> String {
    COLUMNS
        .iter()
        .map(|c| (c.render)(record))
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

/// Write the header followed by a newline
pub fn write_header<W: Write + ?Sized>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", header())
}

/// Write one encoded record followed by a newline
pub fn write_record<W: Write + ?Sized>(writer: &mut W, record: &FlowRecord) -> io::Result<()> {
    writeln!(writer, "{}", encode(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowParameters, FlowSynthesizer};
    use crate::config::GeneratorConfig;
    use crate::schema::columns::{column_index, COLUMN_COUNT};
    use crate::topology::build_topology;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_record() -> FlowRecord {
        let mut rng = StdRng::seed_from_u64(31);
        let subnet = "10.0.0.0/16".parse().unwrap();
        let topology = build_topology(10, &subnet, 4, &mut rng).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let synth = FlowSynthesizer::new(
            &topology,
            FlowParameters::from(&GeneratorConfig::default()),
            now,
        )
        .unwrap();
        synth.normal_flow(&mut rng, now)
    }

    #[test]
    fn test_header_starts_and_ends() {
        let header = header();
        assert!(header.starts_with("InsertedTime,FlowStartSeconds,FlowEndSeconds,"));
        assert!(header.ends_with(",ReverseThroughputFromDestinationNode,ClusterUUID"));
        assert_eq!(header.split(DELIMITER).count(), COLUMN_COUNT);
    }

    #[test]
    fn test_row_matches_header_width() {
        let record = sample_record();
        let row = encode(&record);
        let fields: Vec<&str> = row.split(DELIMITER).collect();
        assert_eq!(fields.len(), header().split(DELIMITER).count());

        let field = |name: &str| fields[column_index(name).unwrap()];
        assert_eq!(field("SourceIP"), record.source_ip.to_string());
        assert_eq!(field("ProtocolIdentifier"), "6");
        assert_eq!(field("FlowEndReason"), "3");
        assert_eq!(field("PacketTotalCount"), record.packet_total_count.to_string());
        assert_eq!(field("TcpState"), "TIME_WAIT");
        assert_eq!(field("SourcePodLabels"), r#"'{"DDOS":"0"}'"#);
        assert_eq!(field("DestinationClusterIP"), "");
        assert_eq!(field("DestinationServicePort"), "0");
        assert_eq!(field("IngressNetworkPolicyRuleAction"), "0");
        assert_eq!(field("InsertedTime"), "2024-05-01 12:12:00.0000 +0000");
        assert_eq!(field("ClusterUUID"), "7e2e1de2-c85f-476e-ab1a-fce1bf83ee2c");
    }

    #[test]
    fn test_known_values() {
        let mut record = sample_record();
        record.packet_total_count = 100;
        record.octet_total_count = 150_000;
        record.throughput = 1_200_000;
        let row = encode(&record);
        let fields: Vec<&str> = row.split(DELIMITER).collect();
        assert_eq!(fields[column_index("OctetTotalCount").unwrap()], "150000");
        assert_eq!(fields[column_index("Throughput").unwrap()], "1200000");
    }

    #[test]
    fn test_write_header_and_record() {
        let record = sample_record();
        let mut out = Vec::new();
        write_header(&mut out).unwrap();
        write_record(&mut out, &record).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], header());
        assert_eq!(lines[1], encode(&record));
        assert!(text.ends_with('\n'));
    }
}
