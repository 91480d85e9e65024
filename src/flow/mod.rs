//! Flow record synthesis.
//!
//! This module derives statistically shaped flow records (timing, volume,
//! throughput and locality) from a topology and a small set of parameters.

pub mod record;
pub mod synthesizer;

pub use record::{FlowRecord, FlowType};
pub use synthesizer::{AttackEpisode, FlowParameters, FlowSynthesizer, SynthesisError};
