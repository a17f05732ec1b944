//! # Titan Hops
//!
//! Cross-component transit latency.
//!
//! A hop is a causal edge between two TTT tags. Its latency samples are
//! obtained by differencing counter readings of consecutive events on the
//! hop's sub-stream; there is no request id to correlate on.

pub mod topology;
pub mod deriver;

pub use topology::{HopDefinition, HopTopology, DEFAULT_HOPS};
pub use deriver::{derive_hop_samples, HopSample, HopSeries};
