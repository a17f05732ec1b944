//! Hop latency derivation.
//!
//! For a hop `(A, B)` the TTT stream is narrowed to the events tagged `A`
//! or `B`, keeping time order. Each event is differenced against the event
//! immediately before it on that sub-stream, whichever tag it carried. A
//! difference is a hop sample only if the event is a `B` and the difference
//! is strictly positive.
//!
//! This assumes `A` and `B` roughly alternate. A `B` that follows another
//! `B` is differenced against that `B`, not the last `A`, so bursts of
//! repeated tags under-count hops.

use chrono::NaiveTime;
use serde::Serialize;
use titan_metrics::MIN_SAMPLES;
use titan_perflog::LatencyRecord;

use crate::topology::{HopDefinition, HopTopology};

/// One observed transit of a hop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HopSample {
    /// Time of the destination event.
    pub timestamp: NaiveTime,
    /// Counter delta from the preceding event, in counter units.
    pub latency: f64,
}

/// Derive the samples of one hop from a time-ordered TTT stream.
pub fn derive_hop_samples(hop: &HopDefinition, ttt: &[LatencyRecord]) -> Vec<HopSample> {
    let mut samples = Vec::new();
    let mut previous: Option<f64> = None;

    for record in ttt.iter().filter(|r| hop.selects(&r.tag)) {
        if let Some(prev) = previous {
            let diff = record.value - prev;
            if diff > 0.0 && record.tag == hop.destination {
                samples.push(HopSample {
                    timestamp: record.timestamp,
                    latency: diff,
                });
            }
        }
        previous = Some(record.value);
    }

    samples
}

/// Samples for one hop of a topology.
#[derive(Clone, Debug)]
pub struct HopSeries<'a> {
    pub hop: &'a HopDefinition,
    pub samples: Vec<HopSample>,
}

impl<'a> HopSeries<'a> {
    /// Derive every hop of `topology`, in topology order.
    pub fn derive_all(topology: &'a HopTopology, ttt: &[LatencyRecord]) -> Vec<Self> {
        topology
            .iter()
            .map(|hop| Self {
                hop,
                samples: derive_hop_samples(hop, ttt),
            })
            .collect()
    }

    /// False when too few samples survived to be summarized.
    #[inline]
    pub fn is_sufficient(&self) -> bool {
        self.samples.len() >= MIN_SAMPLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stream(events: &[(&str, f64)]) -> Vec<LatencyRecord> {
        events
            .iter()
            .enumerate()
            .map(|(i, &(tag, value))| {
                let t = NaiveTime::from_hms_micro_opt(10, 0, 0, i as u32).unwrap();
                LatencyRecord::new(t, tag, value)
            })
            .collect()
    }

    #[test]
    fn test_only_positive_diffs_at_destination() {
        let hop = HopDefinition::new("A", "B");
        let ttt = stream(&[("A", 10.0), ("B", 15.0), ("A", 20.0), ("B", 12.0)]);

        let samples = derive_hop_samples(&hop, &ttt);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].latency, 5.0);
        assert_eq!(samples[0].timestamp, ttt[1].timestamp);
    }

    #[test]
    fn test_other_tags_ignored() {
        let hop = HopDefinition::new("A", "B");
        let ttt = stream(&[("A", 10.0), ("X", 11.0), ("B", 14.0), ("Y", 100.0), ("A", 20.0), ("B", 27.0)]);

        let latencies: Vec<f64> = derive_hop_samples(&hop, &ttt).iter().map(|s| s.latency).collect();
        assert_eq!(latencies, [4.0, 7.0]);
    }

    #[test]
    fn test_b_after_b_differences_against_b() {
        let hop = HopDefinition::new("A", "B");
        let ttt = stream(&[("A", 10.0), ("B", 15.0), ("B", 18.0), ("B", 17.0)]);

        let latencies: Vec<f64> = derive_hop_samples(&hop, &ttt).iter().map(|s| s.latency).collect();
        // 18 - 15 is positive and kept; 17 - 18 is not.
        assert_eq!(latencies, [5.0, 3.0]);
    }

    #[test]
    fn test_first_event_has_no_predecessor() {
        let hop = HopDefinition::new("A", "B");
        let ttt = stream(&[("B", 15.0), ("A", 20.0)]);
        assert!(derive_hop_samples(&hop, &ttt).is_empty());
    }

    #[test]
    fn test_empty_stream() {
        let hop = HopDefinition::new("A", "B");
        assert!(derive_hop_samples(&hop, &[]).is_empty());
    }

    #[test]
    fn test_derive_all_and_sufficiency() {
        let topology = HopTopology::new(vec![
            HopDefinition::new("A", "B"),
            HopDefinition::new("B", "C"),
        ]);
        let ttt = stream(&[
            ("A", 10.0), ("B", 15.0), ("C", 40.0),
            ("A", 50.0), ("B", 58.0),
        ]);

        let series = HopSeries::derive_all(&topology, &ttt);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].hop.name(), "A -> B");
        assert_eq!(series[0].samples.len(), 2);
        assert!(series[0].is_sufficient());
        assert_eq!(series[1].samples.len(), 1);
        assert!(!series[1].is_sufficient());
        // Sufficiency agrees with the summarizer's threshold.
        assert_eq!(series[0].samples.len(), MIN_SAMPLES);
    }

    proptest! {
        #[test]
        fn prop_samples_positive_and_at_destination(
            events in prop::collection::vec((0u8..3, 0.0f64..1.0e6), 0..200)
        ) {
            let tags = ["A", "B", "C"];
            let owned: Vec<(&str, f64)> = events.iter().map(|&(t, v)| (tags[t as usize], v)).collect();
            let ttt = stream(&owned);
            let hop = HopDefinition::new("A", "B");

            let samples = derive_hop_samples(&hop, &ttt);
            let destinations = ttt.iter().filter(|r| r.tag == "B").count();
            prop_assert!(samples.len() <= destinations);
            for sample in &samples {
                prop_assert!(sample.latency > 0.0);
                let at = ttt.iter().find(|r| r.timestamp == sample.timestamp).unwrap();
                prop_assert_eq!(at.tag.as_str(), "B");
            }
        }
    }
}
