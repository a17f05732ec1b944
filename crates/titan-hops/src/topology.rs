//! Pipeline hop topology.
//!
//! The default topology follows an order through the exchange and the
//! trading client:
//! order server TCP read → matching engine → market data publisher /
//! order server response → client market data consumer / order gateway →
//! trade engine → order gateway TCP write → back to the exchange,
//! plus the tick-to-trade pair.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Default `(source, destination)` tag pairs, in reporting order.
pub const DEFAULT_HOPS: &[(&str, &str)] = &[
    ("T1_OrderServer_TCP_read", "T2_OrderServer_LFQueue_write"),
    ("T2_OrderServer_LFQueue_write", "T3_MatchingEngine_LFQueue_read"),
    ("T3_MatchingEngine_LFQueue_read", "T4_MatchingEngine_LFQueue_write"),
    ("T3_MatchingEngine_LFQueue_read", "T4t_MatchingEngine_LFQueue_write"),
    ("T4_MatchingEngine_LFQueue_write", "T5_MarketDataPublisher_LFQueue_read"),
    ("T4t_MatchingEngine_LFQueue_write", "T5t_OrderServer_LFQueue_read"),
    ("T5_MarketDataPublisher_LFQueue_read", "T6_MarketDataPublisher_UDP_write"),
    ("T5t_OrderServer_LFQueue_read", "T6t_OrderServer_TCP_write"),
    ("T7_MarketDataConsumer_UDP_read", "T8_MarketDataConsumer_LFQueue_write"),
    ("T7t_OrderGateway_TCP_read", "T8t_OrderGateway_LFQueue_write"),
    ("T6_MarketDataPublisher_UDP_write", "T7_MarketDataConsumer_UDP_read"),
    ("T6t_OrderServer_TCP_write", "T7t_OrderGateway_TCP_read"),
    ("T8_MarketDataConsumer_LFQueue_write", "T9_TradeEngine_LFQueue_read"),
    ("T8t_OrderGateway_LFQueue_write", "T9t_TradeEngine_LFQueue_read"),
    ("T9_TradeEngine_LFQueue_read", "T10_TradeEngine_LFQueue_write"),
    ("T9t_TradeEngine_LFQueue_read", "T10_TradeEngine_LFQueue_write"),
    ("T10_TradeEngine_LFQueue_write", "T11_OrderGateway_LFQueue_read"),
    ("T11_OrderGateway_LFQueue_read", "T12_OrderGateway_TCP_write"),
    // exchange <-> client
    ("T12_OrderGateway_TCP_write", "T1_OrderServer_TCP_read"),
    // tick-to-trade
    ("Ticker_Received", "Order_Sent"),
];

/// One causal edge: events tagged `source` lead to events tagged
/// `destination`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HopDefinition {
    pub source: String,
    pub destination: String,
}

impl HopDefinition {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// True if `tag` is either endpoint of this hop.
    #[inline]
    pub fn selects(&self, tag: &str) -> bool {
        tag == self.source || tag == self.destination
    }

    /// Display name, `"<source> -> <destination>"`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HopDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Ordered list of hops to analyze.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HopTopology {
    hops: Vec<HopDefinition>,
}

impl HopTopology {
    pub fn new(hops: Vec<HopDefinition>) -> Self {
        Self { hops }
    }

    /// The built-in exchange/client pipeline.
    pub fn default_pipeline() -> Self {
        Self::new(
            DEFAULT_HOPS
                .iter()
                .map(|&(source, destination)| HopDefinition::new(source, destination))
                .collect(),
        )
    }

    pub fn hops(&self) -> &[HopDefinition] {
        &self.hops
    }

    pub fn iter(&self) -> impl Iterator<Item = &HopDefinition> {
        self.hops.iter()
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

impl Default for HopTopology {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_order() {
        let topology = HopTopology::default();
        assert_eq!(topology.len(), 20);
        assert_eq!(
            topology.hops()[0],
            HopDefinition::new("T1_OrderServer_TCP_read", "T2_OrderServer_LFQueue_write")
        );
        assert_eq!(
            topology.hops()[18],
            HopDefinition::new("T12_OrderGateway_TCP_write", "T1_OrderServer_TCP_read")
        );
        assert_eq!(
            topology.hops()[19],
            HopDefinition::new("Ticker_Received", "Order_Sent")
        );
    }

    #[test]
    fn test_hop_name() {
        let hop = HopDefinition::new("Ticker_Received", "Order_Sent");
        assert_eq!(hop.name(), "Ticker_Received -> Order_Sent");
    }

    #[test]
    fn test_selects() {
        let hop = HopDefinition::new("A", "B");
        assert!(hop.selects("A"));
        assert!(hop.selects("B"));
        assert!(!hop.selects("C"));
    }
}
