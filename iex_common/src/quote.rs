//! Market-data records returned by the IEX API.
//!
//! Both records are decoded straight from the JSON arrays returned by the `tops` and
//! `tops/last` endpoints. Fields the exporter does not publish are ignored.

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Best ask and bid plus traded volume for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopOfBook {
    /// Symbol identifier as echoed by the API.
    pub symbol: Symbol,
    /// Best ask price.
    pub ask_price: f64,
    /// Best bid price.
    pub bid_price: f64,
    /// Shares traded so far in the session.
    pub volume: u64,
}

/// Price of the most recent trade for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastTrade {
    /// Symbol identifier as echoed by the API.
    pub symbol: Symbol,
    /// Last traded price.
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tops_payload_and_ignores_extra_fields() {
        let body = r#"[{"symbol":"AAPL","sector":"technologyhardwareequipment","securityType":"commonstock",
            "bidPrice":157.71,"bidSize":100,"askPrice":157.74,"askSize":200,
            "lastUpdated":1546450860000,"lastSalePrice":157.72,"lastSaleSize":100,
            "lastSaleTime":1546450859000,"volume":1204518}]"#;
        let tops: Vec<TopOfBook> = serde_json::from_str(body).unwrap();

        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].symbol.as_str(), "AAPL");
        assert_eq!(tops[0].ask_price, 157.74);
        assert_eq!(tops[0].bid_price, 157.71);
        assert_eq!(tops[0].volume, 1_204_518);
    }

    #[test]
    fn decodes_last_trade_payload() {
        let body = r#"[{"symbol":"FB","price":135.68,"size":100,"time":1546450860000}]"#;
        let last: Vec<LastTrade> = serde_json::from_str(body).unwrap();

        assert_eq!(last[0].symbol.as_str(), "FB");
        assert_eq!(last[0].price, 135.68);
    }

    #[test]
    fn missing_field_fails_the_whole_payload() {
        let body = r#"[{"symbol":"AAPL","askPrice":1.0,"bidPrice":1.0,"volume":5},
            {"symbol":"FB","askPrice":2.0}]"#;
        assert!(serde_json::from_str::<Vec<TopOfBook>>(body).is_err());
    }
}
