use crate::core::{OrderId, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An order to be submitted through a gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    /// Unsigned quantity; direction comes from `side`
    pub size: f64,
    pub side: Side,
    /// `None` for a market order
    pub price: Option<f64>,
}

impl OrderRequest {
    /// Create a limit order
    pub fn limit(symbol: impl Into<String>, side: Side, size: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            size,
            side,
            price: Some(price),
        }
    }

    /// Create a market order
    pub fn market(symbol: impl Into<String>, side: Side, size: f64) -> Self {
        Self {
            symbol: symbol.into(),
            size,
            side,
            price: None,
        }
    }

    pub fn is_market(&self) -> bool {
        self.price.is_none()
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(f, "{} {} {} @ {}", self.side, self.size, self.symbol, price),
            None => write!(f, "{} {} {} @ MKT", self.side, self.size, self.symbol),
        }
    }
}

/// Terminal outcome reported by the venue
///
/// Only `Filled` and `PartiallyFilled` may touch the ledger, and only with
/// the confirmed quantity and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum AckStatus {
    #[serde(rename = "ACK")]
    Filled { filled_quantity: f64, fill_price: f64 },

    #[serde(rename = "PARTIAL")]
    PartiallyFilled { filled_quantity: f64, fill_price: f64 },

    #[serde(rename = "REJECT")]
    Rejected { reason: String },
}

impl AckStatus {
    /// Confirmed `(quantity, price)` if anything executed
    pub fn fill(&self) -> Option<(f64, f64)> {
        match self {
            AckStatus::Filled {
                filled_quantity,
                fill_price,
            }
            | AckStatus::PartiallyFilled {
                filled_quantity,
                fill_price,
            } => Some((*filled_quantity, *fill_price)),
            AckStatus::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, AckStatus::Rejected { .. })
    }

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            AckStatus::Filled { .. } => "ACK",
            AckStatus::PartiallyFilled { .. } => "PARTIAL",
            AckStatus::Rejected { .. } => "REJECT",
        }
    }
}

/// Acknowledgement for one submitted order, echoing the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: OrderId,
    #[serde(flatten)]
    pub status: AckStatus,
    pub symbol: String,
    pub size: f64,
    pub side: Side,
    pub price: Option<f64>,
    pub timestamp_ns: u64,
}

impl OrderAck {
    /// Build an ack that echoes `request`
    pub fn for_request(
        order_id: OrderId,
        request: &OrderRequest,
        status: AckStatus,
        timestamp_ns: u64,
    ) -> Self {
        Self {
            order_id,
            status,
            symbol: request.symbol.clone(),
            size: request.size,
            side: request.side,
            price: request.price,
            timestamp_ns,
        }
    }
}
