//! Risk management
//!
//! ```text
//! Strategy → RISK GATE (check) → Order Gateway → RISK GATE (apply_fill)
//!            ✓ |position| ≤ limit                  position ± size
//!            ✓ pnl - cost ≥ -loss_limit            pnl ∓ size * price
//! ```

pub mod gate;
pub mod types;

pub use gate::RiskGate;
pub use types::{LedgerSnapshot, RiskLimits, RiskViolation};
