//! Payment info carried on entries
//!
//! Payment *collection* is an external workflow; entries only record what the
//! operator submitted at creation time.

use serde::{Deserialize, Serialize};

/// Payment information attached to an entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInfo {
    /// Payment method ("Cash", "Card", "QR", "Unpaid", ...)
    pub method: String,
    /// Operator note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PaymentInfo {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            note: None,
        }
    }

    /// Whether payment is still owed for this entry
    pub fn is_unpaid(&self) -> bool {
        self.method.eq_ignore_ascii_case("unpaid")
    }
}
