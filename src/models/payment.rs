//! Payment ledger model used to derive personal sales.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The payment category that counts toward personal sales.
pub const PT_PAYMENT_CATEGORY: &str = "PT";

/// A membership payment from the front-desk ledger.
///
/// Payments carry the registrar's free-text name rather than a staff id;
/// the link to a staff member is made through a registrar directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique identifier for the payment.
    pub id: String,
    /// Name of the staff member who registered the sale, as typed at the desk.
    pub registrar_name: String,
    /// Product category (e.g., "PT", "헬스", "GX").
    pub category: String,
    /// Amount paid in won.
    pub amount: Decimal,
    /// When the payment was taken.
    pub paid_at: NaiveDateTime,
}

impl PaymentRecord {
    /// Returns true if the payment is a PT sale.
    pub fn is_pt_sale(&self) -> bool {
        self.category.trim() == PT_PAYMENT_CATEGORY
    }
}
