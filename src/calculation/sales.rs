//! Personal sales aggregation.
//!
//! PT payments are recorded at the front desk under the registrar's typed
//! name. A [`RegistrarDirectory`] maps those names to staff ids; sales whose
//! name cannot be mapped are reported back rather than dropped.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{PaymentRecord, PayrollMonth, StaffMember};

/// Maps a registrar name to a staff id.
pub trait RegistrarDirectory {
    /// Returns the staff id registered under `registrar_name`, if any.
    fn resolve(&self, registrar_name: &str) -> Option<&str>;
}

/// A directory keyed by staff display names, matched exactly after trimming.
///
/// When two staff members share a display name the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffNameDirectory {
    by_name: BTreeMap<String, String>,
}

impl StaffNameDirectory {
    /// Builds the directory from staff display names.
    pub fn from_staff<'a>(staff: impl IntoIterator<Item = &'a StaffMember>) -> Self {
        let mut by_name: BTreeMap<String, String> = BTreeMap::new();
        for member in staff {
            let name = member.name.trim();
            if name.is_empty() {
                continue;
            }
            if by_name.contains_key(name) {
                warn!(staff_id = %member.id, name = %name, "Duplicate staff display name; registrar matches go to the first staff member");
                continue;
            }
            by_name.insert(name.to_string(), member.id.clone());
        }
        Self { by_name }
    }
}

impl RegistrarDirectory for StaffNameDirectory {
    fn resolve(&self, registrar_name: &str) -> Option<&str> {
        self.by_name.get(registrar_name.trim()).map(String::as_str)
    }
}

/// A PT payment whose registrar name matched no staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedSale {
    /// The payment id.
    pub payment_id: String,
    /// The registrar name as typed.
    pub registrar_name: String,
    /// The payment amount.
    pub amount: Decimal,
}

/// Monthly PT sales per staff member, plus the sales that could not be
/// attributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalSalesLedger {
    /// Sales totals keyed by staff id.
    pub totals: BTreeMap<String, Decimal>,
    /// Payments with an unknown registrar, in input order.
    pub unmatched: Vec<UnmatchedSale>,
}

impl PersonalSalesLedger {
    /// Returns a staff member's total, zero when they sold nothing.
    pub fn total_for(&self, staff_id: &str) -> Decimal {
        self.totals.get(staff_id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Sum of the unattributed payments.
    pub fn unmatched_total(&self) -> Decimal {
        self.unmatched.iter().map(|sale| sale.amount).sum()
    }
}

/// Sums PT payments made in `month` per staff member.
///
/// Non-PT payments and payments outside the month are ignored.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{aggregate_personal_sales, StaffNameDirectory};
/// use payroll_engine::models::{PaymentRecord, StaffMember};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let staff = vec![StaffMember::new("staff_001", "김민수", "트레이너")];
/// let directory = StaffNameDirectory::from_staff(&staff);
/// let payments = vec![PaymentRecord {
///     id: "pay_001".to_string(),
///     registrar_name: " 김민수 ".to_string(),
///     category: "PT".to_string(),
///     amount: Decimal::from(1_500_000),
///     paid_at: NaiveDateTime::parse_from_str("2025-03-12 14:20:00", "%Y-%m-%d %H:%M:%S").unwrap(),
/// }];
///
/// let ledger = aggregate_personal_sales(&payments, "2025-03".parse().unwrap(), &directory);
/// assert_eq!(ledger.total_for("staff_001"), Decimal::from(1_500_000));
/// assert!(ledger.unmatched.is_empty());
/// ```
pub fn aggregate_personal_sales<D>(
    payments: &[PaymentRecord],
    month: PayrollMonth,
    directory: &D,
) -> PersonalSalesLedger
where
    D: RegistrarDirectory + ?Sized,
{
    let mut ledger = PersonalSalesLedger::default();

    for payment in payments
        .iter()
        .filter(|payment| payment.is_pt_sale() && month.contains(payment.paid_at))
    {
        match directory.resolve(&payment.registrar_name) {
            Some(staff_id) => {
                *ledger
                    .totals
                    .entry(staff_id.to_string())
                    .or_insert(Decimal::ZERO) += payment.amount;
            }
            None => {
                warn!(
                    payment_id = %payment.id,
                    registrar_name = %payment.registrar_name,
                    amount = %payment.amount,
                    "PT payment registrar matches no staff member"
                );
                ledger.unmatched.push(UnmatchedSale {
                    payment_id: payment.id.clone(),
                    registrar_name: payment.registrar_name.clone(),
                    amount: payment.amount,
                });
            }
        }
    }

    debug!(
        month = %month,
        staff_with_sales = ledger.totals.len(),
        unmatched = ledger.unmatched.len(),
        "Aggregated personal sales"
    );

    ledger
}
