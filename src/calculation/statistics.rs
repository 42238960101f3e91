//! Attendance statistics aggregation.
//!
//! This module reduces one staff member's locked attendance records for a
//! month into the typed counters that rule evaluation reads.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{AttendanceRecord, MonthlyAttendanceStatistics, RecordType, WorkTimeCategory};

/// Aggregates attendance records into monthly statistics.
///
/// The caller passes records that already passed the eligibility gate
/// (locked, same staff member, same month); see
/// [`payroll_records`](super::payroll_records).
///
/// - PT: delivered sessions are counted into inside/outside/weekend/holiday
///   buckets; body challenge sessions are tallied again in `bc_count`. Every
///   PT record, delivered or not, is tallied by outcome.
/// - OT: delivered sessions split by the InBody flag.
/// - Consulting and GX: delivered sessions counted.
/// - Personal: duration in hours regardless of status; weekend and holiday
///   time counts as outside.
/// - Other record types are ignored.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate_statistics;
/// use payroll_engine::models::AttendanceRecord;
///
/// let records: Vec<AttendanceRecord> = Vec::new();
/// let stats = aggregate_statistics(&records);
/// assert_eq!(stats.total_pt(), 0);
/// ```
pub fn aggregate_statistics<'a, I>(records: I) -> MonthlyAttendanceStatistics
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut stats = MonthlyAttendanceStatistics::default();
    let mut ignored = 0usize;
    let mut personal_inside_minutes = 0i64;
    let mut personal_outside_minutes = 0i64;

    for record in records {
        let delivered = record.status.is_delivered();

        match record.record_type {
            RecordType::Pt => {
                *stats.pt_outcomes.entry(record.status).or_insert(0) += 1;
                if !delivered {
                    continue;
                }
                match record.category {
                    WorkTimeCategory::Inside => stats.pt_inside += 1,
                    WorkTimeCategory::Outside => stats.pt_outside += 1,
                    WorkTimeCategory::Weekend => stats.pt_weekend += 1,
                    WorkTimeCategory::Holiday => stats.pt_holiday += 1,
                }
                if record.body_challenge {
                    stats.bc_count += 1;
                }
            }
            RecordType::Ot if delivered => {
                if record.inbody {
                    stats.ot_inbody += 1;
                } else {
                    stats.ot_plain += 1;
                }
            }
            RecordType::Consulting if delivered => stats.consulting_count += 1,
            RecordType::Gx if delivered => stats.gx_count += 1,
            RecordType::Personal => {
                if record.is_inverted() {
                    warn!(
                        record_id = %record.id,
                        staff_id = %record.staff_id,
                        "Personal time record ends before it starts; counted as zero hours"
                    );
                }
                let minutes = record.duration_minutes();
                match record.category {
                    WorkTimeCategory::Inside => personal_inside_minutes += minutes,
                    WorkTimeCategory::Outside
                    | WorkTimeCategory::Weekend
                    | WorkTimeCategory::Holiday => personal_outside_minutes += minutes,
                }
            }
            RecordType::Ot | RecordType::Consulting | RecordType::Gx => {}
            RecordType::Other => ignored += 1,
        }
    }

    stats.personal_inside_hours = minutes_to_hours(personal_inside_minutes);
    stats.personal_outside_hours = minutes_to_hours(personal_outside_minutes);

    debug!(
        total_pt = stats.total_pt(),
        total_ot = stats.total_ot(),
        personal_hours = %stats.total_personal_hours(),
        ignored_records = ignored,
        "Aggregated attendance statistics"
    );

    stats
}

/// Minutes are summed before dividing so whole-hour totals stay exact.
fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).normalize()
}
