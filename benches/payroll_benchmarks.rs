//! Performance benchmarks for the payroll engine.
//!
//! Benchmarks cover:
//! - Statistics aggregation for one staff member's month
//! - Single staff computation from raw records
//! - Monthly runs over rosters of 100 and 1000 staff
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use payroll_engine::calculation::{ApprovedReports, aggregate_statistics};
use payroll_engine::config::{CompensationConfig, ConfigLoader};
use payroll_engine::models::{
    AttendanceRecord, PaymentRecord, PayrollMonth, RecordType, SessionStatus, StaffMember,
    WorkTimeCategory,
};
use payroll_engine::payroll::{PayrollRunInput, recompute, run_monthly_payroll};

fn load_config() -> CompensationConfig {
    ConfigLoader::load("./config/sample")
        .expect("Failed to load config")
        .into_config()
}

fn march() -> PayrollMonth {
    "2025-03".parse().expect("valid month")
}

fn month_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .and_then(|date| date.and_hms_opt(6, 0, 0))
        .expect("valid date")
}

/// Cycles sample assignments so every template is exercised.
fn staff_id(i: usize) -> String {
    format!("staff_{:03}", i % 5 + 1)
}

fn roster(size: usize) -> Vec<StaffMember> {
    (0..size)
        .map(|i| StaffMember {
            id: if i < 5 { staff_id(i) } else { format!("bench_{:05}", i) },
            name: format!("트레이너{}", i),
            job_title: "트레이너".to_string(),
        })
        .collect()
}

/// A busy trainer's month: roughly 120 sessions across all record types.
fn monthly_records(staff_id: &str) -> Vec<AttendanceRecord> {
    let types = [
        (RecordType::Pt, WorkTimeCategory::Inside),
        (RecordType::Pt, WorkTimeCategory::Outside),
        (RecordType::Pt, WorkTimeCategory::Weekend),
        (RecordType::Ot, WorkTimeCategory::Inside),
        (RecordType::Personal, WorkTimeCategory::Inside),
        (RecordType::Gx, WorkTimeCategory::Outside),
    ];
    let statuses = [
        SessionStatus::Completed,
        SessionStatus::Completed,
        SessionStatus::Service,
        SessionStatus::NoShowDeducted,
        SessionStatus::NoShow,
    ];

    (0..120)
        .map(|i| {
            let (record_type, category) = types[i % types.len()];
            let start = month_start() + Duration::hours((i as i64 / 6) * 24 + (i as i64 % 6) * 2);
            AttendanceRecord {
                id: format!("{}_rec_{:03}", staff_id, i),
                staff_id: staff_id.to_string(),
                record_type,
                category,
                status: statuses[i % statuses.len()],
                locked: true,
                inbody: i % 4 == 0,
                body_challenge: i % 9 == 0,
                start_time: start,
                end_time: start + Duration::minutes(50),
            }
        })
        .collect()
}

fn create_payments(staff: &[StaffMember]) -> Vec<PaymentRecord> {
    staff
        .iter()
        .enumerate()
        .map(|(i, member)| PaymentRecord {
            id: format!("pay_{:05}", i),
            registrar_name: member.name.clone(),
            category: "PT".to_string(),
            amount: Decimal::from(500_000 * (i as i64 % 20 + 1)),
            paid_at: month_start() + Duration::days(i as i64 % 28),
        })
        .collect()
}

/// Benchmark: statistics aggregation for one staff member.
fn bench_aggregate_statistics(c: &mut Criterion) {
    let records = monthly_records("staff_001");

    c.bench_function("aggregate_statistics", |b| {
        b.iter(|| black_box(aggregate_statistics(black_box(&records))))
    });
}

/// Benchmark: one staff member from raw records to result.
fn bench_single_staff(c: &mut Criterion) {
    let config = load_config();
    let staff = StaffMember::new("staff_001", "김민수", "트레이너");
    let records = monthly_records("staff_001");

    c.bench_function("single_staff_recompute", |b| {
        b.iter(|| {
            black_box(recompute(
                &staff,
                march(),
                black_box(&records),
                Decimal::from(6_000_000),
                &config,
            ))
        })
    });
}

/// Benchmark: monthly runs over growing rosters.
fn bench_monthly_run(c: &mut Criterion) {
    let config = load_config();
    let mut group = c.benchmark_group("monthly_run");

    for size in [100usize, 1000] {
        let staff = roster(size);
        let records: Vec<AttendanceRecord> = staff
            .iter()
            .flat_map(|member| monthly_records(&member.id))
            .collect();
        let payments = create_payments(&staff);
        let approvals: ApprovedReports = staff
            .iter()
            .map(|member| (member.id.clone(), march()))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        if size >= 1000 {
            group.sample_size(10);
        }
        group.bench_with_input(BenchmarkId::new("staff", size), &size, |b, _| {
            b.iter(|| {
                black_box(run_monthly_payroll(PayrollRunInput {
                    month: march(),
                    staff: &staff,
                    records: &records,
                    payments: &payments,
                    approvals: &approvals,
                    config: &config,
                }))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_aggregate_statistics,
    bench_single_staff,
    bench_monthly_run
);
criterion_main!(benches);
