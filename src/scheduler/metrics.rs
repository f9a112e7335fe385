use crate::model::{Duplicate, DutyKind, Gap, InputBundle, Metrics, ScheduleEntry};
use std::collections::BTreeSet;

/// Agrège le planning émis en compteurs.
pub fn summarize(
    schedule: &[ScheduleEntry],
    input: &InputBundle,
    gaps: &[Gap],
    duplicates: &[Duplicate],
) -> Metrics {
    let count = |kind: DutyKind| schedule.iter().filter(|e| e.duty_kind == kind).count();
    let days: BTreeSet<_> = schedule.iter().map(|e| e.date).collect();
    let capped: BTreeSet<_> = schedule
        .iter()
        .filter(|e| e.cap_reached)
        .map(|e| &e.operator_id)
        .collect();

    Metrics {
        total_records: schedule.len(),
        day_shift_count: count(DutyKind::DayShift),
        night_shift_count: count(DutyKind::NightShift),
        rest_day_count: count(DutyKind::Rest),
        vacation_day_count: count(DutyKind::Vacation),
        operator_count: input.operators.len(),
        position_count: input.positions.len(),
        days_analyzed: days.len(),
        operators_at_hour_cap: capped.len(),
        gap_count: gaps.len(),
        duplicate_count: duplicates.len(),
    }
}
