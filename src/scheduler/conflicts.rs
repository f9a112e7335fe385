use crate::model::{Duplicate, Gap, OperatorId, Position, ScheduleEntry, WorkShift};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

const SHIFTS: [WorkShift; 2] = [WorkShift::Day, WorkShift::Night];

/// Contrôle de couverture : relèves sans personne (trous) et relèves tenues
/// par plusieurs opérateurs (doublons), calculés sur les lignes émises.
pub fn detect_coverage(
    schedule: &[ScheduleEntry],
    positions: &[Position],
) -> (Vec<Gap>, Vec<Duplicate>) {
    let mut dates = BTreeSet::new();
    let mut assigned: BTreeMap<(NaiveDate, &str, WorkShift), Vec<&OperatorId>> = BTreeMap::new();

    for entry in schedule {
        dates.insert(entry.date);
        if let Some(shift) = entry.duty_kind.shift() {
            assigned
                .entry((entry.date, entry.position.as_str(), shift))
                .or_default()
                .push(&entry.operator_id);
        }
    }

    let duplicates = assigned
        .iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|((date, position, shift), ids)| Duplicate {
            date: *date,
            position: position.to_string(),
            shift: *shift,
            operator_ids: ids.iter().map(|id| (*id).clone()).collect(),
        })
        .collect();

    let mut gaps = Vec::new();
    for date in &dates {
        for position in positions {
            let required = SHIFTS.iter().take(position.shifts_per_day as usize);
            for shift in required {
                if !assigned.contains_key(&(*date, position.id.as_str(), *shift)) {
                    gaps.push(Gap {
                        date: *date,
                        position: position.id.clone(),
                        missing_shift: *shift,
                    });
                }
            }
        }
    }

    (gaps, duplicates)
}
