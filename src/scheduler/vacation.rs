use super::rotation::OperatorState;
use super::types::VacationSlot;
use crate::calendar;
use crate::model::{Configuration, VacationAssignment};
use chrono::NaiveDate;
use tracing::debug;

/// Ordre de passage des opérateurs réguliers : congés dus d'abord,
/// puis anniversaire croissant (sans date : en dernier), ordre d'entrée sinon.
pub(super) fn priority_order(states: &[OperatorState]) -> Vec<usize> {
    let mut regular: Vec<usize> = (0..states.len())
        .filter(|&i| !states[i].is_replacement)
        .collect();
    regular.sort_by_key(|&i| {
        let s = &states[i];
        (
            s.pending_vacation_days == 0,
            s.anniversary.unwrap_or(NaiveDate::MAX),
        )
    });
    regular
}

/// Premier décalage du bloc où l'opérateur peut partir.
pub(super) fn eligibility_floor(state: &OperatorState, year_start: NaiveDate) -> u32 {
    if state.is_eligible(year_start) {
        return 0;
    }
    state
        .anniversary
        .map(|a| calendar::days_between(year_start, a).max(0))
        .and_then(|days| u32::try_from(days).ok())
        .unwrap_or(0)
}

/// Attribue à chaque opérateur un créneau disjoint ; le(s) remplaçant(s) passent en dernier.
pub(super) fn allocate(
    states: &mut [OperatorState],
    year_start: NaiveDate,
    config: &Configuration,
) -> Vec<VacationAssignment> {
    let mut order = priority_order(states);
    order.extend((0..states.len()).filter(|&i| states[i].is_replacement));

    let mut plan = Vec::with_capacity(order.len());
    let mut cursor = 0u32;

    for (rank, &idx) in order.iter().enumerate() {
        let state = &mut states[idx];
        let start = if state.is_replacement {
            cursor
        } else {
            cursor.max(eligibility_floor(state, year_start))
        };
        let slot = VacationSlot::new(start, config.vacation_days);
        state.vacation_slot = Some(slot);
        cursor = start.saturating_add(config.slot_stride);

        debug!(
            operator = %state.operator_id,
            priority = rank + 1,
            start = slot.start_offset,
            end = slot.end_offset,
            replacement = state.is_replacement,
            "vacation slot assigned"
        );

        plan.push(VacationAssignment {
            operator_id: state.operator_id.clone(),
            priority: rank + 1,
            start_offset: slot.start_offset,
            end_offset: slot.end_offset,
            anniversary: state.anniversary,
            replacement: state.is_replacement,
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cycle, Operator};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state(id: &str, pending: u32, anniversary: Option<NaiveDate>, replacement: bool) -> OperatorState {
        let mut op = Operator::new(id, id, "p", "12x9");
        op.pending_vacation_days = pending;
        OperatorState::new(&op, &Cycle::new("12x9", 12, 9), replacement, anniversary)
    }

    fn slots(plan: &[VacationAssignment]) -> Vec<(&str, u32, u32)> {
        plan.iter()
            .map(|a| (a.operator_id.as_str(), a.start_offset, a.end_offset))
            .collect()
    }

    #[test]
    fn stride_of_51_with_replacement_last() {
        let mut states = vec![
            state("r", 0, None, true),
            state("a", 30, Some(ymd(2026, 6, 1)), false),
            state("b", 30, Some(ymd(2026, 3, 1)), false),
        ];
        let plan = allocate(&mut states, ymd(2026, 1, 1), &Configuration::default());
        assert_eq!(slots(&plan), vec![("b", 0, 29), ("a", 51, 80), ("r", 102, 131)]);
        assert_eq!(states[0].vacation_slot, Some(VacationSlot { start_offset: 102, end_offset: 131 }));
    }

    #[test]
    fn pending_first_then_anniversary_then_input_order() {
        let states = vec![
            state("late", 0, Some(ymd(2026, 9, 1)), false),
            state("undated", 0, None, false),
            state("early", 0, Some(ymd(2026, 2, 1)), false),
            state("owed", 10, Some(ymd(2026, 12, 1)), false),
            state("early-too", 0, Some(ymd(2026, 2, 1)), false),
        ];
        let order: Vec<&str> = priority_order(&states)
            .into_iter()
            .map(|i| states[i].operator_id.as_str())
            .collect();
        assert_eq!(order, vec!["owed", "early", "early-too", "late", "undated"]);
    }

    #[test]
    fn anniversary_pushes_slot_forward() {
        let mut states = vec![
            state("a", 30, None, false),
            state("b", 0, Some(ymd(2026, 5, 1)), false),
            state("c", 0, Some(ymd(2026, 5, 2)), false),
        ];
        let plan = allocate(&mut states, ymd(2026, 1, 1), &Configuration::default());
        // 01/05/2026 = 120 jours après le 01/01
        assert_eq!(slots(&plan), vec![("a", 0, 29), ("b", 120, 149), ("c", 171, 200)]);
    }

    #[test]
    fn regular_slots_never_overlap() {
        let mut states: Vec<OperatorState> = (0..6)
            .map(|i| state(&format!("op{i}"), 0, Some(ymd(2026, 1 + i as u32, 10)), false))
            .collect();
        allocate(&mut states, ymd(2026, 1, 1), &Configuration::default());
        for (i, a) in states.iter().enumerate() {
            for b in states.iter().skip(i + 1) {
                let (sa, sb) = (a.vacation_slot.unwrap(), b.vacation_slot.unwrap());
                assert!(!sa.overlaps(&sb), "{sa:?} overlaps {sb:?}");
            }
        }
    }

    #[test]
    fn huge_stride_saturates() {
        let mut states = vec![state("a", 30, None, false), state("b", 30, None, false)];
        let config = Configuration {
            slot_stride: u32::MAX,
            ..Configuration::default()
        };
        let plan = allocate(&mut states, ymd(2026, 1, 1), &config);
        assert_eq!(slots(&plan), vec![("a", 0, 29), ("b", u32::MAX, u32::MAX)]);
    }
}
