use super::SimulationContext;
use crate::calendar;
use crate::model::{
    Configuration, DutyKind, Operator, ScheduleEntry, Warning, REST_POSITION, VACATION_POSITION,
};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Porte du bloc de congés, évaluée une fois par jour avant toute affectation.
pub(super) fn vacation_gate(ctx: &mut SimulationContext, date: NaiveDate, warnings: &mut Vec<Warning>) {
    if !ctx.clock.started {
        let opener = ctx.states.iter().find(|s| {
            !s.is_replacement && s.vacation_slot.is_some() && s.at_cycle_end() && s.is_eligible(date)
        });
        if let Some(opener) = opener {
            info!(
                date = %calendar::format_date(date),
                operator = %opener.operator_id,
                "vacation block started"
            );
            ctx.clock.start(date);
        }
    }
    if !ctx.clock.started {
        return;
    }

    let offset = ctx.clock.day_offset;
    for state in ctx.states.iter_mut() {
        let Some(slot) = state.vacation_slot else {
            continue;
        };
        let due = slot.contains(offset);

        if due && !state.is_on_vacation {
            // départ différé jusqu'au dernier jour de repos, jamais en cours de relève
            let ready = state.is_replacement || state.at_cycle_end();
            if state.is_eligible(date) && ready {
                state.enter_vacation();
                info!(
                    date = %calendar::format_date(date),
                    operator = %state.operator_id,
                    offset,
                    "vacation started"
                );
            } else if offset == slot.end_offset && !state.vacation_taken {
                warn!(operator = %state.operator_id, "vacation slot elapsed without departure");
                warnings.push(Warning::VacationNotStarted {
                    operator: state.operator_id.clone(),
                    start_offset: slot.start_offset,
                    end_offset: slot.end_offset,
                });
            }
        } else if !due && state.is_on_vacation {
            state.leave_vacation();
            info!(
                date = %calendar::format_date(date),
                operator = %state.operator_id,
                "vacation ended"
            );
        }
    }

    sync_replacements(ctx, date);
    ctx.clock.tick();
}

/// Le remplaçant tourne tant qu'un régulier est en congés, attend sinon.
fn sync_replacements(ctx: &mut SimulationContext, date: NaiveDate) {
    let regular_away = ctx
        .states
        .iter()
        .any(|s| !s.is_replacement && s.is_on_vacation);

    for state in ctx.states.iter_mut().filter(|s| s.is_replacement) {
        if regular_away && state.day_in_cycle == 0 && !state.is_on_vacation {
            state.day_in_cycle = 1;
            info!(date = %calendar::format_date(date), operator = %state.operator_id, "replacement on duty");
        } else if !regular_away && state.day_in_cycle != 0 {
            state.day_in_cycle = 0;
            info!(date = %calendar::format_date(date), operator = %state.operator_id, "replacement on standby");
        }
    }
}

/// Émet une ligne par opérateur ; les cumuls d'heures s'arrêtent à la veille.
pub(super) fn emit_day(
    ctx: &SimulationContext,
    operators: &[Operator],
    config: &Configuration,
    date: NaiveDate,
    schedule: &mut Vec<ScheduleEntry>,
) {
    for (state, operator) in ctx.states.iter().zip(operators) {
        let duty = state.duty();
        let position = match duty {
            DutyKind::DayShift | DutyKind::NightShift => operator.initial_position.as_str(),
            DutyKind::Rest => REST_POSITION,
            DutyKind::Vacation => VACATION_POSITION,
        };
        let (day_share, night_share) = state.shares();

        schedule.push(ScheduleEntry {
            date,
            operator_id: operator.id.clone(),
            operator_name: operator.name.clone(),
            position: position.to_string(),
            initial_position: operator.initial_position.clone(),
            duty_kind: duty,
            code: duty.code().to_string(),
            cycle_id: state.cycle_id.clone(),
            day_in_cycle: state.day_in_cycle,
            annual_hours_to_date: state.annual_hours,
            day_hours_to_date: state.day_hours,
            night_hours_to_date: state.night_hours,
            cycle_hours: state.cycle_hours(duty, config.shift_hours),
            pending_vacation_days: state.pending_vacation_days,
            day_share,
            night_share,
            cap_reached: state.has_reached_annual_cap,
        });
    }
}

/// Fin de journée : crédit des heures travaillées, contrôle du plafond, avance du cycle.
pub(super) fn advance_all(
    ctx: &mut SimulationContext,
    config: &Configuration,
    date: NaiveDate,
    warnings: &mut Vec<Warning>,
) {
    for state in ctx.states.iter_mut() {
        let duty = state.duty();
        if state.credit(duty, config.shift_hours, config.annual_hour_limit) {
            warn!(
                operator = %state.operator_id,
                hours = state.annual_hours,
                "annual hour limit reached"
            );
            warnings.push(Warning::AnnualCapReached {
                operator: state.operator_id.clone(),
                date,
                hours: state.annual_hours,
            });
        }
        state.advance();
    }
}
