mod conflicts;
mod driver;
mod metrics;
mod rotation;
mod types;
mod vacation;

pub use conflicts::detect_coverage;
pub use metrics::summarize;
pub use rotation::{duty_for, OperatorState};
pub use types::{SchedError, VacationBlockClock, VacationSlot};

use crate::calendar;
use crate::cycles::CycleRegistry;
use crate::model::{
    InputBundle, OutputBundle, ScheduleEntry, VacationAssignment, Warning, CYCLE_LENGTH,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Contexte de simulation : états des opérateurs et horloge du bloc de congés.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationContext {
    pub states: Vec<OperatorState>,
    pub clock: VacationBlockClock,
}

/// Scheduler : prépare le contexte puis simule l'année jour par jour.
#[derive(Debug)]
pub struct Scheduler<'a> {
    input: &'a InputBundle,
    context: SimulationContext,
    plan: Vec<VacationAssignment>,
    start: NaiveDate,
    end: NaiveDate,
    schedule: Vec<ScheduleEntry>,
    warnings: Vec<Warning>,
}

impl<'a> Scheduler<'a> {
    /// Valide le lot d'entrée, initialise les états et attribue les créneaux.
    pub fn new(input: &'a InputBundle) -> Result<Self, SchedError> {
        let config = &input.configuration;
        if input.operators.is_empty() {
            return Err(SchedError::NoOperators);
        }
        if !(1..=12).contains(&config.analysis_start_month) {
            return Err(SchedError::InvalidStartMonth(config.analysis_start_month));
        }
        if config.vacation_days == 0 || config.shift_hours == 0 {
            return Err(SchedError::InvalidConfiguration(
                "vacation days and shift hours must be positive",
            ));
        }
        if config.slot_stride < config.vacation_days {
            return Err(SchedError::InvalidConfiguration(
                "slot stride shorter than the vacation length",
            ));
        }
        let (year_start, _) = calendar::analysis_window(config.analysis_year, 1)
            .map_err(|_| SchedError::InvalidYear(config.analysis_year))?;
        let (start, end) =
            calendar::analysis_window(config.analysis_year, config.analysis_start_month)
                .map_err(|_| SchedError::InvalidYear(config.analysis_year))?;

        let registry = CycleRegistry::load(&input.cycles)?;

        let mut seen = BTreeSet::new();
        let mut warnings = Vec::new();
        let mut states = Vec::with_capacity(input.operators.len());
        for operator in &input.operators {
            if !seen.insert(&operator.id) {
                return Err(SchedError::DuplicateOperator(operator.id.to_string()));
            }
            if operator.initial_cycle_day > CYCLE_LENGTH {
                return Err(SchedError::InvalidCycleDay {
                    operator: operator.id.to_string(),
                    day: operator.initial_cycle_day,
                });
            }

            let cycle = if operator.initial_cycle_id.trim().is_empty() {
                registry.preferred()
            } else {
                registry.lookup(&operator.initial_cycle_id).ok()
            }
            .ok_or_else(|| SchedError::UnknownCycle {
                operator: Some(operator.id.to_string()),
                cycle: operator.initial_cycle_id.clone(),
            })?;

            let reference = operator
                .anniversary_reference_date
                .as_deref()
                .and_then(|raw| calendar::parse_reference_date(raw).ok());
            let anniversary =
                reference.and_then(|r| calendar::project_anniversary(r, config.analysis_year));
            if anniversary.is_none() {
                warn!(operator = %operator.id, "no usable anniversary date, treated as eligible");
                warnings.push(Warning::MissingAnniversary {
                    operator: operator.id.clone(),
                    raw: operator.anniversary_reference_date.clone(),
                });
            }

            let is_replacement = operator.is_replacement(&config.replacement_position);
            states.push(OperatorState::new(operator, cycle, is_replacement, anniversary));
        }

        let replacements: Vec<_> = states
            .iter()
            .filter(|s| s.is_replacement)
            .map(|s| s.operator_id.clone())
            .collect();
        if replacements.len() > 1 {
            warn!(count = replacements.len(), "more than one replacement operator");
            warnings.push(Warning::MultipleReplacementOperators {
                operators: replacements,
            });
        }

        let plan = vacation::allocate(&mut states, year_start, config);

        info!(
            operators = input.operators.len(),
            positions = input.positions.len(),
            cycles = registry.len(),
            "scheduler initialised"
        );

        Ok(Self {
            input,
            context: SimulationContext {
                states,
                clock: VacationBlockClock::default(),
            },
            plan,
            start,
            end,
            schedule: Vec::new(),
            warnings,
        })
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }
    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.context
    }
    pub fn plan(&self) -> &[VacationAssignment] {
        &self.plan
    }
    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Premier et dernier jour simulés (inclus).
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Simule une journée : porte des congés, émission, puis crédit et avance.
    pub fn step(&mut self, date: NaiveDate) {
        driver::vacation_gate(&mut self.context, date, &mut self.warnings);
        driver::emit_day(
            &self.context,
            &self.input.operators,
            &self.input.configuration,
            date,
            &mut self.schedule,
        );
        driver::advance_all(
            &mut self.context,
            &self.input.configuration,
            date,
            &mut self.warnings,
        );
    }

    /// Simule toute la fenêtre d'analyse et produit le résultat.
    pub fn run(mut self) -> OutputBundle {
        let mut current = Some(self.start);
        while let Some(date) = current.filter(|d| *d <= self.end) {
            self.step(date);
            current = date.succ_opt();
        }

        let (gaps, duplicates) = detect_coverage(&self.schedule, &self.input.positions);
        let metrics = summarize(&self.schedule, self.input, &gaps, &duplicates);
        info!(
            records = metrics.total_records,
            day_shifts = metrics.day_shift_count,
            night_shifts = metrics.night_shift_count,
            rest_days = metrics.rest_day_count,
            vacation_days = metrics.vacation_day_count,
            gaps = metrics.gap_count,
            duplicates = metrics.duplicate_count,
            "schedule generated"
        );

        OutputBundle {
            schedule: self.schedule,
            metrics,
            gaps,
            duplicates,
            warnings: self.warnings,
            vacation_plan: self.plan,
            vacation_block_start: self.context.clock.start_date,
        }
    }
}

/// Point d'entrée : lot d'entrée → planning, métriques, trous et doublons.
pub fn generate_schedule(input: &InputBundle) -> Result<OutputBundle, SchedError> {
    Ok(Scheduler::new(input)?.run())
}
