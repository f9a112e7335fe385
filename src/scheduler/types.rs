use chrono::NaiveDate;
use thiserror::Error;

/// Erreurs de configuration : levées avant toute simulation.
#[derive(Error, Debug)]
pub enum SchedError {
    #[error("no operators supplied")]
    NoOperators,
    #[error("no cycles supplied")]
    NoCycles,
    #[error("cycle {cycle}: work ({work}) + rest ({rest}) days must equal 21")]
    InvalidCycleLength { cycle: String, work: u32, rest: u32 },
    #[error("unknown cycle {cycle}{}", operator_suffix(.operator))]
    UnknownCycle {
        operator: Option<String>,
        cycle: String,
    },
    #[error("operator {operator}: initial cycle day {day} out of range 0..=21")]
    InvalidCycleDay { operator: String, day: u32 },
    #[error("duplicate operator id: {0}")]
    DuplicateOperator(String),
    #[error("analysis start month must be 1..=12, got {0}")]
    InvalidStartMonth(u32),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("invalid analysis year: {0}")]
    InvalidYear(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn operator_suffix(operator: &Option<String>) -> String {
    operator
        .as_ref()
        .map(|o| format!(" referenced by operator {o}"))
        .unwrap_or_default()
}

/// Créneau de congés, en jours depuis le début du bloc (bornes incluses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VacationSlot {
    pub start_offset: u32,
    pub end_offset: u32,
}

impl VacationSlot {
    pub fn new(start_offset: u32, length: u32) -> Self {
        Self {
            start_offset,
            end_offset: start_offset.saturating_add(length.saturating_sub(1)),
        }
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.start_offset <= offset && offset <= self.end_offset
    }

    pub fn overlaps(&self, other: &VacationSlot) -> bool {
        self.start_offset <= other.end_offset && other.start_offset <= self.end_offset
    }
}

/// Horloge unique du bloc de congés : démarre une fois, ne revient jamais en arrière.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VacationBlockClock {
    pub started: bool,
    pub start_date: Option<NaiveDate>,
    pub day_offset: u32,
}

impl VacationBlockClock {
    pub fn start(&mut self, date: NaiveDate) {
        self.started = true;
        self.start_date = Some(date);
        self.day_offset = 0;
    }

    pub fn tick(&mut self) {
        if self.started {
            self.day_offset += 1;
        }
    }
}
