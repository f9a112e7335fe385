#![forbid(unsafe_code)]
//! Rotaplan — moteur de planification de rotations postées sur 21 jours.
//!
//! - Cycles `travail × repos` (relèves de jour puis de nuit, puis repos).
//! - Bloc de congés annuel : créneaux de 30 jours espacés, ordonnés par anniversaire.
//! - Opérateur de remplacement activé pendant les congés des réguliers.
//! - Simulation déterministe jour par jour, heures cumulées, trous et doublons.
//! - Dates `DD/MM/YYYY` aux frontières ; pas d'E/S dans la boucle de simulation.

pub mod calendar;
pub mod cycles;
pub mod io;
pub mod model;
pub mod scheduler;

pub use cycles::{normalize_cycle_id, CycleRegistry};
pub use model::{
    Configuration, Cycle, Duplicate, DutyKind, Gap, InputBundle, InitialShift, Metrics, Operator,
    OperatorId, OutputBundle, Position, ScheduleEntry, VacationAssignment, Warning, WorkShift,
};
pub use scheduler::{generate_schedule, SchedError, Scheduler, SimulationContext};
