use crate::calendar::ddmmyyyy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longueur fixe d'une rotation, en jours.
pub const CYCLE_LENGTH: u32 = 21;
/// Position affichée les jours de repos.
pub const REST_POSITION: &str = "rest";
/// Position affichée les jours de congés.
pub const VACATION_POSITION: &str = "vacation";

/// Identifiant fort pour Operator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorId(String);

impl OperatorId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rotation `travail × repos` sur 21 jours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Cycle {
    pub id: String,
    pub work_days: u32,
    pub rest_days: u32,
    #[serde(default)]
    pub is_preferred: bool,
}

impl Cycle {
    pub fn new<S: Into<String>>(id: S, work_days: u32, rest_days: u32) -> Self {
        Self {
            id: id.into(),
            work_days,
            rest_days,
            is_preferred: false,
        }
    }

    /// Répartition des jours travaillés : `(jours, nuits)`, la moitié basse en jour.
    pub fn day_split(&self) -> (u32, u32) {
        let day = self.work_days / 2;
        (day, self.work_days - day)
    }

    /// Dernier jour de repos du cycle (fin de rotation).
    pub fn last_rest_day(&self) -> u32 {
        self.work_days + self.rest_days
    }
}

/// Poste à couvrir jour et nuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Position {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required_operators: u32,
    #[serde(default = "default_shifts_per_day")]
    pub shifts_per_day: u32,
}

fn default_shifts_per_day() -> u32 {
    2
}

/// Relève de début de cycle déclarée en entrée (informative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialShift {
    #[serde(alias = "DIA")]
    Day,
    #[serde(alias = "NOCHE")]
    Night,
    #[serde(alias = "DESCANSO")]
    Rest,
}

/// Opérateur tel que fourni en entrée ; jamais modifié par le moteur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Operator {
    pub id: OperatorId,
    pub name: String,
    pub position_type: String,
    pub initial_position: String,
    pub initial_cycle_id: String,
    /// 1..=21 ; 0 = pas encore démarré (opérateur de remplacement).
    #[serde(default)]
    pub initial_cycle_day: u32,
    #[serde(default)]
    pub initial_shift: Option<InitialShift>,
    /// `DD/MM/YYYY` ou numéro de série tableur.
    #[serde(default)]
    pub anniversary_reference_date: Option<String>,
    #[serde(default)]
    pub pending_vacation_days: u32,
    #[serde(default)]
    pub accumulated_hours_at_start: u32,
}

impl Operator {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N, position: &str, cycle: &str) -> Self {
        Self {
            id: OperatorId::new(id),
            name: name.into(),
            position_type: String::new(),
            initial_position: position.to_string(),
            initial_cycle_id: cycle.to_string(),
            initial_cycle_day: 1,
            initial_shift: None,
            anniversary_reference_date: None,
            pending_vacation_days: 0,
            accumulated_hours_at_start: 0,
        }
    }

    pub fn is_replacement(&self, replacement_position: &str) -> bool {
        self.initial_position == replacement_position
    }
}

/// Paramètres du calcul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Configuration {
    #[serde(default = "defaults::vacation_days")]
    pub vacation_days: u32,
    #[serde(default = "defaults::annual_hour_limit")]
    pub annual_hour_limit: u32,
    #[serde(default = "defaults::analysis_year")]
    pub analysis_year: i32,
    #[serde(default = "defaults::analysis_start_month")]
    pub analysis_start_month: u32,
    #[serde(default = "defaults::replacement_position")]
    pub replacement_position: String,
    #[serde(default = "defaults::shift_hours")]
    pub shift_hours: u32,
    /// Écart entre deux débuts de créneau : congés + un cycle complet du remplaçant.
    #[serde(default = "defaults::slot_stride")]
    pub slot_stride: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            vacation_days: defaults::vacation_days(),
            annual_hour_limit: defaults::annual_hour_limit(),
            analysis_year: defaults::analysis_year(),
            analysis_start_month: defaults::analysis_start_month(),
            replacement_position: defaults::replacement_position(),
            shift_hours: defaults::shift_hours(),
            slot_stride: defaults::slot_stride(),
        }
    }
}

mod defaults {
    pub fn vacation_days() -> u32 {
        30
    }
    pub fn annual_hour_limit() -> u32 {
        2496
    }
    pub fn analysis_year() -> i32 {
        2025
    }
    pub fn analysis_start_month() -> u32 {
        1
    }
    pub fn replacement_position() -> String {
        "vacation-pool".to_string()
    }
    pub fn shift_hours() -> u32 {
        12
    }
    pub fn slot_stride() -> u32 {
        51
    }
}

/// Lot d'entrée complet, déjà validé par la couche de saisie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputBundle {
    #[serde(default)]
    pub configuration: Configuration,
    pub cycles: Vec<Cycle>,
    #[serde(default)]
    pub positions: Vec<Position>,
    pub operators: Vec<Operator>,
}

/// Activité d'un opérateur sur une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyKind {
    DayShift,
    NightShift,
    Rest,
    Vacation,
}

impl DutyKind {
    /// Code court (TD / TN / DE / VC).
    pub fn code(self) -> &'static str {
        match self {
            DutyKind::DayShift => "TD",
            DutyKind::NightShift => "TN",
            DutyKind::Rest => "DE",
            DutyKind::Vacation => "VC",
        }
    }

    pub fn shift(self) -> Option<WorkShift> {
        match self {
            DutyKind::DayShift => Some(WorkShift::Day),
            DutyKind::NightShift => Some(WorkShift::Night),
            DutyKind::Rest | DutyKind::Vacation => None,
        }
    }

    pub fn is_working(self) -> bool {
        self.shift().is_some()
    }
}

/// Relève d'un poste : jour ou nuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkShift {
    Day,
    Night,
}

/// Ligne du planning : un opérateur, un jour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(with = "ddmmyyyy")]
    pub date: NaiveDate,
    pub operator_id: OperatorId,
    pub operator_name: String,
    pub position: String,
    pub initial_position: String,
    pub duty_kind: DutyKind,
    pub code: String,
    pub cycle_id: String,
    pub day_in_cycle: u32,
    pub annual_hours_to_date: u32,
    pub day_hours_to_date: u32,
    pub night_hours_to_date: u32,
    pub cycle_hours: u32,
    pub pending_vacation_days: u32,
    /// Part des heures annuelles faites de jour, en %.
    pub day_share: f64,
    pub night_share: f64,
    pub cap_reached: bool,
}

/// Poste/jour/relève sans personne.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gap {
    #[serde(with = "ddmmyyyy")]
    pub date: NaiveDate,
    pub position: String,
    pub missing_shift: WorkShift,
}

/// Poste/jour/relève tenu par plusieurs opérateurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duplicate {
    #[serde(with = "ddmmyyyy")]
    pub date: NaiveDate,
    pub position: String,
    pub shift: WorkShift,
    pub operator_ids: Vec<OperatorId>,
}

/// Compteurs agrégés sur le planning émis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_records: usize,
    pub day_shift_count: usize,
    pub night_shift_count: usize,
    pub rest_day_count: usize,
    pub vacation_day_count: usize,
    pub operator_count: usize,
    pub position_count: usize,
    pub days_analyzed: usize,
    pub operators_at_hour_cap: usize,
    pub gap_count: usize,
    pub duplicate_count: usize,
}

/// Avertissements non bloquants remontés avec le planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Warning {
    /// Date de référence absente ou illisible : opérateur éligible d'emblée.
    MissingAnniversary {
        operator: OperatorId,
        raw: Option<String>,
    },
    AnnualCapReached {
        operator: OperatorId,
        #[serde(with = "ddmmyyyy")]
        date: NaiveDate,
        hours: u32,
    },
    MultipleReplacementOperators { operators: Vec<OperatorId> },
    /// Créneau écoulé sans que l'opérateur ait pu partir.
    VacationNotStarted {
        operator: OperatorId,
        start_offset: u32,
        end_offset: u32,
    },
}

/// Créneau attribué par l'allocateur de congés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationAssignment {
    pub operator_id: OperatorId,
    pub priority: usize,
    pub start_offset: u32,
    pub end_offset: u32,
    #[serde(serialize_with = "ddmmyyyy::option::serialize", skip_deserializing)]
    pub anniversary: Option<NaiveDate>,
    pub replacement: bool,
}

/// Résultat complet d'un calcul.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputBundle {
    pub schedule: Vec<ScheduleEntry>,
    pub metrics: Metrics,
    pub gaps: Vec<Gap>,
    pub duplicates: Vec<Duplicate>,
    pub warnings: Vec<Warning>,
    pub vacation_plan: Vec<VacationAssignment>,
    #[serde(serialize_with = "ddmmyyyy::option::serialize", skip_deserializing)]
    pub vacation_block_start: Option<NaiveDate>,
}
