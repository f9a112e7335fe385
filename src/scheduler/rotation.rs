use super::types::VacationSlot;
use crate::model::{Cycle, DutyKind, Operator, OperatorId, CYCLE_LENGTH};
use chrono::NaiveDate;

/// État mutable d'un opérateur pendant la simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorState {
    pub operator_id: OperatorId,
    pub cycle_id: String,
    /// 0 = en attente (remplaçant inactif), sinon 1..=21.
    pub day_in_cycle: u32,
    /// `(jours en relève de jour, jours en relève de nuit)`.
    pub work_day_split: (u32, u32),
    pub rest_days: u32,
    pub annual_hours: u32,
    pub day_hours: u32,
    pub night_hours: u32,
    pub is_on_vacation: bool,
    pub vacation_day_index: u32,
    pub vacation_slot: Option<VacationSlot>,
    pub has_reached_annual_cap: bool,
    pub is_replacement: bool,
    pub anniversary: Option<NaiveDate>,
    pub pending_vacation_days: u32,
    pub vacation_taken: bool,
}

impl OperatorState {
    pub fn new(
        operator: &Operator,
        cycle: &Cycle,
        is_replacement: bool,
        anniversary: Option<NaiveDate>,
    ) -> Self {
        let day_in_cycle = match (is_replacement, operator.initial_cycle_day) {
            (true, _) => 0,
            (false, 0) => 1,
            (false, day) => day,
        };
        Self {
            operator_id: operator.id.clone(),
            cycle_id: cycle.id.clone(),
            day_in_cycle,
            work_day_split: cycle.day_split(),
            rest_days: cycle.rest_days,
            annual_hours: operator.accumulated_hours_at_start,
            day_hours: 0,
            night_hours: 0,
            is_on_vacation: false,
            vacation_day_index: 0,
            vacation_slot: None,
            has_reached_annual_cap: false,
            is_replacement,
            anniversary,
            pending_vacation_days: operator.pending_vacation_days,
            vacation_taken: false,
        }
    }

    pub fn duty(&self) -> DutyKind {
        duty_for(self.day_in_cycle, self.work_day_split, self.is_on_vacation)
    }

    pub fn last_rest_day(&self) -> u32 {
        self.work_day_split.0 + self.work_day_split.1 + self.rest_days
    }

    /// Dernier jour de repos du cycle : seul moment où un départ est permis.
    pub fn at_cycle_end(&self) -> bool {
        self.day_in_cycle == self.last_rest_day() && self.duty() == DutyKind::Rest
    }

    /// Éligible si des congés restent dus ou si l'anniversaire est passé.
    pub fn is_eligible(&self, date: NaiveDate) -> bool {
        if self.pending_vacation_days > 0 {
            return true;
        }
        self.anniversary.map_or(true, |anniversary| date >= anniversary)
    }

    /// Crédite les heures de la journée écoulée puis contrôle le plafond, quelle que
    /// soit l'activité ; renvoie `true` au premier franchissement.
    pub fn credit(&mut self, duty: DutyKind, shift_hours: u32, annual_cap: u32) -> bool {
        match duty {
            DutyKind::DayShift => self.day_hours += shift_hours,
            DutyKind::NightShift => self.night_hours += shift_hours,
            DutyKind::Rest | DutyKind::Vacation => {}
        }
        if duty.is_working() {
            self.annual_hours += shift_hours;
        }
        if !self.has_reached_annual_cap && self.annual_hours >= annual_cap {
            self.has_reached_annual_cap = true;
            return true;
        }
        false
    }

    /// Heures du cycle en cours, jour émis inclus ; cycle complet en repos/congés.
    pub fn cycle_hours(&self, duty: DutyKind, shift_hours: u32) -> u32 {
        let (day, night) = self.work_day_split;
        if duty.is_working() {
            self.day_in_cycle.min(day + night) * shift_hours
        } else {
            (day + night) * shift_hours
        }
    }

    /// Pourcentages jour/nuit des heures annuelles, arrondis au centième.
    pub fn shares(&self) -> (f64, f64) {
        if self.annual_hours == 0 {
            return (0.0, 0.0);
        }
        let total = f64::from(self.annual_hours);
        let pct = |h: u32| (f64::from(h) / total * 10_000.0).round() / 100.0;
        (pct(self.day_hours), pct(self.night_hours))
    }

    /// Avance d'un jour simulé.
    pub fn advance(&mut self) {
        if self.is_on_vacation {
            self.vacation_day_index += 1;
        } else if self.day_in_cycle > 0 {
            self.day_in_cycle += 1;
            if self.day_in_cycle > CYCLE_LENGTH {
                self.day_in_cycle = 1;
            }
        }
    }

    pub fn enter_vacation(&mut self) {
        self.is_on_vacation = true;
        self.vacation_day_index = 1;
        self.vacation_taken = true;
    }

    /// Retour de congés : reprise en début de phase travaillée.
    pub fn leave_vacation(&mut self) {
        self.is_on_vacation = false;
        self.vacation_day_index = 0;
        self.day_in_cycle = 1;
    }
}

/// Activité du jour pour une position dans le cycle.
pub fn duty_for(day_in_cycle: u32, split: (u32, u32), on_vacation: bool) -> DutyKind {
    let (day, night) = split;
    if on_vacation {
        DutyKind::Vacation
    } else if day_in_cycle == 0 {
        DutyKind::Rest
    } else if day_in_cycle <= day {
        DutyKind::DayShift
    } else if day_in_cycle <= day + night {
        DutyKind::NightShift
    } else {
        DutyKind::Rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(day: u32) -> OperatorState {
        let mut op = Operator::new("1", "A", "central_1", "12x9");
        op.initial_cycle_day = day;
        OperatorState::new(&op, &Cycle::new("12x9", 12, 9), false, None)
    }

    #[test]
    fn twelve_by_nine_sequence() {
        let mut s = state(1);
        let mut seq = Vec::new();
        for _ in 0..22 {
            seq.push(s.duty());
            s.advance();
        }
        assert!(seq[..6].iter().all(|d| *d == DutyKind::DayShift));
        assert!(seq[6..12].iter().all(|d| *d == DutyKind::NightShift));
        assert!(seq[12..21].iter().all(|d| *d == DutyKind::Rest));
        assert_eq!(seq[21], DutyKind::DayShift);
    }

    #[test]
    fn wraps_after_day_21() {
        let mut s = state(20);
        s.advance();
        assert_eq!(s.day_in_cycle, 21);
        assert!(s.at_cycle_end());
        s.advance();
        assert_eq!(s.day_in_cycle, 1);
    }

    #[test]
    fn idle_replacement_does_not_move() {
        let op = Operator::new("9", "R", "vacation-pool", "12x9");
        let mut s = OperatorState::new(&op, &Cycle::new("12x9", 12, 9), true, None);
        assert_eq!(s.day_in_cycle, 0);
        assert_eq!(s.duty(), DutyKind::Rest);
        s.advance();
        assert_eq!(s.day_in_cycle, 0);
    }

    #[test]
    fn vacation_overrides_and_freezes_cycle() {
        let mut s = state(3);
        s.enter_vacation();
        assert_eq!(s.duty(), DutyKind::Vacation);
        s.advance();
        assert_eq!((s.day_in_cycle, s.vacation_day_index), (3, 2));
        s.leave_vacation();
        assert_eq!(s.day_in_cycle, 1);
    }

    #[test]
    fn cap_is_flagged_once() {
        let mut s = state(1);
        assert!(!s.credit(DutyKind::DayShift, 12, 24));
        assert!(s.credit(DutyKind::NightShift, 12, 24));
        assert!(!s.credit(DutyKind::DayShift, 12, 24));
        assert!(!s.credit(DutyKind::Rest, 12, 24));
        assert_eq!((s.annual_hours, s.day_hours, s.night_hours), (36, 24, 12));
        assert!(s.has_reached_annual_cap);
        assert_eq!(s.shares(), (66.67, 33.33));
    }

    #[test]
    fn eligibility_follows_anniversary() {
        let mut s = state(1);
        let anniversary = NaiveDate::from_ymd_opt(2026, 5, 21).unwrap();
        s.anniversary = Some(anniversary);
        assert!(!s.is_eligible(NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()));
        assert!(s.is_eligible(anniversary));
        s.pending_vacation_days = 30;
        assert!(s.is_eligible(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn credit_counts_worked_days_only() {
        let mut s = state(1);
        assert!(!s.credit(DutyKind::DayShift, 12, 2496));
        assert!(!s.credit(DutyKind::NightShift, 12, 2496));
        assert!(!s.credit(DutyKind::Rest, 12, 2496));
        assert_eq!((s.annual_hours, s.day_hours, s.night_hours), (24, 12, 12));
    }

    #[test]
    fn cap_is_checked_on_rest_days_too() {
        let mut op = Operator::new("9", "R", "vacation-pool", "12x9");
        op.accumulated_hours_at_start = 3000;
        let mut s = OperatorState::new(&op, &Cycle::new("12x9", 12, 9), true, None);
        assert!(s.credit(DutyKind::Rest, 12, 2496));
        assert!(s.has_reached_annual_cap);
        assert!(!s.credit(DutyKind::Rest, 12, 2496));
        assert_eq!(s.annual_hours, 3000);
    }
}
