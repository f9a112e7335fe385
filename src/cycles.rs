//! Registre des cycles, indexé par identifiant normalisé (`12×9`, `12X9` → `12x9`).

use crate::model::{Cycle, CYCLE_LENGTH};
use crate::scheduler::SchedError;
use std::collections::BTreeMap;

/// Remplace les glyphes de multiplication par un `x` minuscule.
pub fn normalize_cycle_id(id: &str) -> String {
    id.trim().replace(['×', 'X'], "x")
}

#[derive(Debug, Clone, Default)]
pub struct CycleRegistry {
    cycles: BTreeMap<String, Cycle>,
}

impl CycleRegistry {
    /// Construit le registre ; la dernière déclaration d'un même identifiant l'emporte.
    pub fn load(cycles: &[Cycle]) -> Result<Self, SchedError> {
        if cycles.is_empty() {
            return Err(SchedError::NoCycles);
        }
        let mut registry = Self::default();
        for cycle in cycles {
            registry.register(cycle.clone())?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, cycle: Cycle) -> Result<(), SchedError> {
        if cycle.work_days + cycle.rest_days != CYCLE_LENGTH {
            return Err(SchedError::InvalidCycleLength {
                cycle: cycle.id.clone(),
                work: cycle.work_days,
                rest: cycle.rest_days,
            });
        }
        self.cycles.insert(normalize_cycle_id(&cycle.id), cycle);
        Ok(())
    }

    /// Recherche par identifiant, sous n'importe quelle graphie (`x`, `X`, `×`).
    pub fn lookup(&self, id: &str) -> Result<&Cycle, SchedError> {
        self.cycles
            .get(&normalize_cycle_id(id))
            .ok_or_else(|| SchedError::UnknownCycle {
                operator: None,
                cycle: id.to_string(),
            })
    }

    /// Cycle marqué préféré, le cas échéant.
    pub fn preferred(&self) -> Option<&Cycle> {
        self.cycles.values().find(|c| c.is_preferred)
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}
