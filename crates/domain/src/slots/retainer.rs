//! Fortunate: the retainer roster.

use serde::{Deserialize, Serialize};

use super::reconcile::{self, ReconcileOutcome};
use crate::entities::Retainer;
use crate::error::DomainError;

/// Fortunate slot collection. Each position holds a retainer record or a
/// vacant (unnamed) one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Retainer>", into = "Vec<Retainer>")]
pub struct RetainerRoster {
    slots: Vec<Retainer>,
}

impl From<Vec<Retainer>> for RetainerRoster {
    fn from(mut slots: Vec<Retainer>) -> Self {
        for retainer in &mut slots {
            retainer.normalize();
        }
        Self { slots }
    }
}

impl From<RetainerRoster> for Vec<Retainer> {
    fn from(roster: RetainerRoster) -> Self {
        roster.slots
    }
}

impl RetainerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Retainer] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Retainer> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Retainer, DomainError> {
        let len = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or_else(|| DomainError::slot_out_of_range(index, len))
    }

    /// Retainers currently hired.
    pub fn hired(&self) -> impl Iterator<Item = &Retainer> {
        self.slots.iter().filter(|r| !r.is_vacant())
    }

    pub fn hired_count(&self) -> usize {
        self.hired().count()
    }

    /// Place a retainer in the first vacant position and return its index.
    pub fn hire(&mut self, retainer: Retainer) -> Result<usize, DomainError> {
        if retainer.is_vacant() {
            return Err(DomainError::validation("Retainer name cannot be empty"));
        }
        let Some(index) = self.slots.iter().position(Retainer::is_vacant) else {
            let max = self.slots.len() as u32;
            tracing::debug!(capacity = max, "Rejected hire on full roster");
            return Err(DomainError::container_full(max, max));
        };
        self.slots[index] = retainer;
        Ok(index)
    }

    /// Vacate a position and return who held it.
    pub fn dismiss(&mut self, index: usize) -> Result<Retainer, DomainError> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::take(slot))
    }

    pub fn reconcile(&mut self, target: usize) -> ReconcileOutcome {
        reconcile::reconcile(&mut self.slots, target, Retainer::default)
    }

    pub fn filled_beyond(&self, target: usize) -> usize {
        reconcile::filled_beyond(&self.slots, target, |r| !r.is_vacant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(slots: usize) -> RetainerRoster {
        let mut roster = RetainerRoster::new();
        roster.reconcile(slots);
        roster
    }

    #[test]
    fn hire_fills_first_vacancy() {
        let mut r = roster(2);
        assert_eq!(r.hire(Retainer::new("Pell", 4)).unwrap(), 0);
        assert_eq!(r.hire(Retainer::new("Ona", 5)).unwrap(), 1);
        assert_eq!(r.hired_count(), 2);
    }

    #[test]
    fn hire_beyond_capacity_is_rejected() {
        let mut r = roster(1);
        r.hire(Retainer::new("Pell", 4)).unwrap();
        assert!(matches!(
            r.hire(Retainer::new("Ona", 5)),
            Err(DomainError::ContainerFull { current: 1, max: 1 })
        ));
        assert_eq!(r.get(0).unwrap().name, "Pell");
    }

    #[test]
    fn dismiss_frees_the_slot() {
        let mut r = roster(2);
        r.hire(Retainer::new("Pell", 4)).unwrap();
        r.hire(Retainer::new("Ona", 5)).unwrap();

        let gone = r.dismiss(0).unwrap();
        assert_eq!(gone.name, "Pell");
        assert!(r.get(0).unwrap().is_vacant());

        assert_eq!(r.hire(Retainer::new("Tam", 3)).unwrap(), 0);
        assert!(r.dismiss(9).is_err());
    }

    #[test]
    fn unnamed_hire_is_rejected() {
        let mut r = roster(1);
        assert!(r.hire(Retainer::new("  ", 4)).is_err());
    }

    #[test]
    fn shrink_reports_hired_retainers_beyond_target() {
        let mut r = roster(3);
        r.hire(Retainer::new("Pell", 4)).unwrap();
        r.hire(Retainer::new("Ona", 5)).unwrap();
        r.dismiss(0).unwrap();

        assert_eq!(r.filled_beyond(1), 1);
        r.reconcile(1);
        assert_eq!(r.len(), 1);
        assert_eq!(r.hired_count(), 0);
    }

    #[test]
    fn deserialize_clamps_hp() {
        let json = serde_json::json!([{ "name": "Pell", "currentHp": 9, "maxHp": 4 }]);
        let r: RetainerRoster = serde_json::from_value(json).unwrap();
        assert_eq!(r.get(0).unwrap().current_hp(), 4);
    }
}
