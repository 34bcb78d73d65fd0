//! Master day templates.
//!
//! Five fixed slots. A date takes the first empty slot (ascending id) when it
//! is promoted; each slot's color tags the days copied from it.

use serde::{Deserialize, Serialize};

use crate::block::ColorToken;
use crate::day::DateKey;
use crate::error::ValidationError;

pub const MASTER_SLOT_COUNT: usize = 5;

/// One template slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterDay {
    pub id: u8,
    pub date: Option<DateKey>,
    pub color: ColorToken,
    pub name: String,
    pub color_name: String,
}

/// The fixed table of template slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasterRegistry {
    slots: Vec<MasterDay>,
}

impl MasterRegistry {
    /// Build from configured slots, ordered by id.
    pub fn from_slots(mut slots: Vec<MasterDay>) -> Self {
        slots.sort_by_key(|s| s.id);
        Self { slots }
    }

    pub fn slots(&self) -> &[MasterDay] {
        &self.slots
    }

    pub fn slot(&self, id: u8) -> Result<&MasterDay, ValidationError> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or(ValidationError::UnknownMaster(id))
    }

    /// The slot currently holding `date`.
    pub fn slot_for(&self, date: DateKey) -> Option<&MasterDay> {
        self.slots.iter().find(|s| s.date == Some(date))
    }

    pub fn is_master(&self, date: DateKey) -> bool {
        self.slot_for(date).is_some()
    }

    /// Put `date` in the first empty slot.
    ///
    /// Returns the slot id, or `None` when the date already holds a slot or
    /// every slot is taken.
    pub fn promote(&mut self, date: DateKey) -> Option<u8> {
        if self.is_master(date) {
            return None;
        }
        let slot = self.slots.iter_mut().find(|s| s.date.is_none())?;
        slot.date = Some(date);
        Some(slot.id)
    }

    /// Empty whichever slot holds `date`. Returns the freed slot id.
    pub fn release(&mut self, date: DateKey) -> Option<u8> {
        let slot = self.slots.iter_mut().find(|s| s.date == Some(date))?;
        slot.date = None;
        Some(slot.id)
    }
}

impl Default for MasterRegistry {
    fn default() -> Self {
        let slots = [
            (1, "bg-sky-500", "Blue"),
            (2, "bg-yellow-400", "Yellow"),
            (3, "bg-orange-500", "Orange"),
            (4, "bg-green-500", "Green"),
            (5, "bg-red-500", "Red"),
        ]
        .into_iter()
        .map(|(id, color, color_name)| MasterDay {
            id,
            date: None,
            color: color.to_string(),
            name: format!("Master {id}"),
            color_name: color_name.to_string(),
        })
        .collect();
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn default_has_five_empty_slots() {
        let masters = MasterRegistry::default();
        assert_eq!(masters.slots().len(), MASTER_SLOT_COUNT);
        assert!(masters.slots().iter().all(|s| s.date.is_none()));
        assert_eq!(masters.slot(3).unwrap().color_name, "Orange");
        assert!(masters.slot(9).is_err());
    }

    #[test]
    fn promote_fills_lowest_free_slot() {
        let mut masters = MasterRegistry::default();
        assert_eq!(masters.promote(date("2024-05-01")), Some(1));
        assert_eq!(masters.promote(date("2024-05-02")), Some(2));
        masters.release(date("2024-05-01"));
        assert_eq!(masters.promote(date("2024-05-03")), Some(1));
    }

    #[test]
    fn promote_is_idempotent_per_date() {
        let mut masters = MasterRegistry::default();
        masters.promote(date("2024-05-01"));
        assert_eq!(masters.promote(date("2024-05-01")), None);
        assert_eq!(masters.slots().iter().filter(|s| s.date.is_some()).count(), 1);
    }

    #[test]
    fn promote_gives_up_when_full() {
        let mut masters = MasterRegistry::default();
        for day in 1..=5 {
            assert!(masters.promote(date(&format!("2024-05-0{day}"))).is_some());
        }
        assert_eq!(masters.promote(date("2024-05-09")), None);
        assert!(!masters.is_master(date("2024-05-09")));
    }
}
