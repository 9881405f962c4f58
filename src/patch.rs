// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::params::Registry;

mod store;

pub use store::{Error, PatchStore};

/// Number of characters in a patch name.
pub const NAME_LENGTH: usize = 8;

/// Number of patch slots.
pub const SLOTS: u8 = 64;

/// Name given to freshly initialized patches.
pub const DEFAULT_NAME: &str = "Init";

const NAME_CHAR_MIN: u8 = 32;
const NAME_CHAR_MAX: u8 = 125;

/// A named set of parameter values.
#[derive(Clone, PartialEq, Eq)]
pub struct Patch {
    name: [u8; NAME_LENGTH],
    values: BTreeMap<u16, u8>,
}

impl Patch {
    /// Creates an empty patch with the given name.
    pub fn new(name: &str) -> Patch {
        let mut patch = Patch {
            name: [b' '; NAME_LENGTH],
            values: BTreeMap::new(),
        };
        patch.set_name(name);
        patch
    }

    /// Creates a patch holding the initial value of every registered parameter.
    pub fn init(registry: &Registry) -> Patch {
        let mut patch = Patch::new(DEFAULT_NAME);
        for descriptor in registry.iter() {
            patch.values.insert(descriptor.id(), descriptor.initial());
        }
        patch
    }

    /// The name, always exactly eight characters.
    pub fn name(&self) -> String {
        self.name.iter().map(|c| char::from(*c)).collect()
    }

    /// Sets the name, padding with spaces or clipping to eight characters.
    /// Characters outside the printable range become spaces.
    pub fn set_name(&mut self, name: &str) {
        self.set_name_bytes(name.as_bytes());
    }

    pub(crate) fn set_name_bytes(&mut self, name: &[u8]) {
        self.name = [b' '; NAME_LENGTH];
        for (slot, c) in self.name.iter_mut().zip(name.iter()) {
            if (NAME_CHAR_MIN..=NAME_CHAR_MAX).contains(c) {
                *slot = *c;
            }
        }
    }

    pub(crate) fn name_bytes(&self) -> &[u8; NAME_LENGTH] {
        &self.name
    }

    /// Moves the character at `position` one step up. Returns false at the
    /// top of the range or for a position past the end.
    pub fn increment_name_char(&mut self, position: usize) -> bool {
        match self.name.get_mut(position) {
            Some(c) if *c < NAME_CHAR_MAX => {
                *c += 1;
                true
            }
            _ => false,
        }
    }

    /// Moves the character at `position` one step down.
    pub fn decrement_name_char(&mut self, position: usize) -> bool {
        match self.name.get_mut(position) {
            Some(c) if *c > NAME_CHAR_MIN => {
                *c -= 1;
                true
            }
            _ => false,
        }
    }

    /// The stored value, or 0 when the parameter is not in the patch.
    pub fn get(&self, id: u16) -> u8 {
        self.values.get(&id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.values.contains_key(&id)
    }

    /// Stores `min(value, max)` and returns what was stored.
    pub fn set(&mut self, id: u16, value: u8, max: u8) -> u8 {
        let value = value.min(max);
        self.values.insert(id, value);
        value
    }

    /// Adds `delta` to the stored value, clamped to `0..=max`, and returns
    /// the new value.
    pub fn increment(&mut self, id: u16, delta: i16, max: u8) -> u8 {
        let value = (i16::from(self.get(id)) + delta).clamp(0, i16::from(max));
        self.set(id, value as u8, max)
    }

    pub fn remove(&mut self, id: u16) -> Option<u8> {
        self.values.remove(&id)
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }

    pub fn ids(&self) -> Vec<u16> {
        self.values.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A printable view of the patch with every value rendered through the
    /// registry.
    pub fn summary(&self, number: u8, registry: &Registry) -> Summary {
        Summary {
            number,
            name: self.name().trim_end().to_string(),
            parameters: self
                .iter()
                .map(|(id, value)| {
                    let descriptor = registry.by_id(id);
                    ParameterSummary {
                        id,
                        group: descriptor.map(|d| d.group().to_string()),
                        name: descriptor.map(|d| d.name().to_string()),
                        value,
                        display: descriptor.map(|d| d.format(value)),
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch")
            .field("name", &self.name())
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} parameters)", self.name(), self.values.len())
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub number: u8,
    pub name: String,
    pub parameters: Vec<ParameterSummary>,
}

#[derive(Debug, Serialize)]
pub struct ParameterSummary {
    pub id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Splits a patch number into the two 1-8 digits used on the controller.
pub fn number_to_digits(number: u8) -> (u8, u8) {
    let number = number.min(SLOTS - 1);
    (number / 8 + 1, number % 8 + 1)
}

/// Joins two 1-8 digits into a patch number.
pub fn digits_to_number(digit1: u8, digit2: u8) -> u8 {
    (digit1.clamp(1, 8) - 1) * 8 + (digit2.clamp(1, 8) - 1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_name_padding_and_clipping() {
        assert_eq!(Patch::new("Init").name(), "Init    ");
        assert_eq!(Patch::new("Much too long").name(), "Much too");
        assert_eq!(Patch::new("").name(), "        ");
        assert_eq!(Patch::new("a\tb~").name(), "a b     ");
    }

    #[test]
    fn test_init_from_registry() {
        let registry = Registry::standard().unwrap();
        let patch = Patch::init(&registry);

        assert_eq!(patch.name(), "Init    ");
        assert_eq!(patch.len(), registry.len());
        for descriptor in registry.iter() {
            assert_eq!(patch.get(descriptor.id()), descriptor.initial());
        }
    }

    #[test]
    fn test_set_clamps() {
        let mut patch = Patch::new("Test");
        assert_eq!(patch.set(1, 100, 127), 100);
        assert_eq!(patch.set(1, 100, 6), 6);
        assert_eq!(patch.get(1), 6);
        assert_eq!(patch.set(2, 255, 127), 127);
    }

    #[test]
    fn test_get_missing_is_zero() {
        let patch = Patch::new("Test");
        assert_eq!(patch.get(42), 0);
        assert!(!patch.contains(42));
    }

    #[test]
    fn test_increment_stays_in_range() {
        let mut patch = Patch::new("Test");
        patch.set(1, 5, 6);
        for _ in 0..10 {
            patch.increment(1, 1, 6);
        }
        assert_eq!(patch.get(1), 6);

        for _ in 0..10 {
            patch.increment(1, -1, 6);
        }
        assert_eq!(patch.get(1), 0);

        // Starts from zero when missing.
        assert_eq!(patch.increment(2, 1, 127), 1);
        assert_eq!(patch.increment(3, -1, 127), 0);
    }

    #[test]
    fn test_name_char_edits() {
        let mut patch = Patch::new(DEFAULT_NAME);
        for _ in 0..3 {
            assert!(patch.increment_name_char(2));
        }
        assert_eq!(patch.name(), "Inlt    ");

        assert!(patch.decrement_name_char(0));
        assert_eq!(patch.name(), "Hnlt    ");

        // Spaces cannot go lower.
        assert!(!patch.decrement_name_char(7));
        assert!(!patch.increment_name_char(8));

        patch.set_name("}");
        assert!(!patch.increment_name_char(0));
        assert_eq!(patch.name(), "}       ");
    }

    #[test]
    fn test_remove() {
        let mut patch = Patch::new("Test");
        patch.set(7, 3, 127);
        assert_eq!(patch.remove(7), Some(3));
        assert_eq!(patch.remove(7), None);
        assert!(patch.is_empty());
    }

    #[test]
    fn test_digits() {
        assert_eq!(number_to_digits(0), (1, 1));
        assert_eq!(number_to_digits(9), (2, 2));
        assert_eq!(number_to_digits(63), (8, 8));
        for number in 0..SLOTS {
            let (digit1, digit2) = number_to_digits(number);
            assert_eq!(digits_to_number(digit1, digit2), number);
        }
    }

    #[test]
    fn test_summary() {
        let registry = Registry::standard().unwrap();
        let mut patch = Patch::new("Bass");
        patch.set(207, 6, 6);
        patch.set(9999, 1, 127);

        let summary = patch.summary(3, &registry);
        assert_eq!(summary.number, 3);
        assert_eq!(summary.name, "Bass");
        assert_eq!(summary.parameters.len(), 2);
        assert_eq!(summary.parameters[0].display.as_deref(), Some("Bypass"));
        assert_eq!(summary.parameters[1].group, None);
    }
}
