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
//! The parameter registry: an immutable index over every synthesizer
//! parameter, addressable by id, external CC, controller CC, controller
//! buttons and menu slot.

use std::{collections::HashMap, fmt};

use tracing::error;

mod catalog;
mod descriptor;
pub mod scale;

pub use descriptor::Descriptor;

/// Number of addressable menu slots.
pub const MENU_SLOTS: usize = 64;

const CODES: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate parameter id {0}")]
    DuplicateParamId(u16),

    #[error("{kind} {code} claimed by parameters {first} and {second}")]
    DuplicateAddress {
        kind: AddressKind,
        code: u8,
        first: u16,
        second: u16,
    },

    #[error("parameter {id} has initial value {initial} outside 0..={max}")]
    InvalidRange { id: u16, initial: u8, max: u8 },

    #[error("{kind} {code} of parameter {id} is out of range")]
    AddressOutOfRange { kind: AddressKind, code: u8, id: u16 },
}

/// The ways a parameter can be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    ExternalCc,
    ControllerCc,
    IncrementNote,
    DecrementNote,
    MenuAddress,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressKind::ExternalCc => "external CC",
            AddressKind::ControllerCc => "controller CC",
            AddressKind::IncrementNote => "increment note",
            AddressKind::DecrementNote => "decrement note",
            AddressKind::MenuAddress => "menu address",
        };
        write!(f, "{}", name)
    }
}

/// Reverse lookup from a small code space to a descriptor index.
struct Index<const N: usize> {
    kind: AddressKind,
    slots: [Option<usize>; N],
}

impl<const N: usize> Index<N> {
    fn new(kind: AddressKind) -> Index<N> {
        Index {
            kind,
            slots: [None; N],
        }
    }

    fn insert(
        &mut self,
        code: Option<u8>,
        position: usize,
        descriptors: &[Descriptor],
    ) -> Result<(), Error> {
        let code = match code {
            Some(code) => code,
            None => return Ok(()),
        };

        let id = descriptors[position].id();
        let slot = self
            .slots
            .get_mut(usize::from(code))
            .ok_or(Error::AddressOutOfRange {
                kind: self.kind,
                code,
                id,
            })?;

        if let Some(existing) = slot {
            return Err(Error::DuplicateAddress {
                kind: self.kind,
                code,
                first: descriptors[*existing].id(),
                second: id,
            });
        }
        *slot = Some(position);

        Ok(())
    }

    fn get(&self, code: u8) -> Option<usize> {
        self.slots.get(usize::from(code)).copied().flatten()
    }
}

/// The immutable parameter catalog.
pub struct Registry {
    descriptors: Vec<Descriptor>,
    by_id: HashMap<u16, usize>,
    external_cc: Index<CODES>,
    controller_cc: Index<CODES>,
    increment_note: Index<CODES>,
    decrement_note: Index<CODES>,
    menu_address: Index<MENU_SLOTS>,
}

impl Registry {
    /// Builds a registry, rejecting duplicate ids, duplicate addresses and
    /// inconsistent value ranges.
    pub fn build(descriptors: Vec<Descriptor>) -> Result<Registry, Error> {
        let mut registry = Registry {
            by_id: HashMap::with_capacity(descriptors.len()),
            external_cc: Index::new(AddressKind::ExternalCc),
            controller_cc: Index::new(AddressKind::ControllerCc),
            increment_note: Index::new(AddressKind::IncrementNote),
            decrement_note: Index::new(AddressKind::DecrementNote),
            menu_address: Index::new(AddressKind::MenuAddress),
            descriptors,
        };

        let result = registry.index();
        if let Err(e) = &result {
            error!(err = %e, "Unable to build parameter registry.");
        }
        result.map(|_| registry)
    }

    /// Builds the registry for the synthesizer's own parameter set.
    pub fn standard() -> Result<Registry, Error> {
        Registry::build(catalog::descriptors())
    }

    fn index(&mut self) -> Result<(), Error> {
        for (position, descriptor) in self.descriptors.iter().enumerate() {
            if descriptor.max() > 127 || descriptor.initial() > descriptor.max() {
                return Err(Error::InvalidRange {
                    id: descriptor.id(),
                    initial: descriptor.initial(),
                    max: descriptor.max(),
                });
            }

            if self.by_id.insert(descriptor.id(), position).is_some() {
                return Err(Error::DuplicateParamId(descriptor.id()));
            }

            self.external_cc
                .insert(descriptor.external_cc(), position, &self.descriptors)?;
            self.controller_cc
                .insert(descriptor.controller_cc(), position, &self.descriptors)?;
            self.increment_note
                .insert(descriptor.increment_note(), position, &self.descriptors)?;
            self.decrement_note
                .insert(descriptor.decrement_note(), position, &self.descriptors)?;
            self.menu_address
                .insert(descriptor.menu_address(), position, &self.descriptors)?;
        }

        Ok(())
    }

    pub fn by_id(&self, id: u16) -> Option<&Descriptor> {
        self.by_id.get(&id).map(|position| &self.descriptors[*position])
    }

    pub fn by_external_cc(&self, cc: u8) -> Option<&Descriptor> {
        self.resolve(self.external_cc.get(cc))
    }

    pub fn by_controller_cc(&self, cc: u8) -> Option<&Descriptor> {
        self.resolve(self.controller_cc.get(cc))
    }

    pub fn by_increment_note(&self, note: u8) -> Option<&Descriptor> {
        self.resolve(self.increment_note.get(note))
    }

    pub fn by_decrement_note(&self, note: u8) -> Option<&Descriptor> {
        self.resolve(self.decrement_note.get(note))
    }

    pub fn by_menu_address(&self, address: u8) -> Option<&Descriptor> {
        self.resolve(self.menu_address.get(address))
    }

    fn resolve(&self, position: Option<usize>) -> Option<&Descriptor> {
        position.and_then(|position| self.descriptors.get(position))
    }

    /// All descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// A markdown table of every externally controllable parameter, for
    /// setting up a sequencer or DAW.
    pub fn cc_chart(&self) -> String {
        const PARAMETER: &str = "Parameter";
        const CC: &str = "CC";

        let rows: Vec<(String, String)> = self
            .descriptors
            .iter()
            .filter_map(|d| {
                d.external_cc()
                    .map(|cc| (format!("{} - {}", d.group(), d.name()), cc.to_string()))
            })
            .collect();
        let parameter_width = rows
            .iter()
            .map(|(parameter, _)| parameter.len())
            .fold(PARAMETER.len(), usize::max);
        let cc_width = rows.iter().map(|(_, cc)| cc.len()).fold(CC.len(), usize::max);

        let mut chart = format!(
            "| {:<pw$} | {:>cw$} |\n| :{} | {}: |\n",
            PARAMETER,
            CC,
            "-".repeat(parameter_width - 1),
            "-".repeat(cc_width - 1),
            pw = parameter_width,
            cw = cc_width,
        );
        for (parameter, cc) in rows {
            chart.push_str(&format!(
                "| {:<pw$} | {:>cw$} |\n",
                parameter,
                cc,
                pw = parameter_width,
                cw = cc_width,
            ));
        }
        chart
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("descriptors", &self.descriptors.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use crate::engine::Setting;

    use super::*;

    fn descriptor(id: u16) -> Descriptor {
        Descriptor::new(id, "Test", "Param", 0, 127, |v| Setting::WaveshapeLevel(scale::linear(v)))
    }

    #[test]
    fn test_lookups() {
        let registry = Registry::build(vec![
            descriptor(1).with_external_cc(10).with_controller_cc(20),
            descriptor(2).with_buttons(1, 3),
            descriptor(3).with_menu_address(5),
        ])
        .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.by_id(1).unwrap().id(), 1);
        assert_eq!(registry.by_external_cc(10).unwrap().id(), 1);
        assert_eq!(registry.by_controller_cc(20).unwrap().id(), 1);
        assert_eq!(registry.by_increment_note(1).unwrap().id(), 2);
        assert_eq!(registry.by_decrement_note(3).unwrap().id(), 2);
        assert_eq!(registry.by_menu_address(5).unwrap().id(), 3);

        assert!(registry.by_id(4).is_none());
        assert!(registry.by_external_cc(20).is_none());
        assert!(registry.by_increment_note(3).is_none());
        assert!(registry.by_menu_address(63).is_none());
        assert!(registry.by_menu_address(200).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Registry::build(vec![descriptor(1), descriptor(1)]);
        assert!(matches!(result, Err(Error::DuplicateParamId(1))));
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let result = Registry::build(vec![
            descriptor(1).with_external_cc(81),
            descriptor(2).with_external_cc(81),
        ]);
        assert!(matches!(
            result,
            Err(Error::DuplicateAddress {
                kind: AddressKind::ExternalCc,
                code: 81,
                first: 1,
                second: 2,
            })
        ));

        let result = Registry::build(vec![
            descriptor(1).with_menu_address(0),
            descriptor(2).with_menu_address(0),
        ]);
        assert!(matches!(
            result,
            Err(Error::DuplicateAddress {
                kind: AddressKind::MenuAddress,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_addresses_and_ranges_rejected() {
        let result = Registry::build(vec![descriptor(1).with_menu_address(64)]);
        assert!(matches!(result, Err(Error::AddressOutOfRange { .. })));

        let result = Registry::build(vec![descriptor(1).with_controller_cc(128)]);
        assert!(matches!(result, Err(Error::AddressOutOfRange { .. })));

        let result = Registry::build(vec![Descriptor::new(1, "Test", "Param", 10, 5, |v| {
            Setting::FilterMode(v)
        })]);
        assert!(matches!(result, Err(Error::InvalidRange { id: 1, .. })));
    }

    #[test]
    fn test_standard_catalog() {
        let registry = Registry::standard().unwrap();
        assert_eq!(registry.len(), 45);

        let ids: HashSet<u16> = registry.iter().map(|d| d.id()).collect();
        assert_eq!(ids.len(), registry.len());

        for descriptor in registry.iter() {
            assert!(descriptor.initial() <= descriptor.max(), "{}", descriptor);
            // Every value in range must format without panicking.
            for value in 0..=descriptor.max() {
                assert!(!descriptor.format(value).is_empty(), "{}", descriptor);
            }
        }

        let menu: Vec<u16> = (0..MENU_SLOTS as u8)
            .filter_map(|address| registry.by_menu_address(address))
            .map(|d| d.id())
            .collect();
        assert_eq!(menu, vec![1500, 202, 1401]);
    }

    #[test]
    fn test_standard_catalog_values() {
        let registry = Registry::standard().unwrap();

        let attack = registry.by_controller_cc(19).unwrap();
        assert_eq!(attack.id(), 0);
        assert_eq!(attack.external_cc(), Some(73));
        assert_eq!(attack.format(0), "0.0ms");

        let mode = registry.by_increment_note(10).unwrap();
        assert_eq!(mode.id(), 207);
        assert_eq!(mode.max(), 6);
        assert_eq!(mode.format(6), "Bypass");
        assert_eq!(mode.setting(9), Setting::FilterMode(6));

        let octave = registry.by_id(904).unwrap();
        assert_eq!(octave.format(4), "+0 octaves");
        assert_eq!(octave.setting(0), Setting::OscFmOctave(-4));

        let transpose = registry.by_decrement_note(6).unwrap();
        assert_eq!(transpose.id(), 505);
        assert_eq!(transpose.format(24), "+12 semitones");

        let sustain = registry.by_id(2).unwrap();
        assert_eq!(sustain.format(127), "100%");

        let mix = registry.by_id(1302).unwrap();
        assert_eq!(mix.format(0), "1: 100% 2: 0%");

        let offset = registry.by_id(1200).unwrap();
        assert_eq!(offset.external_cc(), Some(84));
        assert_eq!(offset.format(63), "+0.0 semitones [0]");

        assert_eq!(registry.by_external_cc(81).unwrap().id(), 602);
    }

    #[test]
    fn test_cc_chart() {
        let registry = Registry::build(vec![
            descriptor(1).with_external_cc(73),
            descriptor(2),
            descriptor(3).with_external_cc(5),
        ])
        .unwrap();

        let chart = registry.cc_chart();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| Parameter"));
        assert!(lines[1].starts_with("| :---"));
        assert!(lines[1].ends_with("-: |"));
        assert!(lines[2].ends_with("| 73 |"));
        assert!(lines[3].ends_with("|  5 |"));
        assert!(lines.iter().all(|line| line.len() == lines[0].len()));

        let standard = Registry::standard().unwrap();
        let rows = standard.cc_chart().lines().count() - 2;
        assert_eq!(
            rows,
            standard.iter().filter(|d| d.external_cc().is_some()).count()
        );
    }
}
