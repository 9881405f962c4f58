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
use std::fmt;

use crate::engine::{Engine, Setting};

use super::scale;

/// Static metadata describing one synthesizer parameter: how it is stored,
/// how the controller and external MIDI address it, what it does to the
/// engine and how it reads on the display.
#[derive(Clone)]
pub struct Descriptor {
    id: u16,
    group: &'static str,
    name: &'static str,
    initial: u8,
    max: u8,
    menu_address: Option<u8>,
    external_cc: Option<u8>,
    controller_cc: Option<u8>,
    increment_note: Option<u8>,
    decrement_note: Option<u8>,
    effect: fn(u8) -> Setting,
    format: fn(u8) -> String,
}

impl Descriptor {
    /// Creates a descriptor with no addressing and the default formatter.
    pub fn new(
        id: u16,
        group: &'static str,
        name: &'static str,
        initial: u8,
        max: u8,
        effect: fn(u8) -> Setting,
    ) -> Descriptor {
        Descriptor {
            id,
            group,
            name,
            initial,
            max,
            menu_address: None,
            external_cc: None,
            controller_cc: None,
            increment_note: None,
            decrement_note: None,
            effect,
            format: scale::raw_percent,
        }
    }

    pub fn with_menu_address(mut self, address: u8) -> Descriptor {
        self.menu_address = Some(address);
        self
    }

    pub fn with_external_cc(mut self, cc: u8) -> Descriptor {
        self.external_cc = Some(cc);
        self
    }

    pub fn with_controller_cc(mut self, cc: u8) -> Descriptor {
        self.controller_cc = Some(cc);
        self
    }

    /// Binds the parameter to a pair of +/- buttons.
    pub fn with_buttons(mut self, increment_note: u8, decrement_note: u8) -> Descriptor {
        self.increment_note = Some(increment_note);
        self.decrement_note = Some(decrement_note);
        self
    }

    pub fn with_format(mut self, format: fn(u8) -> String) -> Descriptor {
        self.format = format;
        self
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn group(&self) -> &'static str {
        self.group
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn initial(&self) -> u8 {
        self.initial
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn menu_address(&self) -> Option<u8> {
        self.menu_address
    }

    pub fn external_cc(&self) -> Option<u8> {
        self.external_cc
    }

    pub fn controller_cc(&self) -> Option<u8> {
        self.controller_cc
    }

    pub fn increment_note(&self) -> Option<u8> {
        self.increment_note
    }

    pub fn decrement_note(&self) -> Option<u8> {
        self.decrement_note
    }

    /// The engine setting produced by the given raw value.
    pub fn setting(&self, value: u8) -> Setting {
        (self.effect)(value.min(self.max))
    }

    /// Pushes the given raw value into the engine.
    pub fn apply(&self, engine: &mut dyn Engine, value: u8) {
        engine.set(self.setting(value));
    }

    /// Renders the given raw value for display.
    pub fn format(&self, value: u8) -> String {
        (self.format)(value.min(self.max))
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("name", &self.name)
            .field("initial", &self.initial)
            .field("max", &self.max)
            .finish()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} ({})", self.group, self.name, self.id)
    }
}
