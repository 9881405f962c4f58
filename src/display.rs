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
//! The character display. Writers update fields in a [`DisplayBuffer`]; a
//! render task draws whatever changed onto a [`Screen`].

use crate::patch::{self, Patch};

mod buffer;
mod render;

pub use buffer::{DisplayBuffer, Field};
pub use render::{render, spawn, LogScreen, Screen};

pub const WIDTH: usize = 20;
pub const HEIGHT: usize = 4;

const NAME_EDIT_MARKERS: &str = "12345678";

/// What the control surface shows the player.
pub trait Display: Send + Sync {
    fn show_mode(&self, mode: &str);

    /// Shows a patch number as its two controller digits and its 1-based
    /// MIDI program.
    fn show_patch_number(&self, number: u8);

    fn show_patch_name(&self, patch: &Patch);

    fn show_param(&self, group: &str, name: &str, value: &str);

    fn clear_param_area(&self);

    /// Numbers the name positions under the patch name while it is edited.
    fn show_name_edit_markers(&self);

    fn clear_name_edit_markers(&self);

    fn show_error(&self, error: &str);
}

impl Display for DisplayBuffer {
    fn show_mode(&self, mode: &str) {
        self.write(Field::Mode, mode);
    }

    fn show_patch_number(&self, number: u8) {
        let (digit1, digit2) = patch::number_to_digits(number);
        self.write(
            Field::PatchNumber,
            &format!("{}{} ~{}", digit1, digit2, u16::from(number) + 1),
        );
    }

    fn show_patch_name(&self, patch: &Patch) {
        self.write(Field::PatchName, &patch.name());
    }

    fn show_param(&self, group: &str, name: &str, value: &str) {
        self.write(Field::Group, group);
        self.write(Field::Param, name);
        self.write(Field::Value, value);
    }

    fn clear_param_area(&self) {
        self.write(Field::Group, "");
        self.write(Field::Param, "");
        self.write(Field::Value, "");
    }

    fn show_name_edit_markers(&self) {
        self.write(Field::NameMarkers, NAME_EDIT_MARKERS);
    }

    fn clear_name_edit_markers(&self) {
        self.write(Field::NameMarkers, "");
    }

    fn show_error(&self, error: &str) {
        self.write(Field::Error, error);
    }
}

/// Clips or space pads `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat(' ').take(width - len));
    fitted
}
