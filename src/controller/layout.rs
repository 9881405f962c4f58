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
//! Physical layout of the grid controller (an Akai MIDImix in its factory mapping).

/// Note of the bank-left button, used to enter patch loading.
pub const LOAD: u8 = 25;
/// Note of the bank-right button, used to enter patch saving.
pub const SAVE: u8 = 26;
/// Note of the solo button, used to enter the parameter menu.
pub const MENU: u8 = 27;
/// Controller notes at or below this value are reserved for the surface.
pub const CONTROL_NOTE_MAX: u8 = 27;

/// Mute buttons, channel strips 1-8. Increment parameters and select the first patch digit.
pub const INCREMENT: [u8; 8] = [1, 4, 7, 10, 13, 16, 19, 22];
/// Rec-arm buttons, channel strips 1-8. Decrement parameters and select the second patch digit.
pub const DECREMENT: [u8; 8] = [3, 6, 9, 12, 15, 18, 21, 24];

pub const SLIDER: [u8; 8] = [19, 23, 27, 31, 49, 53, 57, 61];
pub const DIAL_1: [u8; 8] = [16, 20, 24, 28, 46, 50, 54, 58];
pub const DIAL_2: [u8; 8] = [17, 21, 25, 29, 47, 51, 55, 59];
pub const DIAL_3: [u8; 8] = [18, 22, 26, 30, 48, 52, 56, 60];
pub const MASTER_SLIDER: u8 = 62;

pub const SUSTAIN_CC: u8 = 64;
pub const MOD_WHEEL_CC: u8 = 1;

/// Highest note forwarded to the engine.
pub const NOTE_MAX: u8 = 96;

/// A surface button, identified by the note it sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Load,
    Save,
    Menu,
    /// Mute button on strip n (1-8).
    Increment(u8),
    /// Rec-arm button on strip n (1-8).
    Decrement(u8),
}

impl Button {
    /// Classifies a controller note.
    pub fn from_note(note: u8) -> Option<Button> {
        match note {
            LOAD => Some(Button::Load),
            SAVE => Some(Button::Save),
            MENU => Some(Button::Menu),
            _ => {
                if let Some(i) = INCREMENT.iter().position(|n| *n == note) {
                    Some(Button::Increment(i as u8 + 1))
                } else {
                    DECREMENT
                        .iter()
                        .position(|n| *n == note)
                        .map(|i| Button::Decrement(i as u8 + 1))
                }
            }
        }
    }

    /// The note this button sends, and the note that drives its light.
    pub fn note(&self) -> u8 {
        match self {
            Button::Load => LOAD,
            Button::Save => SAVE,
            Button::Menu => MENU,
            Button::Increment(n) => INCREMENT[(*n as usize - 1) % 8],
            Button::Decrement(n) => DECREMENT[(*n as usize - 1) % 8],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(Button::from_note(25), Some(Button::Load));
        assert_eq!(Button::from_note(26), Some(Button::Save));
        assert_eq!(Button::from_note(27), Some(Button::Menu));
        assert_eq!(Button::from_note(1), Some(Button::Increment(1)));
        assert_eq!(Button::from_note(22), Some(Button::Increment(8)));
        assert_eq!(Button::from_note(3), Some(Button::Decrement(1)));
        assert_eq!(Button::from_note(24), Some(Button::Decrement(8)));
        assert_eq!(Button::from_note(2), None);
        assert_eq!(Button::from_note(60), None);
    }

    #[test]
    fn notes_round_trip_through_buttons() {
        for note in INCREMENT.iter().chain(DECREMENT.iter()) {
            let button = Button::from_note(*note).expect("button");
            assert_eq!(button.note(), *note);
        }
    }
}
