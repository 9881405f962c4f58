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
//! The sound engine boundary. Parameter effects, notes and performance
//! controls are pushed through [`Engine`]; a headless [`Synth`] routes notes
//! to a fixed [`VoicePool`].

mod setting;
mod synth;
mod voice;

pub use setting::Setting;
pub use synth::{LogVoice, Synth};
pub use voice::{Voice, VoicePool, VoiceSlot};

/// The receiving side of every parameter effect and note event.
pub trait Engine: Send {
    /// Pushes a scaled parameter value into the engine.
    fn set(&mut self, setting: Setting);

    /// Starts a note.
    fn note_on(&mut self, note: u8, velocity: u8);

    /// Releases every voice sounding the given note.
    fn note_off(&mut self, note: u8);

    /// Sets the sustain pedal.
    fn sustain(&mut self, on: bool);

    /// Pitch bend in the range -1.0..=1.0.
    fn pitch_bend(&mut self, amount: f32);

    /// Modulation wheel in the range 0.0..=1.0.
    fn mod_wheel(&mut self, amount: f32);
}
