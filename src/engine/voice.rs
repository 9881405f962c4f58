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
//! Polyphonic voice allocation.
//!
//! A fixed pool of voices, each sounding at most one note. Free voices are
//! reused oldest-released-first; when every voice is held down, the voice
//! that was triggered longest ago is stolen.

use std::{error::Error, fmt};

use tracing::debug;

use super::Setting;

/// One unit of polyphony.
pub trait Voice: Send {
    /// Starts the given note, cutting whatever the voice was doing.
    fn note_on(&mut self, note: u8, velocity: u8);

    /// Moves the voice into its release phase.
    fn release(&mut self);

    /// Applies a per-voice setting.
    fn set(&mut self, setting: Setting);

    fn pitch_bend(&mut self, _amount: f32) {}

    fn mod_wheel(&mut self, _amount: f32) {}
}

/// Bookkeeping for one pool entry. Timestamps come from the pool's logical
/// clock, which advances on every note event, so they never tie once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceSlot {
    /// The note the voice was last given, if any.
    pub sounding_note: Option<u8>,
    /// The key for `sounding_note` is still down.
    pub held: bool,
    /// The key was released while the sustain pedal was down.
    pub sustained: bool,
    pub note_on_at: u64,
    pub note_off_at: u64,
}

/// A fixed-size pool of voices.
pub struct VoicePool<V: Voice> {
    voices: Vec<V>,
    slots: Vec<VoiceSlot>,
    clock: u64,
    sustain: bool,
}

impl<V: Voice> VoicePool<V> {
    /// Creates a pool from the given voices. At least one voice is required.
    pub fn new(voices: Vec<V>) -> Result<VoicePool<V>, Box<dyn Error>> {
        if voices.is_empty() {
            return Err("a voice pool needs at least one voice".into());
        }

        Ok(VoicePool {
            slots: vec![VoiceSlot::default(); voices.len()],
            voices,
            clock: 0,
            sustain: false,
        })
    }

    /// Starts a note on the best available voice and returns its index.
    pub fn allocate(&mut self, note: u8, velocity: u8) -> usize {
        self.clock += 1;

        let free = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.held)
            .min_by_key(|(index, slot)| (slot.note_off_at, *index))
            .map(|(index, _)| index);

        let index = match free {
            Some(index) => index,
            None => {
                let (index, stolen) = self
                    .slots
                    .iter()
                    .enumerate()
                    .min_by_key(|(index, slot)| (slot.note_on_at, *index))
                    .map(|(index, slot)| (index, slot.sounding_note))
                    .unwrap_or((0, None));
                debug!(voice = index, stolen = ?stolen, note, "Stealing voice.");
                index
            }
        };

        let slot = &mut self.slots[index];
        slot.sounding_note = Some(note);
        slot.held = true;
        slot.sustained = false;
        slot.note_on_at = self.clock;

        debug!(voice = index, note, velocity, "Voice allocated.");
        self.voices[index].note_on(note, velocity);

        index
    }

    /// Releases every voice whose key for the given note is down. With the
    /// sustain pedal down the voices keep sounding until the pedal lifts.
    pub fn release(&mut self, note: u8) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.held || slot.sounding_note != Some(note) {
                continue;
            }

            self.clock += 1;
            slot.held = false;
            slot.note_off_at = self.clock;

            if self.sustain {
                slot.sustained = true;
                debug!(voice = index, note, "Voice sustained.");
            } else {
                self.voices[index].release();
                debug!(voice = index, note, "Voice released.");
            }
        }
    }

    /// Sets the pool-wide sustain pedal. Lifting it releases every voice
    /// whose key went up while it was down.
    pub fn sustain(&mut self, on: bool) {
        self.sustain = on;
        if on {
            return;
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.sustained && !slot.held {
                slot.sustained = false;
                self.voices[index].release();
                debug!(voice = index, note = ?slot.sounding_note, "Sustain lifted.");
            }
        }
    }

    /// Applies a setting to every voice.
    pub fn apply(&mut self, setting: Setting) {
        self.voices.iter_mut().for_each(|voice| voice.set(setting));
    }

    pub fn pitch_bend(&mut self, amount: f32) {
        self.voices
            .iter_mut()
            .for_each(|voice| voice.pitch_bend(amount));
    }

    pub fn mod_wheel(&mut self, amount: f32) {
        self.voices
            .iter_mut()
            .for_each(|voice| voice.mod_wheel(amount));
    }

    /// Returns the slot bookkeeping for the given voice.
    pub fn slot(&self, index: usize) -> Option<&VoiceSlot> {
        self.slots.get(index)
    }

    /// Returns the voice at the given index.
    #[cfg(test)]
    pub fn voice(&self, index: usize) -> Option<&V> {
        self.voices.get(index)
    }

    /// The number of voices in the pool.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// The number of voices whose key is down.
    pub fn held_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.held).count()
    }
}

impl<V: Voice> fmt::Debug for VoicePool<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoicePool")
            .field("voices", &self.voices.len())
            .field("held", &self.held_count())
            .field("sustain", &self.sustain)
            .finish()
    }
}
