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
use std::{collections::HashMap, error::Error, mem::Discriminant};

use tracing::{debug, trace};

use super::{Engine, Setting, Voice, VoicePool};

/// A headless engine: keeps the latest value of every setting and routes
/// notes through a voice pool.
pub struct Synth<V: Voice> {
    pool: VoicePool<V>,
    settings: HashMap<Discriminant<Setting>, Setting>,
    sustain: bool,
    pitch_bend: f32,
    mod_wheel: f32,
}

impl<V: Voice> Synth<V> {
    /// Creates a synth around the given voices.
    pub fn new(voices: Vec<V>) -> Result<Synth<V>, Box<dyn Error>> {
        Ok(Synth {
            pool: VoicePool::new(voices)?,
            settings: HashMap::new(),
            sustain: false,
            pitch_bend: 0.0,
            mod_wheel: 0.0,
        })
    }

    /// Returns the last value pushed for the kind of setting given.
    pub fn setting(&self, kind: &Setting) -> Option<Setting> {
        self.settings.get(&std::mem::discriminant(kind)).copied()
    }

    pub fn pool(&self) -> &VoicePool<V> {
        &self.pool
    }

    pub fn is_sustained(&self) -> bool {
        self.sustain
    }

    pub fn current_pitch_bend(&self) -> f32 {
        self.pitch_bend
    }

    pub fn current_mod_wheel(&self) -> f32 {
        self.mod_wheel
    }
}

impl<V: Voice> Engine for Synth<V> {
    fn set(&mut self, setting: Setting) {
        trace!(setting = ?setting, "Applying setting.");
        self.settings
            .insert(std::mem::discriminant(&setting), setting);
        self.pool.apply(setting);
    }

    fn note_on(&mut self, note: u8, velocity: u8) {
        self.pool.allocate(note, velocity);
    }

    fn note_off(&mut self, note: u8) {
        self.pool.release(note);
    }

    fn sustain(&mut self, on: bool) {
        debug!(on, "Sustain.");
        self.sustain = on;
        self.pool.sustain(on);
    }

    fn pitch_bend(&mut self, amount: f32) {
        self.pitch_bend = amount;
        self.pool.pitch_bend(amount);
    }

    fn mod_wheel(&mut self, amount: f32) {
        self.mod_wheel = amount;
        self.pool.mod_wheel(amount);
    }
}

/// A voice with no audio path that reports what it is asked to do.
pub struct LogVoice {
    index: usize,
}

impl LogVoice {
    pub fn new(index: usize) -> LogVoice {
        LogVoice { index }
    }

    /// Creates `count` voices.
    pub fn bank(count: usize) -> Vec<LogVoice> {
        (0..count).map(LogVoice::new).collect()
    }
}

impl Voice for LogVoice {
    fn note_on(&mut self, note: u8, velocity: u8) {
        debug!(voice = self.index, note, velocity, "Note on.");
    }

    fn release(&mut self) {
        debug!(voice = self.index, "Release.");
    }

    fn set(&mut self, setting: Setting) {
        trace!(voice = self.index, setting = ?setting, "Set.");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_settings_keep_latest_value() {
        let mut synth = Synth::new(LogVoice::bank(2)).unwrap();
        synth.set(Setting::FilterMode(2));
        synth.set(Setting::Env1Attack(10.0));
        synth.set(Setting::FilterMode(5));

        assert_eq!(
            synth.setting(&Setting::FilterMode(0)),
            Some(Setting::FilterMode(5))
        );
        assert_eq!(
            synth.setting(&Setting::Env1Attack(0.0)),
            Some(Setting::Env1Attack(10.0))
        );
        assert_eq!(synth.setting(&Setting::LfoWaveform(0)), None);
    }

    #[test]
    fn test_notes_routed_to_pool() {
        let mut synth = Synth::new(LogVoice::bank(2)).unwrap();
        synth.note_on(60, 100);
        synth.note_on(64, 100);
        assert_eq!(synth.pool().held_count(), 2);

        synth.sustain(true);
        synth.note_off(60);
        assert_eq!(synth.pool().held_count(), 1);
        assert!(synth.pool().slot(0).unwrap().sustained);

        synth.sustain(false);
        assert!(!synth.is_sustained());
        assert!(!synth.pool().slot(0).unwrap().sustained);
    }

    #[test]
    fn test_performance_controls() {
        let mut synth = Synth::new(LogVoice::bank(1)).unwrap();
        synth.pitch_bend(-1.0);
        synth.mod_wheel(0.5);
        assert_eq!(synth.current_pitch_bend(), -1.0);
        assert_eq!(synth.current_mod_wheel(), 0.5);
    }
}
