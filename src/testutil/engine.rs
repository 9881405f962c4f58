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
use crate::engine::{Engine, Setting};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Set(Setting),
    NoteOn(u8, u8),
    NoteOff(u8),
    Sustain(bool),
    PitchBend(f32),
    ModWheel(f32),
}

/// An engine that remembers everything pushed into it.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    events: Vec<EngineEvent>,
}

impl RecordingEngine {
    pub fn new() -> RecordingEngine {
        RecordingEngine::default()
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&EngineEvent> {
        self.events.last()
    }

    pub fn settings(&self) -> Vec<Setting> {
        self.events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Set(setting) => Some(*setting),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Engine for RecordingEngine {
    fn set(&mut self, setting: Setting) {
        self.events.push(EngineEvent::Set(setting));
    }

    fn note_on(&mut self, note: u8, velocity: u8) {
        self.events.push(EngineEvent::NoteOn(note, velocity));
    }

    fn note_off(&mut self, note: u8) {
        self.events.push(EngineEvent::NoteOff(note));
    }

    fn sustain(&mut self, on: bool) {
        self.events.push(EngineEvent::Sustain(on));
    }

    fn pitch_bend(&mut self, amount: f32) {
        self.events.push(EngineEvent::PitchBend(amount));
    }

    fn mod_wheel(&mut self, amount: f32) {
        self.events.push(EngineEvent::ModWheel(amount));
    }
}
