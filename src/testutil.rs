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
//! Helpers shared by the tests.

mod engine;
mod polling;

pub use engine::{EngineEvent, RecordingEngine};
pub use polling::eventually;

/// Builders for the MIDI events the tests feed in.
pub mod events {
    use midly::{live::LiveEvent, MidiMessage, PitchBend};

    fn midi(message: MidiMessage) -> LiveEvent<'static> {
        LiveEvent::Midi {
            channel: 0.into(),
            message,
        }
    }

    pub fn note_on(key: u8, vel: u8) -> LiveEvent<'static> {
        midi(MidiMessage::NoteOn {
            key: key.into(),
            vel: vel.into(),
        })
    }

    pub fn note_off(key: u8) -> LiveEvent<'static> {
        midi(MidiMessage::NoteOff {
            key: key.into(),
            vel: 0.into(),
        })
    }

    pub fn cc(controller: u8, value: u8) -> LiveEvent<'static> {
        midi(MidiMessage::Controller {
            controller: controller.into(),
            value: value.into(),
        })
    }

    pub fn program(program: u8) -> LiveEvent<'static> {
        midi(MidiMessage::ProgramChange {
            program: program.into(),
        })
    }

    pub fn bend(amount: i16) -> LiveEvent<'static> {
        midi(MidiMessage::PitchBend {
            bend: PitchBend::from_int(amount),
        })
    }

    /// Serializes an event the way it would arrive from a port.
    pub fn raw(event: LiveEvent<'static>) -> Vec<u8> {
        let mut buf = Vec::with_capacity(3);
        event.write(&mut buf).expect("unable to write event");
        buf
    }

    /// Whether the last note-on sent for `note` lit it.
    pub fn is_lit(emitted: &[Vec<u8>], note: u8) -> bool {
        emitted
            .iter()
            .rev()
            .find(|event| event.len() == 3 && event[0] & 0xF0 == 0x90 && event[1] == note)
            .map(|event| event[2] > 0)
            .unwrap_or(false)
    }
}
