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
/// A single engine setting, already scaled from its raw 0-127 patch value
/// into the unit the engine works in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    /// Milliseconds.
    Env1Attack(f32),
    /// Milliseconds.
    Env1Decay(f32),
    /// Level, 0.0..=1.0.
    Env1Sustain(f32),
    /// Milliseconds.
    Env1Release(f32),
    Env2Attack(f32),
    Env2Decay(f32),
    Env2Sustain(f32),
    Env2Release(f32),
    /// -1.0..=1.0 around the keyboard tracked cutoff.
    Filter1Frequency(f32),
    Filter1Resonance(f32),
    Filter1KbdTrack(f32),
    Filter1KbdVelocity(f32),
    Filter1Env2(f32),
    Filter1Lfo(f32),
    /// Index into the filter mode labels.
    FilterMode(u8),
    Filter2FrequencyOffset(f32),
    /// Hertz.
    LfoFrequency(f32),
    LfoShape(f32),
    /// Index into the waveform table.
    LfoWaveform(u8),
    /// Milliseconds.
    LfoAttack(f32),
    OscVolumeMix(f32),
    Osc1Waveform(u8),
    Osc1Wavefold(f32),
    Osc1Shape(f32),
    /// Semitones.
    Osc1Transpose(i8),
    /// Cents.
    Osc1Detune(f32),
    Osc1ModFrequencyEnv2(f32),
    Osc1ModFrequencyLfo(f32),
    Osc1ModShapeEnv2(f32),
    Osc1ModShapeLfo(f32),
    Osc1ModWavefoldEnv2(f32),
    Osc1UnisonDetune(f32),
    Osc1UnisonMix(f32),
    OscFmWaveform(u8),
    /// Octaves.
    OscFmOctave(i8),
    /// Semitones.
    OscFmTranspose(i8),
    OscFmPhaseMod(f32),
    OscFmModPhaseEnv2(f32),
    WaveshapeLevel(f32),
    /// Semitones covered by a full pitch bend.
    PitchChangeRange(u8),
    EnsembleMix(f32),
    /// Hertz.
    EnsembleLfoRate(f32),
    AmpModLfo(f32),
    AmpKbdVelocity(f32),
    EnvReverse(f32),
}
