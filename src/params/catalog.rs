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
use crate::{
    controller::layout::{
        DECREMENT as REC_ARM, DIAL_1, DIAL_2, DIAL_3, INCREMENT as MUTE, MASTER_SLIDER, SLIDER,
    },
    engine::Setting,
};

use super::{scale, Descriptor};

const ENV_1: &str = "Envelope 1";
const ENV_2: &str = "Envelope 2";
const FILTER: &str = "Filters";
const FILTER_MOD: &str = "Filter modulation";
const LFO: &str = "LFO";
const LFO_MOD: &str = "LFO modulation";
const OSC_1: &str = "Oscillator 1";
const OSC_1_MOD: &str = "Osc. 1 modulation";
const OSC_FM: &str = "Oscillator FM";
const OSC_FM_MOD: &str = "Osc. FM modulation";
const AMP_MOD: &str = "Amplifier modulation";
const MISC: &str = "Miscellaneous";
const MOD_WHEEL: &str = "Modulation wheel";

const WAVEFORM_MAX: u8 = (scale::WAVEFORM_COUNT - 1) as u8;

fn env_time(value: u8) -> String {
    scale::milliseconds(scale::env_time_ms(value))
}

fn lfo_rate(value: u8) -> String {
    scale::hertz(scale::lfo_hz(value))
}

fn filter_frequency(value: u8) -> String {
    format!("{:+.1} semitones", 96.0 * scale::linear(value) - 24.0)
}

fn filter_offset(value: u8) -> String {
    let scaled = scale::center_zero(value);
    format!("{:+.1} semitones{}", 48.0 * scaled, scale::zero_suffix(scaled))
}

fn detune(value: u8) -> String {
    let scaled = scale::center_zero(value);
    format!("{:+.0} cents{}", (50.0 * scaled).round(), scale::zero_suffix(scaled))
}

fn volume_mix(value: u8) -> String {
    let mix = scale::linear(value);
    format!(
        "1: {:.0}% 2: {:.0}%",
        (100.0 - 100.0 * mix).round(),
        (100.0 * mix).round()
    )
}

fn octaves(value: u8) -> String {
    format!("{:+} octaves", scale::octave(value))
}

fn transpose(value: u8) -> String {
    format!("{:+} semitones", scale::transpose(value))
}

fn semitones(value: u8) -> String {
    format!("{} semitones", value)
}

/// The synthesizer's parameter set, bound to the MIDImix default layout.
pub(super) fn descriptors() -> Vec<Descriptor> {
    vec![
        // Envelope 1
        Descriptor::new(0, ENV_1, "Attack", 0, 127, |v| {
            Setting::Env1Attack(scale::env_time_ms(v))
        })
        .with_external_cc(73)
        .with_controller_cc(SLIDER[0])
        .with_format(env_time),
        Descriptor::new(1, ENV_1, "Decay", 50, 127, |v| {
            Setting::Env1Decay(scale::env_time_ms(v))
        })
        .with_external_cc(75)
        .with_controller_cc(SLIDER[1])
        .with_format(env_time),
        Descriptor::new(2, ENV_1, "Sustain", 100, 127, |v| {
            Setting::Env1Sustain(scale::power(v))
        })
        .with_external_cc(79)
        .with_controller_cc(SLIDER[2]),
        Descriptor::new(3, ENV_1, "Release", 50, 127, |v| {
            Setting::Env1Release(scale::env_time_ms(v))
        })
        .with_external_cc(72)
        .with_controller_cc(SLIDER[3])
        .with_format(env_time),
        // Envelope 2
        Descriptor::new(100, ENV_2, "Attack", 0, 127, |v| {
            Setting::Env2Attack(scale::env_time_ms(v))
        })
        .with_external_cc(16)
        .with_controller_cc(SLIDER[4])
        .with_format(env_time),
        Descriptor::new(101, ENV_2, "Decay", 50, 127, |v| {
            Setting::Env2Decay(scale::env_time_ms(v))
        })
        .with_external_cc(17)
        .with_controller_cc(SLIDER[5])
        .with_format(env_time),
        Descriptor::new(102, ENV_2, "Sustain", 100, 127, |v| {
            Setting::Env2Sustain(scale::power(v))
        })
        .with_external_cc(18)
        .with_controller_cc(SLIDER[6]),
        Descriptor::new(103, ENV_2, "Release", 50, 127, |v| {
            Setting::Env2Release(scale::env_time_ms(v))
        })
        .with_external_cc(19)
        .with_controller_cc(SLIDER[7])
        .with_format(env_time),
        // Filters
        Descriptor::new(200, FILTER, "Frequency", 96, 127, |v| {
            Setting::Filter1Frequency(scale::linear(v) * 2.0 - 1.0)
        })
        .with_external_cc(74)
        .with_controller_cc(MASTER_SLIDER)
        .with_format(filter_frequency),
        Descriptor::new(201, FILTER, "Resonance", 40, 127, |v| {
            Setting::Filter1Resonance(scale::linear(v))
        })
        .with_external_cc(71)
        .with_controller_cc(DIAL_3[7])
        .with_format(scale::percent),
        Descriptor::new(202, FILTER, "Keyboard tracking", 127, 127, |v| {
            Setting::Filter1KbdTrack(scale::center_zero(v))
        })
        .with_menu_address(1)
        .with_external_cc(20)
        .with_format(scale::signed_percent),
        Descriptor::new(203, FILTER_MOD, "Keyboard velocity", 63, 127, |v| {
            Setting::Filter1KbdVelocity(scale::center_zero(v))
        })
        .with_external_cc(21)
        .with_controller_cc(DIAL_1[7])
        .with_format(scale::signed_percent),
        Descriptor::new(205, FILTER_MOD, "Envelope 2", 63, 127, |v| {
            Setting::Filter1Env2(scale::center_zero(v))
        })
        .with_external_cc(22)
        .with_controller_cc(DIAL_1[5])
        .with_format(scale::signed_percent),
        Descriptor::new(206, FILTER_MOD, "LFO", 0, 127, |v| {
            Setting::Filter1Lfo(scale::linear(v))
        })
        .with_external_cc(23)
        .with_controller_cc(DIAL_1[6])
        .with_format(scale::percent),
        Descriptor::new(207, FILTER, "Mode", 0, 6, Setting::FilterMode)
            .with_external_cc(24)
            .with_buttons(MUTE[3], REC_ARM[3])
            .with_format(scale::filter_mode_label),
        Descriptor::new(1200, FILTER, "Filter 2 freq. offset", 63, 127, |v| {
            Setting::Filter2FrequencyOffset(scale::center_zero(v))
        })
        .with_external_cc(84)
        .with_controller_cc(DIAL_2[7])
        .with_format(filter_offset),
        // LFO
        Descriptor::new(300, LFO, "Frequency", 63, 127, |v| {
            Setting::LfoFrequency(scale::lfo_hz(v))
        })
        .with_external_cc(76)
        .with_controller_cc(DIAL_1[4])
        .with_format(lfo_rate),
        Descriptor::new(301, LFO, "Shape", 63, 127, |v| {
            Setting::LfoShape(scale::center_zero(v))
        })
        .with_external_cc(25)
        .with_controller_cc(DIAL_2[4])
        .with_format(scale::signed_percent),
        Descriptor::new(302, LFO, "Waveform", 4, WAVEFORM_MAX, Setting::LfoWaveform)
            .with_external_cc(26)
            .with_buttons(MUTE[4], REC_ARM[4])
            .with_format(scale::waveform_name),
        Descriptor::new(303, LFO_MOD, "Attack", 0, 127, |v| {
            Setting::LfoAttack(scale::env_time_ms(v))
        })
        .with_external_cc(78)
        .with_controller_cc(DIAL_3[4])
        .with_format(env_time),
        // Oscillators
        Descriptor::new(1302, MISC, "Osc. volume mix", 0, 127, |v| {
            Setting::OscVolumeMix(scale::linear(v))
        })
        .with_external_cc(106)
        .with_controller_cc(DIAL_1[0])
        .with_format(volume_mix),
        Descriptor::new(501, OSC_1, "Waveform", 0, WAVEFORM_MAX, Setting::Osc1Waveform)
            .with_external_cc(27)
            .with_buttons(MUTE[0], REC_ARM[0])
            .with_format(scale::waveform_name),
        Descriptor::new(901, OSC_FM, "Waveform", 3, WAVEFORM_MAX, Setting::OscFmWaveform)
            .with_external_cc(88)
            .with_buttons(MUTE[5], REC_ARM[5])
            .with_format(scale::waveform_name),
        Descriptor::new(502, OSC_1, "Wavefold", 0, 127, |v| {
            Setting::Osc1Wavefold(scale::linear(v))
        })
        .with_external_cc(28)
        .with_controller_cc(DIAL_3[1])
        .with_format(scale::percent),
        Descriptor::new(503, OSC_1, "Shape", 63, 127, |v| {
            Setting::Osc1Shape(scale::center_zero(v))
        })
        .with_external_cc(29)
        .with_controller_cc(DIAL_2[1])
        .with_format(scale::signed_percent),
        Descriptor::new(904, OSC_FM, "Octave", 4, 8, |v| {
            Setting::OscFmOctave(scale::octave(v))
        })
        .with_external_cc(89)
        .with_buttons(MUTE[6], REC_ARM[6])
        .with_format(octaves),
        Descriptor::new(505, OSC_1, "Transpose", 12, 24, |v| {
            Setting::Osc1Transpose(scale::transpose(v))
        })
        .with_external_cc(30)
        .with_buttons(MUTE[1], REC_ARM[1])
        .with_format(transpose),
        Descriptor::new(905, OSC_FM, "Transpose", 12, 24, |v| {
            Setting::OscFmTranspose(scale::transpose(v))
        })
        .with_external_cc(90)
        .with_buttons(MUTE[7], REC_ARM[7])
        .with_format(transpose),
        Descriptor::new(506, OSC_1, "Detune", 63, 127, |v| {
            Setting::Osc1Detune(50.0 * scale::center_zero(v))
        })
        .with_external_cc(31)
        .with_controller_cc(DIAL_1[1])
        .with_format(detune),
        // Oscillator modulation
        Descriptor::new(601, OSC_1_MOD, "Frequency env. 2", 63, 127, |v| {
            Setting::Osc1ModFrequencyEnv2(scale::center_zero(v))
        })
        .with_external_cc(80)
        .with_controller_cc(DIAL_1[2])
        .with_format(scale::signed_percent),
        Descriptor::new(602, OSC_1_MOD, "Frequency LFO", 0, 127, |v| {
            Setting::Osc1ModFrequencyLfo(scale::linear(v))
        })
        .with_external_cc(81)
        .with_controller_cc(DIAL_1[3])
        .with_format(scale::percent),
        Descriptor::new(604, OSC_1_MOD, "Shape env. 2", 63, 127, |v| {
            Setting::Osc1ModShapeEnv2(scale::center_zero(v))
        })
        .with_external_cc(82)
        .with_controller_cc(DIAL_2[2])
        .with_format(scale::signed_percent),
        Descriptor::new(605, OSC_1_MOD, "Shape LFO", 0, 127, |v| {
            Setting::Osc1ModShapeLfo(scale::linear(v))
        })
        .with_external_cc(83)
        .with_controller_cc(DIAL_2[3])
        .with_format(scale::percent),
        Descriptor::new(607, OSC_1_MOD, "Wavefold env. 2", 63, 127, |v| {
            Setting::Osc1ModWavefoldEnv2(scale::center_zero(v))
        })
        .with_external_cc(85)
        .with_format(scale::signed_percent),
        Descriptor::new(609, OSC_1, "Unison detune", 51, 127, |v| {
            Setting::Osc1UnisonDetune(scale::linear(v))
        })
        .with_external_cc(86)
        .with_controller_cc(DIAL_2[0])
        .with_format(scale::percent),
        Descriptor::new(610, OSC_1, "Unison mix", 0, 127, |v| {
            Setting::Osc1UnisonMix(scale::linear(v))
        })
        .with_external_cc(87)
        .with_controller_cc(DIAL_3[0])
        .with_format(scale::percent),
        Descriptor::new(1011, OSC_FM_MOD, "Phase env. 2", 0, 127, |v| {
            Setting::OscFmModPhaseEnv2(scale::linear(v))
        })
        .with_external_cc(102)
        .with_controller_cc(DIAL_3[5])
        .with_format(scale::percent),
        Descriptor::new(1013, OSC_FM, "Phase modulation", 0, 127, |v| {
            Setting::OscFmPhaseMod(scale::linear(v))
        })
        .with_external_cc(103)
        .with_controller_cc(DIAL_2[5])
        .with_format(scale::percent),
        // Miscellaneous
        Descriptor::new(1300, MISC, "Waveshape level", 0, 127, |v| {
            Setting::WaveshapeLevel(scale::linear(v))
        })
        .with_external_cc(104)
        .with_controller_cc(DIAL_3[2])
        .with_format(scale::percent),
        Descriptor::new(1301, MISC, "Pitch change range", 2, 12, Setting::PitchChangeRange)
            .with_external_cc(105)
            .with_buttons(MUTE[2], REC_ARM[2])
            .with_format(semitones),
        Descriptor::new(1303, MISC, "Ensemble mix", 0, 127, |v| {
            Setting::EnsembleMix(scale::linear(v))
        })
        .with_external_cc(93)
        .with_controller_cc(DIAL_3[6])
        .with_format(scale::percent),
        Descriptor::new(1304, MISC, "Ensemble LFO rate", 63, 127, |v| {
            Setting::EnsembleLfoRate(scale::lfo_hz(v))
        })
        .with_external_cc(94)
        .with_controller_cc(DIAL_2[6])
        .with_format(lfo_rate),
        // Amplifier
        Descriptor::new(1400, AMP_MOD, "Volume LFO", 0, 127, |v| {
            Setting::AmpModLfo(scale::linear(v))
        })
        .with_external_cc(92)
        .with_controller_cc(DIAL_3[3])
        .with_format(scale::percent),
        Descriptor::new(1401, AMP_MOD, "Keyboard velocity", 64, 127, |v| {
            Setting::AmpKbdVelocity(scale::linear(v))
        })
        .with_menu_address(2)
        .with_external_cc(95)
        .with_format(scale::percent),
        // Modulation wheel
        Descriptor::new(1500, MOD_WHEEL, "ENV reverse", 0, 127, |v| {
            Setting::EnvReverse(scale::linear(v))
        })
        .with_menu_address(0)
        .with_external_cc(107)
        .with_format(scale::percent),
    ]
}
