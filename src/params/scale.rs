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
//! Curves that turn a raw 0-127 patch value into an engine unit, and the
//! text helpers used to display them.

/// The longest envelope stage, in milliseconds.
pub const ENV_TIME_MAX_MS: f32 = 11880.0;

/// Suffix shown when a bipolar value sits exactly on zero.
const ZERO_SUFFIX: &str = " [0]";

/// Labels for the filter modes, indexed by value.
pub const FILTER_MODE_LABELS: [&str; 7] = [
    "1:LPF12 & 2:LPF12",
    "1:LPF12 & 2:HPF12",
    "1:HPF12 & 2:LPF12",
    "1:HPF12 & 2:HPF12",
    "1:LPF12",
    "1:HPF12",
    "Bypass",
];

const BASIC_WAVEFORMS: [&str; 6] = [
    "Sawtooth",
    "Sawtooth (reverse)",
    "Square (w/shape)",
    "Sine",
    "Triangle (w/shape)",
    "Sample & hold noise",
];

const WAVETABLES: [&str; 41] = [
    "Ac. guitar 1",
    "Ac. guitar 2",
    "Ac. guitar 3",
    "Ac. guitar 4",
    "Ac. guitar 5",
    "Ac. guitar 6",
    "Alto sax 1",
    "Alto sax 2",
    "Alto sax 3",
    "Cello 1",
    "Cello 2",
    "Cello 3",
    "Clarinett 1",
    "Clarinett 2",
    "Clarinett 3",
    "Clavinet",
    "Double bass",
    "Elec. bass 1",
    "Elec. bass 2",
    "Elec. bass 3",
    "Elec. organ 1",
    "Elec. organ 2",
    "Elec. organ 3",
    "Elec. organ 4",
    "Elec. piano 1",
    "Elec. piano 2",
    "Elec. piano 3",
    "Elec. piano 4",
    "Flute 1",
    "Human voice 1",
    "Human voice 2",
    "Human voice 3",
    "Human voice 4",
    "Oboe 1",
    "Oboe 2",
    "Oboe 3",
    "Oboe 4",
    "Oboe 5",
    "Piano 1",
    "Piano 2",
    "Piano 3",
];

const SNIPPETS: usize = 46;

/// Total number of selectable waveforms.
pub const WAVEFORM_COUNT: usize = BASIC_WAVEFORMS.len() + WAVETABLES.len() + SNIPPETS;

/// 0.0..=1.0.
pub fn linear(value: u8) -> f32 {
    f32::from(value.min(127)) / 127.0
}

/// -1.0..=1.0 with 63 mapping to exactly zero.
pub fn center_zero(value: u8) -> f32 {
    let value = f32::from(value.min(127)) - 63.0;
    if value < 0.0 {
        value / 63.0
    } else {
        value / 64.0
    }
}

/// Linear, squared.
pub fn power(value: u8) -> f32 {
    linear(value).powi(2)
}

/// Envelope stage time in milliseconds.
pub fn env_time_ms(value: u8) -> f32 {
    ENV_TIME_MAX_MS * linear(value).powi(3)
}

/// LFO frequency in hertz, ten octaves up from 0.05 Hz.
pub fn lfo_hz(value: u8) -> f32 {
    0.05 * 2f32.powf(10.0 * linear(value))
}

/// Maps `0..=in_max` onto `out_min..=out_max` with integer arithmetic.
pub fn map_range(value: u8, in_max: u8, out_min: i32, out_max: i32) -> i32 {
    if in_max == 0 {
        return out_min;
    }
    i32::from(value.min(in_max)) * (out_max - out_min) / i32::from(in_max) + out_min
}

/// Octave selector, 0..=8 to -4..=4.
pub fn octave(value: u8) -> i8 {
    map_range(value, 8, -4, 4) as i8
}

/// Transpose selector, 0..=24 to -12..=12.
pub fn transpose(value: u8) -> i8 {
    map_range(value, 24, -12, 12) as i8
}

pub fn zero_suffix(value: f32) -> &'static str {
    if value == 0.0 {
        ZERO_SUFFIX
    } else {
        ""
    }
}

/// Whole percent of the linear curve.
pub fn percent(value: u8) -> String {
    format!("{:.0}%", (100.0 * linear(value)).round())
}

/// Signed percent of the center-zero curve.
pub fn signed_percent(value: u8) -> String {
    let scaled = center_zero(value);
    format!("{:+.0}%{}", (100.0 * scaled).round(), zero_suffix(scaled))
}

/// Integer percent without any curve, used when no formatter is given.
pub fn raw_percent(value: u8) -> String {
    format!("{}%", 100 * u32::from(value) / 127)
}

pub fn milliseconds(value: f32) -> String {
    format!("{:.1}ms", value)
}

pub fn hertz(value: f32) -> String {
    format!("{:.3}hz", value)
}

/// Name of the waveform at the given index.
pub fn waveform_name(value: u8) -> String {
    let index = usize::from(value);
    if let Some(name) = BASIC_WAVEFORMS.get(index) {
        return name.to_string();
    }

    let index = index - BASIC_WAVEFORMS.len();
    if let Some(name) = WAVETABLES.get(index) {
        return format!("Wave - {}", name);
    }

    let index = index - WAVETABLES.len();
    if index < SNIPPETS {
        return format!("Wave - Snippet {}", index + 1);
    }

    format!("Wave {}", value)
}

pub fn filter_mode_label(value: u8) -> String {
    FILTER_MODE_LABELS
        .get(usize::from(value))
        .map(|label| label.to_string())
        .unwrap_or_else(|| format!("Mode {}", value))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_linear_bounds() {
        assert_eq!(linear(0), 0.0);
        assert_eq!(linear(127), 1.0);
        assert_eq!(linear(200), 1.0);
    }

    #[test]
    fn test_center_zero() {
        assert_eq!(center_zero(0), -1.0);
        assert_eq!(center_zero(63), 0.0);
        assert_eq!(center_zero(127), 1.0);
        assert!(center_zero(62) < 0.0);
        assert!(center_zero(64) > 0.0);
    }

    #[test]
    fn test_power_and_times() {
        assert_eq!(power(0), 0.0);
        assert_eq!(power(127), 1.0);
        assert_eq!(env_time_ms(0), 0.0);
        assert_eq!(env_time_ms(127), ENV_TIME_MAX_MS);
        assert!((lfo_hz(0) - 0.05).abs() < 1e-6);
        assert!((lfo_hz(127) - 51.2).abs() < 1e-3);
    }

    #[test]
    fn test_integer_maps() {
        assert_eq!(octave(0), -4);
        assert_eq!(octave(4), 0);
        assert_eq!(octave(8), 4);
        assert_eq!(transpose(0), -12);
        assert_eq!(transpose(12), 0);
        assert_eq!(transpose(24), 12);
        assert_eq!(map_range(5, 0, 3, 9), 3);
    }

    #[test]
    fn test_percent_formats() {
        assert_eq!(percent(0), "0%");
        assert_eq!(percent(127), "100%");
        assert_eq!(signed_percent(63), "+0% [0]");
        assert_eq!(signed_percent(0), "-100%");
        assert_eq!(signed_percent(127), "+100%");
        assert_eq!(raw_percent(100), "78%");
    }

    #[test]
    fn test_waveform_names() {
        assert_eq!(WAVEFORM_COUNT, 93);
        assert_eq!(waveform_name(0), "Sawtooth");
        assert_eq!(waveform_name(6), "Wave - Ac. guitar 1");
        assert_eq!(waveform_name(46), "Wave - Piano 3");
        assert_eq!(waveform_name(47), "Wave - Snippet 1");
        assert_eq!(waveform_name(92), "Wave - Snippet 46");
        assert_eq!(waveform_name(93), "Wave 93");
    }

    #[test]
    fn test_filter_mode_labels() {
        assert_eq!(filter_mode_label(0), "1:LPF12 & 2:LPF12");
        assert_eq!(filter_mode_label(6), "Bypass");
        assert_eq!(filter_mode_label(7), "Mode 7");
    }
}
