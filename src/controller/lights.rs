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
use super::layout::{LOAD, SAVE};

/// Blink every fourth tick.
const SLOW_DIVISOR: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Off,
    On,
    BlinkSlow,
    BlinkFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLight {
    Load,
    Save,
}

#[derive(Debug)]
struct Light {
    note: u8,
    state: LightState,
    lit: bool,
}

impl Light {
    fn new(note: u8) -> Light {
        Light {
            note,
            state: LightState::Off,
            lit: false,
        }
    }

    fn show(&mut self, lit: bool, changes: &mut Vec<(u8, bool)>) {
        self.lit = lit;
        changes.push((self.note, lit));
    }
}

/// The load and save status lights. Changes come back as `(note, lit)` pairs
/// for the caller to send to the controller.
#[derive(Debug)]
pub struct StatusLights {
    load: Light,
    save: Light,
    counter: u64,
}

impl StatusLights {
    pub fn new() -> StatusLights {
        StatusLights {
            load: Light::new(LOAD),
            save: Light::new(SAVE),
            counter: 0,
        }
    }

    fn light_mut(&mut self, light: StatusLight) -> &mut Light {
        match light {
            StatusLight::Load => &mut self.load,
            StatusLight::Save => &mut self.save,
        }
    }

    fn light(&self, light: StatusLight) -> &Light {
        match light {
            StatusLight::Load => &self.load,
            StatusLight::Save => &self.save,
        }
    }

    /// Changes a light's state. The light is latched right away: on for every
    /// state but `Off`.
    pub fn set(&mut self, light: StatusLight, state: LightState) -> Vec<(u8, bool)> {
        let mut changes = Vec::with_capacity(1);
        let light = self.light_mut(light);
        light.state = state;
        light.show(state != LightState::Off, &mut changes);
        changes
    }

    pub fn state(&self, light: StatusLight) -> LightState {
        self.light(light).state
    }

    pub fn is_lit(&self, light: StatusLight) -> bool {
        self.light(light).lit
    }

    /// Advances the blink counter by one tick.
    pub fn tick(&mut self) -> Vec<(u8, bool)> {
        let mut changes = Vec::new();
        let slow = self.counter % SLOW_DIVISOR == 0;
        for light in [&mut self.load, &mut self.save] {
            match light.state {
                LightState::Off if light.lit => light.show(false, &mut changes),
                LightState::On if !light.lit => light.show(true, &mut changes),
                LightState::BlinkFast => light.show(!light.lit, &mut changes),
                LightState::BlinkSlow if slow => light.show(!light.lit, &mut changes),
                _ => {}
            }
        }
        self.counter += 1;
        changes
    }
}

impl Default for StatusLights {
    fn default() -> Self {
        StatusLights::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_latches_immediately() {
        let mut lights = StatusLights::new();
        assert_eq!(lights.set(StatusLight::Load, LightState::BlinkSlow), vec![(25, true)]);
        assert!(lights.is_lit(StatusLight::Load));
        assert_eq!(lights.set(StatusLight::Save, LightState::On), vec![(26, true)]);
        assert_eq!(lights.set(StatusLight::Save, LightState::Off), vec![(26, false)]);
        assert!(!lights.is_lit(StatusLight::Save));
    }

    #[test]
    fn steady_lights_are_quiet() {
        let mut lights = StatusLights::new();
        lights.set(StatusLight::Load, LightState::On);
        for _ in 0..10 {
            assert!(lights.tick().is_empty());
        }
        assert!(lights.is_lit(StatusLight::Load));
        assert!(!lights.is_lit(StatusLight::Save));
    }

    #[test]
    fn fast_blink_toggles_every_tick() {
        let mut lights = StatusLights::new();
        lights.set(StatusLight::Save, LightState::BlinkFast);
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.extend(lights.tick());
        }
        assert_eq!(seen, vec![(26, false), (26, true), (26, false), (26, true)]);
    }

    #[test]
    fn slow_blink_toggles_every_fourth_tick() {
        let mut lights = StatusLights::new();
        lights.set(StatusLight::Load, LightState::BlinkSlow);
        let toggles: Vec<usize> = (0..12)
            .filter(|_| !lights.tick().is_empty())
            .collect();
        assert_eq!(toggles, vec![0, 4, 8]);
        assert!(!lights.is_lit(StatusLight::Load));
    }

    #[test]
    fn both_lights_blink_together() {
        let mut lights = StatusLights::new();
        lights.set(StatusLight::Load, LightState::BlinkSlow);
        lights.set(StatusLight::Save, LightState::BlinkSlow);
        assert_eq!(lights.tick(), vec![(25, false), (26, false)]);
        assert_eq!(lights.state(StatusLight::Save), LightState::BlinkSlow);
    }
}
