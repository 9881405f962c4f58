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
use std::{sync::Arc, time::Duration};

use midly::{live::LiveEvent, num::u4, MidiMessage};
use tracing::{debug, error, info, warn};

use crate::{
    display::Display,
    engine::Engine,
    midi::Device,
    params::{Descriptor, Registry},
    patch::{self, Patch, PatchStore, SLOTS},
};

use super::{
    layout::{Button, CONTROL_NOTE_MAX, MASTER_SLIDER, MOD_WHEEL_CC, NOTE_MAX, SUSTAIN_CC},
    lights::{LightState, StatusLight, StatusLights},
    repeat::Repeat,
};

/// Which port an event came in on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Controller,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Play,
    LoadSelect,
    SaveSelect,
    SaveName,
    Menu,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Play => "Play",
            Mode::LoadSelect => "Load",
            Mode::SaveSelect => "Save",
            Mode::SaveName => "Name",
            Mode::Menu => "Menu",
        }
    }

    fn is_patch_flow(&self) -> bool {
        matches!(self, Mode::LoadSelect | Mode::SaveSelect | Mode::SaveName)
    }
}

/// Runtime knobs for the surface.
#[derive(Debug, Clone)]
pub struct Options {
    /// Zero-based channel for everything sent out.
    pub channel: u8,
    /// Arms the erase-everything gesture.
    pub factory_reset: bool,
    pub repeat_interval: Duration,
    pub repeat_delay: Duration,
    pub repeat_fast_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            channel: 0,
            factory_reset: false,
            repeat_interval: Duration::from_millis(50),
            repeat_delay: Duration::from_secs(1),
            repeat_fast_delay: Duration::from_secs(5),
        }
    }
}

/// The control surface state machine. Owns the current patch and the engine,
/// and turns controller and external MIDI into parameter changes, patch
/// loads and saves, light feedback and display updates.
pub struct ControlSurface<E: Engine> {
    engine: E,
    registry: Arc<Registry>,
    store: PatchStore,
    display: Arc<dyn Display>,
    controller: Arc<dyn Device>,
    external: Option<Arc<dyn Device>>,
    channel: u4,
    factory_reset: bool,

    mode: Mode,
    digit1: u8,
    digit2: u8,
    menu_index: u8,
    patch: Patch,
    number: u8,
    lights: StatusLights,
    repeat: Repeat,
    decrement_held: [bool; 8],
}

impl<E: Engine> ControlSurface<E> {
    pub fn new(
        engine: E,
        registry: Arc<Registry>,
        store: PatchStore,
        display: Arc<dyn Display>,
        controller: Arc<dyn Device>,
        external: Option<Arc<dyn Device>>,
        options: Options,
    ) -> ControlSurface<E> {
        let patch = Patch::init(&registry);
        ControlSurface {
            engine,
            registry,
            store,
            display,
            controller,
            external,
            channel: options.channel.into(),
            factory_reset: options.factory_reset,
            mode: Mode::Play,
            digit1: 0,
            digit2: 0,
            menu_index: 0,
            patch,
            number: 0,
            lights: StatusLights::new(),
            repeat: Repeat::new(
                options.repeat_interval,
                options.repeat_delay,
                options.repeat_fast_delay,
            ),
            decrement_held: [false; 8],
        }
    }

    /// Darkens the controller, loads patch 0 into the engine and enters play.
    pub fn start(&mut self) {
        self.set_status_light(StatusLight::Load, LightState::Off);
        self.set_status_light(StatusLight::Save, LightState::Off);
        self.set_all_value_lights(false);

        self.patch = self.store.load(self.number);
        self.apply_patch();
        self.enter_play();

        info!(
            patch = self.number,
            name = %self.patch.name(),
            "Control surface started."
        );
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Handles one inbound event. Anything the surface does not use is dropped.
    pub fn handle(&mut self, origin: Origin, event: LiveEvent<'_>) {
        let message = match event {
            LiveEvent::Midi { message, .. } => message,
            _ => return,
        };

        match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                self.note_on(origin, key.as_int(), vel.as_int())
            }
            MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                self.note_off(origin, key.as_int())
            }
            MidiMessage::Controller { controller, value } => {
                self.control_change(origin, controller.as_int(), value.as_int())
            }
            MidiMessage::PitchBend { bend } => self.pitch_bend(bend.as_int()),
            MidiMessage::ProgramChange { program } => {
                self.program_change(origin, program.as_int())
            }
            _ => {}
        }
    }

    /// Advances the status light blink.
    pub fn tick_lights(&mut self) {
        for (note, lit) in self.lights.tick() {
            self.send_light(note, lit);
        }
    }

    /// Advances the button repeat, firing the held button again when due.
    pub fn tick_repeat(&mut self) {
        if let Some(note) = self.repeat.tick() {
            self.controller_note_on(note, true);
        }
    }

    fn note_on(&mut self, origin: Origin, note: u8, velocity: u8) {
        if origin == Origin::Controller && self.controller_note_on(note, false) {
            return;
        }
        if note <= NOTE_MAX {
            self.engine.note_on(note, velocity);
        }
    }

    fn note_off(&mut self, origin: Origin, note: u8) {
        if origin == Origin::Controller {
            match Button::from_note(note) {
                Some(Button::Decrement(n)) => {
                    self.decrement_held[usize::from(n - 1)] = false;
                    self.repeat.release();
                }
                Some(Button::Increment(_)) => self.repeat.release(),
                _ => {}
            }
        }
        self.engine.note_off(note);
    }

    /// Runs a controller button through the current mode. Returns false when
    /// the note is not a surface action and should be played instead.
    fn controller_note_on(&mut self, note: u8, repeat: bool) -> bool {
        let button = Button::from_note(note);

        if !repeat {
            if let Some(Button::Decrement(n)) = button {
                self.decrement_held[usize::from(n - 1)] = true;
                if self.decrement_held.iter().all(|held| *held) && self.erase_all_patches() {
                    return true;
                }
            }
            if let Some(Button::Increment(_) | Button::Decrement(_)) = button {
                self.repeat.press(note);
            }
        }

        match (self.mode, button) {
            (Mode::Menu, Some(Button::Menu)) => {
                self.enter_play();
                return true;
            }
            (Mode::Menu, Some(Button::Increment(n))) => {
                self.select_menu_param(n - 1);
                return true;
            }
            (Mode::Menu, Some(Button::Decrement(n))) => {
                self.select_menu_param(n + 7);
                return true;
            }
            (Mode::LoadSelect, Some(Button::Load)) => {
                self.enter_play();
                return true;
            }
            (Mode::LoadSelect, Some(Button::Increment(n))) => {
                self.select_digit1(n);
                self.load_selected();
                return true;
            }
            (Mode::LoadSelect, Some(Button::Decrement(n))) => {
                self.select_digit2(n);
                self.load_selected();
                return true;
            }
            (Mode::SaveSelect, Some(Button::Save)) => {
                self.enter_save_name();
                return true;
            }
            (Mode::SaveSelect, Some(Button::Load | Button::Menu)) => {
                self.enter_play();
                return true;
            }
            (Mode::SaveSelect, Some(Button::Increment(n))) => {
                self.select_digit1(n);
                self.display
                    .show_patch_number(patch::digits_to_number(self.digit1, self.digit2));
                return true;
            }
            (Mode::SaveSelect, Some(Button::Decrement(n))) => {
                self.select_digit2(n);
                self.display
                    .show_patch_number(patch::digits_to_number(self.digit1, self.digit2));
                return true;
            }
            (Mode::SaveName, Some(Button::Save)) => {
                self.save_selected();
                self.enter_play();
                return true;
            }
            (Mode::SaveName, Some(Button::Increment(n))) => {
                self.patch.increment_name_char(usize::from(n - 1));
                self.display.show_patch_name(&self.patch);
                return true;
            }
            (Mode::SaveName, Some(Button::Decrement(n))) => {
                self.patch.decrement_name_char(usize::from(n - 1));
                self.display.show_patch_name(&self.patch);
                return true;
            }
            _ => {}
        }

        // Mode buttons always pass through play first to reset the display.
        match button {
            Some(Button::Load) => {
                self.enter_play();
                self.enter_load_select();
                return true;
            }
            Some(Button::Save) => {
                self.enter_play();
                self.enter_save_select();
                return true;
            }
            Some(Button::Menu) => {
                self.enter_play();
                self.enter_menu();
                return true;
            }
            _ => {}
        }

        if note <= CONTROL_NOTE_MAX && self.mode.is_patch_flow() {
            self.enter_play();
        }

        let registry = self.registry.clone();
        let (descriptor, delta) = if let Some(descriptor) = registry.by_increment_note(note) {
            (descriptor, 1)
        } else if let Some(descriptor) = registry.by_decrement_note(note) {
            (descriptor, -1)
        } else {
            return false;
        };

        let value = self
            .patch
            .increment(descriptor.id(), delta, descriptor.max());
        self.dispatch(descriptor, value);
        true
    }

    fn control_change(&mut self, origin: Origin, control: u8, value: u8) {
        match control {
            SUSTAIN_CC => self.engine.sustain(value >= 64),
            MOD_WHEEL_CC => self.engine.mod_wheel(f32::from(value) / 127.0),
            _ => match origin {
                Origin::Controller => self.controller_cc(control, value),
                Origin::External => self.external_cc(control, value),
            },
        }
    }

    fn controller_cc(&mut self, control: u8, value: u8) {
        if self.mode.is_patch_flow() {
            self.enter_play();
        }

        let registry = self.registry.clone();
        if self.mode == Mode::Menu && control == MASTER_SLIDER {
            if let Some(descriptor) = registry.by_menu_address(self.menu_index) {
                let value = self.patch.set(descriptor.id(), value, descriptor.max());
                self.dispatch(descriptor, value);
            }
            return;
        }

        if let Some(descriptor) = registry.by_controller_cc(control) {
            if value != self.patch.get(descriptor.id()) {
                let value = self.patch.set(descriptor.id(), value, descriptor.max());
                self.dispatch(descriptor, value);
            }
        }
    }

    /// External changes reach the engine silently.
    fn external_cc(&mut self, control: u8, value: u8) {
        let registry = self.registry.clone();
        if let Some(descriptor) = registry.by_external_cc(control) {
            if value != self.patch.get(descriptor.id()) {
                let value = self.patch.set(descriptor.id(), value, descriptor.max());
                descriptor.apply(&mut self.engine, value);
            }
        }
    }

    fn pitch_bend(&mut self, bend: i16) {
        let amount = if bend > 0 {
            f32::from(bend) / 8191.0
        } else {
            f32::from(bend) / 8192.0
        };
        self.engine.pitch_bend(amount);
    }

    fn program_change(&mut self, origin: Origin, program: u8) {
        if program >= SLOTS || program == self.number {
            debug!(program, current = self.number, "Ignoring program change.");
            return;
        }

        info!(patch = program, origin = ?origin, "Program change.");
        self.number = program;
        self.patch = self.store.load(program);
        self.apply_patch();
        self.enter_play();

        if origin == Origin::Controller {
            self.send_program_change(program);
        }
    }

    /// Stores nothing itself: pushes a value to the engine, shows it and
    /// mirrors it to the external port.
    fn dispatch(&mut self, descriptor: &Descriptor, value: u8) {
        descriptor.apply(&mut self.engine, value);
        self.display
            .show_param(descriptor.group(), descriptor.name(), &descriptor.format(value));
        if let Some(cc) = descriptor.external_cc() {
            self.send_external(MidiMessage::Controller {
                controller: cc.into(),
                value: value.into(),
            });
        }
    }

    /// Pushes the whole current patch to the engine. Entries the registry
    /// does not know are dropped from the patch.
    fn apply_patch(&mut self) {
        self.display.show_patch_number(self.number);
        self.display.show_patch_name(&self.patch);
        self.display.clear_param_area();

        let registry = self.registry.clone();
        for id in self.patch.ids() {
            match registry.by_id(id) {
                Some(descriptor) => descriptor.apply(&mut self.engine, self.patch.get(id)),
                None => {
                    warn!(id, "Patch holds an unknown parameter, dropping it.");
                    self.patch.remove(id);
                }
            }
        }
    }

    fn load_selected(&mut self) {
        if self.digit1 == 0 || self.digit2 == 0 {
            return;
        }

        self.number = patch::digits_to_number(self.digit1, self.digit2);
        info!(patch = self.number, "Loading patch.");
        self.patch = self.store.load(self.number);
        self.apply_patch();
        self.send_program_change(self.number);
        self.enter_play();
    }

    fn save_selected(&mut self) {
        let number = patch::digits_to_number(self.digit1, self.digit2);
        match self.store.save(number, &self.patch) {
            Ok(()) => {
                self.number = number;
                self.send_program_change(number);
            }
            Err(e) => error!(patch = number, err = %e, "Unable to save patch."),
        }
        self.display.clear_name_edit_markers();
    }

    /// All eight decrement buttons held at once. Returns whether the patches
    /// were erased.
    fn erase_all_patches(&mut self) -> bool {
        if !self.factory_reset {
            warn!("Factory reset gesture ignored, factory_reset is not enabled.");
            return false;
        }

        warn!("Factory reset, erasing all patches.");
        if let Err(e) = self.store.delete_all() {
            error!(err = %e, "Unable to erase patches.");
        }
        self.patch = Patch::init(&self.registry);
        self.apply_patch();
        true
    }

    fn select_menu_param(&mut self, index: u8) {
        self.menu_index = index;
        self.set_all_value_lights(false);
        if index < 8 {
            self.send_light(Button::Increment(index + 1).note(), true);
        } else {
            self.send_light(Button::Decrement(index - 7).note(), true);
        }

        debug!(index, "Selected menu parameter.");
        if let Some(descriptor) = self.registry.by_menu_address(index) {
            let value = self.patch.get(descriptor.id());
            self.display.show_param(
                descriptor.group(),
                descriptor.name(),
                &descriptor.format(value),
            );
        }
    }

    fn select_digit1(&mut self, digit: u8) {
        if self.digit1 > 0 {
            self.send_light(Button::Increment(self.digit1).note(), false);
        }
        self.digit1 = digit;
        self.send_light(Button::Increment(digit).note(), true);
    }

    fn select_digit2(&mut self, digit: u8) {
        if self.digit2 > 0 {
            self.send_light(Button::Decrement(self.digit2).note(), false);
        }
        self.digit2 = digit;
        self.send_light(Button::Decrement(digit).note(), true);
    }

    /// Darkens every light and switches mode.
    fn switch_mode(&mut self, mode: Mode, value_lights: bool) {
        debug!(from = ?self.mode, to = ?mode, "Switching mode.");
        self.set_status_light(StatusLight::Load, LightState::Off);
        self.set_status_light(StatusLight::Save, LightState::Off);
        self.set_all_value_lights(value_lights);
        if self.mode == Mode::SaveName && mode != Mode::SaveName {
            self.display.clear_name_edit_markers();
        }
        self.mode = mode;
        self.display.show_mode(mode.label());
    }

    fn enter_play(&mut self) {
        self.switch_mode(Mode::Play, false);
        self.digit1 = 0;
        self.digit2 = 0;
        self.set_status_light(StatusLight::Load, LightState::On);
        self.set_status_light(StatusLight::Save, LightState::On);

        self.display.show_patch_name(&self.patch);
        self.display.show_patch_number(self.number);
        self.display.clear_param_area();
    }

    fn enter_menu(&mut self) {
        self.switch_mode(Mode::Menu, false);
        self.digit1 = 0;
        self.digit2 = 0;
        self.set_status_light(StatusLight::Load, LightState::BlinkSlow);
        self.set_status_light(StatusLight::Save, LightState::BlinkSlow);
        self.display.clear_param_area();
    }

    fn enter_load_select(&mut self) {
        self.switch_mode(Mode::LoadSelect, false);
        self.digit1 = 0;
        self.digit2 = 0;
        self.set_status_light(StatusLight::Load, LightState::BlinkSlow);
        self.display.clear_param_area();
    }

    fn enter_save_select(&mut self) {
        self.switch_mode(Mode::SaveSelect, false);
        let (digit1, digit2) = patch::number_to_digits(self.number);
        self.digit1 = digit1;
        self.digit2 = digit2;
        self.send_light(Button::Increment(digit1).note(), true);
        self.send_light(Button::Decrement(digit2).note(), true);
        self.set_status_light(StatusLight::Save, LightState::BlinkSlow);
        self.display.clear_param_area();
    }

    fn enter_save_name(&mut self) {
        self.switch_mode(Mode::SaveName, true);
        self.set_status_light(StatusLight::Save, LightState::BlinkFast);
        self.display.show_name_edit_markers();
    }

    fn set_status_light(&mut self, light: StatusLight, state: LightState) {
        for (note, lit) in self.lights.set(light, state) {
            self.send_light(note, lit);
        }
    }

    fn set_all_value_lights(&self, lit: bool) {
        for n in 1..=8 {
            self.send_light(Button::Increment(n).note(), lit);
            self.send_light(Button::Decrement(n).note(), lit);
        }
    }

    fn send_light(&self, note: u8, lit: bool) {
        let velocity: u8 = if lit { 127 } else { 0 };
        let event = LiveEvent::Midi {
            channel: self.channel,
            message: MidiMessage::NoteOn {
                key: note.into(),
                vel: velocity.into(),
            },
        };
        if let Err(e) = self.controller.emit(Some(event)) {
            error!(device = %self.controller.name(), err = %e, "Unable to send light.");
        }
    }

    fn send_program_change(&self, program: u8) {
        self.send_external(MidiMessage::ProgramChange {
            program: program.into(),
        });
    }

    fn send_external(&self, message: MidiMessage) {
        let external = match &self.external {
            Some(external) => external,
            None => return,
        };
        let event = LiveEvent::Midi {
            channel: self.channel,
            message,
        };
        if let Err(e) = external.emit(Some(event)) {
            error!(device = %external.name(), err = %e, "Unable to send external MIDI.");
        }
    }
}
