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
use std::{
    error::Error,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use config::File;
use duration_string::DurationString;
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    controller::{ControlSurface, Controller, Options},
    display::{self, Display, DisplayBuffer, LogScreen, Screen},
    engine::{LogVoice, Synth},
    midi,
    params::Registry,
    patch::{self, PatchStore},
};

mod error;

pub use error::ConfigError;

const DEFAULT_PATCH_DIRECTORY: &str = "/var/lib/tmix";
const DEFAULT_VOICES: usize = 8;
const DEFAULT_MIDI_OUT_CHANNEL: u8 = 1;

const DEFAULT_LIGHT_INTERVAL: Duration = Duration::from_millis(125);
const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(50);
const DEFAULT_REPEAT_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_REPEAT_FAST_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_DISPLAY_INTERVAL: Duration = Duration::from_millis(50);

/// The configuration for the synthesizer.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// The grid controller's MIDI port.
    controller_device: String,
    /// The external MIDI source and sink, if any.
    external_device: Option<String>,
    /// Where the patch store lives.
    patch_directory: Option<PathBuf>,
    /// The size of the voice pool.
    voices: Option<usize>,
    /// One-based channel for everything sent out.
    midi_out_channel: Option<u8>,
    /// Arms the erase-all-patches gesture.
    #[serde(default)]
    factory_reset: bool,
    #[serde(default)]
    timing: Timing,
}

/// Cadences of the periodic tasks, as duration strings.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Timing {
    light_interval: Option<String>,
    repeat_interval: Option<String>,
    repeat_delay: Option<String>,
    repeat_fast_delay: Option<String>,
    display_interval: Option<String>,
}

impl Config {
    /// Parse the configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Config, ConfigError> {
        Ok(config::Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Config>()?)
    }

    pub fn controller_device(&self) -> &str {
        &self.controller_device
    }

    pub fn external_device(&self) -> Option<&str> {
        self.external_device.as_deref()
    }

    pub fn patch_directory(&self) -> PathBuf {
        self.patch_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATCH_DIRECTORY))
    }

    pub fn voices(&self) -> Result<usize, ConfigError> {
        match self.voices.unwrap_or(DEFAULT_VOICES) {
            0 => Err(ConfigError::NoVoices),
            voices => Ok(voices),
        }
    }

    /// The zero-based output channel.
    pub fn midi_out_channel(&self) -> Result<u8, ConfigError> {
        match self.midi_out_channel.unwrap_or(DEFAULT_MIDI_OUT_CHANNEL) {
            channel @ 1..=16 => Ok(channel - 1),
            channel => Err(ConfigError::InvalidChannel(channel)),
        }
    }

    pub fn factory_reset(&self) -> bool {
        self.factory_reset
    }

    pub fn light_interval(&self) -> Result<Duration, ConfigError> {
        duration(
            "light_interval",
            &self.timing.light_interval,
            DEFAULT_LIGHT_INTERVAL,
        )
    }

    pub fn repeat_interval(&self) -> Result<Duration, ConfigError> {
        duration(
            "repeat_interval",
            &self.timing.repeat_interval,
            DEFAULT_REPEAT_INTERVAL,
        )
    }

    pub fn repeat_delay(&self) -> Result<Duration, ConfigError> {
        duration(
            "repeat_delay",
            &self.timing.repeat_delay,
            DEFAULT_REPEAT_DELAY,
        )
    }

    pub fn repeat_fast_delay(&self) -> Result<Duration, ConfigError> {
        duration(
            "repeat_fast_delay",
            &self.timing.repeat_fast_delay,
            DEFAULT_REPEAT_FAST_DELAY,
        )
    }

    pub fn display_interval(&self) -> Result<Duration, ConfigError> {
        duration(
            "display_interval",
            &self.timing.display_interval,
            DEFAULT_DISPLAY_INTERVAL,
        )
    }

    /// The control surface settings this configuration describes.
    pub fn surface_options(&self) -> Result<Options, ConfigError> {
        Ok(Options {
            channel: self.midi_out_channel()?,
            factory_reset: self.factory_reset,
            repeat_interval: self.repeat_interval()?,
            repeat_delay: self.repeat_delay()?,
            repeat_fast_delay: self.repeat_fast_delay()?,
        })
    }
}

/// Builds everything the synthesizer needs from the given config file and
/// starts the controller. Realistically, the controller is not expected to exit.
pub fn init_controller(path: &Path) -> Result<Controller, Box<dyn Error>> {
    let config = Config::deserialize(path)?;

    let registry = Arc::new(Registry::standard()?);
    let buffer = Arc::new(DisplayBuffer::new());
    let mut screen = LogScreen::new();
    let store = open_patch_store(
        &config.patch_directory(),
        registry.clone(),
        &buffer,
        &mut screen,
    )?;
    display::spawn(buffer.clone(), Box::new(screen), config.display_interval()?);

    let controller = midi::get_device(config.controller_device())?;
    let external = config
        .external_device()
        .map(midi::get_device)
        .transpose()?;
    let engine = Synth::new(LogVoice::bank(config.voices()?))?;

    info!(
        controller = %controller.name(),
        external = ?external.as_ref().map(|device| device.name()),
        voices = config.voices()?,
        "Starting synthesizer."
    );

    let surface = ControlSurface::new(
        engine,
        registry,
        store,
        buffer,
        controller.clone(),
        external.clone(),
        config.surface_options()?,
    );
    Controller::start(
        surface,
        controller,
        external,
        config.light_interval()?,
        config.repeat_interval()?,
    )
}

/// Opens the patch store. Without storage the synthesizer can't start, so the
/// error is drawn straight onto the screen before it is returned.
fn open_patch_store(
    root: &Path,
    registry: Arc<Registry>,
    buffer: &DisplayBuffer,
    screen: &mut dyn Screen,
) -> Result<PatchStore, patch::Error> {
    match PatchStore::open(root, registry) {
        Ok(store) => Ok(store),
        Err(e) => {
            error!(err = %e, "Patch storage is unavailable.");
            buffer.show_error(&e.to_string());
            display::render(buffer, screen);
            Err(e)
        }
    }
}

fn duration(
    field: &'static str,
    value: &Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => Ok(DurationString::from_string(value.clone())
            .map_err(|e| ConfigError::InvalidDuration {
                field,
                value: value.clone(),
                reason: e.to_string(),
            })?
            .into()),
        None => Ok(default),
    }
}
