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
//! The control surface and the task that drives it.

use std::{error::Error, sync::Arc, time::Duration};

use midly::live::LiveEvent;
use tokio::{
    sync::mpsc::{self, Receiver},
    task::{JoinError, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tracing::{error, info, span, Instrument, Level};

use crate::{engine::Engine, midi::Device};

pub mod layout;
mod lights;
mod repeat;
mod surface;

pub use lights::{LightState, StatusLight, StatusLights};
pub use repeat::Repeat;
pub use surface::{ControlSurface, Mode, Options, Origin};

/// Buffered raw MIDI messages per port.
const EVENT_BUFFER: usize = 64;

/// Drives a control surface from its MIDI ports and timers.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Starts watching both ports and spawns the task that owns the surface.
    pub fn start<E: Engine + 'static>(
        mut surface: ControlSurface<E>,
        controller: Arc<dyn Device>,
        external: Option<Arc<dyn Device>>,
        light_interval: Duration,
        repeat_interval: Duration,
    ) -> Result<Controller, Box<dyn Error>> {
        let (controller_tx, controller_rx) = mpsc::channel::<Vec<u8>>(EVENT_BUFFER);
        controller.watch_events(controller_tx)?;

        let external_rx = match &external {
            Some(external) => {
                let (external_tx, external_rx) = mpsc::channel::<Vec<u8>>(EVENT_BUFFER);
                external.watch_events(external_tx)?;
                Some(external_rx)
            }
            None => None,
        };

        surface.start();

        let ports = Ports {
            controller,
            external,
            controller_rx,
            external_rx,
        };
        Ok(Controller {
            handle: tokio::spawn(
                Controller::run(surface, ports, light_interval, repeat_interval)
                    .instrument(span!(Level::INFO, "controller")),
            ),
        })
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    async fn run<E: Engine>(
        mut surface: ControlSurface<E>,
        mut ports: Ports,
        light_interval: Duration,
        repeat_interval: Duration,
    ) {
        let mut lights = time::interval(light_interval);
        lights.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut repeat = time::interval(repeat_interval);
        repeat.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(controller = %ports.controller.name(), "Controller started.");

        loop {
            tokio::select! {
                raw = ports.controller_rx.recv() => match raw {
                    Some(raw) => dispatch(&mut surface, Origin::Controller, &raw),
                    None => {
                        info!("Controller port closed.");
                        break;
                    }
                },
                raw = next_external(&mut ports.external_rx) => match raw {
                    Some(raw) => dispatch(&mut surface, Origin::External, &raw),
                    None => {
                        info!("External port closed.");
                        ports.external_rx = None;
                    }
                },
                _ = lights.tick() => surface.tick_lights(),
                _ = repeat.tick() => surface.tick_repeat(),
            }
        }

        ports.controller.stop_watch_events();
        if let Some(external) = ports.external.as_ref() {
            external.stop_watch_events();
        }
        info!("Controller closing.");
    }
}

struct Ports {
    controller: Arc<dyn Device>,
    external: Option<Arc<dyn Device>>,
    controller_rx: Receiver<Vec<u8>>,
    external_rx: Option<Receiver<Vec<u8>>>,
}

/// The next external message. Pends forever without an external port.
async fn next_external(external_rx: &mut Option<Receiver<Vec<u8>>>) -> Option<Vec<u8>> {
    match external_rx {
        Some(external_rx) => external_rx.recv().await,
        None => std::future::pending().await,
    }
}

fn dispatch<E: Engine>(surface: &mut ControlSurface<E>, origin: Origin, raw: &[u8]) {
    match LiveEvent::parse(raw) {
        Ok(event) => surface.handle(origin, event),
        Err(e) => error!(
            origin = ?origin,
            err = format!("{:?}", e),
            "Error parsing event."
        ),
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, sync::Arc, time::Duration};

    use crate::{
        display::{DisplayBuffer, Field},
        midi::{self, Device as _},
        params::Registry,
        patch::PatchStore,
        testutil::{
            eventually,
            events::{cc, is_lit, note_on, raw},
            RecordingEngine,
        },
    };

    use super::{layout, ControlSurface, Controller, Options};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_controller() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let registry = Arc::new(Registry::standard()?);
        let store = PatchStore::open(dir.path(), registry.clone())?;
        let display = Arc::new(DisplayBuffer::new());
        let controller = midi::test::Device::get("mock-controller");
        let external = midi::test::Device::get("mock-external");

        let surface = ControlSurface::new(
            RecordingEngine::new(),
            registry.clone(),
            store,
            display.clone(),
            Arc::new(controller.clone()),
            Some(Arc::new(external.clone())),
            Options::default(),
        );
        let mut runtime = Controller::start(
            surface,
            Arc::new(controller.clone()),
            Some(Arc::new(external.clone())),
            Duration::from_millis(10),
            Duration::from_millis(50),
        )?;

        eventually(
            || display.text(Field::Mode) == "Play",
            "Surface never entered play",
        );

        // Garbage is skipped.
        controller.mock_event(&[0xF4, 0x01]);
        controller.mock_event(&raw(note_on(layout::LOAD, 127)));
        eventually(
            || display.text(Field::Mode) == "Load",
            "Surface never entered load select",
        );

        // The load light blinks on its own.
        eventually(
            || !is_lit(&controller.emitted(), layout::LOAD),
            "Load light never blinked off",
        );
        eventually(
            || is_lit(&controller.emitted(), layout::LOAD),
            "Load light never blinked on",
        );

        let descriptor = registry
            .by_controller_cc(layout::SLIDER[1])
            .expect("slider");
        let external_cc = descriptor.external_cc().expect("external cc");
        controller.mock_event(&raw(cc(layout::SLIDER[1], 7)));
        eventually(
            || display.text(Field::Mode) == "Play",
            "Slider never aborted load select",
        );
        eventually(
            || {
                external
                    .emitted()
                    .contains(&vec![0xB0, external_cc, 7])
            },
            "Slider was never mirrored",
        );

        // An external change is stored silently, so moving the slider to the
        // same value afterwards is a no-op.
        external.mock_event(&raw(cc(external_cc, 9)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.mock_event(&raw(cc(layout::SLIDER[1], 9)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!external.emitted().contains(&vec![0xB0, external_cc, 9]));

        controller.stop_watch_events();
        tokio::time::timeout(Duration::from_secs(5), runtime.join()).await??;
        Ok(())
    }
}
