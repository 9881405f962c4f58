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
use std::{error::Error, fmt, sync::Arc};

use midly::live::LiveEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// A mock device. Records what it emits and injects events on demand.
#[derive(Clone)]
pub struct Device {
    name: String,
    sender: Arc<Mutex<Option<Sender<Vec<u8>>>>>,
    emitted: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            sender: Arc::new(Mutex::new(None)),
            emitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[cfg(test)]
    /// Sends the mock event through to the watcher, if any.
    pub fn mock_event(&self, event: &[u8]) {
        if let Some(sender) = self.sender.lock().as_ref() {
            sender
                .try_send(event.to_vec())
                .expect("error sending mock event");
        }
    }

    #[cfg(test)]
    /// Gets every event emitted so far, in order.
    pub fn emitted(&self) -> Vec<Vec<u8>> {
        self.emitted.lock().clone()
    }

    #[cfg(test)]
    /// Gets the last event emitted.
    pub fn last_emitted(&self) -> Option<Vec<u8>> {
        self.emitted.lock().last().cloned()
    }

    #[cfg(test)]
    /// Forgets all emitted events.
    pub fn reset_emitted(&self) {
        self.emitted.lock().clear();
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn watch_events(&self, sender: Sender<Vec<u8>>) -> Result<(), Box<dyn Error>> {
        let mut watcher = self.sender.lock();
        if watcher.is_some() {
            return Err("Already watching events.".into());
        }
        *watcher = Some(sender);
        Ok(())
    }

    fn stop_watch_events(&self) {
        self.sender.lock().take();
    }

    fn emit(&self, midi_event: Option<LiveEvent<'static>>) -> Result<(), Box<dyn Error>> {
        if let Some(midi_event) = midi_event {
            let mut buf: Vec<u8> = Vec::with_capacity(8);
            midi_event.write(&mut buf)?;
            debug!(device = self.name, event = ?buf, "Mock emit.");
            self.emitted.lock().push(buf);
        }

        Ok(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
