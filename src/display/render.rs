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

use tokio::task::JoinHandle;
use tracing::{info, span, Instrument, Level};

use super::{fit, DisplayBuffer, HEIGHT, WIDTH};

/// A character device the display is drawn on.
pub trait Screen: Send {
    /// Writes text at a position. The text is already fitted to its region.
    fn draw(&mut self, row: usize, col: usize, text: &str);

    /// Called once after each batch of draws.
    fn flush(&mut self) {}
}

/// A screen that keeps a 20x4 frame in memory and logs the rows that change.
pub struct LogScreen {
    frame: [[char; WIDTH]; HEIGHT],
    changed: [bool; HEIGHT],
}

impl LogScreen {
    pub fn new() -> LogScreen {
        LogScreen {
            frame: [[' '; WIDTH]; HEIGHT],
            changed: [false; HEIGHT],
        }
    }

    /// The text of one row.
    pub fn row(&self, row: usize) -> String {
        self.frame
            .get(row)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }
}

impl Default for LogScreen {
    fn default() -> Self {
        LogScreen::new()
    }
}

impl Screen for LogScreen {
    fn draw(&mut self, row: usize, col: usize, text: &str) {
        let Some(line) = self.frame.get_mut(row) else {
            return;
        };
        for (cell, c) in line.iter_mut().skip(col).zip(text.chars()) {
            *cell = c;
        }
        self.changed[row] = true;
    }

    fn flush(&mut self) {
        for row in 0..HEIGHT {
            if self.changed[row] {
                self.changed[row] = false;
                info!(row, text = self.row(row), "Display.");
            }
        }
    }
}

/// Draws every dirty field onto the screen.
pub fn render(buffer: &DisplayBuffer, screen: &mut dyn Screen) {
    let dirty = buffer.take_dirty();
    if dirty.is_empty() {
        return;
    }

    for (field, text) in dirty {
        let (row, col, width) = field.region();
        screen.draw(row, col, &fit(&text, width));
    }
    screen.flush();
}

/// Spawns the render task. It runs until the runtime shuts down.
pub fn spawn(
    buffer: Arc<DisplayBuffer>,
    mut screen: Box<dyn Screen>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                render(&buffer, screen.as_mut());
            }
        }
        .instrument(span!(Level::INFO, "display")),
    )
}
