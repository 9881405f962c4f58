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
use parking_lot::Mutex;

/// A region of the display. Later fields draw over earlier ones where they
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mode,
    PatchNumber,
    PatchName,
    Group,
    NameMarkers,
    Param,
    Value,
    Error,
}

impl Field {
    /// Every field in drawing order.
    pub const ALL: [Field; 8] = [
        Field::Mode,
        Field::PatchNumber,
        Field::PatchName,
        Field::Group,
        Field::NameMarkers,
        Field::Param,
        Field::Value,
        Field::Error,
    ];

    /// Row, column and width.
    pub fn region(&self) -> (usize, usize, usize) {
        match self {
            Field::Mode => (0, 0, 5),
            Field::PatchNumber => (0, 5, 7),
            Field::PatchName => (0, 12, 8),
            Field::Group => (1, 0, super::WIDTH),
            Field::NameMarkers => (1, 12, 8),
            Field::Param => (2, 0, super::WIDTH),
            Field::Value => (3, 0, super::WIDTH),
            Field::Error => (0, 0, super::WIDTH),
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Default)]
struct Cell {
    text: String,
    dirty: bool,
}

/// Latest text per field, each behind its own lock together with its
/// dirty flag.
pub struct DisplayBuffer {
    cells: Vec<Mutex<Cell>>,
}

impl DisplayBuffer {
    pub fn new() -> DisplayBuffer {
        DisplayBuffer {
            cells: Field::ALL.iter().map(|_| Mutex::new(Cell::default())).collect(),
        }
    }

    /// Replaces a field's text and marks it for drawing.
    pub fn write(&self, field: Field, text: &str) {
        let mut cell = self.cells[field.index()].lock();
        cell.text.clear();
        cell.text.push_str(text);
        cell.dirty = true;
    }

    /// The current text of a field.
    pub fn text(&self, field: Field) -> String {
        self.cells[field.index()].lock().text.clone()
    }

    /// Returns the fields written since the last call, in drawing order,
    /// and clears their dirty flags.
    pub fn take_dirty(&self) -> Vec<(Field, String)> {
        Field::ALL
            .iter()
            .filter_map(|field| {
                let mut cell = self.cells[field.index()].lock();
                if !cell.dirty {
                    return None;
                }
                cell.dirty = false;
                Some((*field, cell.text.clone()))
            })
            .collect()
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        DisplayBuffer::new()
    }
}
