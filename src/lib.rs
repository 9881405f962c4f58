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
//! The control core of a polyphonic synthesizer: parameters, patches, voice
//! allocation and the control surface that ties them to a grid controller.

pub mod config;
pub mod controller;
pub mod display;
pub mod engine;
pub mod midi;
pub mod params;
pub mod patch;
#[cfg(test)]
mod testutil;
