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
use std::time::Duration;

/// While repeating slowly, fire on every fifth tick.
const SLOW_DIVISOR: u64 = 5;

/// Repeats a held value button. The first press fires immediately from the
/// caller; after `delay` the button repeats every fifth tick, after
/// `fast_delay` on every tick.
#[derive(Debug)]
pub struct Repeat {
    pressed: Option<u8>,
    elapsed: Duration,
    ticks: u64,
    interval: Duration,
    delay: Duration,
    fast_delay: Duration,
}

impl Repeat {
    pub fn new(interval: Duration, delay: Duration, fast_delay: Duration) -> Repeat {
        Repeat {
            pressed: None,
            elapsed: Duration::ZERO,
            ticks: 0,
            interval,
            delay,
            fast_delay,
        }
    }

    /// Arms the repeat for a freshly pressed note.
    pub fn press(&mut self, note: u8) {
        self.pressed = Some(note);
        self.elapsed = Duration::ZERO;
        self.ticks = 0;
    }

    pub fn release(&mut self) {
        self.pressed = None;
    }

    pub fn pressed(&self) -> Option<u8> {
        self.pressed
    }

    /// Advances by one interval and returns the note to fire again, if any.
    pub fn tick(&mut self) -> Option<u8> {
        let note = self.pressed?;
        self.ticks += 1;
        self.elapsed += self.interval;

        if self.elapsed >= self.delay
            && (self.elapsed >= self.fast_delay || self.ticks % SLOW_DIVISOR == 0)
        {
            Some(note)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn repeat() -> Repeat {
        Repeat::new(
            Duration::from_millis(50),
            Duration::from_secs(1),
            Duration::from_secs(5),
        )
    }

    /// Elapsed milliseconds at each firing over the given number of ticks.
    fn firings(repeat: &mut Repeat, ticks: u64) -> Vec<u64> {
        (1..=ticks)
            .filter(|_| repeat.tick().is_some())
            .map(|tick| tick * 50)
            .collect()
    }

    #[test]
    fn idle_never_fires() {
        let mut repeat = repeat();
        assert_eq!(firings(&mut repeat, 200), Vec::<u64>::new());
    }

    #[test]
    fn slow_then_fast() {
        let mut repeat = repeat();
        repeat.press(4);
        let fired = firings(&mut repeat, 104);
        assert_eq!(&fired[..4], &[1000, 1250, 1500, 1750]);
        let fast: Vec<u64> = fired.into_iter().filter(|ms| *ms >= 4750).collect();
        assert_eq!(fast, vec![4750, 5000, 5050, 5100, 5150, 5200]);
    }

    #[test]
    fn release_stops_repeat() {
        let mut repeat = repeat();
        repeat.press(4);
        firings(&mut repeat, 30);
        repeat.release();
        assert_eq!(repeat.pressed(), None);
        assert_eq!(firings(&mut repeat, 200), Vec::<u64>::new());
    }

    #[test]
    fn new_press_restarts_delay() {
        let mut repeat = repeat();
        repeat.press(4);
        firings(&mut repeat, 19);
        repeat.press(7);
        assert_eq!(repeat.pressed(), Some(7));
        assert_eq!(firings(&mut repeat, 20), vec![1000]);
    }
}
