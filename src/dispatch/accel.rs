//! Refresh interval adjustment with key-repeat acceleration.
//!
//! A `+`/`-` press moves `update_ms` by [`FINE_STEP`]. Holding the key
//! switches to [`COARSE_STEP`]: a press counts as held when the previous
//! `+`/`-` press was at most [`REPEAT_WINDOW`] ago and the whole input
//! history consists of this key.

use crate::config::{UPDATE_MS_MAX, UPDATE_MS_MIN};
use crate::input::{InputHistory, KeyEvent};
use std::time::{Duration, Instant};

/// Step of an isolated press, in milliseconds.
pub const FINE_STEP: i64 = 100;
/// Step of a held key, in milliseconds.
pub const COARSE_STEP: i64 = 1000;
/// Maximum gap between presses of a held key.
pub const REPEAT_WINDOW: Duration = Duration::from_millis(200);

/// Direction of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `+`: slower refresh.
    Up,
    /// `-`: faster refresh.
    Down,
}

impl Direction {
    /// The key bound to this direction.
    pub const fn key(self) -> KeyEvent {
        match self {
            Self::Up => KeyEvent::Char(b'+'),
            Self::Down => KeyEvent::Char(b'-'),
        }
    }
}

/// Remembers the last adjustment press.
#[derive(Debug, Clone, Default)]
pub struct IntervalAccel {
    last_press: Option<Instant>,
}

impl IntervalAccel {
    /// Create with no press recorded.
    pub const fn new() -> Self {
        Self { last_press: None }
    }

    /// New interval for a press in `direction`, or `None` if `current` is
    /// already at the limit (the press is then not consumed).
    ///
    /// `history` must not yet contain this press.
    pub fn adjust(
        &mut self,
        direction: Direction,
        current: i64,
        history: &InputHistory,
        now: Instant,
    ) -> Option<i64> {
        let held = self
            .last_press
            .is_some_and(|last| now.saturating_duration_since(last) <= REPEAT_WINDOW)
            && history.is_saturated_with(&direction.key());

        let next = match direction {
            Direction::Up => {
                if current > UPDATE_MS_MAX {
                    return None;
                }
                let coarse = held && current <= UPDATE_MS_MAX - 900;
                current + if coarse { COARSE_STEP } else { FINE_STEP }
            }
            Direction::Down => {
                if current < 2 * UPDATE_MS_MIN {
                    return None;
                }
                let coarse = held && current >= 20 * UPDATE_MS_MIN;
                current - if coarse { COARSE_STEP } else { FINE_STEP }
            }
        };

        self.last_press = Some(now);
        Some(next.clamp(UPDATE_MS_MIN, UPDATE_MS_MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HISTORY_CAPACITY;

    fn full_history(key: KeyEvent) -> InputHistory {
        let mut history = InputHistory::new();
        for _ in 0..HISTORY_CAPACITY {
            history.push(key);
        }
        history
    }

    #[test]
    fn test_isolated_press_is_fine() {
        let mut accel = IntervalAccel::new();
        let history = full_history(KeyEvent::Char(b'+'));
        assert_eq!(accel.adjust(Direction::Up, 2000, &history, Instant::now()), Some(2100));
    }

    #[test]
    fn test_held_key_escalates() {
        let mut accel = IntervalAccel::new();
        let mut history = full_history(KeyEvent::Char(b'+'));
        let t0 = Instant::now();

        let mut value = 2000;
        let mut steps = Vec::new();
        for i in 0..3 {
            let next = accel
                .adjust(Direction::Up, value, &history, t0 + Duration::from_millis(100 * i))
                .unwrap();
            steps.push(next - value);
            value = next;
            history.push(KeyEvent::Char(b'+'));
        }
        assert_eq!(steps, vec![FINE_STEP, COARSE_STEP, COARSE_STEP]);
    }

    #[test]
    fn test_slow_presses_stay_fine() {
        let mut accel = IntervalAccel::new();
        let history = full_history(KeyEvent::Char(b'-'));
        let t0 = Instant::now();
        assert_eq!(accel.adjust(Direction::Down, 5000, &history, t0), Some(4900));
        assert_eq!(
            accel.adjust(Direction::Down, 4900, &history, t0 + Duration::from_millis(201)),
            Some(4800)
        );
    }

    #[test]
    fn test_mixed_history_stays_fine() {
        let mut accel = IntervalAccel::new();
        let mut history = full_history(KeyEvent::Char(b'+'));
        history.push(KeyEvent::Char(b'x'));
        let t0 = Instant::now();
        accel.adjust(Direction::Up, 2000, &history, t0);
        assert_eq!(
            accel.adjust(Direction::Up, 2100, &history, t0 + Duration::from_millis(50)),
            Some(2200)
        );
    }

    #[test]
    fn test_limits() {
        let mut accel = IntervalAccel::new();
        let history = InputHistory::new();
        let now = Instant::now();
        assert_eq!(accel.adjust(Direction::Down, 199, &history, now), None);
        assert_eq!(accel.adjust(Direction::Down, 200, &history, now), Some(100));
        assert_eq!(accel.adjust(Direction::Up, UPDATE_MS_MAX, &history, now), Some(UPDATE_MS_MAX));
        assert_eq!(accel.adjust(Direction::Up, UPDATE_MS_MAX + 1, &history, now), None);
    }

    #[test]
    fn test_coarse_down_needs_headroom() {
        let mut accel = IntervalAccel::new();
        let history = full_history(KeyEvent::Char(b'-'));
        let t0 = Instant::now();
        accel.adjust(Direction::Down, 1900, &history, t0);
        assert_eq!(
            accel.adjust(Direction::Down, 1800, &history, t0 + Duration::from_millis(10)),
            Some(1700)
        );
    }
}
