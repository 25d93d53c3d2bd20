//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Thread-local RNG for dice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Replays a fixed sequence of rolls, then repeats the last one.
#[cfg(test)]
pub struct ScriptedRandom {
    rolls: std::sync::Mutex<std::collections::VecDeque<i32>>,
    last: i32,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(rolls: Vec<i32>) -> Self {
        let last = rolls.last().copied().unwrap_or(1);
        Self {
            rolls: std::sync::Mutex::new(rolls.into()),
            last,
        }
    }
}

#[cfg(test)]
impl RandomPort for ScriptedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let next = self
            .rolls
            .lock()
            .ok()
            .and_then(|mut rolls| rolls.pop_front())
            .unwrap_or(self.last);
        next.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let random = SystemRandom;
        for _ in 0..200 {
            let roll = random.gen_range(1, 6);
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn scripted_random_replays_then_repeats() {
        let random = ScriptedRandom::new(vec![3, 20]);
        assert_eq!(random.gen_range(1, 20), 3);
        assert_eq!(random.gen_range(1, 20), 20);
        assert_eq!(random.gen_range(1, 20), 20);
        assert_eq!(random.gen_range(1, 6), 6);
    }
}
