//! Wall-clock pacing of engine ticks
//!
//! A presenter calls [`Scheduler::advance`] once per frame with the time
//! since the previous frame. Elapsed time accrues into a fractional tick
//! budget at `speed` ticks per second; whole ticks are spent on the engine.
//! When a grid finishes it stays on screen for the hold time and is then
//! reset so generation starts over.

use std::time::Duration;

use crate::algorithm::executor::{CollapseEngine, TickOutcome};
use crate::io::configuration::{COMPLETION_HOLD_SECS, MAX_SPEED};
use crate::io::error::{Result, invalid_parameter};

/// What one call to [`Scheduler::advance`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Advance {
    /// Ticks that collapsed a cell
    pub collapses: usize,
    /// Contradiction resets met along the way
    pub resets: usize,
    /// Whether the hold ran out and a fresh grid was started
    pub restarted: bool,
}

/// Converts elapsed time into engine ticks
#[derive(Debug, Clone)]
pub struct Scheduler {
    speed: u32,
    budget: f64,
    hold: Duration,
    held: Option<Duration>,
}

impl Scheduler {
    /// Create a scheduler running `speed` ticks per second
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` exceeds `MAX_SPEED`
    pub fn new(speed: u32) -> Result<Self> {
        let mut scheduler = Self {
            speed: 0,
            budget: 0.0,
            hold: Duration::from_secs_f32(COMPLETION_HOLD_SECS),
            held: None,
        };
        scheduler.set_speed(speed)?;
        Ok(scheduler)
    }

    /// Override how long a finished grid stays up before restarting
    #[must_use]
    pub const fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    /// Change the tick rate; zero stops ticking without pausing
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` exceeds `MAX_SPEED`
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        if speed > MAX_SPEED {
            return Err(invalid_parameter(
                "speed",
                &speed,
                &format!("must not exceed {MAX_SPEED} ticks per second"),
            ));
        }
        self.speed = speed;
        Ok(())
    }

    /// Ticks per second
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Time a finished grid has been on display, if one is being held
    pub const fn held_for(&self) -> Option<Duration> {
        self.held
    }

    /// Forget any fractional budget and pending hold
    pub const fn clear(&mut self) {
        self.budget = 0.0;
        self.held = None;
    }

    /// Spend `elapsed` on the engine
    ///
    /// A paused engine accrues nothing. A collapsed engine accrues hold
    /// time instead of ticks and is reset once the hold is over.
    ///
    /// # Errors
    ///
    /// Propagates any error raised by [`CollapseEngine::tick`]
    pub fn advance(&mut self, engine: &mut CollapseEngine, elapsed: Duration) -> Result<Advance> {
        let mut advance = Advance::default();
        if !engine.is_running() {
            return Ok(advance);
        }

        if engine.is_collapsed() {
            let held = self.held.unwrap_or_default().saturating_add(elapsed);
            if held >= self.hold {
                engine.reset();
                self.clear();
                advance.restarted = true;
            } else {
                self.held = Some(held);
            }
            return Ok(advance);
        }

        self.budget += elapsed.as_secs_f64() * f64::from(self.speed);
        while self.budget >= 1.0 {
            self.budget -= 1.0;
            match engine.tick()? {
                TickOutcome::Idle => break,
                TickOutcome::Collapsed(_) => advance.collapses += 1,
                TickOutcome::Reset { .. } => advance.resets += 1,
                TickOutcome::Completed(_) => {
                    advance.collapses += 1;
                    self.budget = 0.0;
                    self.held = Some(Duration::ZERO);
                    break;
                }
            }
        }
        Ok(advance)
    }
}
