//! Timed status effects on hostiles
//!
//! Burn and slow are independent timer pairs evaluated against the
//! simulation clock, never the wall clock. Burn damage ticks are scheduled
//! from the application timestamp (tick k is due at grace + k·interval)
//! instead of sampling `elapsed % interval`, so the payout is immune to
//! frame-skip drift and always totals the same over a full burn.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Damage ticks a full-length burn pays out
const BURN_MAX_TICKS: u32 = ((BURN_DURATION_MS - BURN_GRACE_MS) / BURN_TICK_MS) as u32 + 1;

/// One active timed effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    /// Simulation time the effect was (re-)applied
    pub applied_at_ms: f64,
    /// Damage ticks already paid (burn only)
    pub ticks_paid: u32,
}

impl TimedEffect {
    fn new(now_ms: f64) -> Self {
        Self {
            applied_at_ms: now_ms,
            ticks_paid: 0,
        }
    }
}

/// Burn/slow state carried by each hostile
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub burn: Option<TimedEffect>,
    pub slow: Option<TimedEffect>,
}

impl StatusEffects {
    /// Start burning, or restart the timer if already burning
    pub fn apply_burn(&mut self, now_ms: f64) {
        self.burn = Some(TimedEffect::new(now_ms));
    }

    /// Start the slow, or restart the timer if already slowed
    pub fn apply_slow(&mut self, now_ms: f64) {
        self.slow = Some(TimedEffect::new(now_ms));
    }

    pub fn is_burning(&self) -> bool {
        self.burn.is_some()
    }

    pub fn is_slowed(&self) -> bool {
        self.slow.is_some()
    }

    /// Speed multiplier for this frame's movement (not persisted)
    pub fn speed_multiplier(&self) -> f32 {
        if self.slow.is_some() { SLOW_FACTOR } else { 1.0 }
    }

    /// Advance both timers, returning burn damage owed this frame.
    ///
    /// The tick check runs before the expiry check so a full-length burn
    /// always pays out its final window.
    pub fn update(&mut self, now_ms: f64) -> f32 {
        let mut damage = 0.0;

        if let Some(burn) = &mut self.burn {
            let elapsed = now_ms - burn.applied_at_ms;
            while burn.ticks_paid < BURN_MAX_TICKS
                && elapsed >= BURN_GRACE_MS + burn.ticks_paid as f64 * BURN_TICK_MS
            {
                burn.ticks_paid += 1;
                damage += BURN_TICK_DAMAGE;
            }
        }
        if self
            .burn
            .is_some_and(|b| now_ms - b.applied_at_ms > BURN_DURATION_MS)
        {
            self.burn = None;
        }

        if self
            .slow
            .is_some_and(|s| now_ms - s.applied_at_ms > SLOW_DURATION_MS)
        {
            self.slow = None;
        }

        damage
    }
}
