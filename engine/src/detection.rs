//! Network-wide exposure accounting.

use serde::{Deserialize, Serialize};

use crate::{ALERT_DETECTION, PASSIVE_DETECTION, TRACKING_DETECTION};

/// How exposed the whole intrusion is, 0 to 100.
///
/// The scalar only ever rises on its own: passively with time and faster
/// for every enemy that is alert or tracking. The only decrements are
/// explicit relief supplied by the caller (log wipes, data patches).
/// Crossing the network's threshold wakes the admin avatar, exactly once
/// per network instance; the flag never clears, even if the level is later
/// suppressed back below the threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionMeter {
    value: f32,
    threshold: f32,
    avatar_active: bool,
}

impl DetectionMeter {
    pub fn new(threshold: f32) -> Self {
        DetectionMeter {
            value: 0.0,
            threshold,
            avatar_active: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn avatar_active(&self) -> bool {
        self.avatar_active
    }

    /// Accumulate one turn of exposure from the aggregate enemy states.
    ///
    /// Returns true the single time the avatar threshold is crossed.
    pub(crate) fn apply_turn(&mut self, alert: usize, tracking: usize) -> bool {
        self.raise(
            PASSIVE_DETECTION
                + alert as f32 * ALERT_DETECTION
                + tracking as f32 * TRACKING_DETECTION,
        )
    }

    fn raise(&mut self, delta: f32) -> bool {
        self.value = (self.value + delta).clamp(0.0, 100.0);
        if self.value >= self.threshold && !self.avatar_active {
            self.avatar_active = true;
            return true;
        }
        false
    }

    /// Externally triggered relief. Negative amounts are ignored; the meter
    /// never rises through this entry point.
    pub fn suppress(&mut self, amount: f32) {
        self.value = (self.value - amount.max(0.0)).clamp(0.0, 100.0);
    }
}
