//! Wheel-spin reward types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the user may spin the wheel now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelStatus {
    /// True when a spin is available.
    pub can_spin: bool,
    /// When the next spin unlocks, if currently locked.
    #[serde(default)]
    pub next_spin_at: Option<DateTime<Utc>>,
}

impl WheelStatus {
    /// Seconds until the next spin, zero when available now.
    #[must_use]
    pub fn seconds_until_next_spin(&self, now: DateTime<Utc>) -> i64 {
        if self.can_spin {
            return 0;
        }
        self.next_spin_at
            .map_or(0, |at| (at - now).num_seconds().max(0))
    }
}

/// Prize kinds the wheel hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Coins credited to the balance.
    Coins,
    /// A free reading of any kind.
    FreeReading,
    /// Nothing this time.
    Nothing,
}

/// Result of a wheel spin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelReward {
    /// Prize kind.
    pub kind: RewardKind,
    /// Amount for countable prizes.
    #[serde(default)]
    pub amount: u32,
    /// Balance after the spin.
    pub balance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_seconds_until_next_spin() {
        let now = Utc::now();
        let locked = WheelStatus {
            can_spin: false,
            next_spin_at: Some(now + Duration::seconds(90)),
        };
        assert_eq!(locked.seconds_until_next_spin(now), 90);

        let past = WheelStatus {
            can_spin: false,
            next_spin_at: Some(now - Duration::seconds(5)),
        };
        assert_eq!(past.seconds_until_next_spin(now), 0);

        let open = WheelStatus {
            can_spin: true,
            next_spin_at: None,
        };
        assert_eq!(open.seconds_until_next_spin(now), 0);
    }
}
