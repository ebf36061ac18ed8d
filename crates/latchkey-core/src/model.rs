// ── Lock domain types ──

use serde::{Deserialize, Serialize};

use latchkey_api::types::SmartlockId;

/// Fallback estimate reported when only the critical flag is set.
/// The vendor raises the flag somewhere below 20%.
pub const BATTERY_ESTIMATE_CRITICAL: u8 = 15;

/// Fallback estimate reported when the battery is not critical and no
/// exact percentage is available.
pub const BATTERY_ESTIMATE_HEALTHY: u8 = 80;

/// Canonical lock state -- normalized from the vendor's numeric codes.
///
/// Always derived from the latest raw code via [`LockState::from_code`],
/// never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum LockState {
    Locked,
    Unlocked,
    Locking,
    Unlocking,
    Jammed,
    Unknown,
}

impl LockState {
    /// Translate a raw vendor state code.
    ///
    /// Total over the whole byte range: any code outside the documented
    /// table maps to [`Unknown`](Self::Unknown).
    pub fn from_code(code: u8) -> Self {
        match code {
            // 0 = uncalibrated: the bolt rests in the locked position
            0 | 1 => Self::Locked,
            2 | 7 => Self::Unlocking, // 7 = unlatching
            3 | 5 | 6 => Self::Unlocked, // 5 = unlatched, 6 = lock'n'go wait
            4 => Self::Locking,
            254 => Self::Jammed, // motor blocked
            _ => Self::Unknown,  // 255 = undefined, plus anything unmapped
        }
    }

    /// Tri-state locked projection: `Some(true)` iff locked,
    /// `Some(false)` iff unlocked, `None` while moving, jammed, or
    /// unknown. Hosts must support the indeterminate case.
    pub fn is_locked(self) -> Option<bool> {
        match self {
            Self::Locked => Some(true),
            Self::Unlocked => Some(false),
            _ => None,
        }
    }

    pub fn is_locking(self) -> bool {
        self == Self::Locking
    }

    pub fn is_unlocking(self) -> bool {
        self == Self::Unlocking
    }

    pub fn is_jammed(self) -> bool {
        self == Self::Jammed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Locking => "locking",
            Self::Unlocking => "unlocking",
            Self::Jammed => "jammed",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical lock type held in the snapshot store.
///
/// Produced fresh from each poll; a new record set replaces the prior
/// snapshot wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lock {
    pub id: SmartlockId,
    pub name: String,
    pub state: LockState,

    /// Raw vendor state code, kept for diagnostics.
    pub raw_state: u8,

    // Battery
    pub battery_critical: bool,
    pub battery_charging: Option<bool>,
    /// Exact charge percentage, when the model reports one.
    pub battery_charge: Option<u8>,
}

impl Lock {
    /// Battery percentage for hosts that want a single number.
    ///
    /// A lossy heuristic, not a measurement: the exact value is used when
    /// reported; otherwise the critical flag picks between a fixed low
    /// and a fixed healthy estimate.
    pub fn battery_percent(&self) -> u8 {
        match self.battery_charge {
            Some(exact) => exact,
            None if self.battery_critical => BATTERY_ESTIMATE_CRITICAL,
            None => BATTERY_ESTIMATE_HEALTHY,
        }
    }
}
