// Wire types for the Nuki Web API.
//
// Shapes mirror the JSON the cloud returns; optional fields are true
// optionals rather than lookups with fallbacks. Unknown fields are
// ignored so new firmware attributes don't break deserialization.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the vendor to each smartlock.
pub type SmartlockId = i64;

/// One smartlock record as returned by `GET /smartlock`.
///
/// Every poll yields a wholly new set of these; nothing is mutated
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Smartlock {
    pub smartlock_id: SmartlockId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: SmartlockState,
}

/// Nested state sub-record of a [`Smartlock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartlockState {
    /// Raw vendor state code. 255 ("undefined") when absent.
    #[serde(default = "default_state_code")]
    pub state: u8,

    /// Low-battery warning. All models report this.
    #[serde(default)]
    pub battery_critical: bool,

    /// Exact charge percentage (0-100). Newer models only.
    #[serde(default)]
    pub battery_charge_state: Option<u8>,

    /// Whether the battery is currently charging. Rechargeable models only.
    #[serde(default)]
    pub battery_charging: Option<bool>,
}

fn default_state_code() -> u8 {
    255
}

impl Default for SmartlockState {
    /// An absent state sub-record reads as "undefined", not "locked".
    fn default() -> Self {
        Self {
            state: 255,
            battery_critical: false,
            battery_charge_state: None,
            battery_charging: None,
        }
    }
}

/// Vendor action codes accepted by `POST /smartlock/{id}/action`.
///
/// `LockNGo`/`LockNGoUnlatch` are composite actions executed device-side
/// (lock, then optionally unlatch) -- a single command on the wire, not a
/// client-orchestrated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LockAction {
    Unlock = 1,
    Lock = 2,
    Unlatch = 3,
    LockNGo = 4,
    LockNGoUnlatch = 5,
}

impl LockAction {
    /// The numeric code sent in the action request body.
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_record() {
        let json = r#"{
            "smartlockId": 12345,
            "name": "Front Door",
            "state": {
                "state": 1,
                "batteryCritical": false,
                "batteryChargeState": 85,
                "batteryCharging": false
            }
        }"#;

        let lock: Smartlock = serde_json::from_str(json).unwrap();
        assert_eq!(lock.smartlock_id, 12345);
        assert_eq!(lock.name.as_deref(), Some("Front Door"));
        assert_eq!(lock.state.state, 1);
        assert_eq!(lock.state.battery_charge_state, Some(85));
        assert_eq!(lock.state.battery_charging, Some(false));
    }

    #[test]
    fn missing_state_fields_default() {
        let json = r#"{"smartlockId": 7, "state": {}}"#;

        let lock: Smartlock = serde_json::from_str(json).unwrap();
        assert_eq!(lock.state.state, 255);
        assert!(!lock.state.battery_critical);
        assert_eq!(lock.state.battery_charge_state, None);
        assert_eq!(lock.state.battery_charging, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "smartlockId": 7,
            "accountId": 99,
            "state": {"state": 3, "doorState": 2}
        }"#;

        let lock: Smartlock = serde_json::from_str(json).unwrap();
        assert_eq!(lock.state.state, 3);
    }

    #[test]
    fn action_codes_match_vendor_values() {
        assert_eq!(LockAction::Unlock.code(), 1);
        assert_eq!(LockAction::Lock.code(), 2);
        assert_eq!(LockAction::Unlatch.code(), 3);
        assert_eq!(LockAction::LockNGo.code(), 4);
        assert_eq!(LockAction::LockNGoUnlatch.code(), 5);
    }
}
