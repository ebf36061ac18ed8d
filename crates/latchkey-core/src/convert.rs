//! Wire-to-domain conversion.
//!
//! The API crate hands back raw `Smartlock` records; everything the rest
//! of the workspace touches is the canonical [`Lock`] type built here.

use latchkey_api::types::Smartlock;

use crate::model::{Lock, LockState};

/// Build a domain [`Lock`] from one wire record.
pub fn to_lock(raw: Smartlock) -> Lock {
    let name = raw
        .name
        .unwrap_or_else(|| format!("Smartlock {}", raw.smartlock_id));

    Lock {
        id: raw.smartlock_id,
        name,
        state: LockState::from_code(raw.state.state),
        raw_state: raw.state.state,
        battery_critical: raw.state.battery_critical,
        battery_charging: raw.state.battery_charging,
        battery_charge: raw.state.battery_charge_state,
    }
}
