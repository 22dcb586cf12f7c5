//! Data models for the Kasa cloud gateway

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ephemeral session issued by the cloud login endpoint.
///
/// The terminal identifier is generated client-side for each login attempt;
/// the token is the opaque credential the vendor binds to it. Neither is
/// persisted anywhere.
#[derive(Debug, Clone)]
pub struct Session {
    pub terminal_uuid: Uuid,
    /// Empty when the login response carried no `result.token`.
    pub token: String,
}

/// A device registered to the account, as reported by `getDeviceList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// Per-device command endpoint; passthrough requests go here, not to the
    /// shared cloud base URL.
    #[serde(rename = "appServerUrl")]
    pub app_server_url: String,
    pub alias: Option<String>,
    #[serde(rename = "deviceModel")]
    pub device_model: Option<String>,
    pub status: Option<i32>, // 0=offline, 1=online
    /// Remaining vendor fields, carried through uninterpreted.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Physical on/off state of the smart plug's switching element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    On,
    Off,
}

impl RelayState {
    /// Wire value used by the `set_relay_state` passthrough payload.
    pub fn as_state(self) -> u8 {
        match self {
            RelayState::On => 1,
            RelayState::Off => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelayState::On => "on",
            RelayState::Off => "off",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_record_keeps_unknown_fields() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "deviceId": "800652E1",
            "appServerUrl": "https://use1-wap.tplinkcloud.com",
            "alias": "Desk lamp",
            "deviceModel": "HS100(US)",
            "status": 1,
            "fwVer": "1.2.5",
            "role": 0,
        }))
        .unwrap();

        assert_eq!(record.device_id, "800652E1");
        assert_eq!(record.app_server_url, "https://use1-wap.tplinkcloud.com");
        assert_eq!(record.alias.as_deref(), Some("Desk lamp"));
        assert_eq!(record.extra.get("fwVer"), Some(&json!("1.2.5")));
        assert_eq!(record.extra.get("role"), Some(&json!(0)));
    }

    #[test]
    fn device_record_tolerates_minimal_payload() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "deviceId": "A",
            "appServerUrl": "https://x",
        }))
        .unwrap();

        assert!(record.alias.is_none());
        assert!(record.status.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn relay_state_wire_values() {
        assert_eq!(RelayState::On.as_state(), 1);
        assert_eq!(RelayState::Off.as_state(), 0);
        assert_eq!(RelayState::On.as_str(), "on");
        assert_eq!(RelayState::Off.as_str(), "off");
    }
}
