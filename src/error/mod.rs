//! Error handling module

use thiserror::Error;

/// Failure modes of the cloud gateway operations.
///
/// Every outbound call is attempted exactly once; no variant implies a retry
/// happened. `NoDevices` and `DeviceNotFound` are lookup failures, distinct
/// from transport or vendor errors, so callers can tell "nothing to control"
/// apart from "the request failed".
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("cloud error {code}: {msg}")]
    Cloud { code: i64, msg: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no devices registered to this account")]
    NoDevices,

    #[error("device {0} not found in device list")]
    DeviceNotFound(String),
}
