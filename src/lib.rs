//! Kasa cloud gateway
//!
//! Thin client over the TP-Link Kasa cloud API: authenticate with account
//! credentials, enumerate the devices registered to the account, and toggle
//! smart-plug relay state through each device's own cloud endpoint.

pub mod cloud;
pub mod config;
pub mod error;
pub mod models;

pub use crate::cloud::CloudGateway;
pub use crate::config::CloudConfig;
pub use crate::error::GatewayError;
pub use crate::models::{DeviceRecord, RelayState, Session};
