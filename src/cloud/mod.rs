//! TP-Link Kasa cloud API

mod client;

pub use self::client::CloudGateway;
