//! Kasa cloud client: login, device listing, passthrough relay commands

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::CloudConfig;
use crate::error::GatewayError;
use crate::models::{DeviceRecord, RelayState, Session};

/// Client identifier the vendor API expects with every request.
const APP_TYPE: &str = "Kasa_Android";

/// Gateway to the vendor cloud.
///
/// Owns the HTTP client and the process-lifetime device-list cache. The
/// cache is populated on the first successful non-empty fetch and never
/// expires; `clear_device_cache` is the only reset path.
pub struct CloudGateway {
    config: CloudConfig,
    devices: RwLock<Vec<DeviceRecord>>,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CloudRequest<P> {
    method: &'static str,
    params: P,
}

/// Envelope shared by every cloud response. A non-zero `error_code` paired
/// with `msg` signals a vendor-side failure regardless of HTTP status.
#[derive(Debug, Deserialize)]
struct CloudResponse<T> {
    error_code: Option<i64>,
    msg: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Serialize)]
struct LoginParams<'a> {
    #[serde(rename = "appType")]
    app_type: &'static str,
    #[serde(rename = "cloudUserName")]
    cloud_user_name: &'a str,
    #[serde(rename = "cloudPassword")]
    cloud_password: &'a str,
    #[serde(rename = "terminalUUID")]
    terminal_uuid: Uuid,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeviceListParams<'a> {
    #[serde(rename = "appType")]
    app_type: &'static str,
    token: &'a str,
    #[serde(rename = "terminalUUID")]
    terminal_uuid: Uuid,
}

#[derive(Debug, Deserialize)]
struct DeviceListResult {
    #[serde(rename = "deviceList")]
    device_list: Option<Vec<DeviceRecord>>,
}

#[derive(Debug, Serialize)]
struct PassthroughParams<'a> {
    #[serde(rename = "appType")]
    app_type: &'static str,
    token: &'a str,
    #[serde(rename = "terminalUUID")]
    terminal_uuid: Uuid,
    #[serde(rename = "deviceId")]
    device_id: &'a str,
    #[serde(rename = "requestData")]
    request_data: RelayCommand,
}

#[derive(Debug, Serialize)]
struct RelayCommand {
    system: RelaySystem,
}

#[derive(Debug, Serialize)]
struct RelaySystem {
    set_relay_state: SetRelayState,
}

#[derive(Debug, Serialize)]
struct SetRelayState {
    state: u8,
}

impl RelayCommand {
    fn new(state: RelayState) -> Self {
        Self {
            system: RelaySystem {
                set_relay_state: SetRelayState {
                    state: state.as_state(),
                },
            },
        }
    }
}

impl CloudGateway {
    pub fn new(config: CloudConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs));

        if config.allow_legacy_tls {
            // The vendor cloud still fronts endpoints whose TLS stacks fail
            // strict verification; mirror the workaround the stock clients
            // ship with.
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http_client = builder.build()?;

        Ok(Self {
            config,
            devices: RwLock::new(Vec::new()),
            http_client,
        })
    }

    /// POST a method call to `url` and unwrap the response envelope.
    async fn call<P, T>(
        &self,
        url: &str,
        method: &'static str,
        params: P,
    ) -> Result<Option<T>, GatewayError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let request = CloudRequest { method, params };

        let response = self
            .http_client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(method, url, "cloud request failed: {}", e);
                e
            })?;

        let body = response.text().await.map_err(|e| {
            tracing::error!(method, url, "failed to read cloud response: {}", e);
            e
        })?;

        if self.config.verbose {
            tracing::debug!(method, url, body = %body, "cloud response");
        }

        let envelope: CloudResponse<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(method, url, "undecodable cloud response: {}", e);
            e
        })?;

        if let (Some(code), Some(msg)) = (envelope.error_code, envelope.msg.as_deref()) {
            if code != 0 {
                tracing::error!(method, code, msg, "cloud reported error");
                return Err(GatewayError::Cloud {
                    code,
                    msg: msg.to_string(),
                });
            }
        }

        Ok(envelope.result)
    }

    /// Log in to the cloud endpoint, yielding a fresh session.
    ///
    /// A new terminal identifier is generated on every call; the vendor binds
    /// the returned token to it. The token is empty when the response carried
    /// none.
    pub async fn authenticate(&self) -> Result<Session, GatewayError> {
        let terminal_uuid = Uuid::new_v4();
        let params = LoginParams {
            app_type: APP_TYPE,
            cloud_user_name: &self.config.user,
            cloud_password: &self.config.pwd,
            terminal_uuid,
        };

        let result: Option<LoginResult> =
            self.call(&self.config.base_url, "login", params).await?;
        let token = result.and_then(|r| r.token).unwrap_or_default();

        tracing::debug!(%terminal_uuid, "login succeeded");
        Ok(Session {
            terminal_uuid,
            token,
        })
    }

    /// Devices registered to the account.
    ///
    /// Returns the cached list when one was already fetched; otherwise logs
    /// in and fetches it. An empty result is returned as-is and does NOT
    /// populate the cache, so the next call fetches again.
    pub async fn get_devices(&self) -> Result<Vec<DeviceRecord>, GatewayError> {
        {
            let cached = self.devices.read().await;
            if !cached.is_empty() {
                if self.config.verbose {
                    tracing::debug!(count = cached.len(), "returning cached device list");
                }
                return Ok(cached.clone());
            }
        }

        let session = self.authenticate().await?;
        let params = DeviceListParams {
            app_type: APP_TYPE,
            token: &session.token,
            terminal_uuid: session.terminal_uuid,
        };

        let result: Option<DeviceListResult> = self
            .call(&self.config.base_url, "getDeviceList", params)
            .await?;
        let list = result.and_then(|r| r.device_list).unwrap_or_default();

        if list.is_empty() {
            tracing::warn!("cloud returned an empty device list");
            return Ok(Vec::new());
        }

        tracing::info!(count = list.len(), "device list fetched and cached");
        let mut cached = self.devices.write().await;
        *cached = list.clone();
        Ok(list)
    }

    pub async fn turn_device_on(&self, device_id: &str) -> Result<(), GatewayError> {
        self.set_relay_state(device_id, RelayState::On).await
    }

    pub async fn turn_device_off(&self, device_id: &str) -> Result<(), GatewayError> {
        self.set_relay_state(device_id, RelayState::Off).await
    }

    /// Send a relay command through the cloud to the device's own endpoint.
    ///
    /// The device must appear in the account device list; nothing is sent
    /// otherwise. A fresh login is performed for every command, independent
    /// of the session used for listing.
    pub async fn set_relay_state(
        &self,
        device_id: &str,
        state: RelayState,
    ) -> Result<(), GatewayError> {
        let devices = self.get_devices().await?;
        if devices.is_empty() {
            tracing::error!(device_id, "no devices registered to this account");
            return Err(GatewayError::NoDevices);
        }

        let device = devices
            .iter()
            .find(|d| d.device_id == device_id)
            .ok_or_else(|| {
                tracing::error!(device_id, "device not found in device list");
                GatewayError::DeviceNotFound(device_id.to_string())
            })?;

        let session = self.authenticate().await?;
        let params = PassthroughParams {
            app_type: APP_TYPE,
            token: &session.token,
            terminal_uuid: session.terminal_uuid,
            device_id,
            request_data: RelayCommand::new(state),
        };

        // Response body is not interpreted; success is observable on the
        // physical relay.
        let _: Option<serde_json::Value> = self
            .call(&device.app_server_url, "passthrough", params)
            .await?;

        tracing::info!(device_id, state = state.as_str(), "relay command sent");
        Ok(())
    }

    /// Snapshot of the current device-list cache.
    pub async fn cached_devices(&self) -> Vec<DeviceRecord> {
        self.devices.read().await.clone()
    }

    /// Drop the cached device list; the next `get_devices` fetches again.
    pub async fn clear_device_cache(&self) {
        self.devices.write().await.clear();
    }
}
