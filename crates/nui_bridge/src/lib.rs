use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    error::ErrorCode,
    protocol::{RpcAction, RpcResponse},
};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

pub const DEFAULT_RESOURCE_NAME: &str = "smartphone-nui";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid action name `{0}`")]
    InvalidAction(String),
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl BridgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAction(_) => ErrorCode::InvalidAction,
            Self::Timeout(_) => ErrorCode::CallbackTimeout,
            Self::Endpoint(_) | Self::Transport(_) => ErrorCode::CallbackFailed,
        }
    }
}

#[async_trait]
pub trait HostRpc: Send + Sync {
    /// Performs one call. Never fails; see [`RpcResponse::failure`].
    async fn call(&self, action: &str, payload: Value) -> RpcResponse;

    async fn call_action(&self, action: RpcAction, payload: Value) -> RpcResponse {
        self.call(action.as_str(), payload).await
    }
}

pub struct OfflineHost;

#[async_trait]
impl HostRpc for OfflineHost {
    async fn call(&self, action: &str, _payload: Value) -> RpcResponse {
        debug!(action, "host offline; returning synthetic failure");
        RpcResponse::failure(ErrorCode::CallbackFailed)
    }
}

pub fn resolve_resource_name(hostname: Option<&str>) -> String {
    match hostname.map(str::trim) {
        Some(name) if !name.is_empty() && name != "localhost" => name.to_string(),
        _ => DEFAULT_RESOURCE_NAME.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    pub resource_name: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct NuiBridge {
    http: Client,
    base: Url,
    timeout: Option<Duration>,
}

impl NuiBridge {
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let raw = match config.base_url {
            Some(base_url) => base_url,
            None => format!(
                "https://{}/",
                resolve_resource_name(config.resource_name.as_deref())
            ),
        };
        let raw = if raw.ends_with('/') {
            raw
        } else {
            format!("{raw}/")
        };
        Ok(Self {
            http: Client::new(),
            base: Url::parse(&raw)?,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, action: &str) -> Result<Url, BridgeError> {
        let valid = !action.is_empty()
            && action
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
            && action != "."
            && action != "..";
        if !valid {
            return Err(BridgeError::InvalidAction(action.to_string()));
        }
        // `./` keeps names like `garage:getVehicles` from parsing as a scheme.
        Ok(self.base.join(&format!("./{action}"))?)
    }

    async fn post(&self, action: &str, payload: &Value) -> Result<RpcResponse, BridgeError> {
        let url = self.endpoint(action)?;
        let response = self.http.post(url).json(payload).send().await?;
        Ok(response.json::<RpcResponse>().await?)
    }

    pub async fn try_call(
        &self,
        action: &str,
        payload: &Value,
    ) -> Result<RpcResponse, BridgeError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.post(action, payload))
                .await
                .map_err(|_| BridgeError::Timeout(limit))?,
            None => self.post(action, payload).await,
        }
    }
}

#[async_trait]
impl HostRpc for NuiBridge {
    async fn call(&self, action: &str, payload: Value) -> RpcResponse {
        match self.try_call(action, &payload).await {
            Ok(response) => {
                debug!(action, success = response.success, "NUI callback completed");
                response
            }
            Err(err) => {
                error!(action, error = %err, "NUI callback failed");
                RpcResponse::failure(err.code())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
