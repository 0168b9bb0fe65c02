//! Connection settings for the JSON-RPC clients.

use std::env;

use serde::Deserialize;

use crate::error::ClientError;

/// Credentials and endpoint of a JSON-RPC node. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClientConfig")]
pub struct ClientConfig {
    user: String,
    pass: String,
    host: String,
    port: u16,
}

#[derive(Deserialize)]
struct RawClientConfig {
    user: String,
    pass: String,
    host: String,
    port: u16,
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = ClientError;

    fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
        ClientConfig::new(raw.user, raw.pass, raw.host, raw.port)
    }
}

impl ClientConfig {
    pub fn new(
        user: impl Into<String>,
        pass: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Result<Self, ClientError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ClientError::Config("rpc host must not be empty".to_owned()));
        }

        Ok(Self {
            user: user.into(),
            pass: pass.into(),
            host,
            port,
        })
    }

    /// Load `{PREFIX}_RPC_USER`, `{PREFIX}_RPC_PASS`, `{PREFIX}_RPC_HOST` and
    /// `{PREFIX}_RPC_PORT` from the process environment.
    pub fn from_env(prefix: &str) -> Result<Self, ClientError> {
        let read = |name: &str| {
            let key = format!("{prefix}_RPC_{name}");
            env::var(&key).map_err(|e| ClientError::Config(format!("{key}: {e}")))
        };

        let port_key = format!("{prefix}_RPC_PORT");
        let port = read("PORT")?
            .parse::<u16>()
            .map_err(|e| ClientError::Config(format!("{port_key}: {e}")))?;

        Self::new(read("USER")?, read("PASS")?, read("HOST")?, port)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pass(&self) -> &str {
        &self.pass
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Target URL. Hosts that already carry an `http://` or `https://`
    /// scheme are used as-is; anything else gets `http://`.
    pub fn url(&self) -> String {
        if has_http_scheme(&self.host) {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

fn has_http_scheme(host: &str) -> bool {
    host.starts_with("http://") || host.starts_with("https://")
}
