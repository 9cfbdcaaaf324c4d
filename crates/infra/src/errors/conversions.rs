//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use tokio_tungstenite::tungstenite::Error as WsError;
use toml::de::Error as TomlError;
use vellum_domain::VellumError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VellumError);

impl From<InfraError> for VellumError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VellumError> for InfraError {
    fn from(value: VellumError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVellumError {
    fn into_vellum(self) -> VellumError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → VellumError */
/* -------------------------------------------------------------------------- */

impl IntoVellumError for KeyringError {
    fn into_vellum(self) -> VellumError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => VellumError::TokenStore("keychain entry not found".into()),
            BadEncoding(_) => {
                VellumError::TokenStore("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => VellumError::TokenStore(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                VellumError::TokenStore(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            Ambiguous(entries) => VellumError::TokenStore(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => VellumError::TokenStore(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                VellumError::TokenStore(format!("unable to access secure storage: {err}"))
            }
            _ => VellumError::TokenStore(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_vellum())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VellumError */
/* -------------------------------------------------------------------------- */

impl IntoVellumError for HttpError {
    fn into_vellum(self) -> VellumError {
        if self.is_timeout() {
            return VellumError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return VellumError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return VellumError::Serialization(format!("failed to decode response body: {self}"));
        }

        if self.is_builder() {
            return VellumError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            return VellumError::Api {
                status: status.as_u16(),
                code: None,
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        VellumError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vellum())
    }
}

/* -------------------------------------------------------------------------- */
/* tungstenite::Error → VellumError */
/* -------------------------------------------------------------------------- */

impl IntoVellumError for WsError {
    fn into_vellum(self) -> VellumError {
        match self {
            WsError::ConnectionClosed | WsError::AlreadyClosed => {
                VellumError::Realtime("realtime connection closed".into())
            }
            WsError::Io(err) => err.into_vellum(),
            WsError::Url(err) => VellumError::Config(format!("invalid realtime URL: {err}")),
            WsError::Http(response) => {
                let status = response.status();
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    VellumError::Auth(format!("realtime handshake rejected with HTTP {status}"))
                } else {
                    VellumError::Realtime(format!("realtime handshake rejected with HTTP {status}"))
                }
            }
            other => VellumError::Realtime(other.to_string()),
        }
    }
}

impl From<WsError> for InfraError {
    fn from(value: WsError) -> Self {
        InfraError(value.into_vellum())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / toml::de::Error → VellumError */
/* -------------------------------------------------------------------------- */

impl IntoVellumError for IoError {
    fn into_vellum(self) -> VellumError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::TimedOut => VellumError::Network("I/O operation timed out".into()),
            ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                VellumError::Network(format!("connection failure: {self}"))
            }
            _ => VellumError::Network(format!("I/O error: {self}")),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_vellum())
    }
}

impl IntoVellumError for TomlError {
    fn into_vellum(self) -> VellumError {
        VellumError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_vellum())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
