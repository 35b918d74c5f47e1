//! Error types for parameter loading, resolution and the channel gate.

use std::path::PathBuf;

use crate::channel::Channel;
use crate::value::ParamType;
use crate::version::FirmwareVersion;

/// Problems found in a parameter document.
///
/// Only [`ConfigError::NotFound`] and [`ConfigError::InvalidSection`] stop
/// startup. Everything else is
/// collected while building the table or resolving a version and the
/// affected entries fall back to the hardware defaults.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("could not find parameter section `{section}`")]
    NotFound { section: String },

    #[error("parameter section `{section}` must be a list of parameter sets, found {found}")]
    InvalidSection { section: String, found: ParamType },

    #[error("malformed parameter `{field}`: {reason}")]
    Malformed { field: String, reason: String },

    #[error("no parameter set matches firmware version {version}, using hardware defaults")]
    VersionUnmatched { version: FirmwareVersion },
}

impl ConfigError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error prevents operating the hand at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidSection { .. })
    }
}

/// Errors reading a parameter or driver configuration file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported mapping key: {0}")]
    InvalidKey(String),
}

/// A force-limit request that arrived while the channels were not enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("force limit for {channel} rejected, channels are not enabled")]
pub struct HardwareGateRejected {
    pub channel: Channel,
}

/// Failures of the connect sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("could not get version info from hand on {device} with retry count {retries}")]
    NoFirmwareInfo { device: String, retries: u32 },

    #[error("could not connect to hand on {device} with retry count {retries}")]
    ConnectFailed { device: String, retries: u32 },
}
