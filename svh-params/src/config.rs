//! Driver configuration.
//!
//! These are the launch parameters of the hand driver. Every field has a
//! default, so an empty document is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::channel::{CHANNEL_COUNT, Channel, PerChannel};
use crate::error::LoadError;
use crate::manager::ManagerSettings;
use crate::version::FirmwareVersion;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Reset all channels right after connecting.
    pub autostart: bool,
    pub serial_device: String,
    /// Channels the manager must leave alone, in hardware order.
    pub disable_flags: [bool; CHANNEL_COUNT],
    /// Seconds a channel reset may take.
    pub reset_timeout: u32,
    pub name_prefix: String,
    pub connect_retry_count: u32,
    /// Fraction of the maximal force the fingers may use.
    pub maximal_force: f32,
    /// Non-zero values force this firmware version instead of asking the hand.
    pub use_major_version: u16,
    pub use_minor_version: u16,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            autostart: false,
            serial_device: "/dev/ttyUSB0".to_string(),
            disable_flags: [false; CHANNEL_COUNT],
            reset_timeout: 5,
            name_prefix: "left_hand".to_string(),
            connect_retry_count: 3,
            maximal_force: 0.8,
            use_major_version: 0,
            use_minor_version: 0,
        }
    }
}

impl DriverConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// The forced firmware version, if one was configured.
    pub fn forced_version(&self) -> Option<FirmwareVersion> {
        let version = FirmwareVersion::new(self.use_major_version, self.use_minor_version);
        (!version.is_unknown()).then_some(version)
    }

    pub fn disabled_channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::all().filter(|c| self.disable_flags[c.index()])
    }

    /// Settings handed to the hand manager when the driver is built.
    pub fn manager_settings(&self) -> ManagerSettings {
        ManagerSettings {
            disabled: PerChannel::from(self.disable_flags),
            reset_timeout: Duration::from_secs(u64::from(self.reset_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = DriverConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.forced_version(), None);
        assert_eq!(config.disabled_channels().count(), 0);
    }

    #[test]
    fn test_partial_document() {
        let config = DriverConfig::from_yaml_str(
            r#"
autostart: true
serial_device: /dev/ttyUSB1
disable_flags: [false, false, false, false, false, false, false, true, false]
use_major_version: 1
"#,
        )
        .unwrap();
        assert!(config.autostart);
        assert_eq!(config.serial_device, "/dev/ttyUSB1");
        assert_eq!(config.connect_retry_count, 3);
        assert_eq!(config.forced_version(), Some(FirmwareVersion::new(1, 0)));
        assert_eq!(
            config.disabled_channels().collect::<Vec<_>>(),
            vec![Channel::Pinky]
        );
    }

    #[test]
    fn test_manager_settings() {
        let config = DriverConfig::from_yaml_str(
            r#"
reset_timeout: 12
disable_flags: [true, false, false, false, false, false, false, false, true]
"#,
        )
        .unwrap();
        let settings = config.manager_settings();
        assert_eq!(settings.reset_timeout, Duration::from_secs(12));
        assert!(settings.disabled[Channel::ThumbFlexion]);
        assert!(settings.disabled[Channel::FingerSpread]);
        assert_eq!(settings.disabled.values().filter(|d| **d).count(), 2);
    }

    #[test]
    fn test_wrong_flag_count_rejected() {
        assert!(DriverConfig::from_yaml_str("disable_flags: [true, false]").is_err());
    }

    #[test]
    fn test_non_boolean_flag_rejected() {
        let yaml = "disable_flags: [1, 0, 0, 0, 0, 0, 0, 0, 0]";
        assert!(DriverConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(DriverConfig::from_yaml_str("max_force: 0.5").is_err());
    }
}
