//! Version-dependent parameter resolution for a nine-channel robotic hand.
//!
//! # Architecture
//!
//! ```text
//! parameter file ──yaml──▶ ParamValue ──▶ ParameterTable
//!                                              │ matching(version)
//!                                              ▼
//!                                     ParameterResolver ──▶ Resolution { set, issues }
//!                                                                  │ manager::apply
//!                                                                  ▼
//! HandDriver ── ChannelsEnabled ── ForceLimitGate ──────────▶ HandManager
//! ```
//!
//! Resolution is pure. Only [`driver::HandDriver`] touches the manager.

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod gate;
pub mod manager;
pub mod resolver;
pub mod settings;
pub mod table;
pub mod value;
pub mod version;
pub mod yaml;

pub use channel::{CHANNEL_COUNT, Channel, ChannelSelect, PerChannel};
pub use config::DriverConfig;
pub use driver::HandDriver;
pub use error::{ConfigError, DriverError, HardwareGateRejected, LoadError};
pub use gate::{ChannelsEnabled, ForceLimitGate};
pub use manager::{HandManager, ManagerSettings};
pub use resolver::{ParameterResolver, Resolution, ResolvedParameterSet};
pub use settings::{CurrentSettings, HomeSettings, PositionSettings, SettingsKind};
pub use table::{DEFAULT_SECTION, ParameterTable};
pub use value::ParamValue;
pub use version::{FirmwareVersion, VersionKey};
