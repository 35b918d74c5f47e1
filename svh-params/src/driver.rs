//! Hand driver: connects the hand, programs version-dependent parameters
//! and serves the homing and force-limit commands.
//!
//! All methods take `&self`; the manager sits behind a mutex so command
//! handlers can share one driver across threads. The driver changes the
//! enabled state only while holding that mutex, so a reconnect cannot
//! interleave with a homing sequence and leave an un-homed hand enabled.

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::channel::{Channel, ChannelSelect, PerChannel};
use crate::config::DriverConfig;
use crate::error::{DriverError, HardwareGateRejected};
use crate::gate::{ChannelsEnabled, ForceLimitGate};
use crate::manager::{self, HandManager};
use crate::resolver::{ParameterResolver, Resolution};
use crate::table::ParameterTable;
use crate::version::FirmwareVersion;

pub struct HandDriver<M: HandManager> {
    config: DriverConfig,
    manager: Mutex<M>,
    table: ParameterTable,
    enabled: ChannelsEnabled,
    gate: ForceLimitGate,
    /// Forced by configuration, or read from the hand on first connect.
    firmware: Mutex<FirmwareVersion>,
}

impl<M: HandManager> HandDriver<M> {
    /// Build the driver and hand the launch settings to `manager`.
    pub fn new(config: DriverConfig, mut manager: M, table: ParameterTable) -> Self {
        info!("Name prefix for this hand was set to: {}", config.name_prefix);

        let firmware = match config.forced_version() {
            Some(version) => {
                info!("Forced hand version {version}");
                version
            }
            None => FirmwareVersion::UNKNOWN,
        };
        for channel in config.disabled_channels() {
            warn!("Disabling channel {} ({channel})", channel.index());
        }
        manager.configure(&config.manager_settings());

        let enabled = ChannelsEnabled::new();
        Self {
            config,
            manager: Mutex::new(manager),
            table,
            gate: ForceLimitGate::new(enabled.clone()),
            enabled,
            firmware: Mutex::new(firmware),
        }
    }

    /// Connect, reset all channels when `autostart` is set, then apply the
    /// configured maximal force.
    pub fn start(&self) -> Result<(), DriverError> {
        let connected = self.connect();

        if self.config.autostart {
            let mut manager = self.manager.lock();
            if connected.is_ok() && manager.reset_channel(ChannelSelect::All) {
                info!("Driver was autostarted, input can now be sent");
                self.enabled.enable();
            } else {
                error!("Tried to reset the fingers by autostart: not succeeded");
            }
        } else {
            info!("Hand driver ready, connect and reset the fingers before using the hand");
        }

        self.manager.lock().set_max_force(self.config.maximal_force);
        connected
    }

    /// (Re)connect to the hand.
    ///
    /// Channels are disabled for the whole sequence and stay disabled; they
    /// must be homed again before force limits are accepted.
    pub fn connect(&self) -> Result<(), DriverError> {
        let device = self.config.serial_device.as_str();
        let retries = self.config.connect_retry_count;

        let mut manager = self.manager.lock();
        self.enabled.disable();
        if manager.is_connected() {
            manager.disconnect();
        }

        let version = {
            let mut firmware = self.firmware.lock();
            if firmware.is_unknown() {
                *firmware = manager.firmware_info(device, retries);
                info!("Current hand version {}", *firmware);
            }
            *firmware
        };
        if version.is_unknown() {
            let err = DriverError::NoFirmwareInfo {
                device: device.to_string(),
                retries,
            };
            error!("{err}");
            return Err(err);
        }

        self.apply_parameters(&mut *manager, version);

        if !manager.connect(device, retries) {
            let err = DriverError::ConnectFailed {
                device: device.to_string(),
                retries,
            };
            error!("{err}");
            return Err(err);
        }
        Ok(())
    }

    /// Resolve the parameters for `version` and program them.
    pub fn init_parameters(&self, version: FirmwareVersion) -> Resolution {
        let mut manager = self.manager.lock();
        self.apply_parameters(&mut *manager, version)
    }

    fn apply_parameters(&self, manager: &mut M, version: FirmwareVersion) -> Resolution {
        let resolution = ParameterResolver::new(&self.table).resolve(version);
        if !resolution.issues.is_empty() {
            warn!(
                "{} parameter problem(s) for version {version}, affected entries keep their defaults",
                resolution.issues.len()
            );
        }
        manager::apply(&resolution.set, manager);
        resolution
    }

    pub fn enable_channel(&self, channel: Channel) {
        self.manager.lock().enable_channel(ChannelSelect::One(channel));
    }

    /// Reset every channel; channels are enabled again only on success.
    pub fn home_all(&self) -> bool {
        let mut manager = self.manager.lock();
        self.enabled.disable();
        let success = manager.reset_channel(ChannelSelect::All);
        if success {
            info!("Successfully reset all channels");
            self.enabled.enable();
        }
        success
    }

    /// Reset the listed channels.
    ///
    /// Channels are enabled afterwards if they were enabled before or if
    /// every channel now reports homed. Individual reset failures are left
    /// to the manager to report.
    pub fn home_by_ids(&self, channels: &[Channel]) -> bool {
        let mut manager = self.manager.lock();
        let enabled_before = self.enabled.replace(false);
        if !enabled_before {
            warn!("After resetting the requested channels the control loop will not be enabled");
        }

        for &channel in channels {
            manager.reset_channel(ChannelSelect::One(channel));
        }
        if enabled_before || manager.is_homed(ChannelSelect::All) {
            self.enabled.enable();
        }
        true
    }

    pub fn set_force_limit_by_id(
        &self,
        channel: Channel,
        force_limit: f32,
    ) -> Result<f32, HardwareGateRejected> {
        self.gate
            .set_force_limit(&mut *self.manager.lock(), channel, force_limit)
    }

    pub fn set_all_force_limits(
        &self,
        force_limits: &PerChannel<f32>,
    ) -> PerChannel<Result<f32, HardwareGateRejected>> {
        let mut manager = self.manager.lock();
        PerChannel::from_fn(|channel| {
            self.gate
                .set_force_limit(&mut *manager, channel, force_limits[channel])
        })
    }

    /// The shared enabled cell, for the diagnostics path.
    pub fn channels_enabled(&self) -> ChannelsEnabled {
        self.enabled.clone()
    }

    /// Firmware version used for parameter resolution, `0.0` until known.
    pub fn firmware_version(&self) -> FirmwareVersion {
        *self.firmware.lock()
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the manager.
    pub fn with_manager<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut *self.manager.lock())
    }
}

impl<M: HandManager> Drop for HandDriver<M> {
    fn drop(&mut self) {
        self.manager.get_mut().disconnect();
    }
}
