//! The hardware channel manager seam.

use std::time::Duration;

use tracing::debug;

use crate::channel::{Channel, ChannelSelect, PerChannel};
use crate::resolver::ResolvedParameterSet;
use crate::settings::{CurrentSettings, HomeSettings, PositionSettings};
use crate::version::FirmwareVersion;

/// Launch settings a manager receives once, before any other call.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSettings {
    /// Channels the manager must leave alone.
    pub disabled: PerChannel<bool>,
    /// Time a channel reset may take before it counts as failed.
    pub reset_timeout: Duration,
}

/// Operations of the finger manager owned by the hand driver library.
///
/// Implementations talk to the hand; everything in this crate only calls
/// through this trait.
pub trait HandManager {
    fn configure(&mut self, settings: &ManagerSettings);

    fn set_current_settings(&mut self, channel: Channel, settings: CurrentSettings);
    fn set_position_settings(&mut self, channel: Channel, settings: PositionSettings);
    fn set_home_settings(&mut self, channel: Channel, settings: HomeSettings);

    /// Set the force limit of a channel, returning the limit actually applied.
    fn set_force_limit(&mut self, channel: Channel, force_limit: f32) -> f32;

    /// Scale the maximal force of all channels, `0.0..=1.0`.
    fn set_max_force(&mut self, max_force: f32);

    fn is_connected(&self) -> bool;
    fn connect(&mut self, device: &str, retries: u32) -> bool;
    fn disconnect(&mut self);

    fn reset_channel(&mut self, channels: ChannelSelect) -> bool;
    fn is_homed(&self, channels: ChannelSelect) -> bool;
    fn enable_channel(&mut self, channels: ChannelSelect);

    /// Read the firmware version, [`FirmwareVersion::UNKNOWN`] on failure.
    fn firmware_info(&mut self, device: &str, retries: u32) -> FirmwareVersion;
}

/// Program the given entries of `set` into the manager.
///
/// Absent entries are skipped so the manager keeps its defaults. Returns
/// the number of entries written.
pub fn apply<M: HandManager + ?Sized>(set: &ResolvedParameterSet, manager: &mut M) -> usize {
    let mut applied = 0;
    for channel in Channel::all() {
        if let Some(settings) = &set.current[channel] {
            manager.set_current_settings(channel, settings.clone());
            applied += 1;
        }
        if let Some(settings) = &set.position[channel] {
            manager.set_position_settings(channel, settings.clone());
            applied += 1;
        }
        if let Some(settings) = &set.home[channel] {
            manager.set_home_settings(channel, settings.clone());
            applied += 1;
        }
    }
    debug!("Applied {applied} settings for firmware {}", set.version);
    applied
}
