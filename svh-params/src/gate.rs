//! The channels-enabled state and the force-limit gate.
//!
//! Reconnects, homing and the diagnostics path all flip the enabled state;
//! force-limit requests read it. Each of them holds a clone of the same
//! [`ChannelsEnabled`] cell.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::channel::Channel;
use crate::error::HardwareGateRejected;
use crate::manager::HandManager;

/// Shared flag telling whether the channels are homed and under control.
#[derive(Debug, Clone, Default)]
pub struct ChannelsEnabled(Arc<AtomicBool>);

impl ChannelsEnabled {
    /// A new, disabled cell.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn enable(&self) {
        self.set(true);
    }

    pub fn disable(&self) {
        self.set(false);
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }

    /// Store `enabled` and return the previous state.
    pub fn replace(&self, enabled: bool) -> bool {
        self.0.swap(enabled, Ordering::AcqRel)
    }
}

/// Lets force limits through only while the channels are enabled.
///
/// Changing limits of channels that are not homed would interfere with the
/// reset and diagnostics sequence.
#[derive(Debug, Clone)]
pub struct ForceLimitGate {
    enabled: ChannelsEnabled,
}

impl ForceLimitGate {
    pub fn new(enabled: ChannelsEnabled) -> Self {
        Self { enabled }
    }

    pub fn set_force_limit<M: HandManager + ?Sized>(
        &self,
        manager: &mut M,
        channel: Channel,
        force_limit: f32,
    ) -> Result<f32, HardwareGateRejected> {
        if !self.enabled.is_enabled() {
            debug!("Force limit for {channel} rejected, channels disabled");
            return Err(HardwareGateRejected { channel });
        }
        Ok(manager.set_force_limit(channel, force_limit))
    }
}
