#![allow(dead_code)]

use std::sync::{Arc, mpsc};
use std::time::Duration;

use parking_lot::Mutex;
use svh_params::{
    Channel, ChannelSelect, CurrentSettings, DEFAULT_SECTION, FirmwareVersion, HandManager,
    HomeSettings, ManagerSettings, ParameterTable, PositionSettings, yaml::load_parameter_string,
};

/// Calls received by [`RecordingManager`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Current(Channel, Vec<f32>),
    Position(Channel, Vec<f32>),
    Home(Channel, Vec<f32>),
    ForceLimit(Channel, f32),
    MaxForce(f32),
    Connect(String, u32),
    Disconnect,
    Reset(ChannelSelect),
    Enable(ChannelSelect),
    FirmwareInfo(String, u32),
}

/// Hand manager double that records every call.
///
/// The log is shared so tests can inspect it after the manager moved into
/// a driver.
#[derive(Debug, Clone)]
pub struct RecordingManager {
    pub log: Arc<Mutex<Vec<Call>>>,
    /// Settings received through `configure`, kept apart from the call log.
    pub settings: Arc<Mutex<Option<ManagerSettings>>>,
    /// Notified when a reset begins, before `reset_delay` elapses.
    pub reset_started: Option<mpsc::Sender<()>>,
    pub reset_delay: Duration,
    pub firmware: FirmwareVersion,
    pub connect_ok: bool,
    pub reset_ok: bool,
    pub homed: bool,
    pub connected: bool,
}

impl RecordingManager {
    pub fn new(firmware: FirmwareVersion) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            settings: Arc::new(Mutex::new(None)),
            reset_started: None,
            reset_delay: Duration::ZERO,
            firmware,
            connect_ok: true,
            reset_ok: true,
            homed: false,
            connected: false,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().clone()
    }

    fn record(&self, call: Call) {
        self.log.lock().push(call);
    }
}

impl HandManager for RecordingManager {
    fn configure(&mut self, settings: &ManagerSettings) {
        *self.settings.lock() = Some(settings.clone());
    }

    fn set_current_settings(&mut self, channel: Channel, settings: CurrentSettings) {
        self.record(Call::Current(channel, settings.into_inner()));
    }

    fn set_position_settings(&mut self, channel: Channel, settings: PositionSettings) {
        self.record(Call::Position(channel, settings.into_inner()));
    }

    fn set_home_settings(&mut self, channel: Channel, settings: HomeSettings) {
        self.record(Call::Home(channel, settings.into_inner()));
    }

    fn set_force_limit(&mut self, channel: Channel, force_limit: f32) -> f32 {
        self.record(Call::ForceLimit(channel, force_limit));
        force_limit
    }

    fn set_max_force(&mut self, max_force: f32) {
        self.record(Call::MaxForce(max_force));
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, device: &str, retries: u32) -> bool {
        self.record(Call::Connect(device.to_string(), retries));
        self.connected = self.connect_ok;
        self.connect_ok
    }

    fn disconnect(&mut self) {
        self.record(Call::Disconnect);
        self.connected = false;
    }

    fn reset_channel(&mut self, channels: ChannelSelect) -> bool {
        self.record(Call::Reset(channels));
        if let Some(started) = &self.reset_started {
            let _ = started.send(());
        }
        std::thread::sleep(self.reset_delay);
        self.reset_ok
    }

    fn is_homed(&self, _channels: ChannelSelect) -> bool {
        self.homed
    }

    fn enable_channel(&mut self, channels: ChannelSelect) {
        self.record(Call::Enable(channels));
    }

    fn firmware_info(&mut self, device: &str, retries: u32) -> FirmwareVersion {
        self.record(Call::FirmwareInfo(device.to_string(), retries));
        self.firmware
    }
}

pub const SAMPLE_PARAMETERS: &str = include_str!("../../config/svh_parameters.yaml");

pub fn table(yaml: &str) -> ParameterTable {
    let doc = load_parameter_string(yaml).expect("Failed to parse parameters");
    ParameterTable::from_document(&doc, DEFAULT_SECTION).expect("Failed to build table")
}
