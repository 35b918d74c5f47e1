//! Resolution of per-channel settings for a firmware version.
//!
//! The resolver walks the parameter sets matching a version from most to
//! least specific. For every channel and settings kind the first set that
//! mentions the entry decides it:
//!
//! - a valid coefficient list becomes the resolved value,
//! - an invalid one is reported and leaves the entry absent, so the hand
//!   manager keeps its built-in default rather than a less specific value.
//!
//! Entries no set mentions stay absent. Nothing is ever filled with zeros.

use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::channel::{CHANNEL_COUNT, Channel, PerChannel};
use crate::error::ConfigError;
use crate::settings::{CurrentSettings, HomeSettings, PositionSettings, SettingsKind};
use crate::table::{ParameterTable, VERSION_FIELDS, VersionRecord};
use crate::value::ParamValue;
use crate::version::FirmwareVersion;

/// Settings to program into the hand for one firmware version.
///
/// `None` means "not given": the hand manager keeps its own default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParameterSet {
    pub version: FirmwareVersion,
    pub position: PerChannel<Option<PositionSettings>>,
    pub current: PerChannel<Option<CurrentSettings>>,
    pub home: PerChannel<Option<HomeSettings>>,
}

impl ResolvedParameterSet {
    /// A set with nothing given.
    pub fn empty(version: FirmwareVersion) -> Self {
        Self {
            version,
            position: PerChannel::default(),
            current: PerChannel::default(),
            home: PerChannel::default(),
        }
    }

    /// Whether `kind` was given for `channel`.
    pub fn is_given(&self, kind: SettingsKind, channel: Channel) -> bool {
        match kind {
            SettingsKind::Position => self.position[channel].is_some(),
            SettingsKind::Current => self.current[channel].is_some(),
            SettingsKind::Home => self.home[channel].is_some(),
        }
    }

    /// Number of given entries over all channels and kinds.
    pub fn given_count(&self) -> usize {
        SettingsKind::ALL
            .iter()
            .flat_map(|&kind| Channel::all().map(move |c| (kind, c)))
            .filter(|&(kind, c)| self.is_given(kind, c))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.given_count() == 0
    }
}

/// Outcome of a resolution: the set plus every recovered problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub set: ResolvedParameterSet,
    pub issues: Vec<ConfigError>,
}

/// What one parameter set says about one channel and kind.
#[derive(Debug, Clone, Default, PartialEq)]
enum Entry {
    #[default]
    Absent,
    Given(Vec<f32>),
    Invalid,
}

/// All entries of one parameter set, indexed by [`SettingsKind::index`].
type RecordEntries = [PerChannel<Entry>; 3];

/// Resolves [`ResolvedParameterSet`]s against a [`ParameterTable`].
#[derive(Debug, Clone, Copy)]
pub struct ParameterResolver<'a> {
    table: &'a ParameterTable,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(table: &'a ParameterTable) -> Self {
        Self { table }
    }

    /// Resolve the settings for `version`.
    ///
    /// Pure: the same table and version always give the same result.
    pub fn resolve(&self, version: FirmwareVersion) -> Resolution {
        let mut issues = Vec::new();
        let matched = self.table.matching(version);

        if matched.is_empty() {
            let err = ConfigError::VersionUnmatched { version };
            warn!("{err}");
            issues.push(err);
            return Resolution {
                set: ResolvedParameterSet::empty(version),
                issues,
            };
        }

        let mut decided: RecordEntries = Default::default();
        for record in matched {
            debug!("[RES] applying {} ({}) for {}", record.path(), record.key(), version);
            let entries = extract_record(record, &mut issues);
            for kind in SettingsKind::ALL {
                let target = &mut decided[kind.index()];
                for (channel, entry) in entries[kind.index()].iter() {
                    if target[channel] == Entry::Absent && *entry != Entry::Absent {
                        target[channel] = entry.clone();
                    }
                }
            }
        }

        let [position, current, home] = decided;
        let set = ResolvedParameterSet {
            version,
            position: settings_from(position),
            current: settings_from(current),
            home: settings_from(home),
        };
        debug!("[RES] {} entries given for {}", set.given_count(), version);
        Resolution { set, issues }
    }
}

fn settings_from<T: From<Vec<f32>>>(entries: PerChannel<Entry>) -> PerChannel<Option<T>> {
    let mut out = PerChannel::default();
    for (channel, entry) in entries.iter() {
        if let Entry::Given(coefficients) = entry {
            out[channel] = Some(T::from(coefficients.clone()));
        }
    }
    out
}

/// Read every override of one parameter set.
///
/// Per-kind lists are read first; per-channel blocks then replace the
/// entries they mention.
fn extract_record(record: &VersionRecord, issues: &mut Vec<ConfigError>) -> RecordEntries {
    let mut entries: RecordEntries = Default::default();
    let body = record.body();
    let path = record.path();

    for kind in SettingsKind::ALL {
        if let Some(list) = body.get(kind.list_key()) {
            let field = format!("{path}.{}", kind.list_key());
            entries[kind.index()] = extract_list(list, &field, issues);
        }
    }

    for (key, value) in body {
        if VERSION_FIELDS.contains(&key.as_str())
            || SettingsKind::ALL.iter().any(|k| k.list_key() == key.as_str())
        {
            continue;
        }
        let field = format!("{path}.{key}");
        let Ok(channel) = Channel::from_str(key) else {
            report(issues, ConfigError::malformed(field, "unknown channel"));
            continue;
        };
        let Some(block) = value.as_record() else {
            report(
                issues,
                ConfigError::malformed(
                    field,
                    format!("channel block must be a mapping, found {}", value.param_type()),
                ),
            );
            continue;
        };

        for block_key in block.keys() {
            if !SettingsKind::ALL.iter().any(|k| k.block_key() == block_key.as_str()) {
                report(
                    issues,
                    ConfigError::malformed(format!("{field}.{block_key}"), "unknown settings kind"),
                );
            }
        }
        for kind in SettingsKind::ALL {
            if let Some(value) = block.get(kind.block_key()) {
                let field = format!("{field}.{}", kind.block_key());
                if entries[kind.index()][channel] != Entry::Absent {
                    debug!("[RES] {field} replaces the {} list entry", kind.list_key());
                }
                entries[kind.index()][channel] = extract_entry(value, &field, issues);
            }
        }
    }
    entries
}

/// Read a channel-indexed list. `null` elements are "not given".
fn extract_list(
    list: &ParamValue,
    field: &str,
    issues: &mut Vec<ConfigError>,
) -> PerChannel<Entry> {
    let items = match list.as_array() {
        Some(items) if items.len() == CHANNEL_COUNT => items,
        Some(items) => {
            report(
                issues,
                ConfigError::malformed(
                    field,
                    format!("expected {CHANNEL_COUNT} channel entries, found {}", items.len()),
                ),
            );
            return PerChannel::from_fn(|_| Entry::Invalid);
        }
        None => {
            report(
                issues,
                ConfigError::malformed(
                    field,
                    format!("expected a list of channel entries, found {}", list.param_type()),
                ),
            );
            return PerChannel::from_fn(|_| Entry::Invalid);
        }
    };

    PerChannel::from_fn(|channel| {
        let item = &items[channel.index()];
        if item.is_null() {
            Entry::Absent
        } else {
            extract_entry(item, &format!("{field}[{}]", channel.index()), issues)
        }
    })
}

fn extract_entry(value: &ParamValue, field: &str, issues: &mut Vec<ConfigError>) -> Entry {
    match to_coefficients(value, field) {
        Ok(coefficients) => Entry::Given(coefficients),
        Err(err) => {
            report(issues, err);
            Entry::Invalid
        }
    }
}

/// Convert a list of numbers to coefficients.
///
/// Integers and doubles are accepted. Any other element, a number that is
/// not finite once narrowed to `f32`, or an empty list rejects the whole
/// entry.
pub fn to_coefficients(value: &ParamValue, field: &str) -> Result<Vec<f32>, ConfigError> {
    let items = value.as_array().ok_or_else(|| {
        ConfigError::malformed(
            field,
            format!("expected a list of numbers, found {}", value.param_type()),
        )
    })?;
    if items.is_empty() {
        return Err(ConfigError::malformed(field, "empty coefficient list"));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_number() {
            Some(v) => {
                let coefficient = v as f32;
                if coefficient.is_finite() {
                    Ok(coefficient)
                } else {
                    Err(ConfigError::malformed(
                        format!("{field}[{i}]"),
                        format!("coefficient {v} is not a finite 32-bit float"),
                    ))
                }
            }
            None => Err(ConfigError::malformed(
                format!("{field}[{i}]"),
                format!("expected a number, found {}", item.param_type()),
            )),
        })
        .collect()
}

fn report(issues: &mut Vec<ConfigError>, err: ConfigError) {
    warn!("{err}");
    issues.push(err);
}
