//! Version-keyed parameter sets.
//!
//! A [`ParameterTable`] is built once from a parameter document and answers
//! one question: which parameter sets apply to a given firmware version, and
//! in which order of precedence.

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::value::{ParamValue, Record};
use crate::version::{FirmwareVersion, VersionKey};

/// Section holding the parameter sets in a parameter document.
pub const DEFAULT_SECTION: &str = "VERSIONS_PARAMETERS";

const PARAMETER_SET: &str = "parameter_set";
const MAJOR_VERSION: &str = "major_version";
const MINOR_VERSION: &str = "minor_version";
const MIN_VERSION: &str = "min_version";
const MAX_VERSION: &str = "max_version";

/// Keys of a parameter set that describe its version rather than settings.
pub(crate) const VERSION_FIELDS: [&str; 4] = [MAJOR_VERSION, MINOR_VERSION, MIN_VERSION, MAX_VERSION];

/// One parameter set of the document with its parsed version key.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRecord {
    position: usize,
    key: VersionKey,
    body: Record,
    path: String,
}

impl VersionRecord {
    /// Position of the set in the document.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn key(&self) -> VersionKey {
        self.key
    }

    /// The raw `parameter_set` mapping, version fields included.
    pub fn body(&self) -> &Record {
        &self.body
    }

    /// Field path of the set, used to name fields in reports.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Immutable table of parameter sets.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    records: Vec<VersionRecord>,
    issues: Vec<ConfigError>,
}

impl ParameterTable {
    /// Build the table from the `section` of a parameter document.
    ///
    /// A missing section, or one that is not a list, is fatal. Sets that cannot be read (not a mapping,
    /// no `parameter_set`, bad version key) are dropped whole and reported
    /// through [`ParameterTable::issues`].
    pub fn from_document(doc: &ParamValue, section: &str) -> Result<Self, ConfigError> {
        let sets = doc.get(section).ok_or_else(|| ConfigError::NotFound {
            section: section.to_string(),
        })?;
        let items = sets.as_array().ok_or_else(|| ConfigError::InvalidSection {
            section: section.to_string(),
            found: sets.param_type(),
        })?;

        let mut table = Self::default();
        for (position, item) in items.iter().enumerate() {
            let path = format!("{section}[{position}].{PARAMETER_SET}");
            match parse_record(item, position, &path) {
                Ok(record) => {
                    debug!("[TBL] {} filed under version {}", record.path, record.key);
                    table.records.push(record);
                }
                Err(err) => {
                    warn!("Discarding parameter set: {err}");
                    table.issues.push(err);
                }
            }
        }
        Ok(table)
    }

    pub fn records(&self) -> &[VersionRecord] {
        &self.records
    }

    /// Problems found while building the table.
    pub fn issues(&self) -> &[ConfigError] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sets applicable to `version`, most specific first.
    ///
    /// Sets of equal specificity keep document order, which makes the first
    /// of them win; that situation is logged because the file is ambiguous.
    pub fn matching(&self, version: FirmwareVersion) -> Vec<&VersionRecord> {
        let mut matched: Vec<&VersionRecord> = self
            .records
            .iter()
            .filter(|r| r.key.matches(version))
            .collect();
        matched.sort_by(|a, b| {
            b.key
                .specificity()
                .cmp(&a.key.specificity())
                .then(a.position.cmp(&b.position))
        });

        for pair in matched.windows(2) {
            if pair[0].key.specificity() == pair[1].key.specificity() {
                warn!(
                    "Parameter sets {} and {} both match version {} equally, {} takes precedence",
                    pair[0].path, pair[1].path, version, pair[0].path
                );
            }
        }
        matched
    }
}

fn parse_record(item: &ParamValue, position: usize, path: &str) -> Result<VersionRecord, ConfigError> {
    let body = item
        .get(PARAMETER_SET)
        .ok_or_else(|| ConfigError::malformed(path, "missing parameter set"))?
        .as_record()
        .ok_or_else(|| ConfigError::malformed(path, "parameter set must be a mapping"))?;

    Ok(VersionRecord {
        position,
        key: parse_version_key(body, path)?,
        body: body.clone(),
        path: path.to_string(),
    })
}

/// Read the version key of a parameter set.
///
/// `major_version`/`minor_version` and `min_version`/`max_version` are
/// mutually exclusive. `0.0` is the wildcard set.
fn parse_version_key(body: &Record, path: &str) -> Result<VersionKey, ConfigError> {
    let major = version_number(body, MAJOR_VERSION, path)?;
    let minor = version_number(body, MINOR_VERSION, path)?;
    let min = version_bound(body, MIN_VERSION, path)?;
    let max = version_bound(body, MAX_VERSION, path)?;

    let has_point = major.is_some() || minor.is_some();
    let has_range = min.is_some() || max.is_some();

    match (has_point, has_range) {
        (true, true) => Err(ConfigError::malformed(
            path,
            "both major/minor and min/max version given",
        )),
        (false, false) => Err(ConfigError::malformed(
            format!("{path}.{MAJOR_VERSION}"),
            "parameter set has no version",
        )),
        (false, true) => {
            if let (Some(lo), Some(hi)) = (min, max)
                && lo > hi
            {
                return Err(ConfigError::malformed(
                    path,
                    format!("empty version range [{lo}, {hi}]"),
                ));
            }
            Ok(VersionKey::Range { min, max })
        }
        (true, false) => match (major, minor) {
            (Some(0), Some(0)) => Ok(VersionKey::Any),
            (Some(major), Some(minor)) => Ok(VersionKey::Exact(FirmwareVersion::new(major, minor))),
            (Some(major), None) => Ok(VersionKey::Major(major)),
            (None, _) => Err(ConfigError::malformed(
                format!("{path}.{MAJOR_VERSION}"),
                "minor version given without major version",
            )),
        },
    }
}

fn version_number(body: &Record, key: &str, path: &str) -> Result<Option<u16>, ConfigError> {
    let Some(value) = body.get(key) else {
        return Ok(None);
    };
    to_u16(value)
        .map(Some)
        .ok_or_else(|| ConfigError::malformed(format!("{path}.{key}"), expected_u16(value)))
}

fn version_bound(
    body: &Record,
    key: &str,
    path: &str,
) -> Result<Option<FirmwareVersion>, ConfigError> {
    let Some(value) = body.get(key) else {
        return Ok(None);
    };
    let field = format!("{path}.{key}");
    match value.as_array() {
        Some([major, minor]) => {
            let major = to_u16(major)
                .ok_or_else(|| ConfigError::malformed(format!("{field}[0]"), expected_u16(major)))?;
            let minor = to_u16(minor)
                .ok_or_else(|| ConfigError::malformed(format!("{field}[1]"), expected_u16(minor)))?;
            Ok(Some(FirmwareVersion::new(major, minor)))
        }
        _ => Err(ConfigError::malformed(field, "expected [major, minor]")),
    }
}

fn to_u16(value: &ParamValue) -> Option<u16> {
    value.as_integer().and_then(|v| u16::try_from(v).ok())
}

fn expected_u16(value: &ParamValue) -> String {
    format!("expected an integer in 0..=65535, found {value:?}")
}
