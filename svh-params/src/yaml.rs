//! YAML parameter file loading.
//!
//! Parameter files hold the version-keyed parameter sets under a top-level
//! section, `VERSIONS_PARAMETERS` by default:
//!
//! ```yaml
//! VERSIONS_PARAMETERS:
//!   - parameter_set:
//!       major_version: 0
//!       minor_version: 0
//!       Thumb_Flexion:
//!         current_controller: [-191.0, 191.0, 0.405, 4e-6, -300.0, 300.0, 0.3, 100.0]
//!   - parameter_set:
//!       major_version: 1
//!       minor_version: 2
//!       current_settings: [null, null, null, [1.0, 2.0, 0.5], null, null, null, null, null]
//! ```
//!
//! The whole document is converted into a [`ParamValue`] tree; this module
//! does not interpret it beyond that.

use std::path::Path;

use serde_yaml::Value;

use crate::error::LoadError;
use crate::value::{ParamValue, Record};

/// Load a YAML file as a [`ParamValue`] tree.
pub fn load_parameter_file(path: &Path) -> Result<ParamValue, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_parameter_string(&content)
}

/// Parse a YAML string as a [`ParamValue`] tree.
pub fn load_parameter_string(yaml: &str) -> Result<ParamValue, LoadError> {
    let doc: Value = serde_yaml::from_str(yaml)?;
    yaml_value_to_param(&doc)
}

/// Convert a YAML value to a ParamValue.
///
/// - integers that fit `i64` stay integers, every other number is a double
/// - sequences keep their elements' own types, mixed or not
/// - mapping keys must be scalars; numbers and booleans are stringified
/// - tags are dropped, the tagged value is kept
pub fn yaml_value_to_param(val: &Value) -> Result<ParamValue, LoadError> {
    Ok(match val {
        Value::Null => ParamValue::Null,
        Value::Bool(b) => ParamValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ParamValue::Integer(i),
            None => ParamValue::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => ParamValue::String(s.clone()),
        Value::Sequence(seq) => ParamValue::Array(
            seq.iter()
                .map(yaml_value_to_param)
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut record = Record::new();
            for (key, value) in map {
                record.insert(mapping_key(key)?, yaml_value_to_param(value)?);
            }
            ParamValue::Record(record)
        }
        Value::Tagged(tagged) => yaml_value_to_param(&tagged.value)?,
    })
}

fn mapping_key(key: &Value) -> Result<String, LoadError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(LoadError::InvalidKey(format!("{other:?}"))),
    }
}
