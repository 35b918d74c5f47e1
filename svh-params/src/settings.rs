//! Per-channel controller settings.
//!
//! The meaning and count of the coefficients belong to the hardware manager;
//! here they are ordered `f32` sequences tagged with the kind they configure.

use serde::Serialize;
use strum::{Display, EnumIter};

/// The three kinds of settings a parameter set can carry per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SettingsKind {
    Position,
    Current,
    Home,
}

impl SettingsKind {
    pub const ALL: [SettingsKind; 3] = [Self::Position, Self::Current, Self::Home];

    /// Key of this kind inside a per-channel block.
    pub fn block_key(self) -> &'static str {
        match self {
            Self::Position => "position_controller",
            Self::Current => "current_controller",
            Self::Home => "home_settings",
        }
    }

    /// Key of the channel-indexed list of this kind at record level.
    pub fn list_key(self) -> &'static str {
        match self {
            Self::Position => "position_settings",
            Self::Current => "current_settings",
            Self::Home => "home_settings",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

macro_rules! settings_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(transparent)]
        pub struct $name(Vec<f32>);

        impl $name {
            pub fn new(coefficients: Vec<f32>) -> Self {
                Self(coefficients)
            }

            pub fn as_slice(&self) -> &[f32] {
                &self.0
            }

            pub fn into_inner(self) -> Vec<f32> {
                self.0
            }
        }

        impl From<Vec<f32>> for $name {
            fn from(coefficients: Vec<f32>) -> Self {
                Self(coefficients)
            }
        }
    };
}

settings_type!(
    /// Position controller coefficients of one channel.
    PositionSettings
);
settings_type!(
    /// Current controller coefficients of one channel.
    CurrentSettings
);
settings_type!(
    /// Homing parameters of one channel.
    HomeSettings
);

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_all_matches_iter() {
        assert_eq!(SettingsKind::iter().collect::<Vec<_>>(), SettingsKind::ALL);
        for (i, kind) in SettingsKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_keys() {
        assert_eq!(SettingsKind::Current.block_key(), "current_controller");
        assert_eq!(SettingsKind::Current.list_key(), "current_settings");
        assert_eq!(SettingsKind::Home.to_string(), "home");
    }

    #[test]
    fn test_settings_newtype() {
        let s = CurrentSettings::from(vec![1.0, 2.0, 0.5]);
        assert_eq!(s.as_slice(), &[1.0, 2.0, 0.5]);
        assert_eq!(s.into_inner(), vec![1.0, 2.0, 0.5]);
    }
}
