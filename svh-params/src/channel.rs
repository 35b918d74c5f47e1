//! Hand channels and fixed-size per-channel containers.

use std::ops::{Index, IndexMut};

use serde::ser::{Serialize, SerializeMap, Serializer};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator};

/// Number of independently controlled channels on the hand.
pub const CHANNEL_COUNT: usize = 9;

/// One actuated joint of the hand, in hardware order.
///
/// The string form is the name used as a key in parameter files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum Channel {
    #[strum(serialize = "Thumb_Flexion")]
    ThumbFlexion = 0,
    #[strum(serialize = "Thumb_Opposition")]
    ThumbOpposition = 1,
    #[strum(serialize = "Index_Finger_Distal")]
    IndexFingerDistal = 2,
    #[strum(serialize = "Index_Finger_Proximal")]
    IndexFingerProximal = 3,
    #[strum(serialize = "Middle_Finger_Distal")]
    MiddleFingerDistal = 4,
    #[strum(serialize = "Middle_Finger_Proximal")]
    MiddleFingerProximal = 5,
    #[strum(serialize = "Ring_Finger")]
    RingFinger = 6,
    #[strum(serialize = "Pinky")]
    Pinky = 7,
    #[strum(serialize = "Finger_Spread")]
    FingerSpread = 8,
}

const _: () = assert!(<Channel as EnumCount>::COUNT == CHANNEL_COUNT);

impl Channel {
    /// All channels in hardware order, built from the discriminants.
    pub const ALL: [Channel; CHANNEL_COUNT] = {
        let mut all = [Self::ThumbFlexion; CHANNEL_COUNT];
        let mut i = 0;
        while i < CHANNEL_COUNT {
            all[i] = match Self::from_repr(i as u8) {
                Some(channel) => channel,
                None => panic!("channel discriminants must be 0..CHANNEL_COUNT"),
            };
            i += 1;
        }
        all
    };

    /// Position of the channel in hardware order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::from_repr)
    }

    /// All channels in hardware order.
    pub fn all() -> impl Iterator<Item = Channel> {
        Self::iter()
    }
}

/// Target of a reset, homing or enable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelSelect {
    All,
    One(Channel),
}

impl From<Channel> for ChannelSelect {
    fn from(channel: Channel) -> Self {
        Self::One(channel)
    }
}

/// Exactly one `T` per channel.
///
/// The length is part of the type, so a container built from a list of
/// the wrong cardinality cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct PerChannel<T>([T; CHANNEL_COUNT]);

impl<T> PerChannel<T> {
    pub fn from_fn(f: impl FnMut(Channel) -> T) -> Self {
        Self(Channel::ALL.map(f))
    }

    /// Iterate in hardware order together with the owning channel.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::all().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_array(&self) -> &[T; CHANNEL_COUNT] {
        &self.0
    }
}

impl<T: Default> Default for PerChannel<T> {
    fn default() -> Self {
        Self(std::array::from_fn(|_| T::default()))
    }
}

impl<T> From<[T; CHANNEL_COUNT]> for PerChannel<T> {
    fn from(values: [T; CHANNEL_COUNT]) -> Self {
        Self(values)
    }
}

impl<T> Index<Channel> for PerChannel<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.0[channel.index()]
    }
}

impl<T> IndexMut<Channel> for PerChannel<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.0[channel.index()]
    }
}

/// Serialized as a map keyed by channel name, in hardware order.
impl<T: Serialize> Serialize for PerChannel<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CHANNEL_COUNT))?;
        for (channel, value) in self.iter() {
            map.serialize_entry(channel.as_ref(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_names_round_trip() {
        for channel in Channel::all() {
            assert_eq!(Channel::from_str(channel.as_ref()), Ok(channel));
        }
        assert_eq!(Channel::RingFinger.to_string(), "Ring_Finger");
        assert!(Channel::from_str("Little_Toe").is_err());
    }

    #[test]
    fn test_index_mapping() {
        assert_eq!(Channel::ThumbFlexion.index(), 0);
        assert_eq!(Channel::FingerSpread.index(), CHANNEL_COUNT - 1);
        assert_eq!(Channel::from_index(3), Some(Channel::IndexFingerProximal));
        assert_eq!(Channel::from_index(CHANNEL_COUNT), None);
        assert_eq!(Channel::from_index(usize::MAX), None);
    }

    #[test]
    fn test_all_matches_iteration_order() {
        assert_eq!(Channel::ALL.to_vec(), Channel::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_per_channel_from_fn() {
        let container = PerChannel::from_fn(|c| c.index() * 10);
        assert_eq!(container.len(), CHANNEL_COUNT);
        assert_eq!(container[Channel::Pinky], 70);

        let order: Vec<Channel> = container.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Channel::all().collect::<Vec<_>>());
    }

    #[test]
    fn test_per_channel_index_mut() {
        let mut container: PerChannel<Option<u8>> = PerChannel::default();
        container[Channel::ThumbOpposition] = Some(1);
        assert_eq!(container.values().filter(|v| v.is_some()).count(), 1);
        assert_eq!(container.as_array()[1], Some(1));
    }
}
