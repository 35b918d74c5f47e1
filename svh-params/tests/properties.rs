use proptest::prelude::*;
use svh_params::{
    CHANNEL_COUNT, Channel, DEFAULT_SECTION, FirmwareVersion, ParamValue, ParameterResolver,
    ParameterTable, SettingsKind, value::Record,
};

/// A channel entry as it may appear in a file: missing, numeric, or junk.
fn entry() -> impl Strategy<Value = Option<ParamValue>> {
    prop_oneof![
        3 => Just(None),
        4 => prop::collection::vec(-1.0e6f64..1.0e6, 1..8)
            .prop_map(|v| Some(ParamValue::from(v))),
        1 => prop::collection::vec(any::<i32>().prop_map(i64::from), 1..8)
            .prop_map(|v| Some(ParamValue::from(v))),
        1 => Just(Some(ParamValue::Array(vec![ParamValue::Double(1.0), ParamValue::from("x")]))),
        1 => Just(Some(ParamValue::Array(vec![]))),
    ]
}

fn version_fields() -> impl Strategy<Value = Vec<(String, ParamValue)>> {
    prop_oneof![
        (0i64..4, 0i64..4).prop_map(|(major, minor)| vec![
            ("major_version".to_string(), ParamValue::Integer(major)),
            ("minor_version".to_string(), ParamValue::Integer(minor)),
        ]),
        (0i64..4).prop_map(|major| vec![("major_version".to_string(), ParamValue::Integer(major))]),
        ((0i64..2, 0i64..4), (2i64..4, 0i64..4)).prop_map(|((a, b), (c, d))| vec![
            ("min_version".to_string(), ParamValue::from(vec![a, b])),
            ("max_version".to_string(), ParamValue::from(vec![c, d])),
        ]),
    ]
}

/// A parameter set using per-channel blocks for every kind.
fn parameter_set() -> impl Strategy<Value = ParamValue> {
    (
        version_fields(),
        prop::collection::vec(prop::collection::vec(entry(), 3), CHANNEL_COUNT),
    )
        .prop_map(|(version, channels)| {
            let mut body: Record = version.into_iter().collect();
            for (channel, kinds) in Channel::all().zip(channels) {
                let block: Record = SettingsKind::ALL
                    .iter()
                    .zip(kinds)
                    .filter_map(|(kind, value)| value.map(|v| (kind.block_key().to_string(), v)))
                    .collect();
                if !block.is_empty() {
                    body.insert(channel.to_string(), ParamValue::Record(block));
                }
            }
            let mut item = Record::new();
            item.insert("parameter_set".to_string(), ParamValue::Record(body));
            ParamValue::Record(item)
        })
}

fn document() -> impl Strategy<Value = ParamValue> {
    prop::collection::vec(parameter_set(), 0..5).prop_map(|sets| {
        let mut doc = Record::new();
        doc.insert(DEFAULT_SECTION.to_string(), ParamValue::Array(sets));
        ParamValue::Record(doc)
    })
}

fn is_mentioned(doc: &ParamValue, kind: SettingsKind, channel: Channel) -> bool {
    doc.get(DEFAULT_SECTION)
        .and_then(ParamValue::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("parameter_set"))
        .any(|set| {
            set.get(channel.as_ref())
                .and_then(|block| block.get(kind.block_key()))
                .is_some()
        })
}

proptest! {
    #[test]
    fn resolution_is_idempotent(doc in document(), major in 0u16..4, minor in 0u16..4) {
        let version = FirmwareVersion::new(major, minor);
        let first_table = ParameterTable::from_document(&doc, DEFAULT_SECTION).unwrap();
        let second_table = ParameterTable::from_document(&doc, DEFAULT_SECTION).unwrap();

        let first = ParameterResolver::new(&first_table).resolve(version);
        let second = ParameterResolver::new(&second_table).resolve(version);
        let again = ParameterResolver::new(&first_table).resolve(version);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &again);
    }

    #[test]
    fn every_kind_has_one_slot_per_channel(doc in document(), major in 0u16..4, minor in 0u16..4) {
        let table = ParameterTable::from_document(&doc, DEFAULT_SECTION).unwrap();
        let r = ParameterResolver::new(&table).resolve(FirmwareVersion::new(major, minor));

        prop_assert_eq!(r.set.position.len(), CHANNEL_COUNT);
        prop_assert_eq!(r.set.current.len(), CHANNEL_COUNT);
        prop_assert_eq!(r.set.home.len(), CHANNEL_COUNT);
    }

    #[test]
    fn unmentioned_entries_stay_absent(doc in document(), major in 0u16..4, minor in 0u16..4) {
        let table = ParameterTable::from_document(&doc, DEFAULT_SECTION).unwrap();
        let r = ParameterResolver::new(&table).resolve(FirmwareVersion::new(major, minor));

        for kind in SettingsKind::ALL {
            for channel in Channel::all() {
                if !is_mentioned(&doc, kind, channel) {
                    prop_assert!(!r.set.is_given(kind, channel));
                }
            }
        }
    }

    #[test]
    fn given_entries_are_never_empty(doc in document(), major in 0u16..4, minor in 0u16..4) {
        let table = ParameterTable::from_document(&doc, DEFAULT_SECTION).unwrap();
        let r = ParameterResolver::new(&table).resolve(FirmwareVersion::new(major, minor));

        let lens = r.set.position.values().flatten().map(|s| s.as_slice().len())
            .chain(r.set.current.values().flatten().map(|s| s.as_slice().len()))
            .chain(r.set.home.values().flatten().map(|s| s.as_slice().len()));
        for len in lens {
            prop_assert!(len > 0);
        }
    }
}
