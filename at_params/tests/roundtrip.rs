//! Property tests for the validate / persist round trip

use at_params::ParamStore;
use at_params::ParameterSet;
use at_params::ValidationError;
use at_params::validate;
use at_params::validate_value;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

fn valid_params() -> impl Strategy<Value = ParameterSet> {
    (2u32..=100, 1u32..=98, -0.999f64..=0.0, any::<bool>(), 0.0f64..1.0, 0.0f64..1.0)
        .prop_flat_map(|(period, buy, stoploss, trailing, positive, offset)| {
            (buy + 1..=99).prop_map(move |sell| ParameterSet {
                rsi_period: period,
                rsi_buy: buy,
                rsi_sell: sell,
                stoploss,
                trailing_stop: trailing,
                trailing_stop_positive: positive,
                trailing_stop_positive_offset: offset,
            })
        })
}

proptest! {
    #[test]
    fn validate_roundtrip_is_stable(params in valid_params()) {
        let first = validate(&params.to_raw()).unwrap();
        prop_assert_eq!(first, params);

        let text = serde_json::to_string_pretty(&first).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        let second = validate_value(&reparsed).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rsi_buy_outside_domain_rejected(rsi_buy in prop_oneof![100i64..1000, -1000i64..1]) {
        let mut raw = Map::new();
        raw.insert("rsi_buy".to_string(), json!(rsi_buy));
        let err = validate(&raw).unwrap_err();
        prop_assert_eq!(err.field(), Some("rsi_buy"));
    }

    #[test]
    fn positive_stoploss_rejected(stoploss in 0.0001f64..100.0) {
        let mut raw = Map::new();
        raw.insert("stoploss".to_string(), json!(stoploss));
        let rejected = matches!(validate(&raw), Err(ValidationError::InvalidField { field: "stoploss", .. }));
        prop_assert!(rejected);
    }
}

#[test]
fn float_fields_survive_persistence_bit_for_bit() {
    let params = ParameterSet {
        stoploss: -0.18876093594191778,
        trailing_stop_positive_offset: 0.9508666971204085,
        ..ParameterSet::default()
    };

    let text = serde_json::to_string_pretty(&params).unwrap();
    let reparsed = validate_value(&serde_json::from_str(&text).unwrap()).unwrap();
    assert_eq!(reparsed.stoploss.to_bits(), params.stoploss.to_bits());
    assert_eq!(reparsed.trailing_stop_positive_offset.to_bits(), params.trailing_stop_positive_offset.to_bits());

    let dir = tempfile::tempdir().unwrap();
    ParamStore::in_dir(dir.path()).save(&params).unwrap();
    assert_eq!(ParamStore::in_dir(dir.path()).load(), params);
}

#[test]
fn rejected_edit_leaves_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = ParamStore::in_dir(dir.path());
    let saved = ParameterSet { rsi_buy: 35, ..ParameterSet::default() };
    store.save(&saved).unwrap();
    let before = std::fs::read_to_string(store.path()).unwrap();

    for bad in [json!({ "rsi_buy": 150 }), json!({ "stoploss": 0.5 })] {
        let mut raw = store.load().to_raw();
        if let Value::Object(edit) = bad {
            raw.extend(edit);
        }
        assert!(validate(&raw).is_err());
    }

    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    assert_eq!(store.load(), saved);
}

#[test]
fn absent_file_loads_documented_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = ParamStore::in_dir(dir.path());

    let params = store.load();
    assert_eq!(
        serde_json::to_value(params).unwrap(),
        json!({
            "rsi_period": 14,
            "rsi_buy": 30,
            "rsi_sell": 70,
            "stoploss": -0.10,
            "trailing_stop": true,
            "trailing_stop_positive": 0.01,
            "trailing_stop_positive_offset": 0.02
        })
    );
}
