use chartkit::interpolate::{Value, build_interpolator};
use chartkit::InterpolateError;
use chrono::DateTime;

fn num(v: f64) -> Value {
    Value::from(v)
}

#[test]
fn numbers_hit_both_endpoints_and_increase() {
    for (a, b) in [(0.0, 1.0), (-5.0, 12.5), (3.0, 1e6), (-1e3, -2.0)] {
        let interp = build_interpolator(&num(a), &num(b)).unwrap();
        assert_eq!(interp.at(0.0), num(a));
        assert_eq!(interp.at(1.0), num(b));

        let samples: Vec<f64> = interp
            .samples(21)
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]), "{a} -> {b}: {samples:?}");
    }
}

#[test]
fn equal_values_are_constant() {
    let v = Value::object([
        ("x", num(1.0)),
        ("tags", Value::from(vec!["a", "b"])),
        ("color", "#ff0000".into()),
    ]);
    let interp = build_interpolator(&v, &v.clone()).unwrap();
    assert!(interp.is_constant());
    for t in [0.0, 0.25, 0.5, 1.0] {
        assert_eq!(interp.at(t), v);
    }
}

#[test]
fn undefined_start_yields_target_everywhere() {
    let b = Value::object([("x", num(4.0))]);
    let interp = build_interpolator(&Value::Undefined, &b).unwrap();
    for t in [0.0, 0.3, 1.0] {
        assert_eq!(interp.at(t), b);
    }
}

#[test]
fn nan_start_is_constant_nan() {
    let interp = build_interpolator(&num(f64::NAN), &num(1.0)).unwrap();
    assert!(interp.at(1.0).is_nan());
}

#[test]
fn colours_blend_in_hcl() {
    let interp = build_interpolator(&"#ff0000".into(), &"#0000ff".into()).unwrap();
    let mid = interp.at(0.5);
    let mid = mid.as_str().unwrap();

    let parsed = csscolorparser::parse(mid).expect("midpoint is a valid CSS colour");
    let [r, g, b, _] = parsed.to_rgba8();
    assert_ne!([r, g, b], [255, 0, 0]);
    assert_ne!([r, g, b], [0, 0, 255]);
    // HCL goes through magenta, not the dark (128, 0, 128) of an RGB blend.
    assert!(r > 128 && b > 128, "{mid}");

    let start = csscolorparser::parse(interp.at(0.0).as_str().unwrap()).unwrap();
    assert_eq!(start.to_rgba8(), [255, 0, 0, 255]);
}

#[test]
fn plain_strings_and_booleans_jump() {
    let interp = build_interpolator(&"cat".into(), &"dog".into()).unwrap();
    assert_eq!(interp.at(0.3), Value::from("dog"));
    assert_eq!(interp.at(0.0), Value::from("dog"));

    let interp = build_interpolator(&Value::Bool(false), &Value::Bool(true)).unwrap();
    assert_eq!(interp.at(0.1), Value::Bool(true));
}

#[test]
fn growing_arrays_start_new_numbers_at_zero() {
    let a = Value::from(vec![1.0, 2.0]);
    let b = Value::from(vec![1.0, 2.0, 3.0]);
    let interp = build_interpolator(&a, &b).unwrap();
    assert_eq!(interp.at(0.0), Value::from(vec![1.0, 2.0, 0.0]));
    assert_eq!(interp.at(0.5), Value::from(vec![1.0, 2.0, 1.5]));
    assert_eq!(interp.at(1.0), b);

    let a = Value::from(vec!["x"]);
    let b = Value::from(vec!["x", "y"]);
    let interp = build_interpolator(&a, &b).unwrap();
    assert_eq!(interp.at(0.0), b);
}

#[test]
fn shrinking_arrays_follow_target_length() {
    let interp =
        build_interpolator(&Value::from(vec![1.0, 2.0, 3.0]), &Value::from(vec![3.0])).unwrap();
    assert_eq!(interp.at(0.5), Value::from(vec![2.0]));
}

#[test]
fn objects_blend_per_key_of_target() {
    let a = Value::object([("x", num(1.0)), ("y", "a".into()), ("gone", num(9.0))]);
    let b = Value::object([("x", num(5.0)), ("y", "b".into())]);
    let interp = build_interpolator(&a, &b).unwrap();
    assert_eq!(
        interp.at(0.5),
        Value::object([("x", num(3.0)), ("y", "b".into())])
    );
    assert!(interp.at(0.5).get("gone").is_none());
}

#[test]
fn new_object_keys_appear_immediately() {
    let a = Value::object([("x", num(0.0))]);
    let b = Value::object([("x", num(2.0)), ("label", "new".into())]);
    let interp = build_interpolator(&a, &b).unwrap();
    assert_eq!(interp.at(0.0).get("label"), Some(&Value::from("new")));
}

#[test]
fn dates_move_by_milliseconds() {
    let a = DateTime::from_timestamp_millis(0).unwrap();
    let b = DateTime::from_timestamp_millis(10_000).unwrap();
    let interp = build_interpolator(&Value::Date(a), &Value::Date(b)).unwrap();
    assert_eq!(
        interp.at(0.5),
        Value::Date(DateTime::from_timestamp_millis(5_000).unwrap())
    );
}

#[test]
fn mismatched_shapes_fail_at_build_time() {
    let err = build_interpolator(&num(1.0), &"x".into()).unwrap_err();
    assert!(matches!(err, InterpolateError::TypeMismatch { from: "number", to: "string", .. }));
    assert_eq!(err.path(), "$");

    let err = build_interpolator(&Value::from(vec![1.0]), &Value::object([("0", num(1.0))]))
        .unwrap_err();
    assert!(matches!(err, InterpolateError::TypeMismatch { from: "array", to: "object", .. }));

    let err = build_interpolator(&Value::Null, &Value::object([("x", num(1.0))])).unwrap_err();
    assert_eq!(err, InterpolateError::NullObject { path: "$".into() });

    let nested = build_interpolator(
        &Value::object([("p", Value::object([("q", num(1.0))]))]),
        &Value::object([("p", Value::Null)]),
    )
    .unwrap_err();
    assert_eq!(nested.path(), "$.p");
}

#[test]
fn errors_render_their_location() {
    let err = build_interpolator(&Value::from(vec![num(1.0)]), &Value::from(vec![Value::Bool(true)]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot interpolate values of different type at $[0]: number -> boolean"
    );
}

#[test]
fn json_input_round_trips() {
    let a = Value::from(serde_json::json!({"series": [{"v": 0, "color": "#000000"}]}));
    let b = Value::from(serde_json::json!({"series": [{"v": 10, "color": "#ffffff"}, {"v": 4}]}));
    let interp = build_interpolator(&a, &b).unwrap();
    let out = serde_json::to_value(interp.at(1.0)).unwrap();
    assert_eq!(out["series"][0]["v"], serde_json::json!(10.0));
    assert_eq!(out["series"][1]["v"], serde_json::json!(4.0));
    let white = csscolorparser::parse(out["series"][0]["color"].as_str().unwrap()).unwrap();
    assert!(white.to_rgba8()[..3].iter().all(|&c| c >= 254));
}
