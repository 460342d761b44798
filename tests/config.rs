use eframe_snip::config::SnipOptions;
use egui::Color32;

#[test]
fn test_defaults() {
    let options = SnipOptions::default();
    assert_eq!(options.auto_weld, Some(20.0));
    assert_eq!(options.weld_distance(), Some(20.0));
    assert!(!options.auto_full);
    assert!(options.save_btn);
    assert_eq!(options.min_size, 10.0);
    assert_eq!(options.pen.color, Color32::RED);
    assert_eq!(options.pen.width, 3.0);
    assert_eq!(options.mosaic.tile, 10);
    assert_eq!(options.save_dir, None);
}

#[test]
fn test_missing_keys_use_defaults() {
    let options = SnipOptions::from_json(r#"{ "auto_full": true, "btn_size": 32 }"#).unwrap();
    assert!(options.auto_full);
    assert_eq!(options.btn_size, 32.0);
    assert_eq!(options.auto_weld, Some(20.0));
    assert_eq!(options.ok_color, SnipOptions::default().ok_color);
}

#[test]
fn test_weld_accepts_false_and_numbers() {
    let off = SnipOptions::from_json(r#"{ "auto_weld": false }"#).unwrap();
    assert_eq!(off.weld_distance(), None);

    let on = SnipOptions::from_json(r#"{ "auto_weld": true }"#).unwrap();
    assert_eq!(on.weld_distance(), Some(20.0));

    let custom = SnipOptions::from_json(r#"{ "auto_weld": 8 }"#).unwrap();
    assert_eq!(custom.weld_distance(), Some(8.0));

    let zero = SnipOptions::from_json(r#"{ "auto_weld": 0 }"#).unwrap();
    assert_eq!(zero.weld_distance(), None);
}

#[test]
fn test_json_round_trip() {
    let options = SnipOptions {
        auto_full: true,
        save_btn: false,
        cancel_color: Color32::from_rgb(1, 2, 3),
        ..SnipOptions::default()
    };
    let json = options.to_json().unwrap();
    assert_eq!(SnipOptions::from_json(&json).unwrap(), options);
}

#[test]
fn test_invalid_json_is_rejected() {
    assert!(SnipOptions::from_json(r#"{ "auto_full": "yes" }"#).is_err());
}
