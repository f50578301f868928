use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg: SigformConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, SigformConfig::default());
    assert_eq!(cfg.timing.success_hold(), Duration::from_millis(3_500));
    assert_eq!(cfg.haptics.success, vec![50, 100, 50]);
    assert_eq!(cfg.upload.max_payload_bytes, 15 * 1024 * 1024);
    cfg.validate().unwrap();
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg: SigformConfig =
        serde_json::from_str(r##"{ "timing": { "success_hold_ms": 2000 }, "brush": { "color": "#000000" } }"##)
            .unwrap();
    assert_eq!(cfg.timing.success_hold_ms, 2_000);
    assert_eq!(cfg.timing.reject_hold_ms, 1_000);
    assert_eq!(cfg.brush.color, Color::BLACK);
    assert_eq!(cfg.brush.max_width, 4.0);
}

#[test]
fn validate_rejects_inverted_brush_widths() {
    let mut cfg = SigformConfig::default();
    cfg.brush.max_width = 0.5;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("brush.max_width"));
}

#[test]
fn validate_rejects_bad_capture_scale_and_endpoint() {
    let mut cfg = SigformConfig::default();
    cfg.capture.scale = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = SigformConfig::default();
    cfg.upload.endpoint = "  ".to_owned();
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reads_and_validates() {
    let dir = std::env::temp_dir().join("sigform_config_test");
    std::fs::create_dir_all(&dir).unwrap();

    let ok = dir.join("ok.json");
    std::fs::write(&ok, r#"{ "upload": { "endpoint": "http://example.test/api/upload" } }"#)
        .unwrap();
    let cfg = SigformConfig::from_path(&ok).unwrap();
    assert_eq!(cfg.upload.endpoint, "http://example.test/api/upload");

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "capture": { "scale": -1 } }"#).unwrap();
    assert!(SigformConfig::from_path(&bad).is_err());

    let garbage = dir.join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    let err = SigformConfig::from_path(&garbage).unwrap_err();
    assert!(err.to_string().contains("serialization error"));
}

#[test]
fn dot_radius_is_mean_of_widths() {
    assert_eq!(BrushConfig::default().dot_radius(), 2.5);
}
