use super::{
    ImageSource, MorphOp, MorphOps, PixelRect, Prediction, ProcessConfig, Segmentation,
    SlideFormat, Threshold, ViewportPoint, ViewportRect,
};

#[test]
fn corners_normalize_in_any_order() {
    let forward =
        ViewportRect::from_corners(ViewportPoint::new(0.1, 0.1), ViewportPoint::new(0.3, 0.2));
    let backward =
        ViewportRect::from_corners(ViewportPoint::new(0.3, 0.2), ViewportPoint::new(0.1, 0.1));
    assert_eq!(forward, backward);
    assert!((forward.x - 0.1).abs() < 1e-12);
    assert!((forward.width - 0.2).abs() < 1e-12);
    assert!((forward.height - 0.1).abs() < 1e-12);
}

#[test]
fn degenerate_rects_have_no_area() {
    assert!(!PixelRect::new(10, 10, 0, 5).has_area());
    assert!(!PixelRect::new(10, 10, 5, -1).has_area());
    assert!(PixelRect::new(10, 10, 1, 1).has_area());
    let click = ViewportRect::from_corners(ViewportPoint::new(0.4, 0.4), ViewportPoint::new(0.4, 0.4));
    assert!(!click.has_area());
}

#[test]
fn sources_reject_zero_dimensions() {
    assert!(ImageSource::tiled(0, 100).is_err());
    assert!(ImageSource::raster(100, 0).is_err());
    let source = ImageSource::tiled(10_000, 8_000).expect("source");
    assert_eq!((source.width(), source.height()), (10_000, 8_000));
    assert!(source.is_tiled());
}

#[test]
fn source_bounds_check() {
    let source = ImageSource::raster(100, 50).expect("source");
    assert!(source.contains(&PixelRect::new(0, 0, 100, 50)));
    assert!(!source.contains(&PixelRect::new(1, 0, 100, 50)));
    assert!(!source.contains(&PixelRect::new(-1, 0, 10, 10)));
}

#[test]
fn slide_format_follows_extension() {
    assert_eq!(
        SlideFormat::from_path("slides/case-7.SVS").expect("svs"),
        SlideFormat::Pyramidal
    );
    assert_eq!(
        SlideFormat::from_path("thumb.png").expect("png"),
        SlideFormat::Raster
    );
    assert!(SlideFormat::from_path("notes.txt").is_err());
    assert!(SlideFormat::from_path("no_extension").is_err());
    assert!(SlideFormat::Pyramidal.needs_tiling());
    assert!(!SlideFormat::Raster.needs_tiling());
}

#[test]
fn segmentation_mask_decodes() {
    let segmentation = Segmentation {
        mask: "iVBORw0KGgo=".to_string(),
        rgb: vec![[1, 2, 3]],
    };
    let bytes = segmentation.mask_png().expect("decode");
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);

    let broken = Segmentation {
        mask: "***".to_string(),
        rgb: Vec::new(),
    };
    assert!(broken.mask_png().is_err());
}

#[test]
fn prediction_majority_prefers_lower_class_on_tie() {
    assert_eq!(Prediction::new(vec![1, 1, 0]).majority_class(), Some(1));
    assert_eq!(Prediction::new(vec![2, 1, 2, 1]).majority_class(), Some(1));
    assert_eq!(Prediction::new(Vec::new()).majority_class(), None);
}

#[test]
fn manual_threshold_is_bounded() {
    assert_eq!(
        Threshold::manual(128).expect("in range"),
        Threshold::Manual { value: 128 }
    );
    assert!(Threshold::manual(256).is_err());
    assert!(Threshold::manual(-1).is_err());
    assert_eq!(Threshold::Adaptive.manual_value(), None);
    assert_eq!(Threshold::Manual { value: 9 }.name(), "manual");
}

#[test]
fn morph_ops_keep_selection_order_without_duplicates() {
    let mut ops = MorphOps::new();
    assert!(ops.insert(MorphOp::Closing));
    assert!(ops.insert(MorphOp::Erosion));
    assert!(!ops.insert(MorphOp::Closing));
    ops.toggle(MorphOp::Dilation);
    ops.toggle(MorphOp::Erosion);
    assert_eq!(ops.names(), vec!["closing", "dilation"]);

    let all = MorphOp::ALL.into_iter().chain(MorphOp::ALL).collect::<MorphOps>();
    assert_eq!(all.len(), 4);
}

#[test]
fn process_config_serializes_with_tagged_threshold() {
    let config = ProcessConfig::new(
        Threshold::Manual { value: 90 },
        vec![MorphOp::Opening, MorphOp::Opening, MorphOp::Closing].into(),
    );
    let value = serde_json::to_value(&config).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "threshold": {"type": "manual", "value": 90},
            "morph_ops": ["opening", "closing"]
        })
    );
    let restored: ProcessConfig = serde_json::from_value(value).expect("deserialize");
    assert_eq!(restored, config);

    let defaults: ProcessConfig = serde_json::from_str("{}").expect("defaults");
    assert_eq!(defaults.threshold, Threshold::Otsu);
    assert!(defaults.morph_ops.is_empty());
}
