use crate::model::{ImageSource, PixelRect, Prediction, Segmentation};

use super::{
    GestureOutcome, MemorySurface, Overlay, OverlayId, OverlayStyle, OverlaySync, PointerEvent,
    RoiStore, Surface, Viewer,
};

fn tiled_source() -> ImageSource {
    ImageSource::tiled(10_000, 8_000).expect("source")
}

fn segmentation(tag: u8) -> Segmentation {
    Segmentation {
        mask: String::new(),
        rgb: vec![[tag, tag, tag]],
    }
}

fn drawing_viewer(store: &RoiStore) -> Viewer<MemorySurface> {
    let mut viewer = Viewer::open(MemorySurface::new(800.0, 600.0), tiled_source(), store);
    viewer.set_draw_mode(true);
    viewer
}

fn sorted_overlays(surface: &MemorySurface) -> Vec<Overlay> {
    surface.overlays().copied().collect()
}

#[test]
fn overlay_ids_are_deterministic() {
    assert_eq!(OverlayId::Roi(0).to_string(), "roi-rectangle-0");
    assert_eq!(OverlayId::Roi(12).to_string(), "roi-rectangle-12");
    assert_eq!(OverlayId::Candidate.to_string(), "roi-rectangle-temp");
}

#[test]
fn drag_commits_pixel_rect() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);

    viewer.handle_pointer(&PointerEvent::press(80.0, 60.0), &mut store);
    assert!(viewer.surface().overlay(OverlayId::Candidate).is_some());
    let update = viewer.handle_pointer(&PointerEvent::drag(160.0, 90.0), &mut store);
    assert!(matches!(update, GestureOutcome::Updated(_)));
    assert!(store.is_empty());

    viewer.handle_pointer(&PointerEvent::drag(240.0, 120.0), &mut store);
    let outcome = viewer.handle_pointer(&PointerEvent::release(240.0, 120.0), &mut store);

    let expected = PixelRect::new(1000, 800, 2000, 800);
    assert_eq!(outcome, GestureOutcome::Completed(expected));
    assert_eq!(store.rects(), vec![expected]);
    assert!(viewer.surface().overlay(OverlayId::Candidate).is_none());
    assert!(viewer.surface().overlay(OverlayId::Roi(0)).is_some());
    assert!(!viewer.gesture().is_dragging());
}

#[test]
fn backwards_drag_normalizes() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    viewer.handle_pointer(&PointerEvent::press(240.0, 120.0), &mut store);
    viewer.handle_pointer(&PointerEvent::drag(80.0, 60.0), &mut store);
    viewer.handle_pointer(&PointerEvent::release(80.0, 60.0), &mut store);
    assert_eq!(store.rects(), vec![PixelRect::new(1000, 800, 2000, 800)]);
}

#[test]
fn click_without_drag_is_discarded() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    viewer.handle_pointer(&PointerEvent::press(100.0, 100.0), &mut store);
    let outcome = viewer.handle_pointer(&PointerEvent::release(100.0, 100.0), &mut store);
    assert!(matches!(outcome, GestureOutcome::Discarded(_)));
    assert!(store.is_empty());
    assert_eq!(viewer.surface().overlay_count(), 0);
}

#[test]
fn flat_drag_is_discarded() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    viewer.handle_pointer(&PointerEvent::press(100.0, 100.0), &mut store);
    viewer.handle_pointer(&PointerEvent::drag(300.0, 100.0), &mut store);
    let outcome = viewer.handle_pointer(&PointerEvent::release(300.0, 100.0), &mut store);
    assert!(matches!(outcome, GestureOutcome::Discarded(rect) if rect.height == 0));
    assert!(store.is_empty());
}

#[test]
fn second_press_restarts_the_drag() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    viewer.handle_pointer(&PointerEvent::press(80.0, 60.0), &mut store);
    viewer.handle_pointer(&PointerEvent::drag(160.0, 90.0), &mut store);
    viewer.handle_pointer(&PointerEvent::press(400.0, 300.0), &mut store);
    viewer.handle_pointer(&PointerEvent::drag(480.0, 360.0), &mut store);
    viewer.handle_pointer(&PointerEvent::release(480.0, 360.0), &mut store);
    assert_eq!(store.rects(), vec![PixelRect::new(5000, 4000, 1000, 800)]);
    assert_eq!(viewer.surface().overlay_count(), 1);
}

#[test]
fn stray_release_and_drag_are_ignored() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    let drag = viewer.handle_pointer(&PointerEvent::drag(10.0, 10.0), &mut store);
    let release = viewer.handle_pointer(&PointerEvent::release(20.0, 20.0), &mut store);
    assert_eq!(drag, GestureOutcome::Ignored);
    assert_eq!(release, GestureOutcome::Ignored);
    assert!(store.is_empty());
}

#[test]
fn navigation_mode_never_draws() {
    let mut store = RoiStore::new();
    let mut viewer = Viewer::open(MemorySurface::new(800.0, 600.0), tiled_source(), &store);
    let camera_before = viewer.surface().camera().clone();

    viewer.handle_pointer(&PointerEvent::press(80.0, 60.0), &mut store);
    let outcome = viewer.handle_pointer(&PointerEvent::drag(240.0, 120.0), &mut store);
    viewer.handle_pointer(&PointerEvent::release(240.0, 120.0), &mut store);

    assert_eq!(outcome, GestureOutcome::Forwarded { moved: true });
    assert!(store.is_empty());
    assert_eq!(viewer.surface().overlay_count(), 0);
    assert_ne!(viewer.surface().camera(), &camera_before);
}

#[test]
fn draw_mode_blocks_native_navigation() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    let camera_before = viewer.surface().camera().clone();

    viewer.handle_pointer(&PointerEvent::scroll(400.0, 300.0, 1.0), &mut store);
    viewer.handle_pointer(&PointerEvent::double_click(400.0, 300.0), &mut store);
    viewer.handle_pointer(&PointerEvent::press(80.0, 60.0), &mut store);
    viewer.handle_pointer(&PointerEvent::drag(240.0, 120.0), &mut store);
    viewer.handle_pointer(&PointerEvent::release(240.0, 120.0), &mut store);

    assert_eq!(viewer.surface().camera(), &camera_before);
    assert!(!viewer.surface().native_navigation());
    assert_eq!(store.len(), 1);
}

#[test]
fn disabled_native_navigation_ignores_events() {
    let mut surface = MemorySurface::new(800.0, 600.0);
    surface.set_native_navigation(false);
    assert!(!surface.handle_native(&PointerEvent::scroll(10.0, 10.0, 1.0)));
    assert!(!surface.handle_native(&PointerEvent::double_click(10.0, 10.0)));
    assert!((surface.camera().zoom - 1.0).abs() < f64::EPSILON);
}

#[test]
fn leaving_draw_mode_drops_the_candidate() {
    let mut store = RoiStore::new();
    let mut viewer = drawing_viewer(&store);
    viewer.handle_pointer(&PointerEvent::press(80.0, 60.0), &mut store);
    viewer.handle_pointer(&PointerEvent::drag(160.0, 90.0), &mut store);
    viewer.set_draw_mode(false);
    assert!(viewer.surface().overlay(OverlayId::Candidate).is_none());
    assert!(!viewer.gesture().is_dragging());
    assert!(viewer.surface().native_navigation());
}

#[test]
fn store_rejects_rects_without_area() {
    let mut store = RoiStore::new();
    assert_eq!(store.add(PixelRect::new(5, 5, 0, 10)), None);
    assert_eq!(store.add_manual(5, 5, 10, -3), None);
    assert_eq!(store.version(), 0);
    assert_eq!(store.add_manual(5, 5, 10, 10), Some(0));
    assert_eq!(store.add_manual(5, 5, 10, 10), Some(1));
    assert_eq!(store.len(), 2);
}

#[test]
fn removal_keeps_parallel_views_aligned() {
    let mut store = RoiStore::new();
    store.add_manual(0, 0, 10, 10);
    store.add_manual(20, 0, 10, 10);
    assert!(store.labels().is_empty());

    store.apply_segmentations(vec![segmentation(1), segmentation(2)]);
    assert_eq!(store.labels(), vec![Some("0"), Some("0")]);

    store.remove(0);
    assert_eq!(store.len(), 1);
    assert_eq!(store.labels(), vec![Some("0")]);
    let remaining = store.segmentation_results();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].map(|seg| seg.rgb[0]), Some([2, 2, 2]));
}

#[test]
fn parallel_views_are_empty_or_full_after_any_sequence() {
    let mut store = RoiStore::new();
    let check = |store: &RoiStore| {
        for len in [
            store.segmentation_results().len(),
            store.labels().len(),
            store.predictions().len(),
        ] {
            assert!(len == 0 || len == store.len());
        }
    };

    for step in 0..12_i64 {
        store.add_manual(step, step, 5 + step, 5);
        check(&store);
        if step % 3 == 0 {
            let results = (0..store.len()).map(|i| segmentation(i as u8)).collect();
            store.apply_segmentations(results);
            store.set_prediction(0, Prediction::new(vec![1]));
        }
        if step % 4 == 1 {
            store.remove(0);
        }
        check(&store);
    }
    while !store.is_empty() {
        store.remove(store.len() - 1);
        check(&store);
    }
}

#[test]
fn remove_out_of_range_is_a_no_op() {
    let mut store = RoiStore::new();
    store.add_manual(0, 0, 1, 1);
    let version = store.version();
    assert!(store.remove(3).is_none());
    assert_eq!(store.version(), version);
}

#[test]
fn keys_survive_reindexing() {
    let mut store = RoiStore::new();
    store.add_manual(0, 0, 1, 1);
    store.add_manual(1, 1, 1, 1);
    let key = store.get(1).expect("second").key();
    store.remove(0);
    assert_eq!(store.position_of_key(key), Some(0));
}

#[test]
fn labels_parse_only_integers() {
    let mut store = RoiStore::new();
    store.add_manual(0, 0, 1, 1);
    let record = store.get(0).expect("record");
    assert_eq!(record.parsed_label(), None);
    for (text, expected) in [("", None), ("  ", None), ("abc", None), ("2", Some(2)), (" 7 ", Some(7))] {
        store.set_label(0, text);
        assert_eq!(store.get(0).expect("record").parsed_label(), expected, "{text:?}");
    }
    assert!(!store.set_label(5, "1"));
}

#[test]
fn overlay_sync_is_idempotent() {
    let mut store = RoiStore::new();
    store.add_manual(1000, 800, 2000, 800);
    store.add_manual(0, 0, 500, 500);
    let source = tiled_source();
    let mut surface = MemorySurface::default();
    let mut sync = OverlaySync::new();

    sync.sync(&store, &source, &mut surface);
    let first = sorted_overlays(&surface);
    sync.sync(&store, &source, &mut surface);
    let second = sorted_overlays(&surface);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].style, OverlayStyle::Committed);
    assert!((first[0].location.x - 0.1).abs() < 1e-12);
    assert!((first[0].location.height - 0.1).abs() < 1e-12);
}

#[test]
fn overlay_sync_drops_overlays_of_removed_rois() {
    let mut store = RoiStore::new();
    store.add_manual(0, 0, 100, 100);
    store.add_manual(200, 0, 100, 100);
    let source = tiled_source();
    let mut surface = MemorySurface::default();
    let mut sync = OverlaySync::new();
    sync.sync(&store, &source, &mut surface);

    store.remove(0);
    sync.sync(&store, &source, &mut surface);
    assert_eq!(surface.overlay_count(), 1);
    assert!(surface.overlay(OverlayId::Roi(1)).is_none());
    let moved = surface.overlay(OverlayId::Roi(0)).expect("overlay");
    assert!((moved.location.x - 0.02).abs() < 1e-12);
}

#[test]
fn overlays_follow_zoom_on_screen() {
    let mut store = RoiStore::new();
    store.add_manual(1000, 800, 2000, 800);
    let mut viewer = Viewer::open(MemorySurface::new(800.0, 600.0), tiled_source(), &store);
    let before = viewer.surface().screen_placement(OverlayId::Roi(0)).expect("placement");
    let location = viewer.surface().overlay(OverlayId::Roi(0)).expect("overlay").location;

    let outcome = viewer.handle_pointer(&PointerEvent::scroll(400.0, 300.0, 1.0), &mut store);
    assert_eq!(outcome, GestureOutcome::Forwarded { moved: true });

    let after = viewer.surface().screen_placement(OverlayId::Roi(0)).expect("placement");
    let relocated = viewer.surface().overlay(OverlayId::Roi(0)).expect("overlay").location;
    assert_eq!(location, relocated);
    assert_ne!(before, after);
}

#[test]
fn closing_viewer_removes_overlays() {
    let mut store = RoiStore::new();
    store.add_manual(0, 0, 100, 100);
    let mut viewer = drawing_viewer(&store);
    viewer.handle_pointer(&PointerEvent::press(80.0, 60.0), &mut store);
    assert_eq!(viewer.surface().overlay_count(), 2);
    let surface = viewer.close();
    assert_eq!(surface.overlay_count(), 0);
}
