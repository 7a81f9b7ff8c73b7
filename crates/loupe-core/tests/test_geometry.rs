use approx::assert_abs_diff_eq;

use loupe_core::geometry::{compute_box, BoxMode, GeometryBox, Size, Viewport};
use loupe_core::target::{TargetKind, ZoomTarget};

fn raster_target(natural: Size, display: Size, bounds: GeometryBox) -> ZoomTarget {
    ZoomTarget {
        kind: TargetKind::Image,
        source: Some("image.jpg".to_string()),
        source_set: None,
        sizes: None,
        alt: None,
        natural,
        display,
        bounds,
    }
}

#[test]
fn test_expanded_box_constrained_by_viewport() {
    // 400x300 target with a 1600x1200 replacement in a 1000x800 viewport at
    // margin 20: available space is 960x760, width binds first, so the box
    // is 960x720 centered at (20, 40).
    let target = raster_target(
        Size::new(400.0, 300.0),
        Size::new(400.0, 300.0),
        GeometryBox::new(50.0, 60.0, 400.0, 300.0),
    );
    let b = compute_box(
        &target,
        BoxMode::Expanded,
        20.0,
        Viewport::new(1000.0, 800.0),
        Some(Size::new(1600.0, 1200.0)),
    );
    assert_abs_diff_eq!(b.width, 960.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.height, 720.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.left, 20.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.top, 40.0, epsilon = 1e-3);
}

#[test]
fn test_expanded_box_never_upscales_past_native() {
    // 200x150 native in a huge viewport stays 200x150, centered.
    let target = raster_target(
        Size::new(200.0, 150.0),
        Size::new(200.0, 150.0),
        GeometryBox::new(0.0, 0.0, 200.0, 150.0),
    );
    let b = compute_box(
        &target,
        BoxMode::Expanded,
        0.0,
        Viewport::new(2000.0, 2000.0),
        Some(Size::new(200.0, 150.0)),
    );
    assert_abs_diff_eq!(b.width, 200.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.height, 150.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.left, 900.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.top, 925.0, epsilon = 1e-3);
}

#[test]
fn test_aspect_ratio_preserved_across_margins() {
    let target = raster_target(
        Size::new(640.0, 480.0),
        Size::new(320.0, 240.0),
        GeometryBox::new(10.0, 10.0, 320.0, 240.0),
    );
    let cap = Size::new(2560.0, 1920.0);
    for margin in [0.0, 1.0, 8.0, 20.0, 33.3, 100.0] {
        let b = compute_box(
            &target,
            BoxMode::Expanded,
            margin,
            Viewport::new(1280.0, 720.0),
            Some(cap),
        );
        assert!(b.width <= cap.width && b.height <= cap.height);
        assert!(b.width >= 0.0 && b.height >= 0.0);
        if b.height > 0.0 {
            assert_abs_diff_eq!(b.width / b.height, 640.0 / 480.0, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_margin_wider_than_viewport_collapses_to_zero() {
    let target = raster_target(
        Size::new(400.0, 300.0),
        Size::new(400.0, 300.0),
        GeometryBox::new(0.0, 0.0, 400.0, 300.0),
    );
    let b = compute_box(
        &target,
        BoxMode::Expanded,
        800.0,
        Viewport::new(1000.0, 800.0),
        None,
    );
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 0.0);
}

#[test]
fn test_zero_size_target_degenerates_cleanly() {
    let target = raster_target(Size::default(), Size::default(), GeometryBox::default());
    let b = compute_box(
        &target,
        BoxMode::Expanded,
        16.0,
        Viewport::new(1000.0, 800.0),
        None,
    );
    assert_eq!(b.width, 0.0);
    assert_eq!(b.height, 0.0);
    assert!(b.left.is_finite() && b.top.is_finite());
    assert_abs_diff_eq!(b.left, 500.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.top, 400.0, epsilon = 1e-3);
}

#[test]
fn test_svg_uses_rendered_box_and_ignores_cap() {
    // An inline SVG has no meaningful pixel resolution: the aspect comes
    // from the rendered 300x100 box and a tiny cap must not constrain it.
    let target = ZoomTarget {
        kind: TargetKind::InlineSvg,
        source: None,
        source_set: None,
        sizes: None,
        alt: None,
        natural: Size::default(),
        display: Size::new(300.0, 100.0),
        bounds: GeometryBox::new(20.0, 20.0, 300.0, 100.0),
    };
    let b = compute_box(
        &target,
        BoxMode::Expanded,
        0.0,
        Viewport::new(900.0, 900.0),
        Some(Size::new(10.0, 10.0)),
    );
    assert_abs_diff_eq!(b.width, 900.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.height, 300.0, epsilon = 1e-3);
}

#[test]
fn test_display_aspect_fallback_when_natural_unknown() {
    // Before the natural probe resolves, the displayed box supplies the
    // aspect ratio.
    let target = raster_target(
        Size::default(),
        Size::new(100.0, 50.0),
        GeometryBox::new(0.0, 0.0, 100.0, 50.0),
    );
    let b = compute_box(
        &target,
        BoxMode::Expanded,
        0.0,
        Viewport::new(400.0, 400.0),
        None,
    );
    assert_abs_diff_eq!(b.width, 400.0, epsilon = 1e-3);
    assert_abs_diff_eq!(b.height, 200.0, epsilon = 1e-3);
}

#[test]
fn test_collapsed_matches_target_bounds() {
    let bounds = GeometryBox::new(123.0, 456.0, 400.0, 300.0);
    let target = raster_target(Size::new(800.0, 600.0), Size::new(400.0, 300.0), bounds);
    let b = compute_box(
        &target,
        BoxMode::Collapsed,
        37.0,
        Viewport::new(1000.0, 800.0),
        Some(Size::new(800.0, 600.0)),
    );
    assert_eq!(b, bounds);
}
