use snapsheet_core::config::PackerConfig;
use snapsheet_core::error::SnapSheetError;
use snapsheet_core::model::Item;
use snapsheet_core::{pack_items, pack_layout};

/// Test zero-sized page dimensions
#[test]
fn test_zero_width() {
    let cfg = PackerConfig {
        page_width: 0.0,
        ..Default::default()
    };

    let result = cfg.validate();
    match result {
        Err(SnapSheetError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0.0);
            assert_eq!(height, 297.0);
        }
        _ => panic!("Expected InvalidDimensions error"),
    }
}

#[test]
fn test_non_finite_height() {
    let cfg = PackerConfig {
        page_height: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(SnapSheetError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_negative_margin_is_rejected() {
    let cfg = PackerConfig {
        margin: -1.0,
        ..Default::default()
    };
    match cfg.validate() {
        Err(SnapSheetError::InvalidConfig(msg)) => assert!(msg.contains("margin")),
        _ => panic!("Expected InvalidConfig error"),
    }
}

/// Test margin that consumes the whole page
#[test]
fn test_margin_leaves_no_content_area() {
    let cfg = PackerConfig {
        page_width: 100.0,
        page_height: 200.0,
        margin: 50.0, // 50 * 2 = 100, leaves 0 width
        ..Default::default()
    };
    match cfg.validate() {
        Err(SnapSheetError::InvalidConfig(msg)) => assert!(msg.contains("margin")),
        _ => panic!("Expected InvalidConfig error"),
    }
}

#[test]
fn test_negative_gap_is_rejected() {
    let cfg = PackerConfig {
        gap: -0.5,
        ..Default::default()
    };
    assert!(matches!(cfg.validate(), Err(SnapSheetError::InvalidConfig(_))));
}

#[test]
fn test_non_positive_scale_is_rejected() {
    for scale in [0.0, -0.1, f64::INFINITY] {
        let cfg = PackerConfig {
            scale,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(SnapSheetError::InvalidConfig(_))));
    }
}

#[test]
fn test_shrink_tolerance_outside_unit_range_is_rejected() {
    for shrink_tolerance in [-0.01, 1.01] {
        let cfg = PackerConfig {
            shrink_tolerance,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(SnapSheetError::InvalidConfig(_))));
    }
    let edge = PackerConfig {
        shrink_tolerance: 1.0,
        ..Default::default()
    };
    assert!(edge.validate().is_ok());
}

#[test]
fn test_invalid_config_fails_the_whole_call() {
    let cfg = PackerConfig {
        gap: -5.0,
        ..Default::default()
    };
    let result = pack_layout(vec![("a", 100.0, 100.0)], cfg);
    assert!(matches!(result, Err(SnapSheetError::InvalidConfig(_))));
}

/// Test empty input
#[test]
fn test_empty_input_is_an_empty_layout() {
    let inputs: Vec<(String, f64, f64)> = vec![];
    let layout = pack_layout(inputs, PackerConfig::default()).expect("empty is fine");
    assert!(layout.placements.is_empty());
    assert!(layout.dropped.is_empty());
    assert_eq!(layout.page_count, 0);
    assert!(layout.pages().is_empty());
}

#[test]
fn test_non_positive_item_size_is_invalid_input() {
    let items = vec![Item::new("ok", 100.0, 100.0), Item::new("bad", 0.0, 100.0)];
    match pack_items(items, PackerConfig::default()) {
        Err(SnapSheetError::InvalidInput(msg)) => assert!(msg.contains("#1")),
        _ => panic!("Expected InvalidInput error"),
    }
}

/// Oversized screenshots are scaled down to the content area, never dropped.
#[test]
fn test_huge_screenshot_is_clamped_not_dropped() {
    let cfg = PackerConfig::default();
    let (cw, ch, gap) = (cfg.content_width(), cfg.content_height(), cfg.gap);
    let layout = pack_layout(vec![("wide", 9000.0, 300.0), ("tall", 300.0, 9000.0)], cfg)
        .expect("layout");

    assert!(layout.dropped.is_empty());
    for p in &layout.placements {
        assert!(p.width + gap <= cw + 1e-9);
        assert!(p.height + gap <= ch + 1e-9);
    }
    let wide = layout.placements.iter().find(|p| p.id == "wide").expect("wide");
    assert!((wide.width / wide.height - 30.0).abs() < 1e-9, "aspect ratio kept");
}

/// A gap wider than the content area makes every item undeliverable.
#[test]
fn test_degenerate_gap_drops_items_without_failing() {
    let cfg = PackerConfig {
        page_width: 30.0,
        page_height: 30.0,
        margin: 10.0,
        gap: 20.0,
        shrink_tolerance: 1.0,
        ..Default::default()
    };
    let inputs = vec![("a", 1000.0, 500.0), ("b", 10.0, 10.0)];
    let layout = pack_layout(inputs.clone(), cfg.clone()).expect("drops are not errors");

    assert!(layout.placements.is_empty());
    assert_eq!(layout.page_count, 0);
    assert_eq!(layout.dropped, vec!["a".to_string(), "b".to_string()]);

    // every dropped item is undeliverable on its own as well, at its own size
    for id in &layout.dropped {
        let &(_, w, h) = inputs.iter().find(|(k, _, _)| k == id).expect("input");
        let alone = pack_layout(vec![(id.clone(), w, h)], cfg.clone()).expect("layout");
        assert_eq!(alone.dropped, vec![id.clone()]);
        assert!(alone.placements.is_empty());
    }
}

/// Finite sizes whose print size overflows are rejected, never placed as slivers.
#[test]
fn test_print_size_overflow_is_invalid_input() {
    let cfg = PackerConfig {
        scale: 10.0,
        ..Default::default()
    };
    let items = vec![Item::new("ok", 100.0, 100.0), Item::new("huge", 1e308, 100.0)];
    match pack_items(items, cfg) {
        Err(SnapSheetError::InvalidInput(msg)) => assert!(msg.contains("#1")),
        other => panic!("Expected InvalidInput error, got {:?}", other),
    }
}
