use snapsheet_core::prelude::*;

#[test]
fn test_pack_stats_basic() {
    let cfg = PackerConfig::builder()
        .with_page_dimensions(220.0, 220.0)
        .margin(10.0)
        .gap(0.0)
        .scale(1.0)
        .build();

    // four 100x100 squares fill the 200x200 content area exactly
    let inputs: Vec<(String, f64, f64)> =
        (0..4).map(|i| (format!("tex_{}", i), 100.0, 100.0)).collect();
    let layout = pack_layout(inputs, cfg).expect("packing should succeed");
    let stats = layout.stats();

    assert_eq!(stats.num_pages, 1);
    assert_eq!(stats.num_placed, 4);
    assert_eq!(stats.num_dropped, 0);
    assert_eq!(stats.used_area, 4.0 * 100.0 * 100.0);
    assert_eq!(stats.total_content_area, 200.0 * 200.0);
    assert!((stats.occupancy - 1.0).abs() < 1e-12);
    assert_eq!(stats.wasted_area(), 0.0);
    assert_eq!(stats.num_rotated, 0);
    assert_eq!(stats.num_shrunk, 0);
}

#[test]
fn test_pack_stats_counts_rotation_shrink_and_pages() {
    let cfg = PackerConfig::builder()
        .with_page_dimensions(120.0, 220.0)
        .margin(10.0)
        .gap(0.0)
        .scale(1.0)
        .allow_rotation(true)
        .shrink_tolerance(0.15)
        .build();
    let layout = pack_layout(
        vec![("big", 100.0, 120.0), ("lying", 70.0, 90.0), ("thin", 11.0, 80.0)],
        cfg,
    )
    .expect("layout");
    let stats = layout.stats();

    // "lying" turns to fit under "big"; "thin" squeezes into the 10-wide strip left over
    assert_eq!(stats.num_placed, 3);
    assert_eq!(stats.num_pages, 1);
    assert_eq!(stats.num_rotated, 1);
    assert_eq!(stats.num_shrunk, 1);
    assert!(stats.occupancy > 0.0 && stats.occupancy <= 1.0);
    assert!(stats.waste_percentage() >= 0.0 && stats.waste_percentage() < 100.0);
}

#[test]
fn test_pack_stats_summary() {
    let layout = pack_layout(vec![("a", 1000.0, 800.0)], PackerConfig::default()).expect("layout");
    let summary = layout.stats().summary();
    assert!(summary.contains("Pages: 1"));
    assert!(summary.contains("Placed: 1"));
    assert!(summary.contains("Dropped: 0"));
    assert!(summary.contains("Occupancy"));
}

#[test]
fn test_pack_stats_empty_layout() {
    let layout = pack_layout(Vec::<(String, f64, f64)>::new(), PackerConfig::default())
        .expect("layout");
    let stats = layout.stats();
    assert_eq!(stats.num_pages, 0);
    assert_eq!(stats.occupancy, 0.0);
    assert_eq!(stats.waste_percentage(), 0.0);
}
