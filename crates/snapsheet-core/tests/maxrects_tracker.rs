use rand::{Rng, SeedableRng};
use snapsheet_core::model::Rect;
use snapsheet_core::packer::FreeSpace;
use snapsheet_core::packer::maxrects::MaxRectsPage;

#[test]
fn empty_page_offers_its_origin() {
    let page = MaxRectsPage::new(100.0, 50.0);
    assert_eq!(page.free_rects(), &[Rect::new(0.0, 0.0, 100.0, 50.0)]);
    assert_eq!(page.find_position(100.0, 50.0), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
    assert_eq!(page.find_position(100.5, 10.0), None);
    assert_eq!(page.find_position(10.0, 50.5), None);
}

#[test]
fn commit_splits_into_maximal_residuals() {
    let mut page = MaxRectsPage::new(100.0, 100.0);
    page.commit(&Rect::new(0.0, 0.0, 60.0, 40.0));
    assert_eq!(
        page.free_rects(),
        &[
            Rect::new(0.0, 40.0, 100.0, 60.0),
            Rect::new(60.0, 0.0, 40.0, 100.0),
        ]
    );
}

#[test]
fn best_short_side_fit_prefers_the_snug_region() {
    let mut page = MaxRectsPage::new(100.0, 100.0);
    page.commit(&Rect::new(0.0, 0.0, 60.0, 40.0));
    // bottom strip leaves a short side of 10, right strip an exact width match
    let spot = page.find_position(40.0, 50.0).expect("fits");
    assert_eq!((spot.x, spot.y), (60.0, 0.0));
}

#[test]
fn identical_scores_resolve_to_the_first_region_in_pool_order() {
    let mut page = MaxRectsPage::new(100.0, 100.0);
    page.commit(&Rect::new(40.0, 0.0, 20.0, 100.0));
    assert_eq!(page.free_list_len(), 2);
    let spot = page.find_position(30.0, 50.0).expect("fits");
    assert_eq!((spot.x, spot.y), (0.0, 0.0));
}

#[test]
fn contained_regions_are_pruned() {
    let mut page = MaxRectsPage::new(100.0, 100.0);
    page.commit(&Rect::new(0.0, 0.0, 50.0, 50.0));
    page.commit(&Rect::new(50.0, 0.0, 50.0, 50.0));
    // both boxes span the top half; only the bottom half remains
    assert_eq!(page.free_rects(), &[Rect::new(0.0, 50.0, 100.0, 50.0)]);
}

#[test]
fn free_regions_never_cover_committed_boxes() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut page = MaxRectsPage::new(190.0, 277.0);
    let mut used: Vec<Rect> = Vec::new();
    for _ in 0..200 {
        let w = rng.gen_range(5.0..60.0);
        let h = rng.gen_range(5.0..60.0);
        if let Some(spot) = page.find_position(w, h) {
            page.commit(&spot);
            used.push(spot);
        }
        let free = page.free_rects();
        for fr in free {
            assert!(page.bounds().contains(fr));
            for u in &used {
                assert!(!fr.intersects(u), "free {:?} overlaps used {:?}", fr, u);
            }
        }
        for i in 0..free.len() {
            for j in 0..free.len() {
                if i != j {
                    assert!(!free[j].contains(&free[i]), "{:?} inside {:?}", free[i], free[j]);
                }
            }
        }
    }
    assert!(!used.is_empty());
}
