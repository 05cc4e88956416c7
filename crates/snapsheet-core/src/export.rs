use crate::model::{Layout, PlacedItem};
use serde_json::{Value, json};

fn item_json<K>(it: &PlacedItem<K>) -> Value {
    json!({
        "x": it.x,
        "y": it.y,
        "width": it.width,
        "height": it.height,
        "rotated": it.rotated,
        "scale": it.scale,
    })
}

/// Serialize the layout page by page: `{ pages: [{ index, width, height, items }], dropped, meta }`.
/// Pages are in ascending index order, which is what a document writer walks.
pub fn to_json_pages<K: ToString + Clone>(layout: &Layout<K>) -> Value {
    let pages_val = layout
        .pages()
        .iter()
        .map(|p| {
            let items: Vec<Value> = p
                .items
                .iter()
                .map(|it| {
                    let mut v = item_json(it);
                    v["id"] = Value::String(it.id.to_string());
                    v
                })
                .collect();
            json!({
                "index": p.index,
                "width": p.width,
                "height": p.height,
                "items": items,
            })
        })
        .collect::<Vec<_>>();
    let dropped: Vec<String> = layout.dropped.iter().map(|k| k.to_string()).collect();
    json!({"pages": pages_val, "dropped": dropped, "meta": &layout.meta})
}

/// Flatten placements keyed by id.
/// Shape: `{ items: { id: { page, x, y, width, height, rotated, scale } }, dropped, meta }`.
pub fn to_json_hash<K: ToString>(layout: &Layout<K>) -> Value {
    let mut items = serde_json::Map::new();
    for it in &layout.placements {
        let mut v = item_json(it);
        v["page"] = json!(it.page_index);
        items.insert(it.id.to_string(), v);
    }
    let dropped: Vec<String> = layout.dropped.iter().map(|k| k.to_string()).collect();
    json!({ "items": items, "dropped": dropped, "meta": &layout.meta })
}
