use furni_types::{Fields, Item};

/// Fold partial records left to right; for each field the last layer that
/// sets it wins.
///
/// Key order follows first appearance, so overlaying onto
/// [`Item::defaults`] keeps the canonical schema order and appends keys the
/// defaults do not know.
pub fn overlay<'a, I>(layers: I) -> Item
where
    I: IntoIterator<Item = &'a Fields>,
{
    let mut merged = Fields::new();
    for layer in layers {
        for (field, value) in layer {
            merged.insert(field.clone(), value.clone());
        }
    }
    Item::from_fields(merged)
}
