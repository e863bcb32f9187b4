//! Catalog refresh merge.

use super::Catalog;

/// Combine a freshly fetched catalog with the current one.
///
/// The result holds exactly the titles of `incoming`; titles only present in
/// `current` are dropped. With `preserve_stock`, every title known to both
/// keeps its current stock while all other fields come from `incoming`.
/// Titles match by exact string equality.
pub fn merge(current: &Catalog, incoming: Catalog, preserve_stock: bool) -> Catalog {
    let mut merged = incoming;

    if preserve_stock {
        for (title, entry) in merged.iter_mut() {
            // A current entry without stock has nothing to preserve
            if let Some(stock) = current.get(title).and_then(|existing| existing.stock) {
                entry.stock = Some(stock);
            }
        }
    }

    merged
}
