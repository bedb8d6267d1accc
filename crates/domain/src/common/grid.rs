//! Maximum over a 2D grid of domain objects.
//!
//! The caller supplies an explicit projection picking the field to rank by,
//! instead of naming a field at runtime.

/// Returns the element whose projected key is greatest, scanning rows in
/// order. Returns `None` for an empty grid; the earliest element wins ties.
pub fn max_by_projection<T, K, F>(grid: &[Vec<T>], mut project: F) -> Option<&T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut best: Option<(&T, K)> = None;
    for row in grid {
        for item in row {
            let key = project(item);
            match &best {
                Some((_, best_key)) if *best_key >= key => {}
                _ => best = Some((item, key)),
            }
        }
    }
    best.map(|(item, _)| item)
}
