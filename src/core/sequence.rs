/// Display order for the next created entity: one past the highest existing
/// order, or 1 when there is none yet.
pub fn next_order<I>(existing: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    existing
        .into_iter()
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
