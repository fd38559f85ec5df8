use std::cmp::Ordering;

use log::debug;

use crate::error::LookupError;
use crate::graph::{follower_count, ProfileTable};
use crate::query::SortKey;

/// Plain lexicographic (byte-wise) order of the usernames.
pub fn by_username(_table: &ProfileTable, a: &str, b: &str) -> Result<Ordering, LookupError> {
    Ok(a.cmp(b))
}

/// Display name, case-sensitive, ties broken by username.
pub fn by_name(table: &ProfileTable, a: &str, b: &str) -> Result<Ordering, LookupError> {
    let a_name = &table.profile(a)?.name;
    let b_name = &table.profile(b)?.name;
    Ok(a_name.cmp(b_name).then_with(|| a.cmp(b)))
}

/// Follower count, most followed first, ties broken by username.
///
/// Counts are recomputed for every comparison.
pub fn by_popularity(table: &ProfileTable, a: &str, b: &str) -> Result<Ordering, LookupError> {
    let a_followers = follower_count(table, a);
    let b_followers = follower_count(table, b);
    Ok(b_followers.cmp(&a_followers).then_with(|| a.cmp(b)))
}

/// Signature shared by the comparators above.
pub type Comparator = fn(&ProfileTable, &str, &str) -> Result<Ordering, LookupError>;

impl SortKey {
    pub fn comparator(self) -> Comparator {
        match self {
            SortKey::Username => by_username,
            SortKey::Name => by_name,
            SortKey::Popularity => by_popularity,
        }
    }
}

/// Stable in-place insertion sort. Stops at the first comparison error,
/// leaving `items` partially sorted.
pub fn insertion_sort_by<T, E, F>(items: &mut [T], mut cmp: F) -> Result<(), E>
where
    F: FnMut(&T, &T) -> Result<Ordering, E>,
{
    for i in 1..items.len() {
        let mut pos = i;
        while pos > 0 && cmp(&items[pos - 1], &items[pos])? == Ordering::Greater {
            items.swap(pos - 1, pos);
            pos -= 1;
        }
    }
    Ok(())
}

/// Sort a result set in place by `key`.
pub fn sort_results(
    table: &ProfileTable,
    results: &mut [String],
    key: SortKey,
) -> Result<(), LookupError> {
    debug!("sorting {} users by {}", results.len(), key);
    let cmp = key.comparator();
    insertion_sort_by(results, |a, b| cmp(table, a, b))
}
