//! twitterverse-core: In-memory social graph query engine.
//!
//! Loads a line-delimited profile file (users plus who they follow) into a
//! [`ProfileTable`] and answers query files against it in three stages:
//! search (walk `followers`/`following` edges from a start user), filter
//! (narrow by named predicates) and present (sort, then render as a short
//! list or long per-user blocks).
//!
//! Only the "following" direction is stored; followers are recomputed by a
//! full table scan whenever they are needed.

mod config;
mod error;
mod graph;
mod parse;
mod present;
mod query;
mod sort;
mod traversal;

use log::debug;

pub use config::{EvalOptions, UnknownOperationPolicy};
pub use error::{Error, LookupError, ParseError, ParseErrorKind, Result};
pub use graph::{follower_count, followers_of, ProfileTable, UserProfile};
pub use parse::{parse_profiles, parse_profiles_str, parse_query, parse_query_str};
pub use present::{format_long, list_literal, present, BORDER};
pub use query::{
    FilterSpec, Format, Operation, Predicate, PresentSpec, QuerySpec, SearchSpec, SortKey,
};
pub use sort::{
    by_name, by_popularity, by_username, insertion_sort_by, sort_results, Comparator,
};
pub use traversal::{filter, search, ResultSet};

/// Run a whole query: search, filter, then present.
///
/// Any error aborts the query; no partial output is produced.
pub fn evaluate(table: &ProfileTable, spec: &QuerySpec, options: &EvalOptions) -> Result<String> {
    let found = search(table, &spec.search, options)?;
    debug!("search from '{}' found {} users", spec.search.username, found.len());

    let mut kept = filter(table, found, &spec.filter)?;
    present(table, &mut kept, &spec.present)
}
