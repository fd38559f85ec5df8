use std::collections::HashSet;

use log::{debug, warn};

use crate::config::{EvalOptions, UnknownOperationPolicy};
use crate::error::{LookupError, Result};
use crate::graph::{followers_of, ProfileTable};
use crate::query::{FilterSpec, Operation, Predicate, SearchSpec};

/// Ordered, duplicate-free list of usernames flowing through the pipeline.
pub type ResultSet = Vec<String>;

/// Drop repeated usernames, keeping each at its first position.
fn dedup_first(usernames: Vec<String>) -> ResultSet {
    let mut seen: HashSet<String> = HashSet::with_capacity(usernames.len());
    usernames
        .into_iter()
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// One expansion step: concatenate each member's neighbors in member order.
fn expand(table: &ProfileTable, current: &[String], op: &Operation) -> Result<Vec<String>> {
    let mut next = Vec::new();
    for user in current {
        match op {
            Operation::Followers => {
                next.extend(followers_of(table, user).into_iter().map(str::to_string))
            }
            Operation::Following => next.extend(table.profile(user)?.following.iter().cloned()),
            Operation::Unknown(_) => {}
        }
    }
    Ok(next)
}

/// Search stage: start from one user and expand step by step along
/// `followers`/`following` edges, deduplicating after every step.
///
/// The start user must exist. A `following` step through a username with no
/// record is a lookup error; a `followers` step never fails.
pub fn search(table: &ProfileTable, spec: &SearchSpec, options: &EvalOptions) -> Result<ResultSet> {
    table.profile(&spec.username)?;

    let mut results: ResultSet = vec![spec.username.clone()];

    for (step, op) in spec.operations.iter().enumerate() {
        if let Operation::Unknown(name) = op {
            match options.unknown_operations {
                UnknownOperationPolicy::Ignore => {
                    warn!("ignoring unknown search operation '{}'", name);
                    continue;
                }
                UnknownOperationPolicy::Reject => {
                    return Err(LookupError::UnknownOperation(name.clone()).into());
                }
            }
        }

        results = dedup_first(expand(table, &results, op)?);
        debug!("search step {} ({}): {} users", step + 1, op, results.len());
    }

    Ok(results)
}

/// Does `username` pass one predicate?
fn matches(table: &ProfileTable, username: &str, predicate: Predicate, arg: &str) -> Result<bool> {
    let matched = match predicate {
        Predicate::NameIncludes => {
            let profile = table.profile(username)?;
            profile.name.to_lowercase().contains(&arg.to_lowercase())
        }
        Predicate::LocationIncludes => {
            let profile = table.profile(username)?;
            profile.location.to_lowercase().contains(&arg.to_lowercase())
        }
        Predicate::Follower => followers_of(table, username).contains(&arg),
        Predicate::Following => table.profile(username)?.follows(arg),
    };
    Ok(matched)
}

/// Filter stage: keep the users that pass every predicate, in their
/// original order. An empty filter returns the input unchanged.
pub fn filter(table: &ProfileTable, results: ResultSet, spec: &FilterSpec) -> Result<ResultSet> {
    let mut current = results;

    for (&predicate, arg) in spec {
        let mut kept = Vec::with_capacity(current.len());
        for user in current {
            if matches(table, &user, predicate, arg)? {
                kept.push(user);
            }
        }
        debug!("filter {} '{}': {} users remain", predicate, arg, kept.len());
        current = kept;
    }

    Ok(current)
}
