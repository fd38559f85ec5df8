use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::LookupError;

/// One user record from a profile file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    #[serde(skip)]
    pub username: String,
    pub name: String,
    pub location: String,
    pub website: String,
    /// Multi-line bio, lines joined with `\n`, no trailing newline.
    pub bio: String,
    /// Usernames this user follows, in file order. Entries need not exist
    /// in the table.
    pub following: Vec<String>,
}

impl UserProfile {
    /// A profile with empty metadata, mostly useful for building tables by hand.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: String::new(),
            location: String::new(),
            website: String::new(),
            bio: String::new(),
            following: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the free-text location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Replace the following list.
    pub fn with_following<I, S>(mut self, following: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.following = following.into_iter().map(Into::into).collect();
        self
    }

    /// Is `username` in this user's following list?
    pub fn follows(&self, username: &str) -> bool {
        self.following.iter().any(|f| f == username)
    }
}

/// In-memory social graph: username → profile.
///
/// Only the "following" direction is stored. Followers are derived by a full
/// scan every time they are asked for (see [`followers_of`]). Records keep
/// file order so follower scans are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileTable {
    profiles: Vec<UserProfile>,
    index: HashMap<String, usize>,
}

impl ProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile. A record for an existing username replaces the old
    /// one in place and the old record is returned.
    pub fn insert(&mut self, profile: UserProfile) -> Option<UserProfile> {
        match self.index.get(&profile.username) {
            Some(&slot) => Some(std::mem::replace(&mut self.profiles[slot], profile)),
            None => {
                self.index
                    .insert(profile.username.clone(), self.profiles.len());
                self.profiles.push(profile);
                None
            }
        }
    }

    /// Look up a profile by username.
    pub fn get(&self, username: &str) -> Option<&UserProfile> {
        self.index.get(username).map(|&slot| &self.profiles[slot])
    }

    /// Like [`get`](Self::get), but a missing user is an error.
    pub fn profile(&self, username: &str) -> Result<&UserProfile, LookupError> {
        self.get(username)
            .ok_or_else(|| LookupError::UnknownUser(username.to_string()))
    }

    /// Is there a record for `username`?
    pub fn contains(&self, username: &str) -> bool {
        self.index.contains_key(username)
    }

    /// Profiles in file order.
    pub fn iter(&self) -> impl Iterator<Item = &UserProfile> {
        self.profiles.iter()
    }

    /// Usernames in file order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.username.as_str())
    }

    /// Number of users with a record.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Total number of stored "following" entries.
    pub fn follow_edge_count(&self) -> usize {
        self.profiles.iter().map(|p| p.following.len()).sum()
    }

    /// `(follower, followed)` pairs whose followed user has no record.
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        self.profiles
            .iter()
            .flat_map(|p| {
                p.following
                    .iter()
                    .filter(|f| !self.contains(f))
                    .map(move |f| (p.username.as_str(), f.as_str()))
            })
            .collect()
    }
}

impl FromIterator<UserProfile> for ProfileTable {
    fn from_iter<I: IntoIterator<Item = UserProfile>>(iter: I) -> Self {
        let mut table = ProfileTable::new();
        for profile in iter {
            table.insert(profile);
        }
        table
    }
}

impl Serialize for ProfileTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.profiles.len()))?;
        for profile in &self.profiles {
            map.serialize_entry(&profile.username, profile)?;
        }
        map.end()
    }
}

/// Every user in the table whose following list contains `username`, in
/// table order. O(|table|) per call; nothing is cached.
pub fn followers_of<'a>(table: &'a ProfileTable, username: &str) -> Vec<&'a str> {
    table
        .iter()
        .filter(|p| p.follows(username))
        .map(|p| p.username.as_str())
        .collect()
}

/// `followers_of(table, username).len()` without collecting.
pub fn follower_count(table: &ProfileTable, username: &str) -> usize {
    table.iter().filter(|p| p.follows(username)).count()
}
