use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One expansion step of the search stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Followers,
    Following,
    /// Any other line found between the start user and `FILTER`.
    Unknown(String),
}

impl From<&str> for Operation {
    fn from(s: &str) -> Self {
        match s {
            "followers" => Operation::Followers,
            "following" => Operation::Following,
            other => Operation::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Followers => f.write_str("followers"),
            Operation::Following => f.write_str("following"),
            Operation::Unknown(s) => f.write_str(s),
        }
    }
}

/// Named single-argument filter test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Predicate {
    /// Candidate follows the argument user.
    Following,
    /// Argument user follows the candidate.
    Follower,
    /// Case-insensitive substring of the candidate's name.
    NameIncludes,
    /// Case-insensitive substring of the candidate's location.
    LocationIncludes,
}

impl Predicate {
    pub fn as_str(self) -> &'static str {
        match self {
            Predicate::Following => "following",
            Predicate::Follower => "follower",
            Predicate::NameIncludes => "name-includes",
            Predicate::LocationIncludes => "location-includes",
        }
    }
}

impl FromStr for Predicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "following" => Ok(Predicate::Following),
            "follower" => Ok(Predicate::Follower),
            "name-includes" => Ok(Predicate::NameIncludes),
            "location-includes" => Ok(Predicate::LocationIncludes),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result ordering chosen by the `sort-by` presentation setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Username,
    Name,
    Popularity,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "username" => Ok(SortKey::Username),
            "name" => Ok(SortKey::Name),
            "popularity" => Ok(SortKey::Popularity),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Username => "username",
            SortKey::Name => "name",
            SortKey::Popularity => "popularity",
        })
    }
}

/// Output layout chosen by the `format` presentation setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One list literal of usernames.
    Short,
    /// One block per user with every profile field.
    Long,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Format::Short),
            "long" => Ok(Format::Long),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Short => "short",
            Format::Long => "long",
        })
    }
}

/// Start user plus the expansion steps to apply, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub username: String,
    pub operations: Vec<Operation>,
}

impl SearchSpec {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            operations: Vec::new(),
        }
    }

    /// Append one expansion step.
    pub fn then(mut self, op: impl Into<Operation>) -> Self {
        self.operations.push(op.into());
        self
    }
}

/// At most one argument per predicate. Predicates commute, so the map order
/// carries no meaning.
pub type FilterSpec = BTreeMap<Predicate, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentSpec {
    pub sort_by: SortKey,
    pub format: Format,
}

/// A parsed query file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub search: SearchSpec,
    pub filter: FilterSpec,
    pub present: PresentSpec,
}
