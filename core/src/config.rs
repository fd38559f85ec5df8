use std::fmt;
use std::str::FromStr;

/// What the search stage does with an operation name it does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOperationPolicy {
    /// Leave the current result set untouched and carry on.
    #[default]
    Ignore,
    /// Abort the query with [`LookupError::UnknownOperation`](crate::LookupError::UnknownOperation).
    Reject,
}

impl FromStr for UnknownOperationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(UnknownOperationPolicy::Ignore),
            "reject" => Ok(UnknownOperationPolicy::Reject),
            other => Err(format!(
                "invalid unknown-operation policy '{}', use 'ignore' or 'reject'",
                other
            )),
        }
    }
}

impl fmt::Display for UnknownOperationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnknownOperationPolicy::Ignore => "ignore",
            UnknownOperationPolicy::Reject => "reject",
        })
    }
}

/// Knobs for [`evaluate`](crate::evaluate). The defaults reproduce the
/// historical behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalOptions {
    pub unknown_operations: UnknownOperationPolicy,
}

impl EvalOptions {
    pub fn strict() -> Self {
        Self {
            unknown_operations: UnknownOperationPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse_case_insensitive() {
        assert_eq!("Reject".parse(), Ok(UnknownOperationPolicy::Reject));
        assert_eq!("ignore".parse(), Ok(UnknownOperationPolicy::Ignore));
        assert!("skip".parse::<UnknownOperationPolicy>().is_err());
    }

    #[test]
    fn test_default_ignores_unknown_operations() {
        assert_eq!(
            EvalOptions::default().unknown_operations,
            UnknownOperationPolicy::Ignore
        );
        assert_eq!(
            EvalOptions::strict().unknown_operations,
            UnknownOperationPolicy::Reject
        );
    }
}
