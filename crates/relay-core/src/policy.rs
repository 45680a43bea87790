//! Failure policy for downstream storage errors.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// What the orchestrator does with provisioning and transfer failures.
///
/// `Lenient` logs them and still reports the destination reference to the
/// caller with a 200. `Strict` turns them into request errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Lenient,
    Strict,
}

impl FailurePolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, FailurePolicy::Strict)
    }
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(FailurePolicy::Lenient),
            "strict" => Ok(FailurePolicy::Strict),
            _ => Err(anyhow::anyhow!("Invalid failure policy: {}", s)),
        }
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FailurePolicy::Lenient => write!(f, "lenient"),
            FailurePolicy::Strict => write!(f, "strict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("strict".parse::<FailurePolicy>().unwrap(), FailurePolicy::Strict);
        assert_eq!(" Lenient ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Lenient);
        assert!("sometimes".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_default_is_lenient() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Lenient);
        assert!(!FailurePolicy::default().is_strict());
    }
}
