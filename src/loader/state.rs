// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a single load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    CacheCheck,
    CacheHit,
    Downloading,
    Parsing,
    Attached,
    Failed,
}

impl LoadPhase {
    pub fn can_transition_to(self, next: LoadPhase) -> bool {
        use LoadPhase::*;
        matches!(
            (self, next),
            (Idle, CacheCheck)
                | (CacheCheck, CacheHit)
                | (CacheCheck, Downloading)
                | (CacheHit, Parsing)
                | (Downloading, Parsing)
                | (Downloading, Failed)
                | (Parsing, Attached)
                | (Parsing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LoadPhase::Attached | LoadPhase::Failed)
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::Idle => "idle",
            LoadPhase::CacheCheck => "cache_check",
            LoadPhase::CacheHit => "cache_hit",
            LoadPhase::Downloading => "downloading",
            LoadPhase::Parsing => "parsing",
            LoadPhase::Attached => "attached",
            LoadPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// When the container's previous children are destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Keep old children until the new model parsed successfully
    #[default]
    ReplaceOnSuccess,
    /// Destroy old children before parsing; a failed parse leaves the container empty
    ClearBeforeParse,
}

impl FromStr for ReplacePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace_on_success" => Ok(ReplacePolicy::ReplaceOnSuccess),
            "clear_before_parse" => Ok(ReplacePolicy::ClearBeforeParse),
            other => Err(anyhow::anyhow!(
                "Unknown replace policy: {} (expected replace_on_success or clear_before_parse)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_path() {
        let path = [
            LoadPhase::Idle,
            LoadPhase::CacheCheck,
            LoadPhase::CacheHit,
            LoadPhase::Parsing,
            LoadPhase::Attached,
        ];
        assert!(path.windows(2).all(|w| w[0].can_transition_to(w[1])));
    }

    #[test]
    fn test_download_path() {
        let path = [
            LoadPhase::Idle,
            LoadPhase::CacheCheck,
            LoadPhase::Downloading,
            LoadPhase::Parsing,
            LoadPhase::Failed,
        ];
        assert!(path.windows(2).all(|w| w[0].can_transition_to(w[1])));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!LoadPhase::Idle.can_transition_to(LoadPhase::Parsing));
        assert!(!LoadPhase::CacheCheck.can_transition_to(LoadPhase::Failed));
        assert!(!LoadPhase::CacheHit.can_transition_to(LoadPhase::Downloading));
        assert!(!LoadPhase::Attached.can_transition_to(LoadPhase::CacheCheck));
        assert!(!LoadPhase::Failed.can_transition_to(LoadPhase::Parsing));
    }

    #[test]
    fn test_terminal_phases() {
        assert!(LoadPhase::Attached.is_terminal());
        assert!(LoadPhase::Failed.is_terminal());
        assert!(!LoadPhase::Parsing.is_terminal());
    }

    #[test]
    fn test_replace_policy_from_str() {
        assert_eq!("clear_before_parse".parse::<ReplacePolicy>().unwrap(), ReplacePolicy::ClearBeforeParse);
        assert_eq!(" Replace_On_Success ".parse::<ReplacePolicy>().unwrap(), ReplacePolicy::ReplaceOnSuccess);
        assert!("never".parse::<ReplacePolicy>().is_err());
    }
}
