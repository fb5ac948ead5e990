//! Termination configuration

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Which policy decides early termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCondition {
    #[default]
    Rounds,
    Consensus,
    Keyword,
    Manual,
}

impl TerminationCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationCondition::Rounds => "rounds",
            TerminationCondition::Consensus => "consensus",
            TerminationCondition::Keyword => "keyword",
            TerminationCondition::Manual => "manual",
        }
    }
}

impl std::fmt::Display for TerminationCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TerminationCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rounds" => Ok(TerminationCondition::Rounds),
            "consensus" => Ok(TerminationCondition::Consensus),
            "keyword" => Ok(TerminationCondition::Keyword),
            "manual" => Ok(TerminationCondition::Manual),
            other => Err(format!("unknown termination condition: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationConfig {
    pub condition: TerminationCondition,
    /// Safety bound on rounds, enforced for every condition
    pub max_rounds: usize,
    /// Fraction in `[0, 1]` of last-round messages that must signal agreement
    pub consensus_threshold: f64,
    pub keywords: Vec<String>,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            condition: TerminationCondition::Rounds,
            max_rounds: 10,
            consensus_threshold: 0.7,
            keywords: Vec::new(),
        }
    }
}

impl TerminationConfig {
    pub fn consensus(threshold: f64) -> Self {
        Self {
            condition: TerminationCondition::Consensus,
            consensus_threshold: threshold,
            ..Default::default()
        }
    }

    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            condition: TerminationCondition::Keyword,
            keywords: keywords.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Effective number of rounds for a requested round budget.
    pub fn effective_rounds(&self, requested: usize) -> usize {
        requested.min(self.max_rounds)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_rounds == 0 {
            return Err(DomainError::InvalidTermination(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.consensus_threshold) {
            return Err(DomainError::InvalidTermination(format!(
                "consensus_threshold {} is outside [0, 1]",
                self.consensus_threshold
            )));
        }
        if self.condition == TerminationCondition::Keyword
            && self.keywords.iter().all(|k| k.trim().is_empty())
        {
            return Err(DomainError::InvalidTermination(
                "keyword condition requires at least one keyword".to_string(),
            ));
        }
        Ok(())
    }
}
