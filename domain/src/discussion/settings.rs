//! User-supplied discussion settings
//!
//! Everything here is optional input to the prompt composer. None of these
//! types influence control flow.

use serde::{Deserialize, Serialize};

/// Overall style of the discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionMode {
    #[default]
    Collaborative,
    Debate,
    Brainstorm,
    Critical,
}

impl DiscussionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionMode::Collaborative => "collaborative",
            DiscussionMode::Debate => "debate",
            DiscussionMode::Brainstorm => "brainstorm",
            DiscussionMode::Critical => "critical",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            DiscussionMode::Collaborative => {
                "Work together toward the best shared answer. Build on good points made by others."
            }
            DiscussionMode::Debate => {
                "This is a debate. Take clear positions, defend them with arguments, and challenge opposing views directly."
            }
            DiscussionMode::Brainstorm => {
                "This is a brainstorm. Favour quantity and variety of ideas; do not dismiss ideas too early."
            }
            DiscussionMode::Critical => {
                "Examine every claim critically. Look for flaws, hidden assumptions and counter-examples."
            }
        }
    }
}

impl std::str::FromStr for DiscussionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collaborative" => Ok(DiscussionMode::Collaborative),
            "debate" => Ok(DiscussionMode::Debate),
            "brainstorm" => Ok(DiscussionMode::Brainstorm),
            "critical" => Ok(DiscussionMode::Critical),
            other => Err(format!("unknown discussion mode: {}", other)),
        }
    }
}

/// How long and detailed each turn should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionDepth {
    Brief,
    #[default]
    Standard,
    Deep,
}

impl DiscussionDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionDepth::Brief => "brief",
            DiscussionDepth::Standard => "standard",
            DiscussionDepth::Deep => "deep",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            DiscussionDepth::Brief => "Keep your reply short: at most one or two paragraphs.",
            DiscussionDepth::Standard => {
                "Reply in a few focused paragraphs with the key reasoning."
            }
            DiscussionDepth::Deep => {
                "Give a thorough, in-depth reply. Explore nuances, edge cases and supporting evidence."
            }
        }
    }
}

impl std::str::FromStr for DiscussionDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brief" => Ok(DiscussionDepth::Brief),
            "standard" => Ok(DiscussionDepth::Standard),
            "deep" => Ok(DiscussionDepth::Deep),
            other => Err(format!("unknown discussion depth: {}", other)),
        }
    }
}

/// User steering for the next rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionGuide {
    /// Aspects the participants should concentrate on
    pub focus: Vec<String>,
    /// Aspects the participants should stay away from
    pub avoid: Vec<String>,
    pub note: Option<String>,
}

impl DirectionGuide {
    pub fn is_empty(&self) -> bool {
        self.focus.is_empty()
            && self.avoid.is_empty()
            && self.note.as_deref().is_none_or(|n| n.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalLevel {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl TechnicalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TechnicalLevel::Beginner => "beginner",
            TechnicalLevel::Intermediate => "intermediate",
            TechnicalLevel::Expert => "expert",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            TechnicalLevel::Beginner => {
                "The user is a beginner: avoid jargon and explain terms in plain language."
            }
            TechnicalLevel::Intermediate => {
                "The user has intermediate knowledge: some technical terms are fine."
            }
            TechnicalLevel::Expert => {
                "The user is an expert: be precise and technical, skip the basics."
            }
        }
    }
}

/// What the user told us about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: Option<String>,
    pub technical_level: Option<TechnicalLevel>,
    pub interests: Vec<String>,
    /// Preferred answer language (e.g. "English", "ja")
    pub language: Option<String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.technical_level.is_none()
            && self.interests.is_empty()
            && self.language.is_none()
    }
}

/// Topic and summary of an earlier exchange in the same session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousTurn {
    pub topic: String,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("Debate".parse::<DiscussionMode>().unwrap(), DiscussionMode::Debate);
        assert!("shouting".parse::<DiscussionMode>().is_err());
    }

    #[test]
    fn test_depth_default() {
        assert_eq!(DiscussionDepth::default(), DiscussionDepth::Standard);
    }

    #[test]
    fn test_direction_guide_blank_note_is_empty() {
        let guide = DirectionGuide {
            note: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(guide.is_empty());
    }

    #[test]
    fn test_profile_empty() {
        assert!(UserProfile::default().is_empty());
        let profile = UserProfile {
            technical_level: Some(TechnicalLevel::Expert),
            ..Default::default()
        };
        assert!(!profile.is_empty());
    }
}
