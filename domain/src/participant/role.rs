//! Participant roles
//!
//! A role is either one of the built-in presets or a custom role that
//! carries its own instruction text. A custom role with blank instructions
//! behaves exactly like having no role at all.

use serde::{Deserialize, Serialize};

/// Built-in role presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolePreset {
    Optimist,
    Critic,
    Analyst,
    DevilsAdvocate,
    Pragmatist,
    Creative,
    Expert,
}

impl RolePreset {
    pub fn all() -> &'static [RolePreset] {
        &[
            RolePreset::Optimist,
            RolePreset::Critic,
            RolePreset::Analyst,
            RolePreset::DevilsAdvocate,
            RolePreset::Pragmatist,
            RolePreset::Creative,
            RolePreset::Expert,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RolePreset::Optimist => "optimist",
            RolePreset::Critic => "critic",
            RolePreset::Analyst => "analyst",
            RolePreset::DevilsAdvocate => "devils_advocate",
            RolePreset::Pragmatist => "pragmatist",
            RolePreset::Creative => "creative",
            RolePreset::Expert => "expert",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RolePreset::Optimist => "Optimist",
            RolePreset::Critic => "Critic",
            RolePreset::Analyst => "Analyst",
            RolePreset::DevilsAdvocate => "Devil's Advocate",
            RolePreset::Pragmatist => "Pragmatist",
            RolePreset::Creative => "Creative Thinker",
            RolePreset::Expert => "Domain Expert",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            RolePreset::Optimist => {
                "You look for opportunities and strengths. Highlight what could go right and build on promising ideas, while staying honest about facts."
            }
            RolePreset::Critic => {
                "You scrutinize claims carefully. Point out weaknesses, missing evidence and risks, and ask for justification where it is lacking."
            }
            RolePreset::Analyst => {
                "You reason from data and structure. Break the problem into parts, weigh evidence, and quantify trade-offs where possible."
            }
            RolePreset::DevilsAdvocate => {
                "You deliberately argue the opposite of the emerging view to stress-test it, even when you privately agree."
            }
            RolePreset::Pragmatist => {
                "You focus on what is practical and actionable. Favour concrete steps, costs and constraints over theory."
            }
            RolePreset::Creative => {
                "You propose unconventional angles and novel combinations of ideas. Explore possibilities others have not mentioned."
            }
            RolePreset::Expert => {
                "You answer as a seasoned specialist in the topic. Be precise, cite established knowledge, and correct misconceptions."
            }
        }
    }
}

impl std::fmt::Display for RolePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for RolePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace('\'', "")
            .replace(['-', ' '], "_");
        RolePreset::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == normalized || p.as_str().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown role preset: {}", s))
    }
}

/// A user-defined role carrying its own instruction text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRole {
    pub id: String,
    pub name: String,
    pub instruction: String,
}

/// The role a participant plays in the discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantRole {
    Preset { preset: RolePreset },
    Custom(CustomRole),
}

/// A role that resolved to usable instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole<'a> {
    pub name: &'a str,
    pub instruction: &'a str,
}

impl ParticipantRole {
    pub fn preset(preset: RolePreset) -> Self {
        ParticipantRole::Preset { preset }
    }

    pub fn custom(
        id: impl Into<String>,
        name: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        ParticipantRole::Custom(CustomRole {
            id: id.into(),
            name: name.into(),
            instruction: instruction.into(),
        })
    }

    /// Resolve to name + instruction, or `None` when the role has no usable text.
    pub fn resolve(&self) -> Option<ResolvedRole<'_>> {
        match self {
            ParticipantRole::Preset { preset } => Some(ResolvedRole {
                name: preset.display_name(),
                instruction: preset.instruction(),
            }),
            ParticipantRole::Custom(custom) => {
                let instruction = custom.instruction.trim();
                if instruction.is_empty() {
                    return None;
                }
                let name = if custom.name.trim().is_empty() {
                    custom.id.as_str()
                } else {
                    custom.name.as_str()
                };
                Some(ResolvedRole { name, instruction })
            }
        }
    }
}
