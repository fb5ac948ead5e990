//! Discussion defaults from TOML (`[discussion]` section)

use council_domain::{
    BackendSelector, DiscussionDepth, DiscussionMode, Participant, ParticipantRole,
    ParticipantRoster, RolePreset, TerminationConfig, UserProfile,
};
use serde::{Deserialize, Serialize};

/// One `[[discussion.participants]]` entry.
///
/// `role` names a preset; `instruction` makes the role custom, with `role`
/// (or the id) as its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileParticipantConfig {
    pub id: String,
    /// `provider/model`, or a bare model name for OpenAI
    pub backend: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}

impl FileParticipantConfig {
    pub fn to_participant(&self) -> Result<Participant, String> {
        let backend: BackendSelector = self
            .backend
            .parse()
            .map_err(|e| format!("participant '{}': {}", self.id, e))?;
        let mut participant = Participant::new(&self.id, backend);
        if let Some(name) = &self.name {
            participant = participant.with_name(name);
        }
        if let Some(color) = &self.color {
            participant = participant.with_color(color);
        }

        let role = match (&self.instruction, &self.role) {
            (Some(instruction), role) => Some(ParticipantRole::custom(
                &self.id,
                role.as_deref().unwrap_or(&self.id),
                instruction,
            )),
            (None, Some(role)) => {
                let preset: RolePreset = role
                    .parse()
                    .map_err(|e| format!("participant '{}': {}", self.id, e))?;
                Some(ParticipantRole::preset(preset))
            }
            (None, None) => None,
        };
        if let Some(role) = role {
            participant = participant.with_role(role);
        }
        Ok(participant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub rounds: usize,
    pub participants: Vec<FileParticipantConfig>,
    pub mode: Option<DiscussionMode>,
    pub depth: Option<DiscussionDepth>,
    pub termination: TerminationConfig,
    pub profile: Option<UserProfile>,
    /// Emit incremental chunks for backends that stream
    pub stream_chunks: bool,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            participants: Vec::new(),
            mode: None,
            depth: None,
            termination: TerminationConfig::default(),
            profile: None,
            stream_chunks: true,
        }
    }
}

impl FileDiscussionConfig {
    /// Build the configured roster, reporting the first invalid entry.
    pub fn roster(&self) -> Result<ParticipantRoster, String> {
        let participants = self
            .participants
            .iter()
            .map(FileParticipantConfig::to_participant)
            .collect::<Result<Vec<_>, _>>()?;
        ParticipantRoster::new(participants).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ProviderKind;

    fn entry(id: &str, backend: &str) -> FileParticipantConfig {
        FileParticipantConfig {
            id: id.to_string(),
            backend: backend.to_string(),
            name: None,
            color: None,
            role: None,
            instruction: None,
        }
    }

    #[test]
    fn test_preset_role_by_name() {
        let mut config = entry("critic", "anthropic/claude-sonnet-4-5");
        config.role = Some("devil's advocate".to_string());

        let participant = config.to_participant().unwrap();
        assert_eq!(participant.backend.provider, ProviderKind::Anthropic);
        assert_eq!(
            participant.role,
            Some(ParticipantRole::preset(RolePreset::DevilsAdvocate))
        );
    }

    #[test]
    fn test_instruction_makes_custom_role() {
        let mut config = entry("ops", "ollama/llama3.1");
        config.role = Some("SRE".to_string());
        config.instruction = Some("Think about on-call load.".to_string());

        let participant = config.to_participant().unwrap();
        assert_eq!(participant.role_name(), Some("SRE"));
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let mut config = entry("x", "gpt-4o");
        config.role = Some("wizard".to_string());
        assert!(config.to_participant().unwrap_err().contains("'x'"));
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let config = FileDiscussionConfig {
            participants: vec![entry("a", "gpt-4o"), entry("a", "gpt-4o-mini")],
            ..Default::default()
        };
        assert!(config.roster().is_err());
    }
}
