//! Builder for the static [`AgentCard`] each service advertises.

use crate::types::{AgentCapabilities, AgentCard, AgentSkill};
use crate::utils::TEXT_PLAIN;

/// A2A protocol version advertised on every card.
const PROTOCOL_VERSION: &str = "0.3.0";

/// Builds a text-only [`AgentCard`].
///
/// Every service exchanges `text/plain` in both directions and advertises
/// no optional capabilities, so only identity, URL and skills are set here.
///
/// ```
/// use a2a_router::builders::AgentCardBuilder;
///
/// let card = AgentCardBuilder::new("MapAgent", "Map and place search", "1.0")
///     .with_url("http://localhost:8002")
///     .with_skill("find_place", "Find Place", "Finds places", vec!["map".to_string()])
///     .with_examples(vec!["best cafes near Satpaev University".to_string()])
///     .build();
/// assert_eq!(card.default_input_modes, vec!["text/plain"]);
/// assert_eq!(card.skills[0].examples.as_ref().map(Vec::len), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct AgentCardBuilder {
    name: String,
    description: String,
    version: String,
    url: String,
    skills: Vec<AgentSkill>,
}

impl AgentCardBuilder {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            url: String::new(),
            skills: Vec::new(),
        }
    }

    /// Public base URL of the service.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_skill(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
            examples: None,
        });
        self
    }

    /// Attach example prompts to the most recently added skill.
    ///
    /// Ignored when no skill has been added yet.
    pub fn with_examples(mut self, examples: Vec<String>) -> Self {
        if let Some(skill) = self.skills.last_mut() {
            skill.examples = Some(examples);
        }
        self
    }

    pub fn build(self) -> AgentCard {
        AgentCard {
            name: self.name,
            description: self.description,
            version: self.version,
            url: self.url,
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec![TEXT_PLAIN.to_string()],
            default_output_modes: vec![TEXT_PLAIN.to_string()],
            skills: self.skills,
            protocol_version: Some(PROTOCOL_VERSION.to_string()),
        }
    }
}
