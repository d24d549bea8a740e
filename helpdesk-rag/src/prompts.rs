//! Persona templates and prompt assembly
//!
//! A persona is the system instruction that keeps the model inside the IT
//! support domain. Retrieved context is injected through the persona's
//! context clause, at its `{context}` placeholder.

use crate::types::MessageSequence;
use helpdesk_core::{config_error, HelpdeskError, HelpdeskResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const DEFAULT_CONTEXT_CLAUSE: &str = "Here is some context to help you answer: {context}";

/// Built-in persona names
pub mod persona {
    /// General IT support
    pub const GENERAL: &str = "general";
    /// IT support with the DUO bypass-code recovery procedure
    pub const DUO: &str = "duo";
    /// IT support answered from retrieved documents
    pub const RAG: &str = "rag";
}

const IT_SUPPORT_INSTRUCTIONS: &str = "You are a specialized IT Support Assistant. Your one and only purpose is to help users with technical problems. \
You must strictly answer questions only about hardware, software, networking, and other IT-related issues. \
If the user asks about any other topic (like history, math, art, general knowledge, or asks you to be creative), you MUST politely refuse. \
When you refuse, state that your function is limited to IT support only. \
For example, if asked 'What is the capital of France?', you should respond with something like: 'I can only assist with IT-related questions.'";

const DUO_INSTRUCTIONS: &str = "You are a specialized IT Support Assistant. Your one and only purpose is to help users with technical problems. \
You must strictly answer questions only about hardware, software, DUO, bypass code, networking, and other IT-related issues. \
If the user asks about any other topic (like history, math, art, general knowledge, or asks you to be creative), you MUST politely refuse. \
When you refuse, state that your function is limited to IT support only. \
For example, if asked 'What is the capital of France?', you should respond with something like: 'I can only assist with IT-related questions.' \
If someone asks a question about a bypass code while logging in the website, provide them these steps: \
1. Go to trueyou.nebraska.edu \
2. Click on Manage account \
3. Log in with their credentials \
4. When the TrueYou or DUO page asks for a bypass code, click the blue link at the bottom labelled other options. They should see an option called Text message Passcode. \
Here the process splits into two. \
(a) If the user sees the Text message Passcode option, continue with: \
5. Click that option and verify yourself. \
6. Once in, click the link called Two Factor management, then the link called manage two factor devices. \
7. The website asks them to log in again. They should select the same option, text message passcode, and log in. \
8. They should now see a plus icon labelled add a device. \
9. Click it, select DUO mobile, and enter their phone number. \
10. On a computer or laptop they get a QR code to scan with the DUO mobile app. On a phone, pressing next after entering the number opens the DUO mobile app directly. \
(b) If after step 4 the user does not see the text message passcode option, or any option other than bypass code, ask them to contact the IT desk for help: \
Phone: (402) 472-3970 Email: nusupport@nebraska.edu";

/// A named system instruction with an optional context clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaTemplate {
    pub name: String,
    pub instructions: String,
    /// Appended when context is available; must contain `{context}`
    #[serde(default = "default_context_clause")]
    pub context_clause: String,
}

fn default_context_clause() -> String {
    DEFAULT_CONTEXT_CLAUSE.to_string()
}

impl PersonaTemplate {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            context_clause: default_context_clause(),
        }
    }

    /// System prompt text. Absent or empty context yields the bare
    /// instructions; otherwise passages are joined with newlines and
    /// substituted into the context clause.
    pub fn render(&self, context: Option<&[String]>) -> String {
        match context {
            Some(passages) if !passages.is_empty() => {
                let clause = self
                    .context_clause
                    .replace(CONTEXT_PLACEHOLDER, &passages.join("\n"));
                format!("{} {}", self.instructions, clause)
            }
            _ => self.instructions.clone(),
        }
    }
}

/// Builds the message sequence sent to the chat model
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn build(
        persona: &PersonaTemplate,
        question: &str,
        context: Option<&[String]>,
    ) -> MessageSequence {
        MessageSequence::new(persona.render(context), question.to_string())
    }
}

#[derive(Deserialize)]
struct PersonaFile {
    #[serde(default)]
    personas: Vec<PersonaTemplate>,
}

/// Personas by name
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: HashMap<String, PersonaTemplate>,
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PersonaCatalog {
    /// The general, DUO and RAG personas
    pub fn builtin() -> Self {
        let mut catalog = Self {
            personas: HashMap::new(),
        };
        catalog.insert(PersonaTemplate::new(persona::GENERAL, IT_SUPPORT_INSTRUCTIONS));
        catalog.insert(PersonaTemplate::new(persona::DUO, DUO_INSTRUCTIONS));
        catalog.insert(PersonaTemplate::new(persona::RAG, IT_SUPPORT_INSTRUCTIONS));
        catalog
    }

    /// Built-in personas overridden or extended by a TOML file of
    /// `[[personas]]` tables
    pub fn from_file<P: AsRef<Path>>(path: P) -> HelpdeskResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            config_error!(
                format!("Failed to read persona file {}: {}", path.display(), e),
                "prompts",
                e
            )
        })?;
        Self::builtin().merge_toml(&content)
    }

    fn merge_toml(mut self, content: &str) -> HelpdeskResult<Self> {
        let file: PersonaFile = toml::from_str(content)
            .map_err(|e| config_error!(format!("Failed to parse personas: {}", e), "prompts", e))?;

        for template in file.personas {
            if !template.context_clause.contains(CONTEXT_PLACEHOLDER) {
                return Err(HelpdeskError::Validation {
                    message: format!(
                        "Context clause of persona '{}' has no {} placeholder",
                        template.name, CONTEXT_PLACEHOLDER
                    ),
                    field: Some("context_clause".to_string()),
                    context: helpdesk_core::ErrorContext::new("prompts"),
                });
            }
            self.insert(template);
        }
        Ok(self)
    }

    pub fn insert(&mut self, template: PersonaTemplate) {
        self.personas.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&PersonaTemplate> {
        self.personas.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.personas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
