//! The five sales stages and their prompt assembly.
//!
//! Each stage is one LLM call with its own persona. Prompts use XML tag
//! boundaries so the model can tell the inquiry, the conversation so far,
//! earlier stage notes, and reference material apart.

use std::fmt;

use salesdesk_types::config::AssistantConfig;
use salesdesk_types::inquiry::GenerationRequest;

/// One step of the sales pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesStage {
    InstantClarity,
    TrustAndSource,
    Engagement,
    LeadCapture,
    Review,
}

impl SalesStage {
    pub const ALL: [SalesStage; 5] = [
        SalesStage::InstantClarity,
        SalesStage::TrustAndSource,
        SalesStage::Engagement,
        SalesStage::LeadCapture,
        SalesStage::Review,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            SalesStage::InstantClarity => "instant_clarity",
            SalesStage::TrustAndSource => "trust_and_source",
            SalesStage::Engagement => "engagement",
            SalesStage::LeadCapture => "lead_capture",
            SalesStage::Review => "review",
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            SalesStage::InstantClarity => "Instant Clarity Agent",
            SalesStage::TrustAndSource => "Trust & Source Agent",
            SalesStage::Engagement => "Engagement & Nudge Agent",
            SalesStage::LeadCapture => "Lead Capture Agent",
            SalesStage::Review => "Message Simulation & Review Agent",
        }
    }

    fn goal(&self) -> &'static str {
        match self {
            SalesStage::InstantClarity => {
                "Answer straightforward questions and common objections quickly and accurately, \
                 and flag anything that needs a deeper, sourced answer."
            }
            SalesStage::TrustAndSource => {
                "Give a detailed answer backed by the reference material. Cite where each fact \
                 comes from and never guess when the references are silent."
            }
            SalesStage::Engagement => {
                "Keep the conversation going: build on what was already said and ask one or two \
                 relevant follow-up questions."
            }
            SalesStage::LeadCapture => {
                "If the visitor shows interest, ask for their name and email in a natural, \
                 conversational way and suggest a concrete next step. Never present a form."
            }
            SalesStage::Review => {
                "Merge the earlier notes into one polished, accurate, friendly reply addressed \
                 to the visitor."
            }
        }
    }

    /// Whether the stage reads the company website reference.
    pub fn uses_website(&self) -> bool {
        matches!(self, SalesStage::InstantClarity | SalesStage::TrustAndSource)
    }

    /// Whether the stage reads web search results.
    pub fn uses_search(&self) -> bool {
        matches!(self, SalesStage::TrustAndSource)
    }

    fn task(&self, profile: &AssistantConfig, company: &str) -> String {
        match self {
            SalesStage::InstantClarity => format!(
                "Write a brief, friendly answer for {company}. If the question needs detail \
                 you cannot give confidently, say what should be looked up."
            ),
            SalesStage::TrustAndSource => format!(
                "Write a detailed answer for {company} covering every part of the inquiry, \
                 with features, examples, or offers and a source for each (prefer {}).",
                profile.website
            ),
            SalesStage::Engagement => format!(
                "Continue the dialogue with {company}, referring back to earlier turns where \
                 useful, and end with follow-up questions such as which feature interests them."
            ),
            SalesStage::LeadCapture => format!(
                "Decide whether {company} has shown interest. If so, weave a request for name \
                 and email plus a next step into a short paragraph; otherwise write a light \
                 invitation to keep talking."
            ),
            SalesStage::Review => format!(
                "Produce the final reply to {company}. Keep it engaging and accurate, keep any \
                 follow-up questions and lead-capture prompt, and end with the contact details: \
                 email {}, phone {}.",
                profile.contact_email, profile.contact_phone
            ),
        }
    }
}

impl fmt::Display for SalesStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Reference text gathered for a stage.
#[derive(Debug, Clone)]
pub struct Reference {
    pub source: String,
    pub text: String,
}

/// Builds the system and user prompts for one stage.
pub struct StagePromptBuilder;

impl StagePromptBuilder {
    /// Persona prompt for `stage`.
    pub fn system(stage: SalesStage, profile: &AssistantConfig) -> String {
        format!(
            "<persona>\n\
            You are the {role} at {company} ({website}).\n\
            {goal}\n\
            </persona>\n\n\
            <instructions>\n\
            Speak on behalf of {company}. Do not invent prices, discounts, or features that are \
            not in the reference material or earlier notes. Write plain prose, no headings.\n\
            </instructions>",
            role = stage.role(),
            company = profile.company_name,
            website = profile.website,
            goal = stage.goal(),
        )
    }

    /// Task prompt for `stage`.
    ///
    /// `earlier` holds the outputs of the stages already run, in order.
    pub fn task(
        stage: SalesStage,
        profile: &AssistantConfig,
        request: &GenerationRequest,
        earlier: &[(SalesStage, String)],
        references: &[Reference],
    ) -> String {
        let mut sections = Vec::with_capacity(5);

        sections.push(format!(
            "<inquiry company=\"{}\">\n{}\n</inquiry>",
            request.company.trim(),
            request.inquiry.trim()
        ));

        if !request.history.is_empty() {
            sections.push(format!(
                "<conversation>\n{}\n</conversation>",
                request.history.join("\n")
            ));
        }

        if !earlier.is_empty() {
            let notes: Vec<String> = earlier
                .iter()
                .map(|(s, text)| format!("<note from=\"{}\">\n{}\n</note>", s.role(), text.trim()))
                .collect();
            sections.push(format!("<earlier_notes>\n{}\n</earlier_notes>", notes.join("\n")));
        }

        for reference in references {
            sections.push(format!(
                "<reference source=\"{}\">\n{}\n</reference>",
                reference.source,
                reference.text.trim()
            ));
        }

        sections.push(format!(
            "<task>\n{}\n</task>",
            stage.task(profile, request.company.trim())
        ));

        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            company: "Acme".to_string(),
            inquiry: "Do you reconcile GST invoices?".to_string(),
            history: vec![],
        }
    }

    #[test]
    fn test_stage_order() {
        let slugs: Vec<&str> = SalesStage::ALL.iter().map(|s| s.slug()).collect();
        assert_eq!(
            slugs,
            ["instant_clarity", "trust_and_source", "engagement", "lead_capture", "review"]
        );
    }

    #[test]
    fn test_tool_usage_per_stage() {
        assert!(SalesStage::InstantClarity.uses_website());
        assert!(!SalesStage::InstantClarity.uses_search());
        assert!(SalesStage::TrustAndSource.uses_website());
        assert!(SalesStage::TrustAndSource.uses_search());
        for stage in [SalesStage::Engagement, SalesStage::LeadCapture, SalesStage::Review] {
            assert!(!stage.uses_website());
            assert!(!stage.uses_search());
        }
    }

    #[test]
    fn test_system_prompt_names_role_and_company() {
        let profile = AssistantConfig::default();
        let prompt = StagePromptBuilder::system(SalesStage::LeadCapture, &profile);
        assert!(prompt.contains("Lead Capture Agent"));
        assert!(prompt.contains("Finkraft"));
        assert!(prompt.contains("<persona>"));
    }

    #[test]
    fn test_task_prompt_first_stage_has_no_optional_sections() {
        let profile = AssistantConfig::default();
        let prompt =
            StagePromptBuilder::task(SalesStage::InstantClarity, &profile, &request(), &[], &[]);
        assert!(prompt.contains("<inquiry company=\"Acme\">"));
        assert!(prompt.contains("reconcile GST"));
        assert!(!prompt.contains("<conversation>"));
        assert!(!prompt.contains("<earlier_notes>"));
        assert!(!prompt.contains("<reference"));
    }

    #[test]
    fn test_task_prompt_includes_history_notes_and_references() {
        let profile = AssistantConfig::default();
        let mut req = request();
        req.history = vec!["Acme (t): hi".to_string(), "Finkraft Bot (t): hello".to_string()];
        let earlier = vec![(SalesStage::InstantClarity, "Quick answer".to_string())];
        let references = vec![Reference {
            source: "website".to_string(),
            text: "We automate GST reconciliation.".to_string(),
        }];

        let prompt = StagePromptBuilder::task(
            SalesStage::TrustAndSource,
            &profile,
            &req,
            &earlier,
            &references,
        );
        assert!(prompt.contains("<conversation>\nAcme (t): hi\nFinkraft Bot (t): hello\n</conversation>"));
        assert!(prompt.contains("<note from=\"Instant Clarity Agent\">\nQuick answer\n</note>"));
        assert!(prompt.contains("<reference source=\"website\">"));
    }

    #[test]
    fn test_review_task_carries_contact_details() {
        let profile = AssistantConfig::default();
        let prompt = StagePromptBuilder::task(SalesStage::Review, &profile, &request(), &[], &[]);
        assert!(prompt.contains("contact@finkraft.ai"));
        assert!(prompt.contains("+91-9876543210"));
    }
}
