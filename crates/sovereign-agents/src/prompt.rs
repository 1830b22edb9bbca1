//! Prompt Builder
//!
//! Renders a `TaskRequest` into the instruction text sent as the user
//! message. Templates are fixed; values are substituted verbatim.

use crate::request::TaskRequest;

/// Final instruction text for one gateway call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the prompt for a request
pub fn render(request: &TaskRequest) -> RenderedPrompt {
    let text = match request {
        TaskRequest::CapitalAccounts { preview } => {
            format!("Prepare capital account summaries for LPs based on this data: {preview}")
        }
        TaskRequest::AuditEsg { text } => {
            format!("Draft a GAAP audit memo and ESG compliance checklist for this fund: {text}")
        }
        TaskRequest::LpRelations { question, context } => format!(
            "LP asks: {question}\nContext: {context}\nRespond with a clear, professional LP communication."
        ),
        TaskRequest::Treasury { preview } => {
            format!("Analyze this fund flow data for treasury insights and optimization: {preview}")
        }
        TaskRequest::Filing { form_type, context } => {
            format!("Generate a {form_type} filing draft for this fund description: {context}")
        }
        TaskRequest::Performance { preview } => {
            format!("Analyze fund performance from this dataset: {preview}. Report IRR, MOIC, DPI.")
        }
        TaskRequest::CfoCopilot { context, question } => format!(
            "Context: {context}\nCFO asks: {question}\nReply with a confident, insightful response."
        ),
    };

    RenderedPrompt(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TabularDataset;
    use crate::request::FilingType;

    fn preview() -> crate::preview::TabularPreview {
        TabularDataset::from_csv_str("lp,called\nAlpha,400\nBeta,250\n")
            .unwrap()
            .preview()
    }

    const PREVIEW: &str = "{'lp': {0: 'Alpha', 1: 'Beta'}, 'called': {0: 400, 1: 250}}";

    #[test]
    fn test_capital_accounts() {
        let prompt = render(&TaskRequest::CapitalAccounts { preview: preview() });
        assert_eq!(
            prompt.as_str(),
            format!("Prepare capital account summaries for LPs based on this data: {PREVIEW}")
        );
    }

    #[test]
    fn test_audit_esg() {
        let prompt = render(&TaskRequest::AuditEsg {
            text: "Fund III, $250M buyout, SFDR Article 8".into(),
        });
        assert_eq!(
            prompt.as_str(),
            "Draft a GAAP audit memo and ESG compliance checklist for this fund: Fund III, $250M buyout, SFDR Article 8"
        );
    }

    #[test]
    fn test_lp_relations() {
        let prompt = render(&TaskRequest::LpRelations {
            question: "When is the next capital call?".into(),
            context: "Q3 call notice sent Sept 1".into(),
        });
        assert_eq!(
            prompt.as_str(),
            "LP asks: When is the next capital call?\nContext: Q3 call notice sent Sept 1\nRespond with a clear, professional LP communication."
        );
    }

    #[test]
    fn test_treasury() {
        let prompt = render(&TaskRequest::Treasury { preview: preview() });
        assert_eq!(
            prompt.as_str(),
            format!("Analyze this fund flow data for treasury insights and optimization: {PREVIEW}")
        );
    }

    #[test]
    fn test_filing() {
        let prompt = render(&TaskRequest::Filing {
            form_type: FilingType::FormD,
            context: "Reg D 506(b) offering".into(),
        });
        assert_eq!(
            prompt.as_str(),
            "Generate a Form D filing draft for this fund description: Reg D 506(b) offering"
        );
    }

    #[test]
    fn test_performance() {
        let prompt = render(&TaskRequest::Performance { preview: preview() });
        assert_eq!(
            prompt.as_str(),
            format!("Analyze fund performance from this dataset: {PREVIEW}. Report IRR, MOIC, DPI.")
        );
    }

    #[test]
    fn test_cfo_copilot() {
        let prompt = render(&TaskRequest::CfoCopilot {
            context: "NAV down 4% QoQ".into(),
            question: "How do we brief the IC?".into(),
        });
        assert_eq!(
            prompt.as_str(),
            "Context: NAV down 4% QoQ\nCFO asks: How do we brief the IC?\nReply with a confident, insightful response."
        );
    }

    #[test]
    fn test_values_are_not_trimmed_or_escaped() {
        let prompt = render(&TaskRequest::AuditEsg {
            text: "  {braces} and\nnewlines ".into(),
        });
        assert!(prompt.as_str().ends_with(":   {braces} and\nnewlines "));
    }
}
