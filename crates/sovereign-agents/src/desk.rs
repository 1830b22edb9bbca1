//! Fund Desk
//!
//! Runs a panel action end to end: validate the inputs, render the prompt,
//! send it through the gateway. Validation failures return before any
//! provider call.

use std::sync::Arc;

use serde::Serialize;

use sovereign_core::{CompletionError, CompletionGateway, GatewayConfig, LlmProvider};

use crate::SOVEREIGN_PERSONA;
use crate::dataset::TabularDataset;
use crate::error::Result;
use crate::panel::PanelInput;
use crate::prompt;
use crate::request::TaskCategory;

/// What a panel shows after its action ran
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PanelReport {
    pub panel: TaskCategory,

    /// Completion text, or `Error: {detail}` when the provider failed
    pub output: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CompletionError>,
}

/// Validation, prompt building and completion behind one call
#[derive(Clone)]
pub struct FundDesk {
    gateway: CompletionGateway,
}

impl FundDesk {
    /// Desk speaking with the Sovereign persona
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_gateway(CompletionGateway::new(
            provider,
            GatewayConfig::new(SOVEREIGN_PERSONA),
        ))
    }

    pub const fn with_gateway(gateway: CompletionGateway) -> Self {
        Self { gateway }
    }

    pub const fn gateway(&self) -> &CompletionGateway {
        &self.gateway
    }

    /// Run one panel action. `Err` means the inputs failed validation and no
    /// request was sent; provider failures come back inside the report.
    pub async fn run(
        &self,
        panel: TaskCategory,
        input: &PanelInput,
        dataset: &TabularDataset,
    ) -> Result<PanelReport> {
        let request = panel.build_request(input, dataset).inspect_err(|e| {
            tracing::debug!(panel = panel.slug(), "Panel validation failed: {}", e);
        })?;

        let rendered = prompt::render(&request);
        tracing::info!(panel = panel.slug(), "Running panel");

        let result = self
            .gateway
            .complete(rendered.as_str(), input.model.as_deref())
            .await;

        Ok(PanelReport {
            panel,
            output: result.display_text(),
            error: result.error().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskError;
    use sovereign_core::testing::StubProvider;
    use sovereign_core::{AgentError, CompletionErrorKind, Role};

    const FIVE_ROWS: &str = "\
lp,commitment,called
Alpha Pension,1000000,400000
Beta Endowment,500000,250000
Gamma Family Office,250000,100000
Delta Insurance,750000,300000
Epsilon Trust,100000,20000
";

    fn desk(provider: &Arc<StubProvider>) -> FundDesk {
        FundDesk::new(provider.clone())
    }

    #[tokio::test]
    async fn test_validation_failures_make_no_calls() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let desk = desk(&provider);
        let empty = TabularDataset::empty();

        for panel in TaskCategory::ALL {
            let err = desk
                .run(panel, &PanelInput::default(), &empty)
                .await
                .unwrap_err();
            assert!(matches!(err, DeskError::MissingInput(ref m) if m == panel.missing_input_message()));
        }

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_input_makes_one_call() {
        let provider = Arc::new(StubProvider::replying("memo"));
        let input = PanelInput {
            text: Some("   ".into()),
            ..Default::default()
        };

        let report = desk(&provider)
            .run(TaskCategory::AuditEsg, &input, &TabularDataset::empty())
            .await
            .unwrap();

        assert_eq!(report.output, "memo");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(
            provider.last_prompt().as_deref(),
            Some("Draft a GAAP audit memo and ESG compliance checklist for this fund:    ")
        );
    }

    #[tokio::test]
    async fn test_capital_accounts_end_to_end() {
        let provider = Arc::new(StubProvider::replying("  LP summaries attached.\n"));
        let dataset = TabularDataset::from_csv_str(FIVE_ROWS).unwrap();

        let report = desk(&provider)
            .run(TaskCategory::CapitalAccounts, &PanelInput::default(), &dataset)
            .await
            .unwrap();

        assert_eq!(report.output, "LP summaries attached.");
        assert!(report.error.is_none());

        let prompt = provider.last_prompt().unwrap();
        assert_eq!(
            prompt,
            "Prepare capital account summaries for LPs based on this data: \
             {'lp': {0: 'Alpha Pension', 1: 'Beta Endowment', 2: 'Gamma Family Office'}, \
             'commitment': {0: 1000000, 1: 500000, 2: 250000}, \
             'called': {0: 400000, 1: 250000, 2: 100000}}"
        );
        assert!(!prompt.contains("Delta"));
        assert!(!prompt.contains("Epsilon"));
    }

    #[tokio::test]
    async fn test_persona_is_fixed() {
        let provider = Arc::new(StubProvider::replying("ok"));
        let input = PanelInput {
            text: Some("Fund III".into()),
            ..Default::default()
        };

        desk(&provider)
            .run(TaskCategory::AuditEsg, &input, &TabularDataset::empty())
            .await
            .unwrap();

        let calls = provider.calls();
        let system = &calls[0].0[0];
        assert_eq!(system.role, Role::System);
        assert_eq!(system.content, SOVEREIGN_PERSONA);
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported_not_raised() {
        let provider = Arc::new(StubProvider::failing(|| {
            AgentError::ProviderUnavailable("connection refused".into())
        }));
        let input = PanelInput {
            context: Some("Fund IV, $400M".into()),
            form_type: Some("ADV".into()),
            ..Default::default()
        };

        let report = desk(&provider)
            .run(TaskCategory::Filings, &input, &TabularDataset::empty())
            .await
            .unwrap();

        assert!(report.output.starts_with("Error: "));
        assert_eq!(
            report.error.map(|e| e.kind),
            Some(CompletionErrorKind::Unavailable)
        );
        assert_eq!(
            provider.last_prompt().as_deref(),
            Some("Generate a ADV filing draft for this fund description: Fund IV, $400M")
        );
    }

    #[tokio::test]
    async fn test_model_override_reaches_provider() {
        let provider = Arc::new(StubProvider::replying("ok"));
        let input = PanelInput {
            context: Some("Q2 close".into()),
            question: Some("Cash runway?".into()),
            model: Some("llama-3.3-70b-versatile".into()),
            ..Default::default()
        };

        desk(&provider)
            .run(TaskCategory::CfoCopilot, &input, &TabularDataset::empty())
            .await
            .unwrap();

        assert_eq!(provider.calls()[0].1.model, "llama-3.3-70b-versatile");
    }
}
