//! Desk Panels
//!
//! Each task category is shown as a panel with its own inputs, trigger and
//! output area. A panel checks its required inputs before anything is built;
//! a failed check yields the inline message and no request.

use serde::{Deserialize, Serialize};

use crate::dataset::TabularDataset;
use crate::error::{DeskError, Result};
use crate::request::{FilingType, TaskCategory, TaskRequest};

/// Raw values submitted from a panel
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelInput {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub form_type: Option<String>,
    /// Model override for this run
    #[serde(default)]
    pub model: Option<String>,
}

/// Input widget shown on a panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    TextArea,
    TextInput,
    Select,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PanelField {
    /// Key in `PanelInput`
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
}

impl PanelField {
    const fn area(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::TextArea,
            options: Vec::new(),
        }
    }

    const fn line(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::TextInput,
            options: Vec::new(),
        }
    }
}

/// Catalogue entry describing one panel to a frontend
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PanelSpec {
    pub category: TaskCategory,
    pub slug: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub button: &'static str,
    pub output_label: &'static str,
    pub uses_dataset: bool,
    pub fields: Vec<PanelField>,
}

impl TaskCategory {
    pub const fn slug(self) -> &'static str {
        match self {
            Self::CapitalAccounts => "capital-accounts",
            Self::AuditEsg => "audit-esg",
            Self::LpRelations => "lp-relations",
            Self::Treasury => "treasury",
            Self::Filings => "filings",
            Self::Performance => "performance",
            Self::CfoCopilot => "cfo-copilot",
        }
    }

    pub fn from_slug(slug: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == slug)
            .ok_or_else(|| DeskError::UnknownPanel(slug.to_string()))
    }

    /// Tab caption
    pub const fn title(self) -> &'static str {
        match self {
            Self::CapitalAccounts => "📋 Capital Accounts",
            Self::AuditEsg => "📑 Audit & ESG",
            Self::LpRelations => "💬 LP Relations",
            Self::Treasury => "💰 Treasury",
            Self::Filings => "📝 SEC / K-1 Filings",
            Self::Performance => "📊 Performance Analyst",
            Self::CfoCopilot => "💼 CFO Copilot",
        }
    }

    /// Heading inside the panel
    pub const fn heading(self) -> &'static str {
        match self {
            Self::CapitalAccounts => "📋 Capital Accounts",
            Self::AuditEsg => "📑 Audit & ESG",
            Self::LpRelations => "💬 LP Relations",
            Self::Treasury => "💰 Treasury Optimizer",
            Self::Filings => "📝 Filing Assistant",
            Self::Performance => "📊 Performance Analytics",
            Self::CfoCopilot => "💼 CFO Copilot",
        }
    }

    pub const fn button_label(self) -> &'static str {
        match self {
            Self::CapitalAccounts => "Generate Summaries",
            Self::AuditEsg => "Generate Audit Memo",
            Self::LpRelations => "Answer LP",
            Self::Treasury => "Run Treasury Analysis",
            Self::Filings => "Draft Filing",
            Self::Performance => "Analyze Fund Performance",
            Self::CfoCopilot => "Ask Copilot",
        }
    }

    pub const fn output_label(self) -> &'static str {
        match self {
            Self::CapitalAccounts => "Capital Account Output",
            Self::AuditEsg => "Audit & ESG Output",
            Self::LpRelations => "LP Response",
            Self::Treasury => "Treasury Analysis",
            Self::Filings => "Draft Filing",
            Self::Performance => "Performance Report",
            Self::CfoCopilot => "AI Response",
        }
    }

    /// Inline message shown when a required input is missing
    pub const fn missing_input_message(self) -> &'static str {
        match self {
            Self::CapitalAccounts => "Please upload data.",
            Self::AuditEsg => "Enter context.",
            Self::LpRelations => "Provide question and context.",
            Self::Treasury => "Upload fund data first.",
            Self::Filings => "Provide fund description.",
            Self::Performance => "Upload performance data.",
            Self::CfoCopilot => "Enter both context and question.",
        }
    }

    pub fn fields(self) -> Vec<PanelField> {
        match self {
            Self::CapitalAccounts | Self::Treasury | Self::Performance => Vec::new(),
            Self::AuditEsg => vec![PanelField::area(
                "text",
                "Describe fund operations, ESG policies, etc.",
            )],
            Self::LpRelations => vec![
                PanelField::area("context", "Fund summary or prior LP notes"),
                PanelField::line("question", "Enter LP question"),
            ],
            Self::Filings => vec![
                PanelField {
                    name: "form_type",
                    label: "Select Filing Type",
                    kind: FieldKind::Select,
                    options: FilingType::ALL.iter().map(|t| t.label()).collect(),
                },
                PanelField::area("context", "Fund Info / Context"),
            ],
            Self::CfoCopilot => vec![
                PanelField::area("context", "Describe fund ops situation"),
                PanelField::line("question", "Ask your CFO AI anything"),
            ],
        }
    }

    pub fn spec(self) -> PanelSpec {
        PanelSpec {
            category: self,
            slug: self.slug(),
            title: self.title(),
            heading: self.heading(),
            button: self.button_label(),
            output_label: self.output_label(),
            uses_dataset: self.uses_dataset(),
            fields: self.fields(),
        }
    }

    /// Validate the panel's inputs and build its request
    pub fn build_request(self, input: &PanelInput, dataset: &TabularDataset) -> Result<TaskRequest> {
        let missing = || DeskError::MissingInput(self.missing_input_message().into());

        if self.uses_dataset() && dataset.is_empty() {
            return Err(missing());
        }

        let request = match self {
            Self::CapitalAccounts => TaskRequest::CapitalAccounts {
                preview: dataset.preview(),
            },
            Self::Treasury => TaskRequest::Treasury {
                preview: dataset.preview(),
            },
            Self::Performance => TaskRequest::Performance {
                preview: dataset.preview(),
            },
            Self::AuditEsg => TaskRequest::AuditEsg {
                text: required(input.text.as_ref()).ok_or_else(missing)?,
            },
            Self::LpRelations => {
                let (Some(question), Some(context)) =
                    (required(input.question.as_ref()), required(input.context.as_ref()))
                else {
                    return Err(missing());
                };
                TaskRequest::LpRelations { question, context }
            }
            Self::Filings => {
                let context = required(input.context.as_ref()).ok_or_else(missing)?;
                let form_type = match required(input.form_type.as_ref()) {
                    Some(label) => label.parse()?,
                    None => FilingType::default(),
                };
                TaskRequest::Filing { form_type, context }
            }
            Self::CfoCopilot => {
                let (Some(context), Some(question)) =
                    (required(input.context.as_ref()), required(input.question.as_ref()))
                else {
                    return Err(missing());
                };
                TaskRequest::CfoCopilot { context, question }
            }
        };

        Ok(request)
    }
}

/// The value as entered, or `None` when absent or empty
fn required(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Catalogue of every panel in tab order
pub fn catalogue() -> Vec<PanelSpec> {
    TaskCategory::ALL.into_iter().map(TaskCategory::spec).collect()
}
