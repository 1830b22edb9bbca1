//! Task Requests
//!
//! One tagged value per user action. Each variant carries exactly the inputs
//! its prompt template needs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::preview::TabularPreview;

/// The seven fund-operations task categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    CapitalAccounts,
    AuditEsg,
    LpRelations,
    Treasury,
    Filings,
    Performance,
    CfoCopilot,
}

impl TaskCategory {
    /// Display order of the desk tabs
    pub const ALL: [Self; 7] = [
        Self::CapitalAccounts,
        Self::AuditEsg,
        Self::LpRelations,
        Self::Treasury,
        Self::Filings,
        Self::Performance,
        Self::CfoCopilot,
    ];

    /// Whether the category works from the uploaded dataset
    pub const fn uses_dataset(self) -> bool {
        matches!(
            self,
            Self::CapitalAccounts | Self::Treasury | Self::Performance
        )
    }
}

/// Filing drafts the desk can request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    #[default]
    #[serde(rename = "K-1")]
    K1,
    #[serde(rename = "Form D")]
    FormD,
    #[serde(rename = "ADV")]
    Adv,
    #[serde(rename = "ESG Report")]
    EsgReport,
}

impl FilingType {
    pub const ALL: [Self; 4] = [Self::K1, Self::FormD, Self::Adv, Self::EsgReport];

    pub const fn label(self) -> &'static str {
        match self {
            Self::K1 => "K-1",
            Self::FormD => "Form D",
            Self::Adv => "ADV",
            Self::EsgReport => "ESG Report",
        }
    }
}

impl std::fmt::Display for FilingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilingType {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeskError::UnknownFilingType(wanted.to_string()))
    }
}

/// A validated request for one prompt
#[derive(Clone, Debug, PartialEq)]
pub enum TaskRequest {
    CapitalAccounts { preview: TabularPreview },
    AuditEsg { text: String },
    LpRelations { question: String, context: String },
    Treasury { preview: TabularPreview },
    Filing { form_type: FilingType, context: String },
    Performance { preview: TabularPreview },
    CfoCopilot { context: String, question: String },
}

impl TaskRequest {
    pub const fn category(&self) -> TaskCategory {
        match self {
            Self::CapitalAccounts { .. } => TaskCategory::CapitalAccounts,
            Self::AuditEsg { .. } => TaskCategory::AuditEsg,
            Self::LpRelations { .. } => TaskCategory::LpRelations,
            Self::Treasury { .. } => TaskCategory::Treasury,
            Self::Filing { .. } => TaskCategory::Filings,
            Self::Performance { .. } => TaskCategory::Performance,
            Self::CfoCopilot { .. } => TaskCategory::CfoCopilot,
        }
    }
}
