//! # sovereign-agents
//!
//! Fund-operations desk for private-fund CFOs. Seven panels turn user input
//! into fixed prompt templates and hand them to the completion gateway.
//!
//! ## Flow
//!
//! ```text
//! ┌────────────┐   ┌────────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ PanelInput │──▶│ build_request  │──▶│   render     │──▶│  Gateway    │
//! │ + dataset  │   │ (validation)   │   │ (templates)  │   │  (provider) │
//! └────────────┘   └───────┬────────┘   └──────────────┘   └──────┬──────┘
//!                          │ missing input                        │
//!                          ▼                                      ▼
//!                    inline message                    text or "Error: ..."
//! ```
//!
//! Data-driven panels (capital accounts, treasury, performance) embed only
//! the first three rows of the uploaded CSV. Performance metrics such as
//! IRR, MOIC and DPI are requested from the model, never computed here.

pub mod dataset;
pub mod desk;
pub mod error;
pub mod panel;
pub mod preview;
pub mod prompt;
pub mod request;
pub mod session;

pub use dataset::TabularDataset;
pub use desk::{FundDesk, PanelReport};
pub use error::{DeskError, Result};
pub use panel::{PanelInput, PanelSpec, catalogue};
pub use preview::TabularPreview;
pub use prompt::{RenderedPrompt, render};
pub use request::{FilingType, TaskCategory, TaskRequest};
pub use session::{DeskSession, MemorySessionStore, SessionId, SessionStore};

/// System persona sent ahead of every desk prompt
pub const SOVEREIGN_PERSONA: &str = "You are Sovereign AI, the CFO AI system for private funds, automating legal, financial, treasury, and LP tasks.";
