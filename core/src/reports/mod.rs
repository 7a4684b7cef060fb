//! The four report types and their metrics reducers.

pub mod chat_flow;
pub mod diagnostic;
pub mod enhancement;
pub mod tab_audit;

pub use chat_flow::{ChatFlowEntry, ChatFlowMetrics};
pub use diagnostic::{DiagnosticMetrics, PhaseEntry, PhaseProgress};
pub use enhancement::{EnhancementEntry, EnhancementMetrics};
pub use tab_audit::{TabAuditEntry, TabMetrics};
