//! Pipeline stages and their explicit result type.
//!
//! Each stage either completes, is skipped for a recoverable reason, or
//! fails fatally. The orchestrator pattern-matches on the outcome instead
//! of consulting side-channel flags.

pub mod assemble;
pub mod bundle;
pub mod native;

use crate::errors::PipelineError;

/// Outcome of a recoverable pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// Stage did not run or did not finish, for a reason that does not
    /// abort the pipeline
    Skipped(String),
}

pub type StageResult = Result<StageOutcome, PipelineError>;
