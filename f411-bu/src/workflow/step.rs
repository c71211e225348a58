//! Wizard step machine
//!
//! The upload workflow is strictly linear:
//!
//! ```text
//! Upload → Mapping → Review → Results
//! ```
//!
//! Backward navigation is allowed from Mapping and Review only, and never
//! undoes server-side progress. Results is terminal; only a context reset
//! returns to Upload.

use serde::{Deserialize, Serialize};

/// One screen of the upload wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Step 0: choose and upload a file
    Upload,
    /// Step 1: review/adjust column mapping
    Mapping,
    /// Step 2: review matched rows, remediate problems
    Review,
    /// Step 3: import results (terminal)
    Results,
}

impl WizardStep {
    /// 0-based step index as shown in the progress bar
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Upload => 0,
            WizardStep::Mapping => 1,
            WizardStep::Review => 2,
            WizardStep::Results => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        match index {
            0 => Some(WizardStep::Upload),
            1 => Some(WizardStep::Mapping),
            2 => Some(WizardStep::Review),
            3 => Some(WizardStep::Results),
            _ => None,
        }
    }

    /// The step after this one, if any
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Upload => Some(WizardStep::Mapping),
            WizardStep::Mapping => Some(WizardStep::Review),
            WizardStep::Review => Some(WizardStep::Results),
            WizardStep::Results => None,
        }
    }

    /// The step behind this one, where backward navigation is permitted
    pub fn back(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Mapping => Some(WizardStep::Upload),
            WizardStep::Review => Some(WizardStep::Mapping),
            WizardStep::Upload | WizardStep::Results => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == WizardStep::Results
    }
}
