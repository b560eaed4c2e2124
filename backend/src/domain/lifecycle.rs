//! Application lifecycle model.
//!
//! Six stages, no enforced transition graph: the board allows free
//! reclassification by drag-and-drop, so any status may follow any other.
//! The predicates here feed the flow aggregation and any caller that wants
//! to group stages without enumerating them.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle stage of a job application.
///
/// `Accepted` and `Declined` refine the outcome of an `Offer`; the earlier
/// four-state model (without them) is superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LifecycleStatus {
    /// Submitted, no response yet.
    Applied,
    /// In the interview pipeline.
    Interview,
    /// Offer received, decision pending.
    Offer,
    /// Offer accepted.
    Accepted,
    /// Offer declined by the candidate.
    Declined,
    /// Rejected by the company.
    Rejected,
}

impl LifecycleStatus {
    /// Every status, in board-column order.
    pub const ALL: [Self; 6] = [
        Self::Applied,
        Self::Interview,
        Self::Offer,
        Self::Accepted,
        Self::Declined,
        Self::Rejected,
    ];

    /// The default stage for a freshly created record.
    pub const fn default_for_new() -> Self {
        Self::Applied
    }

    /// Still moving through the pipeline.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Applied | Self::Interview | Self::Offer)
    }

    /// Ended with an accepted offer.
    pub const fn is_terminal_positive(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Ended without a job: rejected by the company or declined by the
    /// candidate.
    pub const fn is_terminal_negative(self) -> bool {
        matches!(self, Self::Rejected | Self::Declined)
    }

    /// Got past the plain application: the company responded with something
    /// other than a rejection.
    pub const fn progressed_past_applied(self) -> bool {
        matches!(
            self,
            Self::Interview | Self::Offer | Self::Accepted | Self::Declined
        )
    }

    /// Reached the offer stage (or one of its outcomes).
    pub const fn reached_offer(self) -> bool {
        matches!(self, Self::Offer | Self::Accepted | Self::Declined)
    }

    /// Stable label used in persisted records and the HTTP surface.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
            Self::Rejected => "Rejected",
        }
    }

    /// Parse a stored label.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
