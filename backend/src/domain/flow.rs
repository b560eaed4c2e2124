//! Flow aggregation engine.
//!
//! Derives the stage/flow graph behind the outcome diagram from the current
//! record set. Purely a function of its input: no state, re-run after every
//! mutation. Node counts come from direct status filters (`No Offer` by
//! subtraction), link volumes from per-record unit edges aggregated by
//! (source, target). Layout is the rendering collaborator's job; nodes only
//! expose their layer rank.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::application::JobApplication;
use crate::domain::lifecycle::LifecycleStatus;

/// Maximum company names displayed per node, including the overflow slot.
const COMPANY_SLOTS: usize = 5;

/// Fixed stage in the outcome diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum FlowStage {
    /// Every tracked record.
    Applications,
    /// Progressed past a plain application.
    Interviews,
    /// Rejected outright.
    Rejected,
    /// Applied with no response yet.
    Ghosted,
    /// Reached the offer stage or one of its outcomes.
    Offers,
    /// Interviewed but no offer yet.
    #[serde(rename = "No Offer")]
    NoOffer,
    /// Offer accepted.
    Accepted,
    /// Offer declined.
    Declined,
}

impl FlowStage {
    /// All stages in layer-then-display order.
    pub const ALL: [Self; 8] = [
        Self::Applications,
        Self::Interviews,
        Self::Rejected,
        Self::Ghosted,
        Self::Offers,
        Self::NoOffer,
        Self::Accepted,
        Self::Declined,
    ];

    /// Horizontal rank for the layered layout.
    pub const fn layer(self) -> u8 {
        match self {
            Self::Applications => 0,
            Self::Interviews | Self::Rejected | Self::Ghosted => 1,
            Self::Offers | Self::NoOffer => 2,
            Self::Accepted | Self::Declined => 3,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applications => "Applications",
            Self::Interviews => "Interviews",
            Self::Rejected => "Rejected",
            Self::Ghosted => "Ghosted",
            Self::Offers => "Offers",
            Self::NoOffer => "No Offer",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
        }
    }

    /// Whether a record with `status` contributes to this node's company
    /// examples. `NoOffer` deliberately means "interviewed, nothing since".
    const fn includes(self, status: LifecycleStatus) -> bool {
        match self {
            Self::Applications => true,
            Self::Interviews => status.progressed_past_applied(),
            Self::Rejected => matches!(status, LifecycleStatus::Rejected),
            Self::Ghosted => matches!(status, LifecycleStatus::Applied),
            Self::Offers => status.reached_offer(),
            Self::NoOffer => matches!(status, LifecycleStatus::Interview),
            Self::Accepted => matches!(status, LifecycleStatus::Accepted),
            Self::Declined => matches!(status, LifecycleStatus::Declined),
        }
    }
}

/// Visual grouping for a link; display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LinkTint {
    /// Flows ending in an accepted offer.
    Positive,
    /// Flows ending in rejection or a declined offer.
    Negative,
    /// Flows stalled without a response.
    Muted,
    /// Everything still in motion.
    Neutral,
}

impl LinkTint {
    const fn for_target(target: FlowStage) -> Self {
        match target {
            FlowStage::Accepted => Self::Positive,
            FlowStage::Rejected | FlowStage::Declined => Self::Negative,
            FlowStage::Ghosted => Self::Muted,
            FlowStage::Applications
            | FlowStage::Interviews
            | FlowStage::Offers
            | FlowStage::NoOffer => Self::Neutral,
        }
    }
}

/// One stage node with its display count and example companies.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    /// Which fixed stage this is.
    pub stage: FlowStage,
    /// Horizontal rank for the layout collaborator.
    pub layer: u8,
    /// Display count, computed by direct status filter (or subtraction for
    /// `No Offer`).
    pub count: usize,
    /// Up to five distinct contributing company names, first-seen order.
    pub companies: Vec<String>,
    /// Distinct companies beyond the displayed ones; non-zero means the
    /// last slot renders as a truncation indicator.
    pub more_companies: usize,
}

/// Directed flow between two stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowLink {
    /// Source stage.
    pub source: FlowStage,
    /// Target stage.
    pub target: FlowStage,
    /// Number of records whose observed transition matches this edge.
    pub volume: usize,
    /// Display tint.
    pub tint: LinkTint,
}

/// The aggregated outcome diagram.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraph {
    /// All eight stage nodes, layer order.
    pub nodes: Vec<FlowNode>,
    /// Aggregated links with non-zero volume.
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    /// Look up a node by stage.
    pub fn node(&self, stage: FlowStage) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.stage == stage)
    }

    /// Look up a link's volume, zero when absent.
    pub fn volume(&self, source: FlowStage, target: FlowStage) -> usize {
        self.links
            .iter()
            .find(|l| l.source == source && l.target == target)
            .map_or(0, |l| l.volume)
    }
}

/// Derive the outcome diagram from the current record set.
///
/// Returns `None` for an empty set: the caller should render "no diagram"
/// rather than a degenerate graph.
///
/// # Examples
/// ```
/// use backend::domain::flow_graph;
///
/// assert!(flow_graph(&[]).is_none());
/// ```
pub fn flow_graph(records: &[JobApplication]) -> Option<FlowGraph> {
    if records.is_empty() {
        return None;
    }

    let count_by = |filter: fn(LifecycleStatus) -> bool| {
        records.iter().filter(|r| filter(r.status)).count()
    };

    let total = records.len();
    let interviews = count_by(LifecycleStatus::progressed_past_applied);
    let rejected = count_by(LifecycleStatus::is_terminal_negative) - count_by(|s| matches!(s, LifecycleStatus::Declined));
    let ghosted = count_by(|s| matches!(s, LifecycleStatus::Applied));
    let offers = count_by(LifecycleStatus::reached_offer);
    let interview_only = count_by(|s| matches!(s, LifecycleStatus::Interview));
    let accepted = count_by(LifecycleStatus::is_terminal_positive);
    let declined = count_by(|s| matches!(s, LifecycleStatus::Declined));
    // Derived by subtraction, not direct filter; equals interview_only by
    // construction but the subtraction is the contract.
    let no_offer = interviews - offers;

    let nodes = FlowStage::ALL
        .into_iter()
        .map(|stage| {
            let count = match stage {
                FlowStage::Applications => total,
                FlowStage::Interviews => interviews,
                FlowStage::Rejected => rejected,
                FlowStage::Ghosted => ghosted,
                FlowStage::Offers => offers,
                FlowStage::NoOffer => no_offer,
                FlowStage::Accepted => accepted,
                FlowStage::Declined => declined,
            };
            let (companies, more_companies) = company_examples(records, stage);
            FlowNode {
                stage,
                layer: stage.layer(),
                count,
                companies,
                more_companies,
            }
        })
        .collect();

    // Per-record unit edges: one edge per layer boundary the record has
    // crossed, pre-aggregated via the same status filters.
    let candidate_links = [
        (FlowStage::Applications, FlowStage::Interviews, interviews),
        (FlowStage::Applications, FlowStage::Rejected, rejected),
        (FlowStage::Applications, FlowStage::Ghosted, ghosted),
        (FlowStage::Interviews, FlowStage::Offers, offers),
        (FlowStage::Interviews, FlowStage::NoOffer, interview_only),
        (FlowStage::Offers, FlowStage::Accepted, accepted),
        (FlowStage::Offers, FlowStage::Declined, declined),
    ];
    let links = candidate_links
        .into_iter()
        .filter(|(_, _, volume)| *volume > 0)
        .map(|(source, target, volume)| FlowLink {
            source,
            target,
            volume,
            tint: LinkTint::for_target(target),
        })
        .collect();

    Some(FlowGraph { nodes, links })
}

/// Distinct contributing company names in first-seen order, capped at
/// [`COMPANY_SLOTS`]. When more exist, one display slot is given up for the
/// truncation indicator.
fn company_examples(records: &[JobApplication], stage: FlowStage) -> (Vec<String>, usize) {
    let mut companies: Vec<String> = Vec::new();
    for record in records.iter().filter(|r| stage.includes(r.status)) {
        let company = record.company.as_ref();
        if !companies.iter().any(|c| c == company) {
            companies.push(company.to_owned());
        }
    }
    if companies.len() > COMPANY_SLOTS {
        let shown = COMPANY_SLOTS - 1;
        let hidden = companies.len() - shown;
        companies.truncate(shown);
        (companies, hidden)
    } else {
        (companies, 0)
    }
}
