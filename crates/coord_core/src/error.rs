//! Error types for action submission and stage transitions.
//!
//! Validation rejections and precondition failures are distinct kinds so
//! callers can branch on them instead of parsing messages.

use serde::Serialize;
use thiserror::Error;

use crate::{AsteroidName, Role, Stage};

/// A submitted action broke a legality rule. No state was mutated; the same
/// submission with corrected input may succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum Rejection {
    #[error("the captain cannot submit actions")]
    CaptainCannotAct,
    #[error("{action} is not available to the {role:?}")]
    ActionNotAllowedForRole { role: Role, action: String },
    #[error("cost {cost} exceeds remaining PU {remaining}")]
    InsufficientPu { cost: u32, remaining: u32 },
    #[error("this action requires a target asteroid")]
    TargetRequired,
    #[error("cost {cost} does not match the required cost {required}")]
    WrongCost { cost: u32, required: u32 },
    #[error("{asteroid} has already been mined")]
    AlreadyMined { asteroid: AsteroidName },
    #[error("probe limit for this round reached")]
    ProbeLimitReached,
    #[error("a robot has already been deployed this round")]
    RobotLimitReached,
    #[error("the driller must wait for the navigator's action")]
    NavigatorFirst,
}

impl Rejection {
    /// Stable rule name for wire payloads.
    pub fn rule(&self) -> &'static str {
        match self {
            Rejection::CaptainCannotAct => "captain_cannot_act",
            Rejection::ActionNotAllowedForRole { .. } => "action_not_allowed_for_role",
            Rejection::InsufficientPu { .. } => "insufficient_pu",
            Rejection::TargetRequired => "target_required",
            Rejection::WrongCost { .. } => "wrong_cost",
            Rejection::AlreadyMined { .. } => "already_mined",
            Rejection::ProbeLimitReached => "probe_limit_reached",
            Rejection::RobotLimitReached => "robot_limit_reached",
            Rejection::NavigatorFirst => "navigator_first",
        }
    }
}

/// The crew is not in a state where the requested transition makes sense.
/// Safe to retry once the caller re-queries the current stage.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum TransitionError {
    #[error("expected the crew to be in the {expected:?} stage, found {actual:?}")]
    WrongStage { expected: Stage, actual: Stage },
    #[error("round {0} already exists")]
    RoundExists(u32),
    #[error("round {0} has not finished processing")]
    PreviousRoundOpen(u32),
    #[error("the crew has been cancelled")]
    Cancelled,
    #[error("analytics snapshot for round {0} already exists")]
    SnapshotExists(u32),
}

/// Either kind of submission failure, for callers that handle both uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Precondition(#[from] TransitionError),
}
