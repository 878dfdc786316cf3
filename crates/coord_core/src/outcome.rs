//! Mining resolution: intel lookup and the probability-driven yield draw.

use rand::Rng;

use crate::{
    ActionType, AsteroidName, AsteroidState, Constants, Depth, GameState, IntelCombo,
    ProbabilityBasis,
};

/// Classify the reconnaissance performed on `asteroid` in any round up to and
/// including `through_round`, by any crew member. Discovery credit does not
/// matter here — only whether a probe and/or robot ever touched the site.
pub fn intel_combo_for(
    state: &GameState,
    asteroid: AsteroidName,
    through_round: u32,
) -> IntelCombo {
    let touched = |action: ActionType| {
        state.actions.iter().any(|a| {
            a.round_number <= through_round
                && a.action_type == action
                && a.target == Some(asteroid)
        })
    };
    let probed = touched(ActionType::SendProbe);
    let robot = touched(ActionType::DeployRobot);
    match (probed, robot) {
        (true, true) => IntelCombo::ProbePlusRobot,
        (true, false) => IntelCombo::ProbeOnly,
        (false, true) => IntelCombo::RobotOnly,
        (false, false) => IntelCombo::None,
    }
}

pub(crate) struct MiningResolution {
    pub minerals_gained: u32,
    pub full_extraction: bool,
    pub partial_fraction: Option<f64>,
    pub basis: ProbabilityBasis,
}

/// Draw the mining outcome for one site.
///
/// One uniform draw decides full vs. partial extraction; a partial result
/// takes a second draw for the yield fraction. Both draws come from the
/// session's seeded generator, so a fixed seed and action sequence reproduces
/// identical yields.
pub(crate) fn resolve_mining(
    asteroid: &AsteroidState,
    depth: Depth,
    intel_combo: IntelCombo,
    constants: &Constants,
    rng: &mut impl Rng,
) -> MiningResolution {
    let success_probability = constants
        .probability_matrix
        .success_probability(depth, intel_combo);
    let basis = ProbabilityBasis {
        depth,
        intel_combo,
        success_probability,
    };

    let roll: f64 = rng.gen();
    if roll < success_probability {
        return MiningResolution {
            minerals_gained: asteroid.max_minerals,
            full_extraction: true,
            partial_fraction: None,
            basis,
        };
    }

    let fraction = rng.gen_range(constants.partial_yield_min..constants.partial_yield_max);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minerals_gained = (f64::from(asteroid.max_minerals) * fraction).floor() as u32;
    MiningResolution {
        minerals_gained,
        full_extraction: false,
        partial_fraction: Some(fraction),
        basis,
    }
}
