use super::Difficulty;
use super::analysis::HandAnalysis;
use super::weights::{BidWeights, SkipTable};
use rand::Rng;
use redzero_core::model::bet::{BetDecision, MAX_BET, minimum_raise};
use redzero_core::model::player::PlayerId;
use redzero_core::model::state::GameState;

/// A bidding decision together with the evidence behind it.
#[derive(Debug, Clone)]
pub struct BidChoice {
    pub decision: BetDecision,
    pub analysis: Option<HandAnalysis>,
    pub reason: &'static str,
}

impl BidChoice {
    fn skip(analysis: Option<HandAnalysis>, reason: &'static str) -> Self {
        Self {
            decision: BetDecision::skip(),
            analysis,
            reason,
        }
    }
}

pub struct BidPlanner;

impl BidPlanner {
    pub fn choose<R: Rng + ?Sized>(
        state: &GameState,
        player_id: &PlayerId,
        difficulty: Difficulty,
        weights: &BidWeights,
        skips: &SkipTable,
        rng: &mut R,
    ) -> BidChoice {
        let Some(player) = state.player(player_id) else {
            return BidChoice::skip(None, "unknown_player");
        };

        let analysis = HandAnalysis::evaluate(player.hand.cards(), state.trump, weights, rng);
        let is_dealer = state.is_dealer(player_id);
        let highest = state.highest_bet();

        let Some(highest) = highest else {
            if is_dealer {
                let decision = BetDecision::bid(analysis.recommended_bet, false);
                return BidChoice {
                    decision,
                    analysis: Some(analysis),
                    reason: "dealer_forced",
                };
            }
            if rng.gen_bool(skips.chance(difficulty, analysis.hand_quality)) {
                return BidChoice::skip(Some(analysis), "skip_roll");
            }
            let without_trump = damp_without_trump(&analysis, difficulty, weights, rng);
            return BidChoice {
                decision: BetDecision::bid(analysis.recommended_bet, without_trump),
                analysis: Some(analysis),
                reason: "opening",
            };
        };

        let candidate = analysis.recommended_bet;
        let minimum = minimum_raise(Some(highest), is_dealer);
        if !is_dealer
            && (minimum > candidate.saturating_add(weights.max_overbid) || minimum > MAX_BET)
        {
            return BidChoice::skip(Some(analysis), "outbid");
        }

        let amount = minimum.max(candidate).min(MAX_BET);
        let without_trump = damp_without_trump(&analysis, difficulty, weights, rng);
        let reason = if amount > candidate {
            "stretch_raise"
        } else {
            "raise"
        };
        BidChoice {
            decision: BetDecision::bid(amount, without_trump),
            analysis: Some(analysis),
            reason,
        }
    }
}

fn damp_without_trump<R: Rng + ?Sized>(
    analysis: &HandAnalysis,
    difficulty: Difficulty,
    weights: &BidWeights,
    rng: &mut R,
) -> bool {
    match difficulty {
        Difficulty::Easy => rng.gen_bool(weights.easy_without_trump_chance),
        Difficulty::Medium => {
            analysis.should_bet_without_trump && rng.gen_bool(weights.medium_without_trump_follow)
        }
        Difficulty::Hard => analysis.should_bet_without_trump,
    }
}
