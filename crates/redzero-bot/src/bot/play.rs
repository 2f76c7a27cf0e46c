use super::memory::{CardMemory, SpecialStatus};
use super::weights::PlayWeights;
use super::{Difficulty, count_color};
use rand::Rng;
use redzero_core::model::card::{Card, MAX_VALUE};
use redzero_core::model::color::Color;
use redzero_core::model::player::PlayerId;
use redzero_core::model::state::GameState;
use redzero_core::rules;
use std::cmp::Ordering;

/// Score given to brown-0 when the partner holds the trick. Not tunable.
pub const BROWN_ZERO_TO_PARTNER: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrickPosition {
    Lead,
    Second,
    Third,
    Fourth,
}

impl TrickPosition {
    pub fn from_trick_len(len: usize) -> Self {
        match len {
            0 => TrickPosition::Lead,
            1 => TrickPosition::Second,
            2 => TrickPosition::Third,
            _ => TrickPosition::Fourth,
        }
    }
}

/// Everything the play scorer may look at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub state: &'a GameState,
    pub player_id: &'a PlayerId,
    pub hand: &'a [Card],
    pub position: TrickPosition,
    pub partner: Option<&'a PlayerId>,
    pub memory: Option<&'a CardMemory>,
    pub weights: &'a PlayWeights,
}

impl<'a> PlayContext<'a> {
    /// `None` when `player_id` is not seated in `state`.
    pub fn new(
        state: &'a GameState,
        player_id: &'a PlayerId,
        memory: Option<&'a CardMemory>,
        weights: &'a PlayWeights,
    ) -> Option<Self> {
        let player = state.player(player_id)?;
        Some(Self {
            state,
            player_id,
            hand: player.hand.cards(),
            position: TrickPosition::from_trick_len(state.current_trick.len()),
            partner: state.partner_of(player_id).map(|partner| &partner.id),
            memory,
            weights,
        })
    }

    pub fn trick_leader(&self) -> Option<&'a PlayerId> {
        self.state.current_trick.winner(self.state.trump)
    }

    pub fn partner_holds_trick(&self) -> bool {
        matches!((self.trick_leader(), self.partner), (Some(leader), Some(partner)) if leader == partner)
    }

    /// Our side (us or the partner) holds the trick so far.
    pub fn side_holds_trick(&self) -> bool {
        self.partner_holds_trick() || self.trick_leader() == Some(self.player_id)
    }

    fn can_win(&self, card: Card) -> bool {
        rules::can_win(
            self.state.current_trick.plays(),
            self.player_id,
            card,
            self.state.trump,
        )
    }

    /// Whether a card is still out according to memory. Without memory every
    /// card counts as out.
    fn unseen(&self, card: Card) -> bool {
        self.memory.is_none_or(|memory| memory.is_remaining(card))
    }

    fn brown_zero_played(&self) -> bool {
        self.memory
            .is_some_and(|memory| memory.brown_zero_status() == SpecialStatus::Played)
    }
}

/// The card a planner settled on and how it got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayChoice {
    pub card: Card,
    pub score: i32,
    pub reason: &'static str,
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Priority of playing `card` now, roughly on a 0-100 scale.
    pub fn evaluate(card: Card, ctx: &PlayContext<'_>) -> i32 {
        let w = ctx.weights;

        if card.is_brown_zero() {
            return match ctx.position {
                TrickPosition::Lead => w.brown_zero_lead,
                _ if ctx.partner_holds_trick() => BROWN_ZERO_TO_PARTNER,
                _ => w.brown_zero_dump,
            };
        }

        if card.is_red_zero() {
            return match ctx.position {
                TrickPosition::Lead => w.red_zero_lead,
                _ if ctx.side_holds_trick() => w.red_zero_safe,
                _ => w.red_zero_exposed,
            };
        }

        let value = i32::from(card.value);
        let trick_value = ctx.state.current_trick.value();
        match ctx.position {
            TrickPosition::Lead => lead_score(card, ctx),
            TrickPosition::Second => {
                if ctx.can_win(card) {
                    w.second_win_base + trick_value
                } else {
                    w.second_shed_base - value
                }
            }
            TrickPosition::Third => {
                if ctx.partner_holds_trick() {
                    w.third_partner_base - value
                } else if ctx.can_win(card) {
                    w.third_win
                } else {
                    w.third_shed_base - value
                }
            }
            TrickPosition::Fourth => {
                if ctx.partner_holds_trick() {
                    if trick_value > w.fourth_valuable_over {
                        w.fourth_partner_valuable
                    } else {
                        w.fourth_partner_base - value
                    }
                } else if ctx.can_win(card) {
                    w.fourth_win_base + trick_value
                } else {
                    w.fourth_shed_base - value
                }
            }
        }
    }

    /// Legal cards scored and sorted best first; ties go to the lower card.
    pub fn rank(legal: &[Card], ctx: &PlayContext<'_>) -> Vec<(Card, i32)> {
        let mut ranked: Vec<(Card, i32)> = legal
            .iter()
            .map(|&card| (card, Self::evaluate(card, ctx)))
            .collect();
        ranked.sort_by(|(a_card, a_score), (b_card, b_score)| {
            match b_score.cmp(a_score) {
                Ordering::Equal => a_card.sort_key().cmp(&b_card.sort_key()),
                other => other,
            }
        });
        ranked
    }

    pub fn choose<R: Rng + ?Sized>(
        legal: &[Card],
        ctx: &PlayContext<'_>,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Option<PlayChoice> {
        match legal {
            [] => return None,
            [only] => {
                return Some(PlayChoice {
                    card: *only,
                    score: Self::evaluate(*only, ctx),
                    reason: "forced",
                });
            }
            _ => {}
        }

        let ranked = Self::rank(legal, ctx);
        let feeds_partner = ctx.partner_holds_trick() && ctx.position != TrickPosition::Lead;
        let mut pool: Vec<(Card, i32)> = ranked
            .iter()
            .copied()
            .filter(|(card, _)| !(feeds_partner && card.is_brown_zero()))
            .collect();
        if pool.is_empty() {
            pool = ranked;
        }

        let top = pool[0];
        let (pick, reason) = match difficulty {
            Difficulty::Hard => (top, "top"),
            Difficulty::Medium => {
                if rng.gen_bool(ctx.weights.medium_top_chance) {
                    (top, "top")
                } else {
                    (pool.get(1).copied().unwrap_or(top), "runner_up")
                }
            }
            Difficulty::Easy => {
                if rng.gen_bool(ctx.weights.easy_top_chance) {
                    (top, "top")
                } else {
                    let index = if pool.len() > 1 {
                        rng.gen_range(0..pool.len())
                    } else {
                        0
                    };
                    (pool[index], "random")
                }
            }
        };
        Some(PlayChoice {
            card: pick.0,
            score: pick.1,
            reason,
        })
    }
}

fn lead_score(card: Card, ctx: &PlayContext<'_>) -> i32 {
    let w = ctx.weights;
    let is_trump = ctx.state.trump == Some(card.color);

    if card.value == MAX_VALUE - 1 {
        let seven = Card::new(card.color, MAX_VALUE);
        if ctx.unseen(seven) {
            w.lead_six_guarded
        } else {
            w.lead_six_free
        }
    } else if card.value == MAX_VALUE {
        w.lead_seven
    } else if card.color == Color::Brown
        && card.value >= w.brown_flush_min
        && !ctx.brown_zero_played()
    {
        w.lead_brown_flush
    } else if is_trump {
        if count_color(ctx.hand, card.color) >= w.long_trump_count {
            w.lead_trump_long
        } else {
            w.lead_trump_short
        }
    } else if (3..=5).contains(&card.value) {
        w.lead_middle
    } else {
        w.lead_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::testing::ScriptedRng;
    use redzero_core::model::hand::Hand;
    use redzero_core::model::player::{GameId, select_team};
    use redzero_core::model::state::{GamePhase, PlayerState};
    use redzero_core::model::trick::{Play, Trick};

    // Seats p0..p3; p0 and p2 are partners, as are p1 and p3.
    fn state(trump: Option<Color>, trick: Vec<Play>, actor: usize, hand: Vec<Card>) -> GameState {
        let mut players: Vec<PlayerState> = (0..4)
            .map(|idx| PlayerState::new(PlayerId::new(format!("p{idx}")), format!("P{idx}"), select_team(idx)))
            .collect();
        players[actor].hand = Hand::with_cards(hand);
        GameState {
            id: GameId::from("play"),
            players,
            trump,
            current_trick: Trick::from(trick),
            dealer_index: 3,
            current_player_index: actor,
            current_bets: Vec::new(),
            phase: GamePhase::Playing,
        }
    }

    fn card(color: Color, value: u8) -> Card {
        Card::new(color, value)
    }

    fn score(state: &GameState, actor: &str, memory: Option<&CardMemory>, card: Card) -> i32 {
        let weights = PlayWeights::default();
        let id = PlayerId::from(actor);
        let ctx = PlayContext::new(state, &id, memory, &weights).unwrap();
        PlayPlanner::evaluate(card, &ctx)
    }

    #[test]
    fn position_follows_trick_length() {
        assert_eq!(TrickPosition::from_trick_len(0), TrickPosition::Lead);
        assert_eq!(TrickPosition::from_trick_len(1), TrickPosition::Second);
        assert_eq!(TrickPosition::from_trick_len(2), TrickPosition::Third);
        assert_eq!(TrickPosition::from_trick_len(3), TrickPosition::Fourth);
    }

    #[test]
    fn brown_zero_is_never_fed_to_partner() {
        // Partner p0 leads and holds; p1 trumps nothing.
        let trick = vec![
            Play::new("p0", card(Color::Green, 6)),
            Play::new("p1", card(Color::Green, 2)),
        ];
        let s = state(None, trick, 2, vec![Card::BROWN_ZERO, card(Color::Blue, 3)]);
        assert_eq!(score(&s, "p2", None, Card::BROWN_ZERO), 0);

        let fourth = vec![
            Play::new("p1", card(Color::Green, 1)),
            Play::new("p2", card(Color::Green, 7)),
            Play::new("p3", card(Color::Green, 3)),
        ];
        let s = state(Some(Color::Red), fourth, 0, vec![Card::BROWN_ZERO]);
        assert_eq!(score(&s, "p0", None, Card::BROWN_ZERO), BROWN_ZERO_TO_PARTNER);
    }

    #[test]
    fn brown_zero_dumped_on_opponent_and_rarely_led() {
        let trick = vec![Play::new("p0", card(Color::Green, 6))];
        let s = state(None, trick, 1, vec![Card::BROWN_ZERO]);
        assert_eq!(score(&s, "p1", None, Card::BROWN_ZERO), 90);

        let s = state(None, Vec::new(), 1, vec![Card::BROWN_ZERO]);
        assert_eq!(score(&s, "p1", None, Card::BROWN_ZERO), 10);
    }

    #[test]
    fn red_zero_released_only_when_safe() {
        let s = state(None, Vec::new(), 0, vec![Card::RED_ZERO]);
        assert_eq!(score(&s, "p0", None, Card::RED_ZERO), 20);

        let partner_holds = vec![
            Play::new("p0", card(Color::Red, 7)),
            Play::new("p1", card(Color::Red, 2)),
        ];
        let s = state(None, partner_holds, 2, vec![Card::RED_ZERO]);
        assert_eq!(score(&s, "p2", None, Card::RED_ZERO), 85);

        let opponent_holds = vec![Play::new("p0", card(Color::Red, 7))];
        let s = state(None, opponent_holds, 1, vec![Card::RED_ZERO]);
        assert_eq!(score(&s, "p1", None, Card::RED_ZERO), 15);
    }

    #[test]
    fn lead_scores() {
        let hand = vec![
            card(Color::Blue, 6),
            card(Color::Green, 7),
            card(Color::Brown, 5),
            card(Color::Red, 4),
            card(Color::Red, 1),
            card(Color::Green, 2),
        ];
        let s = state(Some(Color::Green), Vec::new(), 0, hand.clone());
        let mut memory = CardMemory::new();
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Blue, 6)), 30);
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Green, 7)), 65);
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Brown, 5)), 70);
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Red, 4)), 50);
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Red, 1)), 40);
        // Two trumps is a short holding.
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Green, 2)), 35);

        memory.note_played(card(Color::Blue, 7));
        memory.note_played(Card::BROWN_ZERO);
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Blue, 6)), 60);
        assert_eq!(score(&s, "p0", Some(&memory), card(Color::Brown, 5)), 50);
    }

    #[test]
    fn long_trump_lead_strips() {
        let hand = vec![
            card(Color::Green, 1),
            card(Color::Green, 2),
            card(Color::Green, 4),
        ];
        let s = state(Some(Color::Green), Vec::new(), 0, hand);
        assert_eq!(score(&s, "p0", None, card(Color::Green, 2)), 55);
    }

    #[test]
    fn second_hand_wins_or_sheds() {
        let trick = vec![Play::new("p0", card(Color::Blue, 4))];
        let s = state(None, trick, 1, vec![card(Color::Blue, 6), card(Color::Blue, 2)]);
        assert_eq!(score(&s, "p1", None, card(Color::Blue, 6)), 51);
        assert_eq!(score(&s, "p1", None, card(Color::Blue, 2)), 38);
    }

    #[test]
    fn third_hand_conserves_behind_partner() {
        let trick = vec![
            Play::new("p0", card(Color::Blue, 7)),
            Play::new("p1", card(Color::Blue, 3)),
        ];
        let s = state(None, trick, 2, vec![card(Color::Blue, 5)]);
        assert_eq!(score(&s, "p2", None, card(Color::Blue, 5)), 25);

        let trick = vec![
            Play::new("p0", card(Color::Blue, 3)),
            Play::new("p1", card(Color::Blue, 6)),
        ];
        let s = state(None, trick, 2, vec![card(Color::Blue, 7), card(Color::Blue, 1)]);
        assert_eq!(score(&s, "p2", None, card(Color::Blue, 7)), 70);
        assert_eq!(score(&s, "p2", None, card(Color::Blue, 1)), 34);
    }

    #[test]
    fn fourth_hand_uses_full_information() {
        let partner_valuable = vec![
            Play::new("p1", Card::RED_ZERO),
            Play::new("p2", card(Color::Red, 7)),
            Play::new("p3", card(Color::Red, 1)),
        ];
        let s = state(None, partner_valuable, 0, vec![card(Color::Red, 6)]);
        assert_eq!(score(&s, "p0", None, card(Color::Red, 6)), 20);

        let partner_plain = vec![
            Play::new("p1", card(Color::Red, 2)),
            Play::new("p2", card(Color::Red, 7)),
            Play::new("p3", card(Color::Red, 1)),
        ];
        let s = state(None, partner_plain, 0, vec![card(Color::Red, 6)]);
        assert_eq!(score(&s, "p0", None, card(Color::Red, 6)), 24);

        let opponent_holds = vec![
            Play::new("p1", Card::RED_ZERO),
            Play::new("p2", card(Color::Red, 3)),
            Play::new("p3", card(Color::Red, 5)),
        ];
        let s = state(None, opponent_holds, 0, vec![card(Color::Red, 6), card(Color::Red, 4)]);
        assert_eq!(score(&s, "p0", None, card(Color::Red, 6)), 86);
        assert_eq!(score(&s, "p0", None, card(Color::Red, 4)), 21);
    }

    #[test]
    fn trump_overtakes_in_last_seat() {
        let trick = vec![
            Play::new("p1", card(Color::Red, 7)),
            Play::new("p2", card(Color::Red, 1)),
            Play::new("p3", card(Color::Red, 2)),
        ];
        let s = state(Some(Color::Blue), trick, 0, vec![card(Color::Blue, 0)]);
        assert_eq!(score(&s, "p0", None, card(Color::Blue, 0)), 81);
    }

    #[test]
    fn rank_breaks_ties_toward_lower_card() {
        let trick = vec![Play::new("p0", card(Color::Blue, 7))];
        let hand = vec![card(Color::Green, 3), card(Color::Red, 3)];
        let s = state(None, trick, 1, hand.clone());
        let weights = PlayWeights::default();
        let id = PlayerId::from("p1");
        let ctx = PlayContext::new(&s, &id, None, &weights).unwrap();
        let ranked = PlayPlanner::rank(&hand, &ctx);
        assert_eq!(ranked[0], (card(Color::Red, 3), 37));
        assert_eq!(ranked[1], (card(Color::Green, 3), 37));
    }

    #[test]
    fn selection_by_difficulty() {
        let trick = vec![Play::new("p0", card(Color::Blue, 4))];
        let legal = vec![card(Color::Blue, 6), card(Color::Blue, 2), card(Color::Blue, 1)];
        let s = state(None, trick, 1, legal.clone());
        let weights = PlayWeights::default();
        let id = PlayerId::from("p1");
        let ctx = PlayContext::new(&s, &id, None, &weights).unwrap();

        let hard = PlayPlanner::choose(&legal, &ctx, Difficulty::Hard, &mut ScriptedRng::always_no());
        assert_eq!(hard.unwrap().card, card(Color::Blue, 6));

        let medium_top = PlayPlanner::choose(&legal, &ctx, Difficulty::Medium, &mut ScriptedRng::always_yes());
        assert_eq!(medium_top.unwrap().card, card(Color::Blue, 6));
        let medium_second =
            PlayPlanner::choose(&legal, &ctx, Difficulty::Medium, &mut ScriptedRng::always_no());
        let medium_second = medium_second.unwrap();
        assert_eq!(medium_second.card, card(Color::Blue, 1));
        assert_eq!(medium_second.reason, "runner_up");

        // Top roll fails, then the index draw lands in the middle of three.
        let mut easy_rng = ScriptedRng::new(&[u64::MAX, 1 << 63]);
        let easy = PlayPlanner::choose(&legal, &ctx, Difficulty::Easy, &mut easy_rng).unwrap();
        assert_eq!(easy.reason, "random");
        assert!(legal.contains(&easy.card));
    }

    #[test]
    fn single_and_empty_legal_sets() {
        let s = state(None, Vec::new(), 0, vec![card(Color::Red, 3)]);
        let weights = PlayWeights::default();
        let id = PlayerId::from("p0");
        let ctx = PlayContext::new(&s, &id, None, &weights).unwrap();
        let forced = PlayPlanner::choose(&[card(Color::Red, 3)], &ctx, Difficulty::Easy, &mut ScriptedRng::always_no());
        assert_eq!(forced.unwrap().reason, "forced");
        assert!(PlayPlanner::choose(&[], &ctx, Difficulty::Easy, &mut ScriptedRng::always_no()).is_none());
    }

    #[test]
    fn random_pools_exclude_brown_zero_when_partner_holds() {
        let trick = vec![
            Play::new("p0", card(Color::Green, 7)),
            Play::new("p1", card(Color::Green, 2)),
        ];
        let legal = vec![Card::BROWN_ZERO, card(Color::Blue, 3)];
        let s = state(None, trick, 2, legal.clone());
        let weights = PlayWeights::default();
        let id = PlayerId::from("p2");
        let ctx = PlayContext::new(&s, &id, None, &weights).unwrap();
        for difficulty in Difficulty::ALL {
            for rng in [ScriptedRng::always_no(), ScriptedRng::new(&[u64::MAX, 0])] {
                let mut rng = rng;
                let choice = PlayPlanner::choose(&legal, &ctx, difficulty, &mut rng).unwrap();
                assert_eq!(choice.card, card(Color::Blue, 3));
            }
        }
    }

    #[test]
    fn easy_single_candidate_pool_skips_the_index_draw() {
        let trick = vec![
            Play::new("p0", card(Color::Green, 7)),
            Play::new("p1", card(Color::Green, 2)),
        ];
        let legal = vec![Card::BROWN_ZERO, card(Color::Blue, 3)];
        let s = state(None, trick, 2, legal.clone());
        let weights = PlayWeights::default();
        let id = PlayerId::from("p2");
        let ctx = PlayContext::new(&s, &id, None, &weights).unwrap();

        // A range draw over one slot never accepts u64::MAX; it must not run.
        let mut rng = ScriptedRng::always_no();
        let choice = PlayPlanner::choose(&legal, &ctx, Difficulty::Easy, &mut rng).unwrap();
        assert_eq!(choice.card, card(Color::Blue, 3));
        assert_eq!(choice.reason, "random");
    }

    #[test]
    fn unknown_player_has_no_context() {
        let s = state(None, Vec::new(), 0, Vec::new());
        let weights = PlayWeights::default();
        let id = PlayerId::from("nobody");
        assert!(PlayContext::new(&s, &id, None, &weights).is_none());
    }
}
