use super::Difficulty;
use super::analysis::HandQuality;
use std::time::Duration;

/// Thresholds and weights used by hand evaluation and bidding.
///
/// Defaults are the empirically chosen values the bots shipped with; tune
/// them here instead of inside the planners.
#[derive(Debug, Clone, Copy)]
pub struct BidWeights {
    /// Minimum value counted as a high card (default: 5)
    pub high_card_min: u8,

    /// Cards of one color that raise the four-of-color flag (default: 4)
    pub four_of_color: usize,

    /// Minimum value of the card that gives control of a color (default: 6)
    pub control_card_min: u8,

    /// Cards of that color required alongside it (default: 2)
    pub control_length_min: usize,

    /// Red card (or trump) value that can protect red-0 (default: 5)
    pub red_zero_support_min: u8,

    /// Trump count that protects a held red-0 on its own (default: 2)
    pub red_zero_support_trumps: usize,

    /// Brown cards at or below this value cannot absorb brown-0 (default: 3)
    pub brown_low_max: u8,

    /// Trump cards counted as sure tricks at most (default: 3)
    pub trump_trick_cap: usize,

    /// Trump value sum that earns the extra trump trick (default: 15)
    pub trump_strength_bonus_at: u32,

    /// Extra trick for a strong trump holding (default: 1.0)
    pub trump_strength_bonus: f32,

    /// Trick credit for holding a color's 7 (default: 0.8)
    pub seven_trick: f32,

    /// Trick credit for the 6 when the 7 is missing (default: 0.5)
    pub six_trick: f32,

    /// Trick credit for four or more cards of a color (default: 0.5)
    pub long_color_trick: f32,

    /// Bonus for a held and controllable red-0 (default: 0.5)
    pub red_zero_controlled: f32,

    /// Adjustment for holding brown-0 (default: -0.3)
    pub brown_zero_held: f32,

    /// Rounded tricks from which the hand is exceptional (default: 11)
    pub exceptional_at: u8,

    /// Rounded tricks from which the hand is strong (default: 9)
    pub strong_at: u8,

    /// Rounded tricks from which the hand is normal (default: 7)
    pub normal_at: u8,

    /// Chance an exceptional hand bids 12 instead of 11 (default: 0.3)
    pub exceptional_raise_chance: f64,

    /// Chance a strong hand bids 10 instead of 9 (default: 0.4)
    pub strong_raise_chance: f64,

    /// Chance a normal hand bids 8 instead of 7 (default: 0.6)
    pub normal_raise_chance: f64,

    /// High cards needed before going without trump (default: 4)
    pub without_trump_high_cards: usize,

    /// Largest gap between the minimum raise and our own bid a non-dealer
    /// still covers (default: 2)
    pub max_overbid: u8,

    /// Easy bots declare without trump at this rate regardless (default: 0.05)
    pub easy_without_trump_chance: f64,

    /// Medium bots follow a without-trump recommendation at this rate (default: 0.7)
    pub medium_without_trump_follow: f64,
}

impl Default for BidWeights {
    fn default() -> Self {
        Self {
            high_card_min: 5,
            four_of_color: 4,
            control_card_min: 6,
            control_length_min: 2,
            red_zero_support_min: 5,
            red_zero_support_trumps: 2,
            brown_low_max: 3,
            trump_trick_cap: 3,
            trump_strength_bonus_at: 15,
            trump_strength_bonus: 1.0,
            seven_trick: 0.8,
            six_trick: 0.5,
            long_color_trick: 0.5,
            red_zero_controlled: 0.5,
            brown_zero_held: -0.3,
            exceptional_at: 11,
            strong_at: 9,
            normal_at: 7,
            exceptional_raise_chance: 0.3,
            strong_raise_chance: 0.4,
            normal_raise_chance: 0.6,
            without_trump_high_cards: 4,
            max_overbid: 2,
            easy_without_trump_chance: 0.05,
            medium_without_trump_follow: 0.7,
        }
    }
}

/// Play priorities, roughly on a 0-100 scale, per trick position.
#[derive(Debug, Clone, Copy)]
pub struct PlayWeights {
    /// Dumping brown-0 onto an opponent's trick (default: 90)
    pub brown_zero_dump: i32,

    /// Leading brown-0 (default: 10)
    pub brown_zero_lead: i32,

    /// Leading red-0 (default: 20)
    pub red_zero_lead: i32,

    /// Releasing red-0 into a trick our side already holds (default: 85)
    pub red_zero_safe: i32,

    /// Releasing red-0 while an opponent holds the trick (default: 15)
    pub red_zero_exposed: i32,

    /// Leading a 6 while that color's 7 is still out (default: 30)
    pub lead_six_guarded: i32,

    /// Leading a 6 once the 7 has fallen (default: 60)
    pub lead_six_free: i32,

    /// Leading a 7 (default: 65)
    pub lead_seven: i32,

    /// Leading a high brown card before brown-0 has fallen (default: 70)
    pub lead_brown_flush: i32,

    /// Brown value that counts as high for flushing (default: 5)
    pub brown_flush_min: u8,

    /// Leading trump while holding a long trump suit (default: 55)
    pub lead_trump_long: i32,

    /// Leading trump from a short holding (default: 35)
    pub lead_trump_short: i32,

    /// Trump cards that make the holding long (default: 3)
    pub long_trump_count: usize,

    /// Leading a middle card, value 3 to 5 (default: 50)
    pub lead_middle: i32,

    /// Leading anything lower (default: 40)
    pub lead_low: i32,

    /// Second hand winning card, before trick value (default: 50)
    pub second_win_base: i32,

    /// Second hand losing card, minus its value (default: 40)
    pub second_shed_base: i32,

    /// Third hand behind a winning partner, minus value (default: 30)
    pub third_partner_base: i32,

    /// Third hand overtaking an opponent (default: 70)
    pub third_win: i32,

    /// Third hand unable to win, minus value (default: 35)
    pub third_shed_base: i32,

    /// Last hand, partner already holds a valuable trick (default: 20)
    pub fourth_partner_valuable: i32,

    /// Trick value above which the partner's trick counts as valuable (default: 5)
    pub fourth_valuable_over: i32,

    /// Last hand, partner holds an ordinary trick, minus value (default: 30)
    pub fourth_partner_base: i32,

    /// Last hand taking the trick from an opponent, before trick value (default: 80)
    pub fourth_win_base: i32,

    /// Last hand unable to win, minus value (default: 25)
    pub fourth_shed_base: i32,

    /// Medium bots play their best card at this rate, else the runner-up (default: 0.7)
    pub medium_top_chance: f64,

    /// Easy bots play their best card at this rate, else a random one (default: 0.3)
    pub easy_top_chance: f64,
}

impl Default for PlayWeights {
    fn default() -> Self {
        Self {
            brown_zero_dump: 90,
            brown_zero_lead: 10,
            red_zero_lead: 20,
            red_zero_safe: 85,
            red_zero_exposed: 15,
            lead_six_guarded: 30,
            lead_six_free: 60,
            lead_seven: 65,
            lead_brown_flush: 70,
            brown_flush_min: 5,
            lead_trump_long: 55,
            lead_trump_short: 35,
            long_trump_count: 3,
            lead_middle: 50,
            lead_low: 40,
            second_win_base: 50,
            second_shed_base: 40,
            third_partner_base: 30,
            third_win: 70,
            third_shed_base: 35,
            fourth_partner_valuable: 20,
            fourth_valuable_over: 5,
            fourth_partner_base: 30,
            fourth_win_base: 80,
            fourth_shed_base: 25,
            medium_top_chance: 0.7,
            easy_top_chance: 0.3,
        }
    }
}

/// Chance to pass on opening the bidding, by difficulty and hand quality.
///
/// Weaker hands skip more often, and stronger bots are more selective.
#[derive(Debug, Clone, Copy)]
pub struct SkipTable {
    /// Rows are easy, medium, hard; columns weak, normal, strong, exceptional.
    pub chances: [[f64; 4]; 3],
}

impl Default for SkipTable {
    fn default() -> Self {
        Self {
            chances: [
                [0.40, 0.20, 0.10, 0.02],
                [0.60, 0.30, 0.15, 0.03],
                [0.80, 0.40, 0.15, 0.05],
            ],
        }
    }
}

impl SkipTable {
    pub fn chance(&self, difficulty: Difficulty, quality: HandQuality) -> f64 {
        self.chances[difficulty.index()][quality.index()].clamp(0.0, 1.0)
    }
}

/// Human-feel latency window for a difficulty: `[base, base + variance)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayProfile {
    pub base_ms: u64,
    pub variance_ms: u64,
}

impl DelayProfile {
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                base_ms: 1_500,
                variance_ms: 1_500,
            },
            Difficulty::Medium => Self {
                base_ms: 1_000,
                variance_ms: 1_000,
            },
            Difficulty::Hard => Self {
                base_ms: 600,
                variance_ms: 800,
            },
        }
    }

    pub fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let jitter = if self.variance_ms == 0 {
            0
        } else {
            rng.gen_range(0..self.variance_ms)
        };
        Duration::from_millis(self.base_ms + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn skip_chance_grows_with_difficulty_and_weakness() {
        let table = SkipTable::default();
        for quality in [
            HandQuality::Weak,
            HandQuality::Normal,
            HandQuality::Strong,
            HandQuality::Exceptional,
        ] {
            assert!(
                table.chance(Difficulty::Easy, quality) <= table.chance(Difficulty::Medium, quality)
            );
            assert!(
                table.chance(Difficulty::Medium, quality) <= table.chance(Difficulty::Hard, quality)
            );
        }
        for difficulty in Difficulty::ALL {
            assert!(
                table.chance(difficulty, HandQuality::Weak)
                    > table.chance(difficulty, HandQuality::Exceptional)
            );
        }
    }

    #[test]
    fn delay_stays_inside_window() {
        let mut rng = StdRng::seed_from_u64(11);
        for difficulty in Difficulty::ALL {
            let profile = DelayProfile::for_difficulty(difficulty);
            for _ in 0..200 {
                let ms = profile.sample(&mut rng).as_millis() as u64;
                assert!(ms >= profile.base_ms);
                assert!(ms < profile.base_ms + profile.variance_ms);
            }
        }
    }

    #[test]
    fn zero_variance_delay_is_exact() {
        let profile = DelayProfile {
            base_ms: 250,
            variance_ms: 0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(profile.sample(&mut rng), Duration::from_millis(250));
    }
}
