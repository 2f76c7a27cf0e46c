//! Drives one seeded round through the local table with a shared engine.

use std::time::{Duration, Instant};

use redzero_bot::{BotEngine, Difficulty};
use redzero_core::game::table::{RoundOutcome, SeatSpec, Table, TableError};
use redzero_core::model::player::{GameId, PlayerId, TeamId};
use redzero_core::model::state::GamePhase;
use tracing::{Level, event};

use super::RunnerError;

/// Bot seated for one game.
#[derive(Debug, Clone)]
pub struct SeatPlan {
    pub name: String,
    pub difficulty: Difficulty,
}

pub struct GameOutcome {
    pub game_id: GameId,
    pub dealer_index: usize,
    pub trump: Option<String>,
    pub round: RoundOutcome,
    pub seats: Vec<SeatOutcome>,
}

pub struct SeatOutcome {
    pub name: String,
    pub difficulty: Difficulty,
    pub team: TeamId,
    pub tricks_won: u32,
    pub points_won: i32,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
pub(crate) struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

pub(crate) struct GameSetup<'a> {
    pub run_id: &'a str,
    pub game_index: usize,
    pub seed: u64,
    pub dealer_index: usize,
    pub seats: &'a [SeatPlan],
    pub log_decisions: bool,
}

pub(crate) fn play_game(setup: GameSetup<'_>) -> Result<GameOutcome, RunnerError> {
    let game_id = GameId::new(format!("{}-G{:05}", setup.run_id, setup.game_index));
    let specs: [SeatSpec; 4] = std::array::from_fn(|idx| {
        let name = setup.seats.get(idx).map(|seat| seat.name.as_str()).unwrap_or("vacant");
        SeatSpec::new(PlayerId::new(name), name)
    });
    let mut table = Table::deal(game_id.clone(), specs, setup.dealer_index, setup.seed);
    let mut engine = BotEngine::seeded(Difficulty::default(), setup.seed.rotate_left(17));
    let mut metrics: Vec<DecisionMetrics> = (0..4).map(|_| DecisionMetrics::default()).collect();
    let table_err = |source: TableError| RunnerError::Table {
        game: game_id.to_string(),
        source,
    };

    engine.init_memory(&game_id);

    while table.phase() == GamePhase::Betting {
        let (id, seat) = expected(&table)?;
        engine.set_difficulty(setup.seats[seat].difficulty);
        let start = Instant::now();
        let decision = engine.make_bet(table.state(), &id);
        let elapsed_ms = metrics[seat].record(start.elapsed());

        if setup.log_decisions && tracing::enabled!(Level::INFO) {
            event!(
                target: "redzero_bench::bid",
                Level::INFO,
                run_id = setup.run_id,
                game_index = setup.game_index as u32,
                seat = seat_label(seat),
                amount = decision.amount,
                without_trump = decision.without_trump,
                skipped = decision.skipped,
                elapsed_ms
            );
        }
        table.submit_bet(&id, decision).map_err(table_err)?;
    }

    if table.phase() == GamePhase::TrumpSelection {
        let (id, seat) = expected(&table)?;
        engine.set_difficulty(setup.seats[seat].difficulty);
        let trump = engine
            .choose_trump(table.state(), &id)
            .ok_or_else(|| RunnerError::game(format!("{id} cannot declare trump")))?;
        table.declare_trump(&id, trump).map_err(table_err)?;
    }

    while table.phase() == GamePhase::Playing {
        let (id, seat) = expected(&table)?;
        engine.set_difficulty(setup.seats[seat].difficulty);
        engine.update_memory(table.state());

        let start = Instant::now();
        let card = engine
            .play_card(table.state(), &id)
            .ok_or_else(|| RunnerError::game(format!("{id} has no card to play")))?;
        let elapsed_ms = metrics[seat].record(start.elapsed());

        if setup.log_decisions && tracing::enabled!(Level::INFO) {
            event!(
                target: "redzero_bench::play",
                Level::INFO,
                run_id = setup.run_id,
                game_index = setup.game_index as u32,
                seat = seat_label(seat),
                card = %card,
                elapsed_ms
            );
        }

        table.play_card(&id, card).map_err(table_err)?;
        engine.update_memory(table.state());
        if table.state().current_trick.is_complete() {
            table.resolve_trick().map_err(table_err)?;
        }
    }

    let round = table
        .outcome()
        .ok_or_else(|| RunnerError::game(format!("{game_id} ended without an outcome")))?;
    engine.clear_memory(&game_id);

    let seats = table
        .state()
        .players
        .iter()
        .zip(setup.seats)
        .zip(metrics)
        .map(|((player, plan), metrics)| SeatOutcome {
            name: plan.name.clone(),
            difficulty: plan.difficulty,
            team: player.team_id,
            tricks_won: player.tricks_won,
            points_won: player.points_won,
            metrics: metrics.finalize(),
        })
        .collect();

    Ok(GameOutcome {
        game_id,
        dealer_index: table.state().dealer_index,
        trump: table.state().trump.map(|color| color.to_string()),
        round,
        seats,
    })
}

fn expected(table: &Table) -> Result<(PlayerId, usize), RunnerError> {
    let id = table
        .expected_player()
        .cloned()
        .ok_or_else(|| RunnerError::game("no player is expected to act"))?;
    let seat = table
        .state()
        .player_index(&id)
        .ok_or_else(|| RunnerError::game(format!("{id} is not seated")))?;
    Ok((id, seat))
}

pub(crate) fn seat_label(index: usize) -> &'static str {
    match index {
        0 => "north",
        1 => "east",
        2 => "south",
        _ => "west",
    }
}
