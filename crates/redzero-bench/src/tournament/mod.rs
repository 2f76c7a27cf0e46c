mod round;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use redzero_core::game::table::TableError;
use serde::Serialize;
use thiserror::Error;

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, ResolvedOutputs, SEAT_COUNT};
use crate::logging::TELEMETRY_FILE;

pub const SUMMARY_JSON_FILE: &str = "summary.json";

pub use round::{DecisionSummary, GameOutcome, SeatOutcome, SeatPlan};
use round::{GameSetup, play_game, seat_label};

/// Plays seeded games between the configured seats and records the results.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    seats: Vec<SeatPlan>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub summary_json_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.seats.len() != SEAT_COUNT {
            return Err(RunnerError::SeatCount {
                found: config.seats.len(),
            });
        }

        let seats = config
            .seats
            .iter()
            .map(|seat| SeatPlan {
                name: seat.name.clone(),
                difficulty: seat.difficulty(),
            })
            .collect();

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            seats,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config);

        for game_index in 0..self.config.games.count {
            let seed = rng.next_u64();
            let outcome = play_game(GameSetup {
                run_id: &self.config.run_id,
                game_index,
                seed,
                dealer_index: game_index % SEAT_COUNT,
                seats: &self.seats,
                log_decisions: self.logging_enabled,
            })?;
            analytics.record_game(&outcome)?;
            rows_written += write_game_rows(&mut writer, &self.config, game_index, seed, &outcome)?;
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;
        let summary_json_path = self.outputs.artifact_dir().join(SUMMARY_JSON_FILE);
        summary.write_json(&summary_json_path)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.artifact_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            summary_json_path,
            telemetry_path,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let contract = &outcome.round.contract;
    let mut rows_written = 0usize;

    for (index, seat) in outcome.seats.iter().enumerate() {
        let on_contract_team = seat.team == contract.team;
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: outcome.game_id.to_string(),
            game_index,
            deal_seed: seed,
            seat: seat_label(index),
            bot: seat.name.clone(),
            difficulty: seat.difficulty.label(),
            team: u8::from(seat.team),
            dealer: index == outcome.dealer_index,
            contract_holder: contract.holder.as_str() == seat.name,
            contract_amount: contract.amount,
            without_trump: contract.without_trump,
            trump: outcome.trump.clone(),
            on_contract_team,
            contract_made: outcome.round.contract_made,
            team_points: outcome.round.team_points[seat.team.index()],
            team_tricks: outcome.round.team_tricks[seat.team.index()],
            seat_points: seat.points_won,
            seat_tricks: seat.tricks_won,
            decisions: seat.metrics.decisions,
            speed_ms_decision: seat.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    deal_seed: u64,
    seat: &'static str,
    bot: String,
    difficulty: &'static str,
    team: u8,
    dealer: bool,
    contract_holder: bool,
    contract_amount: u8,
    without_trump: bool,
    trump: Option<String>,
    on_contract_team: bool,
    contract_made: bool,
    team_points: i32,
    team_tricks: u32,
    seat_points: i32,
    seat_tricks: u32,
    decisions: u32,
    speed_ms_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("table rejected a bot action in {game}: {source}")]
    Table {
        game: String,
        #[source]
        source: TableError,
    },
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("configuration requires exactly 4 seats but found {found}")]
    SeatCount { found: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    pub fn game(message: impl Into<String>) -> Self {
        RunnerError::Game {
            message: message.into(),
        }
    }
}
