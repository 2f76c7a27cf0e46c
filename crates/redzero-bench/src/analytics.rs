use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::tournament::GameOutcome;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("seat '{0}' appears in results but not in the configuration")]
    UnknownSeat(String),
    #[error("statistics error: {0}")]
    Stats(String),
    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub struct AnalyticsCollector {
    baseline: Option<String>,
    seats: HashMap<String, SeatAccumulator>,
    seat_order: Vec<String>,
    latency_budget_ms: u64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        let mut seats = HashMap::new();
        let mut order = Vec::new();
        for seat in &config.seats {
            seats.insert(
                seat.name.clone(),
                SeatAccumulator::new(seat.name.clone(), seat.difficulty().label()),
            );
            order.push(seat.name.clone());
        }

        Self {
            baseline: config.metrics.baseline.clone(),
            seats,
            seat_order: order,
            latency_budget_ms: config.metrics.latency_budget_ms,
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        let contract = &outcome.round.contract;
        for seat in &outcome.seats {
            let acc = self
                .seats
                .get_mut(&seat.name)
                .ok_or_else(|| AnalyticsError::UnknownSeat(seat.name.clone()))?;

            let holder = contract.holder.as_str() == seat.name;
            acc.games += 1;
            if holder {
                acc.contracts_held += 1;
                if outcome.round.contract_made {
                    acc.contracts_made += 1;
                }
            }
            acc.team_points
                .push(f64::from(outcome.round.team_points[seat.team.index()]));
            acc.total_latency_ms += seat.metrics.total_ms;
            acc.decisions += u64::from(seat.metrics.decisions);
        }
        Ok(())
    }

    pub fn finalize(mut self) -> Result<AnalyticsSummary, AnalyticsError> {
        let normal = Normal::new(0.0, 1.0).map_err(|err| AnalyticsError::Stats(err.to_string()))?;
        let z = normal.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);

        let baseline_points = self
            .baseline
            .as_ref()
            .and_then(|name| self.seats.get(name))
            .map(|acc| acc.team_points.clone());

        let mut reports = Vec::new();
        for name in &self.seat_order {
            let Some(acc) = self.seats.remove(name) else {
                continue;
            };
            let p_value = match (&self.baseline, &baseline_points) {
                (Some(baseline), Some(points)) if baseline != name => {
                    Some(welch_p_value(&acc.team_points, points, &normal))
                }
                _ => None,
            };
            reports.push(acc.into_report(z, self.latency_budget_ms, p_value));
        }

        Ok(AnalyticsSummary {
            baseline: self.baseline,
            seats: reports,
            latency_budget_ms: self.latency_budget_ms,
        }
        .enrich())
    }
}

struct SeatAccumulator {
    name: String,
    difficulty: &'static str,
    games: usize,
    contracts_held: usize,
    contracts_made: usize,
    team_points: Vec<f64>,
    total_latency_ms: f64,
    decisions: u64,
}

impl SeatAccumulator {
    fn new(name: String, difficulty: &'static str) -> Self {
        Self {
            name,
            difficulty,
            games: 0,
            contracts_held: 0,
            contracts_made: 0,
            team_points: Vec::new(),
            total_latency_ms: 0.0,
            decisions: 0,
        }
    }

    fn into_report(self, z: f64, latency_budget_ms: u64, p_value: Option<f64>) -> SeatReport {
        let (mean, margin) = mean_and_margin(&self.team_points, z);
        let contract_success_rate = if self.contracts_held == 0 {
            None
        } else {
            Some(self.contracts_made as f64 / self.contracts_held as f64)
        };
        let avg_latency = if self.decisions == 0 {
            0.0
        } else {
            self.total_latency_ms / self.decisions as f64
        };

        SeatReport {
            name: self.name,
            difficulty: self.difficulty,
            games: self.games,
            contracts_held: self.contracts_held,
            contracts_made: self.contracts_made,
            contract_success_rate,
            avg_team_points: mean,
            ci95: (mean - margin, mean + margin),
            average_ms_per_decision: avg_latency,
            over_budget: avg_latency > latency_budget_ms as f64,
            delta_vs_baseline: 0.0,
            p_value,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: Option<String>,
    pub seats: Vec<SeatReport>,
    pub latency_budget_ms: u64,
}

impl AnalyticsSummary {
    fn enrich(mut self) -> Self {
        let baseline_avg = self
            .baseline
            .as_ref()
            .and_then(|name| self.seats.iter().find(|seat| &seat.name == name))
            .map(|seat| seat.avg_team_points);

        if let Some(baseline_avg) = baseline_avg {
            for seat in &mut self.seats {
                seat.delta_vs_baseline = seat.avg_team_points - baseline_avg;
            }
        }
        self
    }

    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        if let Some(baseline) = &self.baseline {
            rows.push_str(&format!("Baseline seat: {baseline}\n\n"));
        }
        rows.push_str(&format!(
            "Latency budget: {} ms average per decision\n\n",
            self.latency_budget_ms
        ));
        rows.push_str("| Seat | Difficulty | Games | Contracts | Success % | Avg team pts | Δ vs baseline | 95% CI | Avg ms/decision | Over Budget | p-value |\n");
        rows.push_str("|------|------------|-------|-----------|-----------|--------------|---------------|--------|-----------------|-------------|---------|\n");

        for seat in &self.seats {
            let success = seat
                .contract_success_rate
                .map(|rate| format!("{:.1}%", rate * 100.0))
                .unwrap_or_else(|| "-".to_string());
            let p_value = seat
                .p_value
                .map(|p| format!("{p:.3}"))
                .unwrap_or_else(|| "-".to_string());

            rows.push_str(&format!(
                "| {name} | {difficulty} | {games} | {contracts} | {success} | {avg:.3} | {delta:+.3} | [{ci_low:.3}, {ci_high:.3}] | {latency:.3} | {over_budget} | {p_value} |\n",
                name = seat.name,
                difficulty = seat.difficulty,
                games = seat.games,
                contracts = seat.contracts_held,
                avg = seat.avg_team_points,
                delta = seat.delta_vs_baseline,
                ci_low = seat.ci95.0,
                ci_high = seat.ci95.1,
                latency = seat.average_ms_per_decision,
                over_budget = if seat.over_budget { "Yes" } else { "No" },
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.render_markdown()).map_err(|source| AnalyticsError::Io {
            context: "writing summary markdown",
            source,
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let payload = serde_json::to_vec_pretty(self)?;
        fs::write(path.as_ref(), payload).map_err(|source| AnalyticsError::Io {
            context: "writing summary json",
            source,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatReport {
    pub name: String,
    pub difficulty: &'static str,
    pub games: usize,
    pub contracts_held: usize,
    pub contracts_made: usize,
    pub contract_success_rate: Option<f64>,
    pub avg_team_points: f64,
    pub ci95: (f64, f64),
    pub average_ms_per_decision: f64,
    pub over_budget: bool,
    pub delta_vs_baseline: f64,
    pub p_value: Option<f64>,
}

fn mean_and_variance(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let mean = points.iter().sum::<f64>() / n;
    if points.len() == 1 {
        return (mean, 0.0);
    }
    let variance = points.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

fn mean_and_margin(points: &[f64], z: f64) -> (f64, f64) {
    let (mean, variance) = mean_and_variance(points);
    if points.len() < 2 {
        return (mean, 0.0);
    }
    (mean, z * (variance / points.len() as f64).sqrt())
}

/// Two-sided p-value for a difference in mean points (normal approximation).
fn welch_p_value(sample: &[f64], baseline: &[f64], normal: &Normal) -> f64 {
    if sample.len() < 2 || baseline.len() < 2 {
        return 1.0;
    }
    let (mean_a, var_a) = mean_and_variance(sample);
    let (mean_b, var_b) = mean_and_variance(baseline);
    let std_error = (var_a / sample.len() as f64 + var_b / baseline.len() as f64).sqrt();
    if std_error <= f64::EPSILON {
        return if (mean_a - mean_b).abs() <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    let z = ((mean_a - mean_b) / std_error).abs();
    (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
}
