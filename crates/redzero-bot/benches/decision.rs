use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use redzero_bot::{BotEngine, Difficulty};
use redzero_core::game::table::{SeatSpec, Table};
use redzero_core::model::player::GameId;

fn fresh_table(seed: u64) -> Table {
    let seats = [
        SeatSpec::new("n", "North"),
        SeatSpec::new("e", "East"),
        SeatSpec::new("s", "South"),
        SeatSpec::new("w", "West"),
    ];
    Table::deal(GameId::new(format!("bench-{seed}")), seats, 0, seed)
}

fn bench_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("decision");

    for seed in [42u64, 12345, 8675309] {
        group.bench_function(format!("bid_seed{seed}"), |b| {
            b.iter_batched(
                || (fresh_table(seed), BotEngine::seeded(Difficulty::Hard, seed)),
                |(table, mut engine)| {
                    let id = table.expected_player().cloned();
                    if let Some(id) = id {
                        black_box(engine.make_bet(table.state(), &id));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("lead_seed{seed}"), |b| {
            b.iter_batched(
                || {
                    let mut table = fresh_table(seed);
                    let mut engine = BotEngine::seeded(Difficulty::Hard, seed);
                    while let Some(id) = table.expected_player().cloned() {
                        let decision = engine.make_bet(table.state(), &id);
                        if table.submit_bet(&id, decision).is_err() {
                            break;
                        }
                    }
                    if let Some(id) = table.expected_player().cloned() {
                        if let Some(trump) = engine.choose_trump(table.state(), &id) {
                            let _ = table.declare_trump(&id, trump);
                        }
                    }
                    (table, engine)
                },
                |(table, mut engine)| {
                    if let Some(id) = table.expected_player().cloned() {
                        black_box(engine.play_card(table.state(), &id));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decisions);
criterion_main!(benches);
