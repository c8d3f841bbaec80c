//! Performance benchmarks for rating updates

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use foosball_ratings::rating::{EloRatingSystem, RatingAlgorithm, RpiRating};
use foosball_ratings::{MatchSubmission, RatingRegistry};

const ROSTER: [&str; 8] = [
    "Alex", "Barrett", "Joel", "Tim", "Sam", "Priya", "Noor", "Kai",
];

/// Deterministic round-robin league of `games` matches
fn league(games: usize) -> Vec<MatchSubmission> {
    (0..games)
        .map(|i| {
            let first = i % ROSTER.len();
            let second = (first + 1 + i / ROSTER.len()) % ROSTER.len();
            let second = if second == first {
                (second + 1) % ROSTER.len()
            } else {
                second
            };
            MatchSubmission::new(
                ROSTER[first],
                (i % 6) as i64,
                ROSTER[second],
                ((i * 7) % 6) as i64,
            )
        })
        .collect()
}

fn registry_after(games: &[MatchSubmission]) -> RatingRegistry {
    let mut registry = RatingRegistry::default();
    for game in games {
        registry.submit(game.clone()).unwrap();
    }
    registry
}

fn bench_add_match_to_registry(c: &mut Criterion) {
    let history = league(200);
    let next = MatchSubmission::new("Alex", 5, "Barrett", 3);

    c.bench_function("registry_add_match_after_200_games", |b| {
        b.iter_batched(
            || registry_after(&history),
            |mut registry| black_box(registry.submit(next.clone())),
            BatchSize::LargeInput,
        )
    });
}

fn bench_rpi_recompute(c: &mut Criterion) {
    let records: Vec<_> = league(500)
        .into_iter()
        .map(|game| game.validate().unwrap())
        .collect();

    c.bench_function("rpi_replay_500_games", |b| {
        b.iter(|| {
            let mut rpi = RpiRating::default();
            for record in &records {
                rpi.update_with_match(record).unwrap();
            }
            black_box(rpi.current_ratings())
        })
    });
}

fn bench_elo_replay(c: &mut Criterion) {
    let records: Vec<_> = league(500)
        .into_iter()
        .map(|game| game.validate().unwrap())
        .collect();

    c.bench_function("elo_replay_500_games", |b| {
        b.iter(|| {
            let mut elo = EloRatingSystem::default();
            for record in &records {
                elo.update_with_match(record).unwrap();
            }
            black_box(elo.current_ratings())
        })
    });
}

fn bench_standings(c: &mut Criterion) {
    let registry = registry_after(&league(200));

    c.bench_function("current_standings_after_200_games", |b| {
        b.iter(|| black_box(registry.current_standings()))
    });
}

criterion_group!(
    benches,
    bench_add_match_to_registry,
    bench_rpi_recompute,
    bench_elo_replay,
    bench_standings
);
criterion_main!(benches);
