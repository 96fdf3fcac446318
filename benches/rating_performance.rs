//! Performance benchmarks for rating calculations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pairwise_ratings::rules::{Colley, Elo, Iterate, KeenerScores, Massey};
use pairwise_ratings::simulation::{simulate_season, Generator, SimulationConfig};
use pairwise_ratings::{Competition, RatingsList, UpdateRule};

fn create_bench_league(players: usize, rounds: usize) -> (RatingsList, Vec<Competition>) {
    let truth: RatingsList = (0..players)
        .map(|i| (format!("player_{}", i), 3000.0 + (i as f64 * 25.0)))
        .collect();
    let config = SimulationConfig {
        generator: Generator::RoundRobin { rounds },
        seed: 7,
        ..SimulationConfig::default()
    };
    let games = simulate_season(&config, &truth).unwrap();

    (truth.map(|_| 1500.0), games)
}

fn bench_recursive_rules(c: &mut Criterion) {
    let (ratings, games) = create_bench_league(20, 5);
    let elo = UpdateRule::Elo(Elo::default());
    let iterate = UpdateRule::Iterate(Iterate::new(elo.clone(), 10).unwrap());

    c.bench_function("elo_950_games", |b| {
        b.iter(|| black_box(elo.update_ratings(&ratings, &games)))
    });

    c.bench_function("iterate_elo_950_games_batch_10", |b| {
        b.iter(|| black_box(iterate.update_ratings(&ratings, &games)))
    });
}

fn bench_simultaneous_rules(c: &mut Criterion) {
    let (ratings, games) = create_bench_league(50, 2);
    let colley = UpdateRule::Colley(Colley);
    let massey = UpdateRule::Massey(Massey);
    let keener = UpdateRule::KeenerScores(KeenerScores::default());

    c.bench_function("colley_50_players", |b| {
        b.iter(|| black_box(colley.update_ratings(&ratings, &games)))
    });

    c.bench_function("massey_50_players", |b| {
        b.iter(|| black_box(massey.update_ratings(&ratings, &games)))
    });

    c.bench_function("keener_50_players", |b| {
        b.iter(|| black_box(keener.update_ratings(&ratings, &games)))
    });
}

fn bench_simulation(c: &mut Criterion) {
    let (ratings, _) = create_bench_league(20, 1);
    let config = SimulationConfig {
        generator: Generator::RandomPairs { games: 1000 },
        ..SimulationConfig::default()
    };

    c.bench_function("simulate_1000_games", |b| {
        b.iter(|| black_box(simulate_season(&config, &ratings)))
    });
}

criterion_group!(
    benches,
    bench_recursive_rules,
    bench_simultaneous_rules,
    bench_simulation
);
criterion_main!(benches);
