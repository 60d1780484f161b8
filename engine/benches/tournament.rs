//! Benchmark harness for tournament predict and learn

use cascade_engine::{BaseLearner, BinaryLabel, CbLabel, Tournament, TournamentConfig};
use cascade_tree::NodeId;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Deterministic scorer: mixes example and offset into a sign
struct HashedScorer {
    updates: u64,
}

impl BaseLearner<u64> for HashedScorer {
    fn predict(&self, example: &u64, offset: NodeId) -> f32 {
        let h = (example ^ u64::from(offset)).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        if h >> 63 == 0 {
            -1.0
        } else {
            1.0
        }
    }

    fn learn(&mut self, _example: &u64, _label: BinaryLabel, _weight: f32, _offset: NodeId) {
        self.updates += 1;
    }
}

fn benchmark_predict(c: &mut Criterion) {
    let engine = Tournament::new(TournamentConfig::new(1_024, 0).expect("valid config")).expect("tree");
    let scorer = HashedScorer { updates: 0 };
    let examples: Vec<u64> = (0..10_000).collect();

    c.bench_function("tournament_predict_1024", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for example in &examples {
                sum += u64::from(engine.predict(&scorer, black_box(example)));
            }
            black_box(sum)
        })
    });

    c.bench_function("tournament_predict_batch_1024", |b| {
        b.iter(|| black_box(engine.predict_batch(&scorer, black_box(&examples))))
    });
}

fn benchmark_learn(c: &mut Criterion) {
    let mut engine = Tournament::new(TournamentConfig::new(1_024, 4).expect("valid config")).expect("tree");
    let mut scorer = HashedScorer { updates: 0 };
    let labels: Vec<CbLabel> = (0..1_000u32)
        .map(|i| CbLabel::new().with(1.0, i % 1_024 + 1, 0.5).with(1.0, (i * 7) % 1_024 + 1, 0.5))
        .collect();

    c.bench_function("tournament_learn_1024", |b| {
        b.iter(|| {
            for (i, label) in labels.iter().enumerate() {
                engine
                    .learn(&mut scorer, black_box(&(i as u64)), label)
                    .expect("labels are in range");
            }
        })
    });
    black_box(scorer.updates);
}

criterion_group!(benches, benchmark_predict, benchmark_learn);
criterion_main!(benches);
