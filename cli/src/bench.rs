//! Throughput harness driving the tournament with a stateless scorer

use std::time::Instant;

use cascade_engine::{BaseLearner, BinaryLabel, CbLabel, EngineError, Tournament, TournamentConfig};
use cascade_tree::NodeId;

/// Mixes example and offset into a sign; counts updates instead of training
#[derive(Debug, Default)]
pub struct HashedScorer {
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

pub struct BenchReport {
    pub samples: u64,
    pub predict_ms: u128,
    pub batch_ms: u128,
    pub learn_ms: u128,
    pub updates: u64,
    pub stats: String,
}

impl BenchReport {
    fn rate(&self, ms: u128) -> f64 {
        self.samples as f64 / (ms.max(1) as f64 / 1000.0)
    }

    pub fn predict_rate(&self) -> f64 {
        self.rate(self.predict_ms)
    }

    pub fn batch_rate(&self) -> f64 {
        self.rate(self.batch_ms)
    }

    pub fn learn_rate(&self) -> f64 {
        self.rate(self.learn_ms)
    }
}

pub fn run(config: TournamentConfig, samples: u64) -> Result<BenchReport, EngineError> {
    let mut engine = Tournament::new(config)?;
    let mut scorer = HashedScorer::default();
    let num_actions = u64::from(engine.num_actions().max(1));

    let start = Instant::now();
    let mut checksum = 0u64;
    for example in 0..samples {
        checksum = checksum.wrapping_add(u64::from(engine.predict(&scorer, &example)));
    }
    let predict_ms = start.elapsed().as_millis();

    let examples: Vec<u64> = (0..samples).collect();
    let start = Instant::now();
    let batch = engine.predict_batch(&scorer, &examples);
    let batch_ms = start.elapsed().as_millis();
    let batch_checksum = batch.iter().fold(0u64, |acc, &a| acc.wrapping_add(u64::from(a)));
    debug_assert_eq!(checksum, batch_checksum);

    let start = Instant::now();
    if engine.num_actions() > 0 {
        for example in 0..samples {
            let action = (example % num_actions) as u32 + 1;
            let label = CbLabel::new().with(1.0, action, 0.5);
            engine.learn(&mut scorer, &example, &label)?;
        }
    }
    let learn_ms = start.elapsed().as_millis();

    Ok(BenchReport {
        samples,
        predict_ms,
        batch_ms,
        learn_ms,
        updates: scorer.updates,
        stats: engine.stats().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_counts_updates() {
        let report = run(TournamentConfig::new(16, 0).unwrap(), 200).unwrap();
        assert_eq!(report.samples, 200);
        assert!(report.updates > 0);
        assert!(report.stats.starts_with("learn count per node: id=0"));
    }

    #[test]
    fn test_bench_empty_tree() {
        let report = run(TournamentConfig::new(0, 0).unwrap(), 50).unwrap();
        assert_eq!(report.updates, 0);
    }
}
