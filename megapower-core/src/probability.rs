//! Génération pondérée de grilles jamais sorties.
//!
//! Le dernier tirage est exclu du réservoir ; chaque numéro restant pèse sa
//! probabilité historique (1 s'il n'est jamais sorti).

use std::collections::HashSet;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreResult;
use crate::frequency::{frequency_table, FrequencyTable};
use crate::history::DrawHistory;
use crate::models::{Combination, Product};
use crate::parser;
use crate::session::CancelToken;

pub const PROBABILITY_ITERATIONS: usize = 500;
const PROBABILITY_WEIGHT: f64 = 0.7;
const GAP_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityPick {
    pub combination: Combination,
    pub avg_probability: f64,
    pub max_gap: usize,
    pub score: f64,
}

pub struct ProbabilityPredictor {
    iterations: usize,
    rng: StdRng,
}

impl ProbabilityPredictor {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_iterations(PROBABILITY_ITERATIONS, seed)
    }

    pub fn with_iterations(iterations: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { iterations, rng }
    }

    /// Grilles inédites triées par score décroissant ; vide sans historique.
    pub fn run(
        &mut self,
        history: &DrawHistory,
        product: Product,
        cancel: &CancelToken,
    ) -> CoreResult<Vec<ProbabilityPick>> {
        let Some(latest) = history.latest() else {
            return Ok(Vec::new());
        };
        let table = frequency_table(history.records(), product);
        let latest_numbers = parser::parse(&latest.result, product);
        let past: Vec<Vec<u8>> = history
            .records()
            .iter()
            .map(|d| parser::parse(&d.result, product))
            .collect();

        let pool: Vec<(u8, f64)> = table
            .entries()
            .iter()
            .filter(|f| !latest_numbers.contains(&f.number))
            .map(|f| (f.number, if f.probability > 0.0 { f.probability } else { 1.0 }))
            .collect();

        let mut seen: HashSet<Combination> = HashSet::new();
        let mut picks = Vec::new();
        for i in 0..self.iterations {
            if cancel.is_cancelled() {
                debug!(iteration = i, kept = picks.len(), "prédiction pondérée annulée");
                break;
            }
            let drawn = self.sample_without_replacement(&pool, Combination::SIZE)?;
            let combination = Combination::from_picks(&drawn);
            if past.iter().any(|d| combination.is_subset_of(d)) || !seen.insert(combination) {
                continue;
            }
            picks.push(evaluate(combination, &table));
        }

        picks.sort_by(|a, b| b.score.total_cmp(&a.score));
        info!(iterations = self.iterations, kept = picks.len(), "grilles pondérées générées");
        Ok(picks)
    }

    fn sample_without_replacement(&mut self, pool: &[(u8, f64)], count: usize) -> CoreResult<Vec<u8>> {
        let mut available = pool.to_vec();
        let mut selected = Vec::with_capacity(count);
        for _ in 0..count.min(available.len()) {
            let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
            let dist = WeightedIndex::new(&weights)?;
            let idx = dist.sample(&mut self.rng);
            let (number, _) = available.remove(idx);
            selected.push(number);
        }
        Ok(selected)
    }
}

fn evaluate(combination: Combination, table: &FrequencyTable) -> ProbabilityPick {
    let numbers = combination.numbers();
    let avg_probability = numbers
        .iter()
        .map(|&n| table.get(n).map(|f| f.probability).unwrap_or(0.0))
        .sum::<f64>()
        / numbers.len() as f64;
    let max_gap = numbers.iter().map(|&n| table.gap(n)).max().unwrap_or(0);
    ProbabilityPick {
        combination,
        avg_probability,
        max_gap,
        score: PROBABILITY_WEIGHT * avg_probability + GAP_WEIGHT * max_gap as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::make_test_history;

    fn sample() -> DrawHistory {
        make_test_history(&[
            (1, "1,2,3,4,5,6"),
            (2, "7,8,9,10,11,12"),
            (3, "1,8,15,22,29,36"),
            (4, "2,9,16,23,30,37"),
        ])
    }

    #[test]
    fn test_excludes_latest_draw_and_history() {
        let history = sample();
        let mut predictor = ProbabilityPredictor::new(Some(42));
        let picks = predictor.run(&history, Product::Mega645, &CancelToken::new()).unwrap();
        assert!(!picks.is_empty());
        for p in &picks {
            for n in [2, 9, 16, 23, 30, 37] {
                assert!(!p.combination.contains(n));
            }
            for d in history.records() {
                let nums = parser::parse(&d.result, Product::Mega645);
                assert!(!p.combination.is_subset_of(&nums));
            }
        }
    }

    #[test]
    fn test_sorted_and_unique() {
        let mut predictor = ProbabilityPredictor::new(Some(1));
        let picks = predictor.run(&sample(), Product::Power655, &CancelToken::new()).unwrap();
        assert!(picks.windows(2).all(|w| w[0].score >= w[1].score));
        let unique: HashSet<_> = picks.iter().map(|p| p.combination).collect();
        assert_eq!(unique.len(), picks.len());
    }

    #[test]
    fn test_score_formula() {
        let history = sample();
        let table = frequency_table(history.records(), Product::Mega645);
        let combo = Combination::new(&[1, 7, 15, 40, 41, 42], 45).unwrap();
        let pick = evaluate(combo, &table);
        // 1 : 50 %, 7 et 15 : 25 %, jamais sortis : 0 % et écart 4
        assert!((pick.avg_probability - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(pick.max_gap, 4);
        assert!((pick.score - (0.7 * 100.0 / 6.0 + 0.3 * 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history() {
        let mut predictor = ProbabilityPredictor::new(Some(1));
        let picks = predictor
            .run(&DrawHistory::default(), Product::Mega645, &CancelToken::new())
            .unwrap();
        assert!(picks.is_empty());
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut predictor = ProbabilityPredictor::new(Some(1));
        assert!(predictor.run(&sample(), Product::Mega645, &cancel).unwrap().is_empty());
    }

    #[test]
    fn test_seeded_runs_match() {
        let history = sample();
        let a = ProbabilityPredictor::with_iterations(50, Some(9))
            .run(&history, Product::Mega645, &CancelToken::new())
            .unwrap();
        let b = ProbabilityPredictor::with_iterations(50, Some(9))
            .run(&history, Product::Mega645, &CancelToken::new())
            .unwrap();
        assert_eq!(a, b);
    }
}
