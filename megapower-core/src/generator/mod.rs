//! Stratégies de génération de grilles.
//!
//! Chaque stratégie renvoie une `Combination` valide et une explication
//! lisible. Sans données de fréquence exploitables, les stratégies biaisées
//! retombent sur le tirage uniforme au lieu d'échouer.

mod digits;
mod frequency;
mod pairs;
mod secure;
mod target;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::history::DrawHistory;
use crate::models::{Combination, Product};
use crate::scoring::ScoringEngine;
use crate::session::CancelToken;

pub use secure::vrf_from_seed;

pub const DEFAULT_TARGET_SCORE: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Random,
    Hot,
    Cold,
    Balanced,
    TargetScore,
    PairAnalysis,
    LastDigit,
    Csprng,
    Vrf,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Random => "Aléatoire",
            Strategy::Hot => "Numéros chauds",
            Strategy::Cold => "Numéros froids",
            Strategy::Balanced => "Mixte équilibré",
            Strategy::TargetScore => "Score cible",
            Strategy::PairAnalysis => "Analyse des paires",
            Strategy::LastDigit => "Dernier chiffre",
            Strategy::Csprng => "CSPRNG",
            Strategy::Vrf => "VRF simulé",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub combination: Combination,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPrediction {
    pub combination: Combination,
    pub score: u8,
    pub explanation: String,
}

pub struct CombinationGenerator<'a> {
    history: &'a DrawHistory,
    product: Product,
    config: AnalysisConfig,
    scorer: ScoringEngine,
    target: u8,
    rng: StdRng,
}

impl<'a> CombinationGenerator<'a> {
    pub fn new(history: &'a DrawHistory, product: Product, seed: Option<u64>) -> Self {
        Self::with_config(history, product, AnalysisConfig::default(), seed)
    }

    pub fn with_config(
        history: &'a DrawHistory,
        product: Product,
        config: AnalysisConfig,
        seed: Option<u64>,
    ) -> Self {
        let rng: StdRng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let scorer = ScoringEngine::with_window(history, product, config.scoring_window);
        Self {
            history,
            product,
            config,
            scorer,
            target: DEFAULT_TARGET_SCORE,
            rng,
        }
    }

    pub fn with_target(mut self, target: u8) -> Self {
        self.target = target;
        self
    }

    pub fn scorer(&self) -> &ScoringEngine {
        &self.scorer
    }

    pub fn generate(&mut self, strategy: Strategy) -> Prediction {
        match strategy {
            Strategy::Random => self.random(),
            Strategy::Hot => self.by_frequency(true),
            Strategy::Cold => self.by_frequency(false),
            Strategy::Balanced => self.balanced(),
            Strategy::TargetScore => self.best_of_random(self.target),
            Strategy::PairAnalysis => self.by_pairs(),
            Strategy::LastDigit => self.by_last_digit(),
            Strategy::Csprng => self.csprng(),
            Strategy::Vrf => self.vrf(),
        }
    }

    /// `count` grilles notées. Le mode score cible lance la recherche par paliers ;
    /// les autres stratégies sont simplement répétées.
    pub fn generate_many(&mut self, strategy: Strategy, count: usize) -> Vec<ScoredPrediction> {
        self.generate_many_cancellable(strategy, count, &CancelToken::new())
    }

    pub fn generate_many_cancellable(
        &mut self,
        strategy: Strategy,
        count: usize,
        cancel: &CancelToken,
    ) -> Vec<ScoredPrediction> {
        if strategy == Strategy::TargetScore {
            return self.target_search(self.target, count, cancel);
        }
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            if cancel.is_cancelled() {
                break;
            }
            let prediction = self.generate(strategy);
            results.push(self.scored(prediction));
        }
        results
    }

    fn scored(&self, prediction: Prediction) -> ScoredPrediction {
        ScoredPrediction {
            score: self.scorer.score(&prediction.combination),
            combination: prediction.combination,
            explanation: prediction.explanation,
        }
    }

    fn random_number(&mut self) -> u8 {
        self.rng.random_range(1..=self.product.max_number())
    }

    /// Complète `picks` par des numéros uniformes jusqu'à six valeurs distinctes.
    fn fill_random(&mut self, picks: &mut Vec<u8>) {
        while picks.len() < Combination::SIZE {
            let n = self.random_number();
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
    }

    fn uniform(&mut self) -> Combination {
        let mut picks = Vec::with_capacity(Combination::SIZE);
        self.fill_random(&mut picks);
        Combination::from_picks(&picks)
    }

    fn random(&mut self) -> Prediction {
        Prediction {
            combination: self.uniform(),
            explanation: "Tirage aléatoire uniforme, sans biais.".to_string(),
        }
    }

    /// Permutation uniforme (Fisher-Yates) puis les six premiers.
    fn shuffle_pick(&mut self, mut candidates: Vec<u8>) -> Vec<u8> {
        candidates.shuffle(&mut self.rng);
        candidates.truncate(Combination::SIZE);
        candidates
    }
}

#[cfg(test)]
pub(crate) fn assert_valid(combination: &Combination, max: u8) {
    let nums = combination.numbers();
    assert!(nums.windows(2).all(|w| w[0] < w[1]), "non trié ou doublon : {:?}", nums);
    assert!(nums.iter().all(|&n| n >= 1 && n <= max), "hors limites : {:?}", nums);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::make_test_history;

    const ALL: [Strategy; 9] = [
        Strategy::Random,
        Strategy::Hot,
        Strategy::Cold,
        Strategy::Balanced,
        Strategy::TargetScore,
        Strategy::PairAnalysis,
        Strategy::LastDigit,
        Strategy::Csprng,
        Strategy::Vrf,
    ];

    #[test]
    fn test_every_strategy_valid_with_history() {
        let history = make_test_history(&[
            (1, "1,2,3,4,5,6"),
            (2, "7,8,9,10,11,12"),
            (3, "13,21,31,41,44,45"),
            (4, "2,11,20,23,36,43"),
        ]);
        for product in [Product::Mega645, Product::Power655] {
            let mut generator = CombinationGenerator::new(&history, product, Some(7));
            for strategy in ALL {
                for _ in 0..20 {
                    let p = generator.generate(strategy);
                    assert_valid(&p.combination, product.max_number());
                    assert!(!p.explanation.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_every_strategy_valid_without_history() {
        let history = DrawHistory::default();
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(1));
        for strategy in ALL {
            let p = generator.generate(strategy);
            assert_valid(&p.combination, 45);
        }
    }

    #[test]
    fn test_seed_determinism() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6"), (2, "2,11,20,23,36,43")]);
        let mut a = CombinationGenerator::new(&history, Product::Mega645, Some(123));
        let mut b = CombinationGenerator::new(&history, Product::Mega645, Some(123));
        for strategy in [Strategy::Random, Strategy::Hot, Strategy::Balanced, Strategy::PairAnalysis] {
            assert_eq!(a.generate(strategy), b.generate(strategy));
        }
    }

    #[test]
    fn test_generate_many_scores() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6")]);
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(5));
        let results = generator.generate_many(Strategy::Random, 4);
        assert_eq!(results.len(), 4);
        for r in &results {
            assert_eq!(r.score, generator.scorer().score(&r.combination));
        }
    }

    #[test]
    fn test_generate_many_cancelled() {
        let history = DrawHistory::default();
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(5));
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(generator.generate_many_cancellable(Strategy::Hot, 10, &cancel).is_empty());
    }
}
