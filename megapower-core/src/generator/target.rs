use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};

use super::{CombinationGenerator, Prediction, ScoredPrediction, Strategy};
use crate::models::Combination;
use crate::session::CancelToken;

impl CombinationGenerator<'_> {
    /// Garde le meilleur de `best_of_attempts` tirages uniformes ; arrêt anticipé sur un score exact.
    pub(super) fn best_of_random(&mut self, target: u8) -> Prediction {
        let mut best: Option<(Combination, u8)> = None;
        let mut tried = 0;
        for _ in 0..self.config.best_of_attempts.max(1) {
            tried += 1;
            let combination = self.uniform();
            let score = self.scorer.score(&combination);
            let better = match best {
                Some((_, s)) => score.abs_diff(target) < s.abs_diff(target),
                None => true,
            };
            if better {
                best = Some((combination, score));
            }
            if score == target {
                break;
            }
        }

        match best {
            Some((combination, score)) => Prediction {
                combination,
                explanation: format!(
                    "Score cible {} : meilleure de {} grilles aléatoires, score {}.",
                    target, tried, score
                ),
            },
            None => self.random(),
        }
    }

    /// Choix de la stratégie d'un essai selon le palier de la cible.
    fn tiered_strategy(&mut self, target: u8) -> Strategy {
        let roll: f64 = self.rng.random();
        if target >= 80 {
            if roll > 0.6 {
                Strategy::Hot
            } else if roll > 0.3 {
                Strategy::Balanced
            } else {
                Strategy::Random
            }
        } else if target >= 60 {
            if roll > 0.5 {
                Strategy::Balanced
            } else {
                Strategy::Random
            }
        } else {
            Strategy::Random
        }
    }

    /// Cherche `count` grilles distinctes à `target_tolerance` près de la cible.
    ///
    /// Au-delà de `target_attempts` essais, complète avec des grilles aléatoires
    /// notées. Résultat trié par écart croissant à la cible. Une annulation rend
    /// les grilles déjà acceptées, sans complément.
    pub(super) fn target_search(
        &mut self,
        target: u8,
        count: usize,
        cancel: &CancelToken,
    ) -> Vec<ScoredPrediction> {
        let tolerance = self.config.target_tolerance;
        let mut accepted: Vec<ScoredPrediction> = Vec::with_capacity(count);
        let mut seen: HashSet<Combination> = HashSet::new();
        let mut attempts = 0;

        while accepted.len() < count && attempts < self.config.target_attempts {
            if cancel.is_cancelled() {
                debug!(attempts, found = accepted.len(), "recherche de score annulée");
                return sorted_by_distance(accepted, target);
            }
            attempts += 1;

            let strategy = self.tiered_strategy(target);
            let combination = self.generate(strategy).combination;
            let score = self.scorer.score(&combination);
            if score.abs_diff(target) <= tolerance && seen.insert(combination) {
                accepted.push(ScoredPrediction {
                    combination,
                    score,
                    explanation: format!(
                        "Score cible {} : grille « {} » notée {} (essai {}).",
                        target,
                        strategy.label(),
                        score,
                        attempts
                    ),
                });
            }
        }

        if accepted.len() < count {
            info!(
                found = accepted.len(),
                requested = count,
                attempts,
                "cible non atteinte, complément aléatoire"
            );
        }
        while accepted.len() < count {
            if cancel.is_cancelled() {
                break;
            }
            let combination = self.uniform();
            if !seen.insert(combination) {
                continue;
            }
            let score = self.scorer.score(&combination);
            accepted.push(ScoredPrediction {
                combination,
                score,
                explanation: format!("Complément aléatoire après {} essais, score {}.", attempts, score),
            });
        }

        sorted_by_distance(accepted, target)
    }
}

fn sorted_by_distance(mut results: Vec<ScoredPrediction>, target: u8) -> Vec<ScoredPrediction> {
    results.sort_by_key(|p| p.score.abs_diff(target));
    results
}
