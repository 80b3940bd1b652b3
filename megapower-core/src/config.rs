use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Fenêtres d'analyse et plafonds utilisés par les générateurs et les modèles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Tirages pris en compte par le score et les numéros chauds/froids.
    pub scoring_window: usize,
    pub pair_window: usize,
    pub digit_window: usize,
    /// Candidats retenus avant mélange pour les stratégies chaud/froid.
    pub hot_pool: usize,
    pub top_pairs: usize,
    pub top_digits: usize,
    pub target_tolerance: u8,
    pub target_attempts: usize,
    /// Essais aléatoires du mode score-cible à une seule grille.
    pub best_of_attempts: usize,
    pub predictive_candidates: usize,
    pub probability_iterations: usize,
    pub pattern_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scoring_window: 100,
            pair_window: 200,
            digit_window: 100,
            hot_pool: 15,
            top_pairs: 20,
            top_digits: 3,
            target_tolerance: 5,
            target_attempts: 200,
            best_of_attempts: 50,
            predictive_candidates: 100,
            probability_iterations: 500,
            pattern_window: 10,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.hot_pool < 6 {
            return Err(CoreError::Config(format!(
                "hot_pool doit contenir au moins 6 numéros (reçu {})",
                self.hot_pool
            )));
        }
        if self.top_pairs == 0 || self.top_digits == 0 {
            return Err(CoreError::Config("top_pairs et top_digits doivent être > 0".into()));
        }
        if self.scoring_window == 0 {
            return Err(CoreError::Config("scoring_window doit être > 0".into()));
        }
        Ok(())
    }
}
