use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CombinationGenerator, Prediction};
use crate::models::{Combination, Product};
use crate::rng::DeterministicRng;

impl CombinationGenerator<'_> {
    /// Tirage par rejet sur un générateur cryptographique réamorcé depuis l'OS.
    pub(super) fn csprng(&mut self) -> Prediction {
        let mut secure = StdRng::from_os_rng();
        let max = self.product.max_number();
        let mut picks = Vec::with_capacity(Combination::SIZE);
        while picks.len() < Combination::SIZE {
            let n = secure.random_range(1..=max);
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
        Prediction {
            combination: Combination::from_picks(&picks),
            explanation: "Tirage cryptographiquement sûr (entropie du système).".to_string(),
        }
    }

    pub(super) fn vrf(&mut self) -> Prediction {
        let seed = format!("{}{}", Utc::now().timestamp_millis(), self.rng.random::<f64>());
        vrf_from_seed(&seed, self.product)
    }
}

/// VRF simulé : grille reproductible à partir d'une graine textuelle.
pub fn vrf_from_seed(seed: &str, product: Product) -> Prediction {
    let mut rng = DeterministicRng::from_text(seed);
    let picks = rng.distinct_numbers(Combination::SIZE, product.max_number());
    let shown: String = seed.chars().take(10).collect();
    Prediction {
        combination: Combination::from_picks(&picks),
        explanation: format!("VRF simulé : tirage déterministe depuis la graine {}...", shown),
    }
}
