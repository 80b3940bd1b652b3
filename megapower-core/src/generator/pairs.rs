use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use super::{CombinationGenerator, Prediction};
use crate::frequency::pair_frequencies;
use crate::models::Combination;

impl CombinationGenerator<'_> {
    /// Part d'une paire fréquente tirée au hasard, complète avec les numéros chauds.
    pub(super) fn by_pairs(&mut self) -> Prediction {
        let mut pairs = pair_frequencies(self.history.window(self.config.pair_window), self.product);
        pairs.truncate(self.config.top_pairs);

        let Some(&((a, b), count)) = pairs.choose(&mut self.rng) else {
            warn!("aucune paire disponible, repli sur le tirage aléatoire");
            return self.random();
        };
        debug!(a, b, count, "paire de départ");

        let mut picks = vec![a, b];
        for n in self.scorer.frequency_table().ranked(true) {
            if picks.len() >= Combination::SIZE {
                break;
            }
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
        self.fill_random(&mut picks);

        Prediction {
            combination: Combination::from_picks(&picks),
            explanation: format!(
                "Analyse des paires : départ sur la paire {:02}-{:02} ({} sorties communes), complétée par les numéros chauds.",
                a, b, count
            ),
        }
    }
}
