use tracing::warn;

use super::{CombinationGenerator, Prediction};
use crate::models::Combination;

const BALANCED_HOT_COUNT: usize = 3;

impl CombinationGenerator<'_> {
    pub(super) fn by_frequency(&mut self, hot: bool) -> Prediction {
        let table = self.scorer.frequency_table();
        if table.is_empty() {
            warn!("pas de fréquences disponibles, repli sur le tirage aléatoire");
            return self.random();
        }

        let window = table.window;
        let mut pool = table.ranked(hot);
        pool.truncate(self.config.hot_pool);
        let mut picks = self.shuffle_pick(pool);
        self.fill_random(&mut picks);

        let explanation = if hot {
            format!(
                "Numéros chauds : tirés parmi les {} numéros les plus fréquents des {} derniers tirages.",
                self.config.hot_pool, window
            )
        } else {
            format!(
                "Numéros froids : tirés parmi les {} numéros les moins fréquents des {} derniers tirages.",
                self.config.hot_pool, window
            )
        };
        Prediction {
            combination: Combination::from_picks(&picks),
            explanation,
        }
    }

    pub(super) fn balanced(&mut self) -> Prediction {
        let table = self.scorer.frequency_table();
        if table.is_empty() {
            warn!("pas de fréquences disponibles, repli sur le tirage aléatoire");
            return self.random();
        }

        let mut picks: Vec<u8> = table.ranked(true).into_iter().take(BALANCED_HOT_COUNT).collect();
        for _ in 0..(Combination::SIZE - BALANCED_HOT_COUNT) {
            let n = self.random_number();
            if !picks.contains(&n) {
                picks.push(n);
            }
        }
        self.fill_random(&mut picks);

        Prediction {
            combination: Combination::from_picks(&picks),
            explanation: "Mixte équilibré : les 3 numéros les plus chauds complétés au hasard.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AnalysisConfig;
    use crate::generator::{assert_valid, CombinationGenerator, Strategy};
    use crate::history::make_test_history;
    use crate::models::Product;

    fn skewed_history() -> crate::history::DrawHistory {
        make_test_history(&[
            (1, "1,2,3,4,5,6"),
            (2, "1,2,3,4,5,7"),
            (3, "1,2,3,4,8,9"),
            (4, "1,2,3,10,11,12"),
        ])
    }

    #[test]
    fn test_hot_stays_in_pool() {
        let history = skewed_history();
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(3));
        let pool = generator.scorer().frequency_table().ranked(true)[..15].to_vec();
        for _ in 0..50 {
            let p = generator.generate(Strategy::Hot);
            assert!(p.combination.numbers().iter().all(|n| pool.contains(n)));
        }
    }

    #[test]
    fn test_small_hot_pool_backfilled() {
        let history = skewed_history();
        let config = AnalysisConfig {
            hot_pool: 4,
            ..AnalysisConfig::default()
        };
        let mut generator = CombinationGenerator::with_config(&history, Product::Mega645, config, Some(1));
        for strategy in [Strategy::Hot, Strategy::Cold] {
            for _ in 0..20 {
                let p = generator.generate(strategy);
                assert_valid(&p.combination, 45);
            }
        }
        // Les quatre numéros les plus chauds restent tous retenus
        let p = generator.generate(Strategy::Hot);
        for n in [1, 2, 3, 4] {
            assert!(p.combination.contains(n));
        }
    }

    #[test]
    fn test_cold_avoids_hottest() {
        let history = skewed_history();
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(3));
        for _ in 0..50 {
            let p = generator.generate(Strategy::Cold);
            assert!(!p.combination.contains(1));
            assert!(!p.combination.contains(2));
        }
    }

    #[test]
    fn test_balanced_keeps_top_three() {
        let history = skewed_history();
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(9));
        for _ in 0..50 {
            let p = generator.generate(Strategy::Balanced);
            for n in [1, 2, 3] {
                assert!(p.combination.contains(n));
            }
        }
    }
}
