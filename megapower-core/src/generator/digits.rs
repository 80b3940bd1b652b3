use tracing::warn;

use super::{CombinationGenerator, Prediction};
use crate::frequency::last_digit_frequencies;
use crate::models::Combination;

impl CombinationGenerator<'_> {
    /// Restreint le tirage aux numéros dont le dernier chiffre est parmi les plus fréquents.
    pub(super) fn by_last_digit(&mut self) -> Prediction {
        let counts = last_digit_frequencies(self.history.window(self.config.digit_window), self.product);

        let mut digits: Vec<(u8, u32)> = (0u8..10)
            .map(|d| (d, counts[d as usize]))
            .filter(|&(_, c)| c > 0)
            .collect();
        if digits.is_empty() {
            warn!("aucun chiffre final observé, repli sur le tirage aléatoire");
            return self.random();
        }
        digits.sort_by(|a, b| b.1.cmp(&a.1));
        let lucky: Vec<u8> = digits
            .into_iter()
            .take(self.config.top_digits)
            .map(|(d, _)| d)
            .collect();

        let pool: Vec<u8> = (1..=self.product.max_number())
            .filter(|n| lucky.contains(&(n % 10)))
            .collect();
        let mut picks = self.shuffle_pick(pool);
        self.fill_random(&mut picks);

        let listed: Vec<String> = lucky.iter().map(|d| d.to_string()).collect();
        Prediction {
            combination: Combination::from_picks(&picks),
            explanation: format!(
                "Dernier chiffre : numéros se terminant par {}.",
                listed.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AnalysisConfig;
    use crate::generator::{CombinationGenerator, Strategy};
    use crate::history::make_test_history;
    use crate::models::Product;

    #[test]
    fn test_last_digit_pool() {
        // Chiffres dominants : 1, 2, 3
        let history = make_test_history(&[
            (1, "1,11,21,2,12,3"),
            (2, "31,41,22,32,13,23"),
            (3, "1,2,3,11,12,13"),
        ]);
        let mut generator = CombinationGenerator::new(&history, Product::Mega645, Some(4));
        for _ in 0..30 {
            let p = generator.generate(Strategy::LastDigit);
            assert!(p.combination.numbers().iter().all(|n| [1, 2, 3].contains(&(n % 10))));
        }
    }

    #[test]
    fn test_last_digit_backfills_short_pool() {
        // Un seul chiffre observé : 5, 15, 25, 35, 45 ne suffisent pas
        let history = make_test_history(&[(1, "5,15,25,35,45,1")]);
        let config = AnalysisConfig {
            top_digits: 1,
            ..AnalysisConfig::default()
        };
        let mut generator = CombinationGenerator::with_config(&history, Product::Mega645, config, Some(4));
        let p = generator.generate(Strategy::LastDigit);
        let fives = p.combination.numbers().iter().filter(|n| *n % 10 == 5).count();
        assert_eq!(fives, 5);
    }
}
