//! Combinaisons jamais sorties, classées par taux de « tirage suivant ».
//!
//! Pour chaque paire de tirages consécutifs, chaque numéro du second tirage
//! gagne un point. Les candidats sont énumérés à partir des numéros les mieux
//! classés ; tout candidat déjà contenu dans un tirage passé est écarté.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::combinations::for_each_combination;
use crate::history::DrawHistory;
use crate::models::Product;
use crate::parser;
use crate::session::CancelToken;

pub const MAX_CANDIDATES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendFilter {
    Above,
    /// Ne retient jamais rien : le taux de contexte n'est jamais négatif.
    Below,
    All,
}

impl TrendFilter {
    fn accepts(&self, context_rate: f64) -> bool {
        match self {
            TrendFilter::Above => context_rate > 0.0,
            TrendFilter::Below => context_rate < 0.0,
            TrendFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NovelCombination {
    pub numbers: Vec<u8>,
    /// Toujours 0 : le candidat n'est jamais sorti.
    pub count: u32,
    pub context_rate: f64,
    pub global_rate: f64,
}

/// Compteurs de « tirage suivant », dans l'ordre de première apparition.
struct NextDrawCounts {
    order: Vec<u8>,
    counts: HashMap<u8, u32>,
}

impl NextDrawCounts {
    fn build(draws: &[Vec<u8>]) -> Self {
        let mut order = Vec::new();
        let mut counts: HashMap<u8, u32> = HashMap::new();
        for pair in draws.windows(2) {
            for &n in &pair[1] {
                let count = counts.entry(n).or_insert_with(|| {
                    order.push(n);
                    0
                });
                *count += 1;
            }
        }
        Self { order, counts }
    }

    fn get(&self, n: u8) -> u32 {
        self.counts.get(&n).copied().unwrap_or(0)
    }

    /// Par compte décroissant ; à égalité, ordre de première apparition.
    fn ranked(&self) -> Vec<u8> {
        let mut ranked = self.order.clone();
        ranked.sort_by(|a, b| self.get(*b).cmp(&self.get(*a)));
        ranked
    }
}

pub fn predict_novel(
    history: &DrawHistory,
    product: Product,
    filter: TrendFilter,
    limit: usize,
) -> Vec<NovelCombination> {
    predict_novel_with(history, product, filter, limit, MAX_CANDIDATES, &CancelToken::new())
}

pub fn predict_novel_with(
    history: &DrawHistory,
    product: Product,
    filter: TrendFilter,
    limit: usize,
    max_candidates: usize,
    cancel: &CancelToken,
) -> Vec<NovelCombination> {
    if history.len() < 2 {
        return Vec::new();
    }
    let set_size = product.draw_size();
    let draws: Vec<Vec<u8>> = history
        .chronological()
        .map(|d| parser::parse_draw(&d.result, product))
        .collect();
    let next = NextDrawCounts::build(&draws);
    let ranked = next.ranked();

    let mut candidates: Vec<Vec<u8>> = Vec::new();
    for_each_combination(&ranked, set_size, |combo| {
        candidates.push(combo.to_vec());
        candidates.len() < max_candidates
    });

    let denominator = (draws.len() * set_size) as f64;
    let mut results = Vec::new();
    for mut numbers in candidates {
        if cancel.is_cancelled() {
            debug!(found = results.len(), "analyse prédictive annulée");
            break;
        }
        let seen = draws
            .iter()
            .any(|draw| numbers.iter().all(|n| draw.contains(n)));
        if seen {
            continue;
        }
        let score: u32 = numbers.iter().map(|&n| next.get(n)).sum();
        let context_rate = score as f64 / denominator * 100.0;
        if !filter.accepts(context_rate) {
            continue;
        }
        numbers.sort();
        results.push(NovelCombination {
            numbers,
            count: 0,
            context_rate,
            global_rate: 0.0,
        });
    }

    results.sort_by(|a, b| b.context_rate.total_cmp(&a.context_rate));
    results.truncate(limit);
    debug!(ranked = ranked.len(), kept = results.len(), "combinaisons inédites");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::make_test_history;

    fn sample() -> DrawHistory {
        make_test_history(&[
            (1, "1,2,3,4,5,6"),
            (2, "1,2,3,4,5,7"),
            (3, "1,2,3,8,9,10"),
            (4, "1,2,11,12,13,14"),
        ])
    }

    #[test]
    fn test_never_subset_of_history() {
        let history = sample();
        let draws: Vec<Vec<u8>> = history
            .records()
            .iter()
            .map(|d| parser::parse(&d.result, Product::Mega645))
            .collect();
        let results = predict_novel(&history, Product::Mega645, TrendFilter::All, 100);
        assert!(!results.is_empty());
        for r in &results {
            assert_eq!(r.numbers.len(), 6);
            assert_eq!(r.count, 0);
            assert!(!draws.iter().any(|d| r.numbers.iter().all(|n| d.contains(n))));
        }
    }

    #[test]
    fn test_context_rate_sorted() {
        let results = predict_novel(&sample(), Product::Mega645, TrendFilter::Above, 100);
        assert!(results.windows(2).all(|w| w[0].context_rate >= w[1].context_rate));
        // 1 et 2 sortent dans les trois tirages « suivants »
        assert!(results[0].numbers.starts_with(&[1, 2]));
    }

    #[test]
    fn test_context_rate_value() {
        // Suivants : [1..5,7], [1,2,3,8,9,10], [1,2,11..14] ; 1 et 2 : 3, 3 : 2, autres : 1
        let results = predict_novel(&sample(), Product::Mega645, TrendFilter::All, 100);
        let top = &results[0];
        // [1,2,3,4,5,7] est le tirage 2, écarté
        assert_eq!(top.numbers, vec![1, 2, 3, 4, 5, 8]);
        assert!((top.context_rate - 11.0 / 24.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_below_filter_always_empty() {
        assert!(predict_novel(&sample(), Product::Mega645, TrendFilter::Below, 100).is_empty());
    }

    #[test]
    fn test_needs_two_draws() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6")]);
        assert!(predict_novel(&history, Product::Mega645, TrendFilter::All, 10).is_empty());
    }

    #[test]
    fn test_power_product_uses_seven_numbers() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6,7"), (2, "8,9,10,11,12,13,14"), (3, "1,9,17,25,33,41,50")]);
        let results = predict_novel(&history, Product::Power655, TrendFilter::All, 5);
        assert!(results.iter().all(|r| r.numbers.len() == 7));
    }

    #[test]
    fn test_candidate_cap_and_limit() {
        let results = predict_novel_with(&sample(), Product::Mega645, TrendFilter::All, 3, 10, &CancelToken::new());
        assert!(results.len() <= 3);
    }
}
