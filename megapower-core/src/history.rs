use std::collections::HashSet;

use crate::models::{Combination, DrawRecord, Product};
use crate::parser;

/// Historique immuable des tirages d'un produit, trié par id décroissant
/// (records[0] = tirage le plus récent).
#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    records: Vec<DrawRecord>,
}

impl DrawHistory {
    /// Trie par id décroissant et ne garde que la première occurrence de chaque id.
    pub fn new(mut records: Vec<DrawRecord>) -> Self {
        records.sort_by(|a, b| b.id.cmp(&a.id));
        let mut seen = HashSet::new();
        records.retain(|r| seen.insert(r.id));
        Self { records }
    }

    pub fn records(&self) -> &[DrawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&DrawRecord> {
        self.records.first()
    }

    /// Les `size` tirages les plus récents (moins si l'historique est plus court).
    pub fn window(&self, size: usize) -> &[DrawRecord] {
        &self.records[..size.min(self.records.len())]
    }

    /// Ordre chronologique (id croissant), pour les algorithmes qui en ont besoin.
    pub fn chronological(&self) -> impl DoubleEndedIterator<Item = &DrawRecord> + ExactSizeIterator {
        self.records.iter().rev()
    }

    /// Tirages dont les six numéros principaux sont exactement `combination`.
    pub fn find_exact(&self, combination: &Combination, product: Product) -> Vec<&DrawRecord> {
        self.records
            .iter()
            .filter(|r| parser::parse(&r.result, product).as_slice() == combination.numbers().as_slice())
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn make_test_history(results: &[(u32, &str)]) -> DrawHistory {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    DrawHistory::new(
        results
            .iter()
            .map(|&(id, result)| DrawRecord::new(id, base + chrono::Days::new(id as u64 * 2), result))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_descending() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6"), (3, "7,8,9,10,11,12"), (2, "1,2,3,4,5,7")]);
        let ids: Vec<u32> = history.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(history.latest().map(|r| r.id), Some(3));
    }

    #[test]
    fn test_duplicate_ids_removed() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6"), (1, "7,8,9,10,11,12")]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_window_clamped() {
        let history = make_test_history(&[(1, "1,2,3,4,5,6"), (2, "1,2,3,4,5,7")]);
        assert_eq!(history.window(10).len(), 2);
        assert_eq!(history.window(1)[0].id, 2);
        assert!(history.window(0).is_empty());
    }

    #[test]
    fn test_chronological() {
        let history = make_test_history(&[(5, "1,2,3,4,5,6"), (9, "1,2,3,4,5,7"), (7, "1,2,3,4,5,8")]);
        let ids: Vec<u32> = history.chronological().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 7, 9]);
    }

    #[test]
    fn test_find_exact() {
        let history = make_test_history(&[
            (1, "06,05,04,03,02,01"),
            (2, "1,2,3,4,5,7"),
            (3, "1,2,3,4,5,6,9"),
        ]);
        let combo = Combination::new(&[1, 2, 3, 4, 5, 6], 55).unwrap();
        let hits = history.find_exact(&combo, Product::Power655);
        let ids: Vec<u32> = hits.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
