use std::collections::BTreeMap;

use serde::Serialize;

use crate::history::DrawHistory;
use crate::models::{DrawRecord, Product};
use crate::parser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
    /// count / fenêtre × 100
    pub probability: f64,
    /// Index du tirage le plus récent contenant le numéro (0 = dernier tirage).
    pub last_seen: Option<usize>,
}

/// Table dense sur `[1, max]` : un numéro jamais tiré a un compte nul, il n'est pas omis.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyTable {
    pub window: usize,
    entries: Vec<NumberFrequency>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[NumberFrequency] {
        &self.entries
    }

    pub fn get(&self, number: u8) -> Option<&NumberFrequency> {
        (number as usize)
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
    }

    pub fn count(&self, number: u8) -> u32 {
        self.get(number).map(|f| f.count).unwrap_or(0)
    }

    pub fn total_count(&self) -> u32 {
        self.entries.iter().map(|f| f.count).sum()
    }

    /// Aucune donnée exploitable (fenêtre vide ou aucun numéro compté).
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Numéros classés par fréquence ; à égalité, le plus petit numéro d'abord.
    pub fn ranked(&self, hottest_first: bool) -> Vec<u8> {
        let mut sorted: Vec<&NumberFrequency> = self.entries.iter().collect();
        if hottest_first {
            sorted.sort_by(|a, b| b.count.cmp(&a.count));
        } else {
            sorted.sort_by(|a, b| a.count.cmp(&b.count));
        }
        sorted.into_iter().map(|f| f.number).collect()
    }

    /// Nombre de tirages depuis la dernière sortie ; la fenêtre entière si jamais sorti.
    pub fn gap(&self, number: u8) -> usize {
        self.get(number)
            .and_then(|f| f.last_seen)
            .unwrap_or(self.window)
    }
}

/// Fréquences sur les `window` tirages les plus récents.
pub fn frequencies(history: &DrawHistory, window: usize, product: Product) -> FrequencyTable {
    frequency_table(history.window(window), product)
}

pub fn frequency_table(draws: &[DrawRecord], product: Product) -> FrequencyTable {
    let max = product.max_number();
    let mut entries: Vec<NumberFrequency> = (1..=max)
        .map(|n| NumberFrequency {
            number: n,
            count: 0,
            probability: 0.0,
            last_seen: None,
        })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        for n in parser::parse(&draw.result, product) {
            let entry = &mut entries[(n - 1) as usize];
            entry.count += 1;
            if entry.last_seen.is_none() {
                entry.last_seen = Some(i);
            }
        }
    }

    let window = draws.len();
    if window > 0 {
        for entry in &mut entries {
            entry.probability = entry.count as f64 / window as f64 * 100.0;
        }
    }

    FrequencyTable { window, entries }
}

/// Paires non ordonnées co-sorties, triées par compte décroissant puis par paire croissante.
pub fn pair_frequencies(draws: &[DrawRecord], product: Product) -> Vec<((u8, u8), u32)> {
    let mut counts: BTreeMap<(u8, u8), u32> = BTreeMap::new();
    for draw in draws {
        let nums = parser::parse(&draw.result, product);
        for i in 0..nums.len() {
            for j in (i + 1)..nums.len() {
                *counts.entry((nums[i], nums[j])).or_insert(0) += 1;
            }
        }
    }
    let mut pairs: Vec<((u8, u8), u32)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs
}

/// Occurrences du dernier chiffre (`n mod 10`) de chaque numéro tiré.
pub fn last_digit_frequencies(draws: &[DrawRecord], product: Product) -> [u32; 10] {
    let mut digits = [0u32; 10];
    for draw in draws {
        for n in parser::parse(&draw.result, product) {
            digits[(n % 10) as usize] += 1;
        }
    }
    digits
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceStreak {
    pub number: u8,
    /// Tirages consécutifs sans le numéro, jusqu'au plus récent.
    pub current: u32,
    pub longest: u32,
    /// Absence qui a précédé la dernière sortie.
    pub previous: Option<u32>,
}

pub fn absence_streaks(history: &DrawHistory, product: Product) -> Vec<AbsenceStreak> {
    let mut streaks: Vec<AbsenceStreak> = (1..=product.max_number())
        .map(|n| AbsenceStreak {
            number: n,
            current: 0,
            longest: 0,
            previous: None,
        })
        .collect();

    for draw in history.chronological() {
        let nums = parser::parse(&draw.result, product);
        for streak in &mut streaks {
            if nums.contains(&streak.number) {
                streak.previous = Some(streak.current);
                streak.current = 0;
            } else {
                streak.current += 1;
            }
            streak.longest = streak.longest.max(streak.current);
        }
    }

    streaks
}
