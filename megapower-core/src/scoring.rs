//! Score heuristique d'une grille de six numéros (0-99).
//!
//! Trois composantes : fréquence (40), répartition pair/impair et bas/haut (30),
//! somme des numéros (30). La frontière bas/haut vaut 45 / 2 quel que soit le
//! produit, y compris pour le 6/55.

use serde::Serialize;

use crate::error::CoreResult;
use crate::frequency::{frequencies, FrequencyTable};
use crate::history::DrawHistory;
use crate::models::{Combination, Product};

pub const SCORING_WINDOW: usize = 100;
pub const LOW_HIGH_BOUNDARY: f64 = 45.0 / 2.0;

const FREQUENCY_WEIGHT: f64 = 40.0;
const FREQUENCY_DIVISOR: f64 = 80.0;
const BALANCE_STEP: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub frequency: f64,
    pub even_odd: u32,
    pub low_high: u32,
    pub sum: u32,
    pub total: u8,
}

/// Score précalculé sur une fenêtre d'historique ; réutilisable pour de nombreuses grilles.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: FrequencyTable,
    product: Product,
}

impl ScoringEngine {
    pub fn new(history: &DrawHistory, product: Product) -> Self {
        Self::with_window(history, product, SCORING_WINDOW)
    }

    pub fn with_window(history: &DrawHistory, product: Product, window: usize) -> Self {
        Self {
            table: frequencies(history, window, product),
            product,
        }
    }

    pub fn frequency_table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Valide puis note des numéros bruts.
    pub fn score_numbers(&self, numbers: &[u8]) -> CoreResult<u8> {
        let combination = Combination::new(numbers, self.product.max_number())?;
        Ok(self.score(&combination))
    }

    pub fn score(&self, combination: &Combination) -> u8 {
        self.breakdown(combination).total
    }

    pub fn breakdown(&self, combination: &Combination) -> ScoreBreakdown {
        let numbers = combination.numbers();

        let occurrences: u32 = numbers.iter().map(|&n| self.table.count(n)).sum();
        let frequency = (occurrences as f64 / FREQUENCY_DIVISOR * FREQUENCY_WEIGHT).min(FREQUENCY_WEIGHT);

        let evens = numbers.iter().filter(|&&n| n % 2 == 0).count() as i32;
        let even_odd = balance_score(evens);

        let lows = numbers.iter().filter(|&&n| n as f64 <= LOW_HIGH_BOUNDARY).count() as i32;
        let low_high = balance_score(lows);

        let sum = sum_score(combination.sum());

        let raw = frequency + (even_odd + low_high + sum) as f64;
        let total = if raw >= 100.0 { 99 } else { raw.round() as u8 };

        ScoreBreakdown {
            frequency,
            even_odd,
            low_high,
            sum,
            total,
        }
    }
}

/// Score d'une grille sur les 100 derniers tirages.
pub fn score(numbers: &[u8], history: &DrawHistory, product: Product) -> CoreResult<u8> {
    ScoringEngine::new(history, product).score_numbers(numbers)
}

fn balance_score(count: i32) -> u32 {
    ((3 - (3 - count).abs()) * BALANCE_STEP).max(0) as u32
}

fn sum_score(sum: u32) -> u32 {
    match sum {
        100..=200 => 30,
        80..=220 => 20,
        60..=240 => 10,
        _ => 0,
    }
}
