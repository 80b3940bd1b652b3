//! Générateur congruentiel linéaire reproductible.
//!
//! `state = (state × 1664525 + 1013904223) mod 2^32`, sortie `state / 2^32`.
//! La séquence doit rester identique au bit près pour une même graine :
//! les numéros "chance" du jour en dépendent.

use chrono::{Datelike, NaiveDate};

use crate::models::Product;

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

#[derive(Debug, Clone)]
pub struct DeterministicRng {
    state: u32,
}

impl DeterministicRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Graine dérivée d'une chaîne via le hachage glissant 32 bits.
    pub fn from_text(seed: &str) -> Self {
        Self::new(rolling_hash(seed).unsigned_abs())
    }

    pub fn reseed(&mut self, seed: u32) {
        self.state = seed;
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Prochaine valeur dans `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state as f64 / MODULUS
    }

    /// Prochain numéro dans `[1, max]`.
    pub fn next_number(&mut self, max: u8) -> u8 {
        (self.next_f64() * max as f64).floor() as u8 + 1
    }

    /// `count` numéros distincts dans `[1, max]` par rejet, triés.
    pub fn distinct_numbers(&mut self, count: usize, max: u8) -> Vec<u8> {
        let count = count.min(max as usize);
        let mut picked = Vec::with_capacity(count);
        while picked.len() < count {
            let n = self.next_number(max);
            if !picked.contains(&n) {
                picked.push(n);
            }
        }
        picked.sort();
        picked
    }
}

/// `hash = (hash << 5) - hash + code` sur les unités UTF-16, tronqué en entier signé 32 bits.
pub fn rolling_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(unit as i32)
    })
}

/// Seed déterministe basé sur une date (YYYYMMDD).
pub fn date_seed(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

/// Numéros "chance" du jour : même date + même tirage de référence ⇒ mêmes numéros.
/// Le 6/55 en produit sept (numéro power compris).
pub fn lucky_numbers(product: Product, date: NaiveDate, term_id: Option<u32>) -> Vec<u8> {
    let mut seed = date_seed(date);
    if let Some(term) = term_id.filter(|&t| t != 0) {
        seed ^= term;
    }
    DeterministicRng::new(seed).distinct_numbers(product.draw_size(), product.max_number())
}
