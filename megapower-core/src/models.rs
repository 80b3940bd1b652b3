use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Les deux jeux analysés : Mega 6/45 et Power 6/55 (6 numéros + 1 numéro "power").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Product {
    #[serde(rename = "645")]
    #[value(name = "645")]
    Mega645,
    #[serde(rename = "655")]
    #[value(name = "655")]
    Power655,
}

impl Product {
    pub fn tag(&self) -> &'static str {
        match self {
            Product::Mega645 => "645",
            Product::Power655 => "655",
        }
    }

    pub fn max_number(&self) -> u8 {
        match self {
            Product::Mega645 => 45,
            Product::Power655 => 55,
        }
    }

    /// Nombre de numéros principaux par tirage.
    pub fn main_count(&self) -> usize {
        6
    }

    /// Nombre total de valeurs publiées par tirage (numéro power inclus).
    pub fn draw_size(&self) -> usize {
        match self {
            Product::Mega645 => 6,
            Product::Power655 => 7,
        }
    }

    pub fn has_power_number(&self) -> bool {
        self.draw_size() > self.main_count()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Product {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "645" => Ok(Product::Mega645),
            "655" => Ok(Product::Power655),
            other => Err(CoreError::UnknownProduct(other.to_string())),
        }
    }
}

/// Un tirage tel que fourni par la source, déjà normalisé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub id: u32,
    pub date: NaiveDate,
    pub result: String,
    pub jackpot1: u64,
    pub jackpot2: u64,
}

impl DrawRecord {
    pub fn new(id: u32, date: NaiveDate, result: impl Into<String>) -> Self {
        Self {
            id,
            date,
            result: result.into(),
            jackpot1: 0,
            jackpot2: 0,
        }
    }

    /// Libellé court du tirage, ex. `#01234`.
    pub fn term(&self) -> String {
        format!("#{:05}", self.id)
    }
}

/// Six numéros distincts dans `[1, max]`, toujours triés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Combination([u8; 6]);

impl Combination {
    pub const SIZE: usize = 6;

    pub fn new(numbers: &[u8], max_number: u8) -> CoreResult<Self> {
        if numbers.len() != Self::SIZE {
            return Err(CoreError::InvalidCombination(format!(
                "{} numéros reçus, 6 attendus",
                numbers.len()
            )));
        }
        for &n in numbers {
            if n < 1 || n > max_number {
                return Err(CoreError::InvalidCombination(format!(
                    "numéro {} hors limites (1-{})",
                    n, max_number
                )));
            }
        }
        for i in 0..numbers.len() {
            for j in (i + 1)..numbers.len() {
                if numbers[i] == numbers[j] {
                    return Err(CoreError::InvalidCombination(format!(
                        "numéro en double : {}",
                        numbers[i]
                    )));
                }
            }
        }
        Ok(Self::from_picks(numbers))
    }

    /// Construit sans validation à partir de six tirages distincts déjà bornés.
    pub(crate) fn from_picks(picks: &[u8]) -> Self {
        debug_assert!(picks.len() >= Self::SIZE);
        let mut arr = [0u8; 6];
        for (slot, &n) in arr.iter_mut().zip(picks) {
            *slot = n;
        }
        arr.sort();
        Self(arr)
    }

    pub fn numbers(&self) -> &[u8; 6] {
        &self.0
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.contains(&n)
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    /// Vrai si les six numéros figurent tous dans `draw`.
    pub fn is_subset_of(&self, draw: &[u8]) -> bool {
        self.0.iter().all(|n| draw.contains(n))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:02}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_bounds() {
        assert_eq!(Product::Mega645.max_number(), 45);
        assert_eq!(Product::Power655.max_number(), 55);
        assert_eq!(Product::Mega645.draw_size(), 6);
        assert_eq!(Product::Power655.draw_size(), 7);
        assert!(Product::Power655.has_power_number());
        assert!(!Product::Mega645.has_power_number());
    }

    #[test]
    fn test_product_from_tag() {
        assert_eq!("645".parse::<Product>().unwrap(), Product::Mega645);
        assert_eq!(" 655 ".parse::<Product>().unwrap(), Product::Power655);
        assert!("649".parse::<Product>().is_err());
        assert_eq!(Product::Power655.to_string(), "655");
    }

    #[test]
    fn test_combination_sorted() {
        let combo = Combination::new(&[40, 3, 17, 8, 22, 1], 45).unwrap();
        assert_eq!(combo.numbers(), &[1, 3, 8, 17, 22, 40]);
        assert_eq!(combo.sum(), 91);
        assert_eq!(combo.to_string(), "01 - 03 - 08 - 17 - 22 - 40");
    }

    #[test]
    fn test_combination_wrong_length() {
        assert!(Combination::new(&[1, 2, 3, 4, 5], 45).is_err());
        assert!(Combination::new(&[1, 2, 3, 4, 5, 6, 7], 45).is_err());
    }

    #[test]
    fn test_combination_duplicates() {
        assert!(Combination::new(&[1, 1, 3, 4, 5, 6], 45).is_err());
    }

    #[test]
    fn test_combination_out_of_range() {
        assert!(Combination::new(&[0, 2, 3, 4, 5, 6], 45).is_err());
        assert!(Combination::new(&[1, 2, 3, 4, 5, 46], 45).is_err());
        assert!(Combination::new(&[1, 2, 3, 4, 5, 55], 55).is_ok());
    }

    #[test]
    fn test_combination_subset() {
        let combo = Combination::new(&[1, 2, 3, 4, 5, 6], 45).unwrap();
        assert!(combo.is_subset_of(&[6, 5, 4, 3, 2, 1, 9]));
        assert!(!combo.is_subset_of(&[1, 2, 3, 4, 5, 7]));
    }
}
