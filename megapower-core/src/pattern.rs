//! Formes dessinées par les numéros d'un tirage sur une grille de 8 colonnes.
//!
//! Le numéro `n` occupe la case `((n - 1) mod 8, (n - 1) div 8)`. Les règles de
//! classement sont testées dans un ordre fixe, la première qui s'applique gagne.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::history::DrawHistory;
use crate::models::{Combination, Product};
use crate::parser;

pub const NUMBERS_PER_ROW: u8 = 8;
/// En dessous, un tirage est « Scattered ».
pub const MIN_SHAPE_POINTS: usize = 3;
/// Minimum pour les formes circulaire et zigzag.
pub const MIN_CURVE_POINTS: usize = 4;
/// Colonnes (ou lignes) distinctes tolérées pour une ligne verticale (ou horizontale).
pub const MAX_LINE_SPREAD: usize = 2;
/// Part des paires consécutives de même pente au-delà de laquelle la forme est diagonale.
pub const DIAGONAL_SLOPE_RATIO: f64 = 0.6;
/// Variance maximale des distances au centre pour une forme circulaire.
pub const CIRCULAR_VARIANCE_MAX: f64 = 2.0;
pub const ZIGZAG_MIN_TURNS: usize = 2;
/// Lignes laissées sous le départ d'une diagonale générée.
const DIAGONAL_ROW_MARGIN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPoint {
    pub x: u8,
    pub y: u8,
}

pub fn to_point(number: u8) -> GridPoint {
    let index = number.saturating_sub(1);
    GridPoint {
        x: index % NUMBERS_PER_ROW,
        y: index / NUMBERS_PER_ROW,
    }
}

pub fn to_number(point: GridPoint) -> u8 {
    point.y * NUMBERS_PER_ROW + point.x + 1
}

fn total_rows(product: Product) -> u8 {
    product.max_number().div_ceil(NUMBERS_PER_ROW)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    Vertical,
    Horizontal,
    Diagonal,
    Circular,
    Zigzag,
    Complex,
    Scattered,
}

impl Shape {
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Vertical => "Ligne verticale",
            Shape::Horizontal => "Ligne horizontale",
            Shape::Diagonal => "Diagonale",
            Shape::Circular => "Cercle",
            Shape::Zigzag => "Zigzag",
            Shape::Complex => "Forme complexe",
            Shape::Scattered => "Dispersé",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Shape::Vertical => "Vertical Line",
            Shape::Horizontal => "Horizontal Line",
            Shape::Diagonal => "Diagonal Line",
            Shape::Circular => "Circular",
            Shape::Zigzag => "Zigzag",
            Shape::Complex => "Complex Pattern",
            Shape::Scattered => "Scattered",
        };
        f.write_str(label)
    }
}

pub fn classify(points: &[GridPoint]) -> Shape {
    if points.len() < MIN_SHAPE_POINTS {
        return Shape::Scattered;
    }
    if distinct(points.iter().map(|p| p.x)) <= MAX_LINE_SPREAD {
        return Shape::Vertical;
    }
    if distinct(points.iter().map(|p| p.y)) <= MAX_LINE_SPREAD {
        return Shape::Horizontal;
    }

    let mut by_x = points.to_vec();
    by_x.sort_by_key(|p| p.x);

    if is_diagonal(&by_x) {
        Shape::Diagonal
    } else if is_circular(points) {
        Shape::Circular
    } else if is_zigzag(&by_x) {
        Shape::Zigzag
    } else {
        Shape::Complex
    }
}

fn distinct(values: impl Iterator<Item = u8>) -> usize {
    let mut seen: Vec<u8> = values.collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

fn dy(a: &GridPoint, b: &GridPoint) -> i16 {
    b.y as i16 - a.y as i16
}

fn is_diagonal(by_x: &[GridPoint]) -> bool {
    let steps = by_x.len() - 1;
    let rising = by_x.windows(2).filter(|w| dy(&w[0], &w[1]) > 0).count();
    let falling = by_x.windows(2).filter(|w| dy(&w[0], &w[1]) < 0).count();
    let needed = steps as f64 * DIAGONAL_SLOPE_RATIO;
    rising as f64 > needed || falling as f64 > needed
}

fn is_circular(points: &[GridPoint]) -> bool {
    if points.len() < MIN_CURVE_POINTS {
        return false;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let distances: Vec<f64> = points
        .iter()
        .map(|p| ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt())
        .collect();
    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    variance < CIRCULAR_VARIANCE_MAX
}

fn is_zigzag(by_x: &[GridPoint]) -> bool {
    if by_x.len() < MIN_CURVE_POINTS {
        return false;
    }
    // Un pas sans montée compte comme une descente
    let directions: Vec<bool> = by_x.windows(2).map(|w| dy(&w[0], &w[1]) > 0).collect();
    let turns = directions.windows(2).filter(|d| d[0] != d[1]).count();
    turns >= ZIGZAG_MIN_TURNS
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawPattern {
    pub draw_id: u32,
    pub numbers: Vec<u8>,
    pub points: Vec<GridPoint>,
    pub shape: Shape,
}

/// Forme des `window` derniers tirages, du plus récent au plus ancien.
pub fn analyze(history: &DrawHistory, product: Product, window: usize) -> Vec<DrawPattern> {
    history
        .window(window)
        .iter()
        .map(|draw| {
            let numbers = parser::parse(&draw.result, product);
            let points: Vec<GridPoint> = numbers.iter().map(|&n| to_point(n)).collect();
            DrawPattern {
                draw_id: draw.id,
                shape: classify(&points),
                numbers,
                points,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternPrediction {
    pub shape: Shape,
    /// Au plus six numéros croissants ; une colonne ou une diagonale peut en compter moins.
    pub numbers: Vec<u8>,
}

/// Forme majoritaire (la première rencontrée à égalité) et numéros qui la réalisent.
pub fn predict<R: Rng>(patterns: &[DrawPattern], product: Product, rng: &mut R) -> Option<PatternPrediction> {
    let mut tally: Vec<(Shape, usize)> = Vec::new();
    for pattern in patterns {
        match tally.iter_mut().find(|(s, _)| *s == pattern.shape) {
            Some((_, count)) => *count += 1,
            None => tally.push((pattern.shape, 1)),
        }
    }
    let mut best: Option<(Shape, usize)> = None;
    for (shape, count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((shape, count));
        }
    }
    let (shape, _) = best?;
    Some(PatternPrediction {
        shape,
        numbers: numbers_for_shape(shape, product, rng),
    })
}

pub fn numbers_for_shape<R: Rng>(shape: Shape, product: Product, rng: &mut R) -> Vec<u8> {
    let max = product.max_number();
    let rows = total_rows(product);
    let mut numbers: Vec<u8> = match shape {
        Shape::Vertical => {
            let col = rng.random_range(0..NUMBERS_PER_ROW);
            (0..rows)
                .map(|row| to_number(GridPoint { x: col, y: row }))
                .filter(|&n| n <= max)
                .collect()
        }
        Shape::Horizontal => {
            let row = rng.random_range(0..rows);
            (0..NUMBERS_PER_ROW)
                .map(|col| to_number(GridPoint { x: col, y: row }))
                .filter(|&n| n <= max)
                .collect()
        }
        Shape::Diagonal => {
            let start = rng.random_range(0..rows.saturating_sub(DIAGONAL_ROW_MARGIN).max(1));
            (0..Combination::SIZE as u8)
                .map(|i| start as u16 * NUMBERS_PER_ROW as u16 + i as u16 * (NUMBERS_PER_ROW as u16 + 1) + 1)
                .filter(|&n| n <= max as u16)
                .map(|n| n as u8)
                .collect()
        }
        _ => {
            let mut picks = Vec::with_capacity(Combination::SIZE);
            while picks.len() < Combination::SIZE {
                let n = rng.random_range(1..=max);
                if !picks.contains(&n) {
                    picks.push(n);
                }
            }
            picks
        }
    };
    numbers.truncate(Combination::SIZE);
    numbers.sort();
    numbers
}
