//! Groupes de numéros sortis ensemble autour d'un numéro pivot.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::combinations::for_each_combination;
use crate::history::DrawHistory;
use crate::models::{DrawRecord, Product};
use crate::parser;
use crate::session::CancelToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOccurrence {
    pub date: NaiveDate,
    pub draw_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// Triés par ordre croissant, pivot inclus.
    pub numbers: Vec<u8>,
    /// Du plus récent au plus ancien.
    pub occurrences: Vec<GroupOccurrence>,
    /// Jours entre sorties consécutives, dans l'ordre chronologique.
    pub distances: Vec<u32>,
}

impl Group {
    pub fn key(&self) -> String {
        group_key(&self.numbers)
    }

    pub fn count(&self) -> usize {
        self.occurrences.len()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupReport {
    pub groups: Vec<Group>,
    /// Groupes distincts trouvés avant troncature.
    pub total: usize,
}

fn group_key(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Numéros du tirage hors pivot, ou `None` si le tirage ne peut pas former de groupe.
fn companions(draw: &DrawRecord, anchor: u8, group_size: usize, product: Product) -> Option<Vec<u8>> {
    let nums = parser::parse(&draw.result, product);
    if group_size == 0 || nums.len() < group_size || !nums.contains(&anchor) {
        return None;
    }
    Some(nums.into_iter().filter(|&n| n != anchor).collect())
}

fn with_anchor(others: &[u8], anchor: u8) -> Vec<u8> {
    let mut numbers = others.to_vec();
    numbers.push(anchor);
    numbers.sort();
    numbers
}

pub fn find_groups(
    history: &DrawHistory,
    anchor: u8,
    group_size: usize,
    product: Product,
    limit: usize,
) -> GroupReport {
    find_groups_cancellable(history, anchor, group_size, product, limit, &CancelToken::new())
}

/// Groupes de `group_size` numéros contenant `anchor`, classés par nombre de sorties.
pub fn find_groups_cancellable(
    history: &DrawHistory,
    anchor: u8,
    group_size: usize,
    product: Product,
    limit: usize,
    cancel: &CancelToken,
) -> GroupReport {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for draw in history.records() {
        if cancel.is_cancelled() {
            debug!(groups = groups.len(), "recherche de groupes annulée");
            break;
        }
        let Some(others) = companions(draw, anchor, group_size, product) else {
            continue;
        };
        for_each_combination(&others, group_size - 1, |subset| {
            let numbers = with_anchor(subset, anchor);
            let key = group_key(&numbers);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group {
                    numbers,
                    occurrences: Vec::new(),
                    distances: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].occurrences.push(GroupOccurrence {
                date: draw.date,
                draw_id: draw.id,
            });
            true
        });
    }

    for group in &mut groups {
        group.occurrences.sort_by_key(|o| (o.date, o.draw_id));
        group.distances = group
            .occurrences
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days().unsigned_abs() as u32)
            .collect();
        group.occurrences.reverse();
    }

    let total = groups.len();
    groups.sort_by(|a, b| b.count().cmp(&a.count()));
    groups.truncate(limit);
    debug!(anchor, group_size, total, "groupes trouvés");

    GroupReport { groups, total }
}

/// Nombre de groupes distincts, sans constituer les listes de tirages.
pub fn count_groups(history: &DrawHistory, anchor: u8, group_size: usize, product: Product) -> usize {
    let mut keys: HashSet<Vec<u8>> = HashSet::new();
    for draw in history.records() {
        let Some(others) = companions(draw, anchor, group_size, product) else {
            continue;
        };
        for_each_combination(&others, group_size - 1, |subset| {
            keys.insert(with_anchor(subset, anchor));
            true
        });
    }
    keys.len()
}
