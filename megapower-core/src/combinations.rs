/// Parcourt les combinaisons de `k` éléments de `items` dans l'ordre lexicographique
/// des indices. `visit` renvoie `false` pour interrompre le parcours.
///
/// Renvoie `false` si le parcours a été interrompu.
pub(crate) fn for_each_combination<F>(items: &[u8], k: usize, mut visit: F) -> bool
where
    F: FnMut(&[u8]) -> bool,
{
    if k > items.len() {
        return true;
    }
    let mut current = Vec::with_capacity(k);
    walk(items, k, 0, &mut current, &mut visit)
}

fn walk<F>(items: &[u8], k: usize, start: usize, current: &mut Vec<u8>, visit: &mut F) -> bool
where
    F: FnMut(&[u8]) -> bool,
{
    if current.len() == k {
        return visit(current);
    }
    let remaining = k - current.len();
    for i in start..=(items.len() - remaining) {
        current.push(items[i]);
        let keep_going = walk(items, k, i + 1, current, visit);
        current.pop();
        if !keep_going {
            return false;
        }
    }
    true
}
