//! Extraction des numéros depuis la chaîne `result` d'un tirage.
//!
//! Les jetons non numériques sont ignorés sans erreur. Pour le 6/55 la
//! troncature aux six premiers jetons se fait AVANT le tri : sinon un petit
//! numéro power déloge le plus grand numéro principal.

use crate::models::Product;

fn numeric_tokens(result: &str) -> impl Iterator<Item = u8> + '_ {
    result
        .split([',', '-'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<u8>().ok())
}

/// Numéros principaux triés, chacun dans `[1, max]`.
pub fn parse(result: &str, product: Product) -> Vec<u8> {
    let max = product.max_number();
    let mut numbers: Vec<u8> = numeric_tokens(result)
        .take(product.main_count())
        .filter(|&n| n >= 1 && n <= max)
        .collect();
    numbers.sort();
    numbers
}

/// Toutes les valeurs publiées (numéro power compris), dans l'ordre de la source.
pub fn parse_draw(result: &str, product: Product) -> Vec<u8> {
    let max = product.max_number();
    numeric_tokens(result)
        .take(product.draw_size())
        .filter(|&n| n >= 1 && n <= max)
        .collect()
}

/// Le 7e numéro d'un tirage 6/55 ; `None` pour le 6/45.
pub fn power_number(result: &str, product: Product) -> Option<u8> {
    if !product.has_power_number() {
        return None;
    }
    numeric_tokens(result)
        .nth(product.main_count())
        .filter(|&n| n >= 1 && n <= product.max_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commas() {
        assert_eq!(parse("05,12,23,34,41,44", Product::Mega645), vec![5, 12, 23, 34, 41, 44]);
    }

    #[test]
    fn test_parse_hyphens_and_spaces() {
        assert_eq!(parse(" 44 - 05 - 12 ,23, 34-41 ", Product::Mega645), vec![5, 12, 23, 34, 41, 44]);
    }

    #[test]
    fn test_parse_drops_garbage() {
        assert_eq!(parse("1,x,3,,4.5,7", Product::Mega645), vec![1, 3, 7]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("", Product::Mega645).is_empty());
        assert!(parse(" , - ", Product::Power655).is_empty());
    }

    #[test]
    fn test_parse_truncates_before_sort() {
        // Numéro power = 3 : il ne doit pas remplacer le 55.
        let nums = parse("10,20,30,40,50,55,3", Product::Power655);
        assert_eq!(nums, vec![10, 20, 30, 40, 50, 55]);
    }

    #[test]
    fn test_parse_out_of_range_dropped() {
        assert_eq!(parse("0,1,2,46,3", Product::Mega645), vec![1, 2, 3]);
        assert_eq!(parse("0,1,2,46,3", Product::Power655), vec![1, 2, 3, 46]);
    }

    #[test]
    fn test_parse_draw_keeps_power() {
        assert_eq!(parse_draw("10,20,30,40,50,55,3", Product::Power655), vec![10, 20, 30, 40, 50, 55, 3]);
        assert_eq!(parse_draw("1,2,3,4,5,6,7", Product::Mega645), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_power_number() {
        assert_eq!(power_number("10,20,30,40,50,55,3", Product::Power655), Some(3));
        assert_eq!(power_number("10,20,30,40,50,55", Product::Power655), None);
        assert_eq!(power_number("1,2,3,4,5,6,7", Product::Mega645), None);
    }
}
