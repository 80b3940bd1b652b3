use anyhow::{bail, Result};
use megapower_core::parser;
use megapower_core::{DrawRecord, Product};

/// Un tirage importé doit porter exactement ses 6 (ou 7) numéros, dans les bornes
/// du produit, sans doublon parmi les six principaux.
pub fn validate_record(record: &DrawRecord, product: Product) -> Result<()> {
    let numbers = parser::parse_draw(&record.result, product);
    if numbers.len() != product.draw_size() {
        bail!(
            "Tirage {} : {} numéros valides dans '{}' (attendu {}, bornes 1-{})",
            record.term(),
            numbers.len(),
            record.result,
            product.draw_size(),
            product.max_number()
        );
    }
    let main = &numbers[..product.main_count()];
    for i in 0..main.len() {
        for j in (i + 1)..main.len() {
            if main[i] == main[j] {
                bail!("Tirage {} : numéro en double {}", record.term(), main[i]);
            }
        }
    }
    Ok(())
}
