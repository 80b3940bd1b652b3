use chrono::NaiveDate;
use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use megapower_core::config::AnalysisConfig;
use megapower_core::frequency::{AbsenceStreak, FrequencyTable};
use megapower_core::generator::{Prediction, ScoredPrediction, Strategy};
use megapower_core::groups::GroupReport;
use megapower_core::parser;
use megapower_core::pattern::{DrawPattern, PatternPrediction};
use megapower_core::predictive::NovelCombination;
use megapower_core::probability::ProbabilityPick;
use megapower_core::scoring::ScoreBreakdown;
use megapower_core::{Combination, DrawRecord, Product};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// 12345678900 -> "12.345.678.900"
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

fn score_color(score: u8) -> Color {
    if score >= 70 {
        Color::Green
    } else if score >= 40 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn display_draws(draws: &[DrawRecord], product: Product) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut header = vec!["Tirage", "Date", "Numéros"];
    if product.has_power_number() {
        header.push("Power");
    }
    header.extend(["Jackpot 1", "Jackpot 2"]);
    let mut table = new_table(header);

    for draw in draws {
        let mut row = vec![
            draw.term(),
            draw.date.format("%d/%m/%Y").to_string(),
            format_numbers(&parser::parse(&draw.result, product)),
        ];
        if product.has_power_number() {
            row.push(
                parser::power_number(&draw.result, product)
                    .map(|n| format!("{:02}", n))
                    .unwrap_or_else(|| "—".to_string()),
            );
        }
        for jackpot in [draw.jackpot1, draw.jackpot2] {
            row.push(if jackpot > 0 { format_amount(jackpot) } else { "—".to_string() });
        }
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult, product: Product) {
    println!("Import terminé ({}) :", product);
    println!("  Total tirages lus : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(table_data: &FrequencyTable, product: Product) {
    println!(
        "\n📊 Fréquences {} sur les {} derniers tirages\n",
        product, table_data.window
    );

    let mut table = new_table(vec!["Numéro", "Fréquence", "Probabilité", "Retard"]);
    let mut sorted = table_data.entries().to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));

    for stat in &sorted {
        table.add_row(vec![
            format!("{:02}", stat.number),
            stat.count.to_string(),
            format!("{:.2} %", stat.probability),
            table_data.gap(stat.number).to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_streaks(streaks: &[AbsenceStreak], top: usize) {
    println!("\n⏳ Absences en cours\n");

    let mut table = new_table(vec!["Numéro", "Absence actuelle", "Absence précédente", "Record"]);
    let mut sorted = streaks.to_vec();
    sorted.sort_by(|a, b| b.current.cmp(&a.current));

    for streak in sorted.iter().take(top) {
        table.add_row(vec![
            format!("{:02}", streak.number),
            streak.current.to_string(),
            streak.previous.map(|p| p.to_string()).unwrap_or_else(|| "—".to_string()),
            streak.longest.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_score(combination: &Combination, breakdown: &ScoreBreakdown) {
    println!("\n🧮 Score de {}\n", combination);

    let mut table = new_table(vec!["Composante", "Points", "Maximum"]);
    table.add_row(vec!["Fréquence".to_string(), format!("{:.1}", breakdown.frequency), "40".to_string()]);
    table.add_row(vec!["Pair / impair".to_string(), breakdown.even_odd.to_string(), "15".to_string()]);
    table.add_row(vec!["Bas / haut".to_string(), breakdown.low_high.to_string(), "15".to_string()]);
    table.add_row(vec![
        format!("Somme ({})", combination.sum()),
        breakdown.sum.to_string(),
        "30".to_string(),
    ]);
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(breakdown.total).fg(score_color(breakdown.total)),
        Cell::new("99"),
    ]);
    println!("{table}");
}

pub fn display_predictions(predictions: &[ScoredPrediction], strategy: Strategy) {
    println!("\n🎲 Grilles ({})\n", strategy.label());

    let mut table = new_table(vec!["#", "Numéros", "Score", "Explication"]);
    for (i, p) in predictions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(p.combination.to_string()),
            Cell::new(p.score).fg(score_color(p.score)),
            Cell::new(&p.explanation),
        ]);
    }
    println!("{table}");
}

pub fn display_single_prediction(prediction: &Prediction, score: u8, strategy: Strategy) {
    println!("\n🎲 Grille ({})\n", strategy.label());
    println!("  {}   score {}", prediction.combination, score);
    println!("  {}", prediction.explanation);
}

pub fn display_groups(report: &GroupReport, anchor: u8, shown_dates: usize) {
    println!(
        "\n🔗 Groupes contenant {:02} : {} affichés sur {} trouvés\n",
        anchor,
        report.groups.len(),
        report.total
    );
    if report.groups.is_empty() {
        println!("Aucun groupe trouvé.");
        return;
    }

    let mut table = new_table(vec!["Groupe", "Sorties", "Dernières sorties", "Écarts (jours)"]);
    for group in &report.groups {
        let dates = group
            .occurrences
            .iter()
            .take(shown_dates)
            .map(|o| format!("{} #{:05}", o.date.format("%d/%m/%Y"), o.draw_id))
            .collect::<Vec<_>>()
            .join("\n");
        let distances = if group.distances.is_empty() {
            "—".to_string()
        } else {
            group.distances.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
        };
        table.add_row(vec![
            format_numbers(&group.numbers),
            group.count().to_string(),
            dates,
            distances,
        ]);
    }
    println!("{table}");
}

pub fn display_novel(results: &[NovelCombination]) {
    println!("\n🔮 Combinaisons jamais sorties\n");
    if results.is_empty() {
        println!("Aucune combinaison retenue.");
        return;
    }

    let mut table = new_table(vec!["#", "Numéros", "Taux de contexte", "Sorties"]);
    for (i, r) in results.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            format_numbers(&r.numbers),
            format!("{:.2} %", r.context_rate),
            r.count.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_probability_picks(picks: &[ProbabilityPick], limit: usize) {
    println!("\n🎯 Grilles pondérées inédites ({} retenues)\n", picks.len());

    let mut table = new_table(vec!["#", "Numéros", "Probabilité moy.", "Retard max", "Score"]);
    for (i, p) in picks.iter().take(limit).enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            p.combination.to_string(),
            format!("{:.2} %", p.avg_probability),
            p.max_gap.to_string(),
            format!("{:.2}", p.score),
        ]);
    }
    println!("{table}");
}

pub fn display_patterns(patterns: &[DrawPattern], prediction: Option<&PatternPrediction>) {
    println!("\n✏️  Formes des {} derniers tirages\n", patterns.len());

    let mut table = new_table(vec!["Tirage", "Numéros", "Forme"]);
    for pattern in patterns {
        table.add_row(vec![
            format!("#{:05}", pattern.draw_id),
            format_numbers(&pattern.numbers),
            pattern.shape.label().to_string(),
        ]);
    }
    println!("{table}");

    match prediction {
        Some(p) => println!("\nForme dominante : {}  →  {}", p.shape.label(), format_numbers(&p.numbers)),
        None => println!("\nPas assez de tirages pour prédire une forme."),
    }
}

pub fn display_lucky(numbers: &[u8], product: Product, date: NaiveDate, term: Option<u32>) {
    let source = match term {
        Some(id) => format!("{} (dernier tirage #{:05})", date.format("%d/%m/%Y"), id),
        None => date.format("%d/%m/%Y").to_string(),
    };
    println!("\n🍀 Numéros porte-bonheur {} du {}\n", product, source);
    println!("  {}", format_numbers(numbers));
}

pub fn display_search(combination: &Combination, hits: &[&DrawRecord]) {
    if hits.is_empty() {
        println!("La combinaison {} n'est jamais sortie.", combination);
        return;
    }
    println!("La combinaison {} est sortie {} fois :", combination, hits.len());
    let mut table = new_table(vec!["Tirage", "Date", "Jackpot 1"]);
    for draw in hits {
        table.add_row(vec![
            draw.term(),
            draw.date.format("%d/%m/%Y").to_string(),
            format_amount(draw.jackpot1),
        ]);
    }
    println!("{table}");
}

pub fn display_config(config: &AnalysisConfig) {
    let mut table = new_table(vec!["Paramètre", "Valeur"]);
    let rows: [(&str, String); 12] = [
        ("scoring_window", config.scoring_window.to_string()),
        ("pair_window", config.pair_window.to_string()),
        ("digit_window", config.digit_window.to_string()),
        ("hot_pool", config.hot_pool.to_string()),
        ("top_pairs", config.top_pairs.to_string()),
        ("top_digits", config.top_digits.to_string()),
        ("target_tolerance", config.target_tolerance.to_string()),
        ("target_attempts", config.target_attempts.to_string()),
        ("best_of_attempts", config.best_of_attempts.to_string()),
        ("predictive_candidates", config.predictive_candidates.to_string()),
        ("probability_iterations", config.probability_iterations.to_string()),
        ("pattern_window", config.pattern_window.to_string()),
    ];
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[1, 12, 45]), "01 - 12 - 45");
        assert_eq!(format_numbers(&[]), "");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1.000");
        assert_eq!(format_amount(12_345_678_900), "12.345.678.900");
    }

    #[test]
    fn test_score_color() {
        assert_eq!(score_color(99), Color::Green);
        assert_eq!(score_color(50), Color::Yellow);
        assert_eq!(score_color(15), Color::Red);
    }
}
