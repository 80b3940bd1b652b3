use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use megapower_db::rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use megapower_core::{DrawRecord, Product};
use megapower_db::db::insert_draw;
use megapower_db::models::validate_record;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFile {
    List(Vec<RawDraw>),
    Wrapped { result: Vec<RawDraw> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(u64),
    Text(String),
}

impl RawValue {
    fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPrize {
    #[serde(default)]
    giaithuong: Option<String>,
    #[serde(default)]
    giatrigiai: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDraw {
    id: RawValue,
    date: String,
    result: String,
    #[serde(default)]
    jackpot1: Option<RawValue>,
    #[serde(default)]
    jackpot2: Option<RawValue>,
    #[serde(default)]
    statistical: Vec<RawPrize>,
}

/// "12.345.678.900" -> 12345678900 ; vide ou illisible -> 0.
pub fn parse_amount(s: &str) -> u64 {
    let digits = s.trim().replace('.', "");
    if digits.is_empty() {
        return 0;
    }
    match digits.parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            warn!("Montant illisible : '{}'", s);
            0
        }
    }
}

/// "DD-MM-YYYY" avec une heure optionnelle ("DD-MM-YYYY HH:mm:ss").
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.split_whitespace().next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%d-%m-%Y")
        .with_context(|| format!("Format de date invalide: '{}'", raw))
}

fn jackpots(raw: &RawDraw) -> (u64, u64) {
    let mut j1 = 0;
    let mut j2 = 0;

    if let Some(value) = raw.statistical.first().and_then(|p| p.giatrigiai.as_deref()) {
        j1 = parse_amount(value);
    }
    if let Some(second) = raw.statistical.get(1) {
        let is_jackpot2 = second
            .giaithuong
            .as_deref()
            .is_some_and(|label| label.contains("Jackpot 2"));
        if let (true, Some(value)) = (is_jackpot2, second.giatrigiai.as_deref()) {
            j2 = parse_amount(value);
        }
    }

    // Repli sur les champs de premier niveau
    if j1 == 0 {
        j1 = raw.jackpot1.as_ref().map(|v| parse_amount(&v.as_text())).unwrap_or(0);
    }
    if j2 == 0 {
        j2 = raw.jackpot2.as_ref().map(|v| parse_amount(&v.as_text())).unwrap_or(0);
    }
    (j1, j2)
}

fn to_record(raw: &RawDraw) -> Result<DrawRecord> {
    let id_text = raw.id.as_text();
    let id: u32 = id_text
        .parse()
        .with_context(|| format!("Identifiant de tirage invalide: '{}'", id_text))?;
    let date = parse_date(&raw.date)?;
    if raw.result.trim().is_empty() {
        bail!("Résultat vide pour le tirage {}", id);
    }
    let (jackpot1, jackpot2) = jackpots(raw);
    Ok(DrawRecord {
        jackpot1,
        jackpot2,
        ..DrawRecord::new(id, date, raw.result.trim())
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_json(conn: &Connection, product: Product, path: &Path) -> Result<ImportResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_str(conn, product, &json)
}

pub fn import_str(conn: &Connection, product: Product, json: &str) -> Result<ImportResult> {
    let file: RawFile = serde_json::from_str(json).context("JSON de tirages invalide")?;
    let items = match file {
        RawFile::List(items) => items,
        RawFile::Wrapped { result } => result,
    };

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for raw in &items {
        result.total_records += 1;
        let record = match to_record(raw).and_then(|r| validate_record(&r, product).map(|_| r)) {
            Ok(record) => record,
            Err(e) => {
                warn!("Tirage {} ignoré : {:#}", result.total_records, e);
                result.errors += 1;
                continue;
            }
        };
        match insert_draw(&tx, product, &record) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                warn!("Erreur insertion tirage {}: {:#}", record.term(), e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
