use anyhow::{Context, Result};
use megapower_core::{DrawHistory, DrawRecord, Product};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    product   TEXT NOT NULL,
    draw_id   INTEGER NOT NULL,
    date      TEXT NOT NULL,
    result    TEXT NOT NULL,
    jackpot1  INTEGER NOT NULL DEFAULT 0,
    jackpot2  INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (product, draw_id)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("megapower.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// `false` si le tirage existait déjà pour ce produit.
pub fn insert_draw(conn: &Connection, product: Product, draw: &DrawRecord) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (product, draw_id, date, result, jackpot1, jackpot2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            product.tag(),
            draw.id,
            draw.date,
            draw.result,
            draw.jackpot1,
            draw.jackpot2,
        ],
    ).with_context(|| format!("Échec de l'insertion du tirage {}", draw.term()))?;
    if changed == 0 {
        debug!(product = product.tag(), id = draw.id, "tirage déjà présent");
    }
    Ok(changed > 0)
}

pub fn fetch_last_draws(conn: &Connection, product: Product, limit: u32) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT draw_id, date, result, jackpot1, jackpot2
         FROM draws WHERE product = ?1 ORDER BY draw_id DESC LIMIT ?2"
    )?;
    let draws = stmt.query_map(rusqlite::params![product.tag(), limit], |row| {
        Ok(DrawRecord {
            id: row.get(0)?,
            date: row.get(1)?,
            result: row.get(2)?,
            jackpot1: row.get(3)?,
            jackpot2: row.get(4)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tout l'historique du produit, prêt pour l'analyse.
pub fn fetch_history(conn: &Connection, product: Product) -> Result<DrawHistory> {
    let draws = fetch_last_draws(conn, product, u32::MAX)?;
    debug!(product = product.tag(), draws = draws.len(), "historique chargé");
    Ok(DrawHistory::new(draws))
}

pub fn count_draws(conn: &Connection, product: Product) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE product = ?1",
        [product.tag()],
        |row| row.get(0),
    )?;
    Ok(count)
}
