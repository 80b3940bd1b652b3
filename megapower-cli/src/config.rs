use anyhow::{Context, Result};
use std::path::Path;

use megapower_core::config::AnalysisConfig;

/// Lit et valide une configuration JSON ; les clés absentes prennent leur valeur par défaut.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
    let config: AnalysisConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration illisible {:?}", path))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(config: &AnalysisConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire la configuration {:?}", path))?;
    Ok(())
}
