mod config;
mod display;
mod import;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use megapower_core::config::AnalysisConfig;
use megapower_core::frequency::{absence_streaks, frequencies};
use megapower_core::generator::{CombinationGenerator, Strategy, DEFAULT_TARGET_SCORE};
use megapower_core::groups::find_groups_cancellable;
use megapower_core::pattern::{analyze, predict};
use megapower_core::predictive::{predict_novel_with, TrendFilter};
use megapower_core::probability::ProbabilityPredictor;
use megapower_core::rng::lucky_numbers;
use megapower_core::scoring::ScoringEngine;
use megapower_core::session::{Analyst, CancelToken};
use megapower_core::{Combination, DrawHistory, Product};
use megapower_db::db::{count_draws, db_path, fetch_history, fetch_last_draws, migrate, open_db};
use megapower_db::rusqlite::Connection;

use crate::config::{load_config, save_config};
use crate::display::{
    display_config, display_draws, display_groups, display_import_summary, display_lucky,
    display_novel, display_patterns, display_predictions, display_probability_picks, display_score,
    display_search, display_single_prediction, display_stats, display_streaks,
};

#[derive(Parser)]
#[command(name = "megapower", about = "Analyse des tirages Mega 6/45 et Power 6/55")]
struct Cli {
    /// Produit analysé
    #[arg(short, long, global = true, default_value = "645")]
    product: Product,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Journalisation détaillée sur stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier JSON
    Import {
        /// Chemin vers le fichier JSON (tableau ou {"result": [...]})
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Fréquences et retards des numéros
    Stats {
        /// Fenêtre d'analyse (par défaut : scoring_window)
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Absences en cours et records d'absence
    Streaks {
        /// Nombre de numéros affichés
        #[arg(short, long, default_value = "15")]
        top: usize,
    },

    /// Noter une grille de six numéros
    Score {
        /// Six numéros séparés par des virgules
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,
    },

    /// Générer des grilles
    Generate {
        /// Stratégie de génération
        #[arg(short, long, default_value = "random")]
        strategy: Strategy,

        /// Nombre de grilles
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Score visé (stratégie target-score)
        #[arg(short, long, default_value_t = DEFAULT_TARGET_SCORE)]
        target: u8,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Groupes de numéros sortis ensemble autour d'un numéro
    Groups {
        /// Numéro pivot
        anchor: u8,

        /// Taille des groupes (pivot inclus)
        #[arg(short, long, default_value = "2")]
        size: usize,

        /// Nombre de groupes affichés
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Combinaisons jamais sorties, classées par taux de tirage suivant
    Next {
        /// Filtre de tendance
        #[arg(short, long, default_value = "above")]
        filter: TrendFilter,

        /// Nombre de combinaisons affichées
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Grilles pondérées par probabilité, jamais sorties
    Probability {
        /// Nombre de grilles affichées
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Formes des derniers tirages sur la grille et forme probable
    Pattern {
        /// Nombre de tirages analysés (par défaut : pattern_window)
        #[arg(short, long)]
        window: Option<usize>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Numéros porte-bonheur du jour
    Lucky {
        /// Date (AAAA-MM-JJ), aujourd'hui par défaut
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Chercher si une grille est déjà sortie
    Search {
        /// Six numéros séparés par des virgules
        #[arg(value_delimiter = ',', required = true)]
        numbers: Vec<u8>,
    },

    /// Afficher la configuration ou écrire les valeurs par défaut
    Config {
        /// Écrire la configuration par défaut dans ce fichier
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    if let Command::Config { write } = &cli.command {
        return cmd_config(&config, write.as_deref());
    }

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;
    let product = cli.product;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, product, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, product, last),
        Command::Stats { window } => cmd_stats(&conn, product, window.unwrap_or(config.scoring_window)),
        Command::Streaks { top } => cmd_streaks(&conn, product, top),
        Command::Score { numbers } => cmd_score(&conn, product, &config, &numbers),
        Command::Generate {
            strategy,
            count,
            target,
            seed,
        } => cmd_generate(&conn, product, &config, strategy, count, target, seed),
        Command::Groups { anchor, size, limit } => cmd_groups(&conn, product, anchor, size, limit),
        Command::Next { filter, limit } => cmd_next(&conn, product, &config, filter, limit),
        Command::Probability { limit, seed } => cmd_probability(&conn, product, &config, limit, seed),
        Command::Pattern { window, seed } => {
            cmd_pattern(&conn, product, window.unwrap_or(config.pattern_window), seed)
        }
        Command::Lucky { date } => cmd_lucky(&conn, product, date),
        Command::Search { numbers } => cmd_search(&conn, product, &numbers),
        Command::Config { .. } => Ok(()),
    }
}

/// Historique complet du produit, ou `None` (avec un message) si la base est vide.
fn load_history(conn: &Connection, product: Product) -> Result<Option<DrawHistory>> {
    let n = count_draws(conn, product)?;
    if n == 0 {
        println!("Base vide pour le {}. Lancez d'abord : megapower import --product {} --file <fichier.json>", product, product);
        return Ok(None);
    }
    let history = fetch_history(conn, product)?;
    debug!(product = product.tag(), draws = history.len(), "historique prêt");
    Ok(Some(history))
}

/// Exécute un calcul lourd sur un fil dédié avec un indicateur d'attente.
fn run_heavy<T, F>(history: DrawHistory, message: &str, job: F) -> Result<T>
where
    F: FnOnce(&DrawHistory, &CancelToken) -> T + Send + 'static,
    T: Send + 'static,
{
    let analyst = Analyst::new(history);
    let handle = analyst
        .spawn(job)
        .context("Une analyse est déjà en cours")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = handle.join().map_err(|_| anyhow!("L'analyse s'est interrompue"));
    pb.finish_and_clear();
    result
}

fn parse_combination(numbers: &[u8], product: Product) -> Result<Combination> {
    Combination::new(numbers, product.max_number())
        .with_context(|| format!("Grille {:?} refusée pour le {}", numbers, product))
}

fn cmd_import(conn: &Connection, product: Product, file: &Path) -> Result<()> {
    let result = import::import_json(conn, product, file)?;
    info!(inserted = result.inserted, skipped = result.skipped, "import terminé");
    display_import_summary(&result, product);
    Ok(())
}

fn cmd_list(conn: &Connection, product: Product, last: u32) -> Result<()> {
    let n = count_draws(conn, product)?;
    if n == 0 {
        println!("Base vide pour le {}. Lancez d'abord : megapower import", product);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, product, last)?;
    display_draws(&draws, product);
    Ok(())
}

fn cmd_stats(conn: &Connection, product: Product, window: usize) -> Result<()> {
    let Some(history) = load_history(conn, product)? else {
        return Ok(());
    };
    let table = frequencies(&history, window, product);
    display_stats(&table, product);
    Ok(())
}

fn cmd_streaks(conn: &Connection, product: Product, top: usize) -> Result<()> {
    let Some(history) = load_history(conn, product)? else {
        return Ok(());
    };
    display_streaks(&absence_streaks(&history, product), top);
    Ok(())
}

fn cmd_score(conn: &Connection, product: Product, config: &AnalysisConfig, numbers: &[u8]) -> Result<()> {
    let combination = parse_combination(numbers, product)?;
    let history = fetch_history(conn, product)?;
    let engine = ScoringEngine::with_window(&history, product, config.scoring_window);
    display_score(&combination, &engine.breakdown(&combination));
    Ok(())
}

fn cmd_generate(
    conn: &Connection,
    product: Product,
    config: &AnalysisConfig,
    strategy: Strategy,
    count: usize,
    target: u8,
    seed: Option<u64>,
) -> Result<()> {
    if count == 0 {
        bail!("Le nombre de grilles doit être positif");
    }
    // Un historique vide reste utilisable : les stratégies retombent sur l'aléatoire
    let history = fetch_history(conn, product)?;

    if count == 1 {
        let mut generator = CombinationGenerator::with_config(&history, product, config.clone(), seed)
            .with_target(target);
        let prediction = generator.generate(strategy);
        let score = generator.scorer().score(&prediction.combination);
        display_single_prediction(&prediction, score, strategy);
        return Ok(());
    }

    let predictions = if strategy == Strategy::TargetScore {
        let config = config.clone();
        run_heavy(history, "Recherche de grilles proches du score visé...", move |history, cancel| {
            CombinationGenerator::with_config(history, product, config, seed)
                .with_target(target)
                .generate_many_cancellable(strategy, count, cancel)
        })?
    } else {
        CombinationGenerator::with_config(&history, product, config.clone(), seed)
            .with_target(target)
            .generate_many(strategy, count)
    };
    if predictions.len() < count {
        println!("{} grilles obtenues sur {} demandées.", predictions.len(), count);
    }
    display_predictions(&predictions, strategy);
    Ok(())
}

fn cmd_groups(conn: &Connection, product: Product, anchor: u8, size: usize, limit: usize) -> Result<()> {
    if anchor == 0 || anchor > product.max_number() {
        bail!("Numéro pivot {} hors limites (1-{})", anchor, product.max_number());
    }
    if size < 2 || size > Combination::SIZE {
        bail!("Taille de groupe {} invalide (2-{})", size, Combination::SIZE);
    }
    let Some(history) = load_history(conn, product)? else {
        return Ok(());
    };
    let report = run_heavy(history, "Recherche des groupes...", move |history, cancel| {
        find_groups_cancellable(history, anchor, size, product, limit, cancel)
    })?;
    display_groups(&report, anchor, 5);
    Ok(())
}

fn cmd_next(
    conn: &Connection,
    product: Product,
    config: &AnalysisConfig,
    filter: TrendFilter,
    limit: usize,
) -> Result<()> {
    let Some(history) = load_history(conn, product)? else {
        return Ok(());
    };
    let max_candidates = config.predictive_candidates;
    let results = run_heavy(history, "Analyse prédictive...", move |history, cancel| {
        predict_novel_with(history, product, filter, limit, max_candidates, cancel)
    })?;
    display_novel(&results);
    Ok(())
}

fn cmd_probability(
    conn: &Connection,
    product: Product,
    config: &AnalysisConfig,
    limit: usize,
    seed: Option<u64>,
) -> Result<()> {
    let Some(history) = load_history(conn, product)? else {
        return Ok(());
    };
    let iterations = config.probability_iterations;
    let picks = run_heavy(history, "Génération pondérée...", move |history, cancel| {
        ProbabilityPredictor::with_iterations(iterations, seed).run(history, product, cancel)
    })??;
    display_probability_picks(&picks, limit);
    Ok(())
}

fn cmd_pattern(conn: &Connection, product: Product, window: usize, seed: Option<u64>) -> Result<()> {
    let Some(history) = load_history(conn, product)? else {
        return Ok(());
    };
    let patterns = analyze(&history, product, window);
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let prediction = predict(&patterns, product, &mut rng);
    display_patterns(&patterns, prediction.as_ref());
    Ok(())
}

fn cmd_lucky(conn: &Connection, product: Product, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let term = fetch_last_draws(conn, product, 1)?.first().map(|d| d.id);
    let numbers = lucky_numbers(product, date, term);
    display_lucky(&numbers, product, date, term);
    Ok(())
}

fn cmd_search(conn: &Connection, product: Product, numbers: &[u8]) -> Result<()> {
    let combination = parse_combination(numbers, product)?;
    let history = fetch_history(conn, product)?;
    let hits = history.find_exact(&combination, product);
    display_search(&combination, &hits);
    Ok(())
}

fn cmd_config(config: &AnalysisConfig, write: Option<&Path>) -> Result<()> {
    match write {
        Some(path) => {
            save_config(&AnalysisConfig::default(), path)?;
            println!("Configuration par défaut écrite dans {}", path.display());
        }
        None => display_config(config),
    }
    Ok(())
}
