use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Combinaison invalide : {0}")]
    InvalidCombination(String),

    #[error("Produit inconnu : '{0}' (attendu 645 ou 655)")]
    UnknownProduct(String),

    #[error("Configuration invalide : {0}")]
    Config(String),

    #[error("Tirage pondéré impossible : {0}")]
    Sampling(#[from] rand::distr::weighted::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
