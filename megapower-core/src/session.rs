//! Exécution des calculs lourds hors du fil interactif.
//!
//! Un seul calcul lourd à la fois par session : une demande reçue pendant
//! qu'un calcul tourne est ignorée. L'historique est partagé en lecture seule,
//! un calcul abandonné ne peut donc rien corrompre.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::history::DrawHistory;

/// Drapeau d'annulation partagé, consulté à chaque itération des boucles lourdes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` si un calcul est déjà en cours.
    pub fn try_begin(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Libère le drapeau à la destruction, y compris si le calcul panique.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct AnalysisHandle<T> {
    cancel: CancelToken,
    handle: JoinHandle<T>,
}

impl<T> AnalysisHandle<T> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> thread::Result<T> {
        self.handle.join()
    }
}

/// Session d'analyse : un historique partagé et au plus un calcul lourd en vol.
#[derive(Debug, Clone)]
pub struct Analyst {
    history: Arc<DrawHistory>,
    busy: BusyFlag,
}

impl Analyst {
    pub fn new(history: DrawHistory) -> Self {
        Self {
            history: Arc::new(history),
            busy: BusyFlag::new(),
        }
    }

    pub fn history(&self) -> &DrawHistory {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Lance `job` sur un fil dédié ; `None` si un calcul tourne déjà.
    pub fn spawn<T, F>(&self, job: F) -> Option<AnalysisHandle<T>>
    where
        F: FnOnce(&DrawHistory, &CancelToken) -> T + Send + 'static,
        T: Send + 'static,
    {
        let Some(guard) = self.busy.try_begin() else {
            debug!("analyse déjà en cours, demande ignorée");
            return None;
        };
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let history = Arc::clone(&self.history);
        let handle = thread::spawn(move || {
            let _guard = guard;
            job(&history, &token)
        });
        Some(AnalysisHandle { cancel, handle })
    }
}
