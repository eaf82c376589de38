// ============================================================================
// Génération par lots
//
// Pour chaque taille (dans l'ordre) : KEYS_PER_SIZE clés, puis un seul
// fichier rsa_<bits>_params.txt. Entièrement séquentiel ; la première
// erreur (génération ou écriture) interrompt tout le lot, y compris
// les tailles suivantes.
// ============================================================================

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::info;
use crate::rsa::rsa_keygen::{KeyGenerator, KeyTuple};
use crate::key_management::param_file::{params_file_name, save_params_file};
use crate::crypto_error::CryptoError;

/// Tailles de clé produites, dans l'ordre
pub const KEY_SIZES: [u64; 3] = [1024, 2048, 15360];

/// Nombre de clés par fichier
pub const KEYS_PER_SIZE: usize = 10;

// ─────────────────────────────────────────────────────────
// Erreur du lot
//
// Unifie CryptoError et io::Error pour propager via ?
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum BatchError {
    Crypto(CryptoError),
    Io(io::Error),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            BatchError::Io(e)     => write!(f, "Erreur I/O : {}", e),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Crypto(e) => Some(e),
            BatchError::Io(e)     => Some(e),
        }
    }
}

impl From<CryptoError> for BatchError {
    fn from(e: CryptoError) -> Self { BatchError::Crypto(e) }
}

impl From<io::Error> for BatchError {
    fn from(e: io::Error) -> Self { BatchError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Suivi de progression
// ─────────────────────────────────────────────────────────

/// Reçoit les étapes du lot. Toutes les méthodes sont optionnelles.
pub trait BatchObserver {
    fn batch_started(&mut self, _bits: u64, _count: usize) {}
    /// `index` commence à 1
    fn key_generated(&mut self, _bits: u64, _index: usize, _count: usize) {}
    fn batch_saved(&mut self, _bits: u64, _path: &Path) {}
}

/// Observateur par défaut : un événement tracing par étape
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl BatchObserver for TracingObserver {
    fn batch_started(&mut self, bits: u64, count: usize) {
        info!(bits, count, "génération des clés RSA");
    }

    fn key_generated(&mut self, bits: u64, index: usize, count: usize) {
        info!(bits, index, count, "clé générée");
    }

    fn batch_saved(&mut self, bits: u64, path: &Path) {
        info!(bits, path = %path.display(), "clés sauvegardées");
    }
}

// ─────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    pub bit_sizes:     Vec<u64>,
    pub keys_per_size: usize,
    pub output_dir:    PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            bit_sizes:     KEY_SIZES.to_vec(),
            keys_per_size: KEYS_PER_SIZE,
            output_dir:    PathBuf::from("."),
        }
    }
}

impl BatchConfig {
    pub fn output_path(&self, bits: u64) -> PathBuf {
        self.output_dir.join(params_file_name(bits))
    }
}

// ─────────────────────────────────────────────────────────
// Lot d'une taille
// ─────────────────────────────────────────────────────────

pub fn generate_batch<R>(
    generator: &KeyGenerator,
    bits: u64,
    count: usize,
    rng: &mut R,
    observer: &mut dyn BatchObserver,
) -> Result<Vec<KeyTuple>, CryptoError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    observer.batch_started(bits, count);

    let mut keys = Vec::with_capacity(count);
    for index in 1..=count {
        keys.push(generator.generate_with_rng(bits, rng)?);
        observer.key_generated(bits, index, count);
    }
    Ok(keys)
}

// ─────────────────────────────────────────────────────────
// Lot complet
// ─────────────────────────────────────────────────────────

/// Génère et sauvegarde toutes les tailles de `config` avec l'entropie
/// système. Retourne les chemins écrits, dans l'ordre.
pub fn run_batch(
    config: &BatchConfig,
    generator: &KeyGenerator,
    observer: &mut dyn BatchObserver,
) -> Result<Vec<PathBuf>, BatchError> {
    run_batch_with_rng(config, generator, &mut OsRng, observer)
}

pub fn run_batch_with_rng<R>(
    config: &BatchConfig,
    generator: &KeyGenerator,
    rng: &mut R,
    observer: &mut dyn BatchObserver,
) -> Result<Vec<PathBuf>, BatchError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut written = Vec::with_capacity(config.bit_sizes.len());

    for &bits in &config.bit_sizes {
        let keys = generate_batch(generator, bits, config.keys_per_size, rng, observer)?;

        let path = config.output_path(bits);
        save_params_file(&keys, &path)?;
        observer.batch_saved(bits, &path);

        written.push(path);
    }

    Ok(written)
}
