// =========================================================
// Génération des paramètres RSA (n, e, p, q, d)
// 10 clés par taille, 1024 / 2048 / 15360 bits,
// un fichier rsa_<bits>_params.txt par taille
// =========================================================

use rsa_params::logging::init_tracing;
use rsa_params::{run_batch, BatchConfig, KeyGenerator, TracingObserver};
use tracing::{error, info};

fn main() {
    init_tracing();

    let config = BatchConfig::default();
    let generator = KeyGenerator::default();

    match run_batch(&config, &generator, &mut TracingObserver) {
        Ok(paths) => info!(files = paths.len(), "génération terminée"),
        Err(e) => {
            error!("[FATAL] {}", e);
            std::process::exit(1);
        }
    }
}
