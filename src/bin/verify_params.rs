// =========================================================
// Vérifie les fichiers rsa_<bits>_params.txt d'un répertoire.
//
//   verify_params                    → 1024, 2048, 15360 dans .
//   verify_params 1024 2048 --dir out
// =========================================================

use std::path::PathBuf;

use clap::Parser;
use rsa_params::key_management::verify_params_file;
use rsa_params::logging::init_tracing;
use rsa_params::{params_file_name, KEY_SIZES};
use tracing::{error, info};

/// Vérification des paramètres RSA générés par rsa_params.
#[derive(Parser, Debug, Clone)]
#[command(name = "verify_params")]
#[command(version)]
struct Args {
    /// Tailles de clé (bits) dont le fichier est vérifié
    #[arg(default_values_t = KEY_SIZES)]
    sizes: Vec<u64>,

    /// Répertoire contenant les fichiers rsa_<bits>_params.txt
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut total = 0;
    for &bits in &args.sizes {
        let path = args.dir.join(params_file_name(bits));
        match verify_params_file(&path, bits) {
            Ok(count) => total += count,
            Err(e) => {
                error!(path = %path.display(), "[ECHEC] {}", e);
                std::process::exit(1);
            }
        }
    }

    info!(keys = total, "toutes les clés sont valides");
}
