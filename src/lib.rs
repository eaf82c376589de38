// Déclaration des modules
pub mod crypto_error;
pub mod rsa;
pub mod key_management;
pub mod batch;
pub mod logging;

pub use crate::rsa::math;
pub use crate::rsa::rsa_keygen;
pub use crate::rsa::rsa_encrypt;
pub use crate::rsa::rsa_decrypt;

// Fonctions mathématiques principales
pub use crate::rsa::math::{generate_prime, is_probable_prime, miller_rabin_rounds, mod_inverse};

// Types depuis keygen
pub use rsa_keygen::{KeyTuple, KeyGenConfig, KeyGenerator, PUBLIC_EXPONENT};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Lecture / écriture des fichiers rsa_<bits>_params.txt
pub use key_management::{save_params_file, load_params_file, params_file_name, verify_key};

// Lots — point d'entrée des binaires
pub use batch::{BatchConfig, BatchError, BatchObserver, TracingObserver, run_batch, KEY_SIZES, KEYS_PER_SIZE};
