use std::io;
use std::path::Path;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::{info, warn};
use crate::rsa::math::{is_probable_prime, miller_rabin_rounds};
use crate::rsa::rsa_keygen::{KeyTuple, PUBLIC_EXPONENT};
use crate::rsa::rsa_encrypt::rsa_encrypt;
use crate::rsa::rsa_decrypt::rsa_decrypt;
use crate::key_management::param_file::load_params_file;
use crate::crypto_error::CryptoError;

// ============================================================================
// Vérification complète d'une clé RSA de `expected_bits` bits :
//   - e = 65537
//   - p et q probablement premiers, distincts, chacun de expected_bits/2 bits
//   - n = p·q et e·d ≡ 1 (mod phi)
//   - dec(enc(m)) == m pour un m aléatoire dans [2, n)
// ============================================================================
pub fn verify_key<R>(key: &KeyTuple, expected_bits: u64, rng: &mut R) -> Result<(), CryptoError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if key.e() != &BigUint::from(PUBLIC_EXPONENT) {
        return Err(CryptoError::VerificationFailed(format!("e = {:x}, 10001 attendu", key.e())));
    }

    let half = expected_bits / 2;
    let rounds = miller_rabin_rounds(half);
    for (name, prime) in [('p', key.p()), ('q', key.q())] {
        if prime.bits() != half {
            return Err(CryptoError::VerificationFailed(format!(
                "{name} a {} bits, {half} attendus",
                prime.bits()
            )));
        }
        if !is_probable_prime(prime, rounds, rng) {
            return Err(CryptoError::VerificationFailed(format!("{name} n'est pas premier")));
        }
    }

    if key.p() == key.q() {
        return Err(CryptoError::VerificationFailed("p == q".into()));
    }
    if key.n() != &(key.p() * key.q()) {
        return Err(CryptoError::VerificationFailed("n != p*q".into()));
    }
    let phi = key
        .phi()
        .ok_or_else(|| CryptoError::VerificationFailed("clé zeroisée".into()))?;
    if (key.e() * key.d()) % phi != BigUint::one() {
        return Err(CryptoError::VerificationFailed("e*d != 1 mod phi".into()));
    }

    let m = rng.gen_biguint_range(&BigUint::from(2u32), key.n());
    let c = rsa_encrypt(&m, key)?;
    if rsa_decrypt(&c, key)? != m {
        return Err(CryptoError::VerificationFailed("dec(enc(m)) != m".into()));
    }

    Ok(())
}

/// Charge un fichier de paramètres et vérifie chaque clé.
/// Retourne le nombre de clés vérifiées.
pub fn verify_params_file(path: impl AsRef<Path>, expected_bits: u64) -> io::Result<usize> {
    let path = path.as_ref();
    let keys = load_params_file(path)?;
    let mut rng = OsRng;

    for (index, key) in keys.iter().enumerate() {
        if let Err(e) = verify_key(key, expected_bits, &mut rng) {
            warn!(path = %path.display(), key = index + 1, "clé rejetée : {e}");
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("clé {} de {} : {e}", index + 1, path.display()),
            ));
        }
    }

    info!(path = %path.display(), keys = keys.len(), bits = expected_bits, "fichier vérifié");
    Ok(keys.len())
}
