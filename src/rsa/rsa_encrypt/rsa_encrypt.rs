use num_bigint::BigUint;
use crate::rsa::rsa_keygen::KeyTuple;
use crate::crypto_error::CryptoError;


// ---------------------------------------------------------------------------
// Chiffrement RSA « manuel » (sans padding) : c = m^e  mod n
//
// Sert uniquement à contrôler qu'une paire (e, d) est fonctionnelle.
// Retourne Err(CryptoError::MessageOutOfRange) si m >= n.
// ---------------------------------------------------------------------------
pub fn rsa_encrypt(m: &BigUint, key: &KeyTuple) -> Result<BigUint, CryptoError> {
    if m >= key.n() {
        return Err(CryptoError::MessageOutOfRange);
    }

    Ok(m.modpow(key.e(), key.n()))
}
