use num_bigint::BigUint;
use crate::rsa::rsa_keygen::KeyTuple;
use crate::crypto_error::CryptoError;


// m = c^d mod n
pub fn rsa_decrypt(c: &BigUint, key: &KeyTuple) -> Result<BigUint, CryptoError> {
    if c >= key.n() {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    Ok(c.modpow(key.d(), key.n()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::rsa_encrypt::rsa_encrypt;

    fn textbook_key() -> KeyTuple {
        // p = 61, q = 53 : exemple classique, d = 2753
        KeyTuple::from_parts(
            BigUint::from(3233u32),
            BigUint::from(65537u32),
            BigUint::from(61u32),
            BigUint::from(53u32),
            BigUint::from(2753u32),
        )
        .unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = textbook_key();
        for m in [0u32, 1, 2, 65, 1234, 3232] {
            let m = BigUint::from(m);
            let c = rsa_encrypt(&m, &key).unwrap();
            assert_eq!(rsa_decrypt(&c, &key).unwrap(), m);
        }
    }

    #[test]
    fn test_out_of_range_inputs() {
        let key = textbook_key();
        let n = key.n().clone();
        assert_eq!(rsa_encrypt(&n, &key), Err(CryptoError::MessageOutOfRange));
        assert_eq!(rsa_decrypt(&n, &key), Err(CryptoError::CiphertextOutOfRange));
    }
}
