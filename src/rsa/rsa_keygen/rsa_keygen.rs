use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::{debug, warn};
use zeroize::Zeroize;
use crate::rsa::math::{generate_prime, miller_rabin_rounds, mod_inverse};
use crate::crypto_error::CryptoError;

/// Exposant public fixe e = 65537 (F4)
pub const PUBLIC_EXPONENT: u32 = 65_537;

/// Nombre maximal de tirages (p, q) avant abandon.
/// gcd(65537, phi) != 1 n'arrive que si 65537 divise p-1 ou q-1,
/// soit environ 2 chances sur 65537 par tirage.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

// ============================================================================
// Helper : efface les limbs d'un BigUint EN PLACE
//
// assign_from_slice vide puis remplit le buffer existant (capacité suffisante,
// pas de réallocation) ; la normalisation ne libère le buffer qu'une fois
// rempli de zéros.
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    let limbs = ((n.bits() + 31) / 32) as usize;
    if limbs > 0 {
        n.assign_from_slice(&vec![0u32; limbs]);
    }
}

// ============================================================================
// Paramètres RSA (n, e, p, q, d) — immuables, ZEROISÉS À LA DESTRUCTION
//
// Invariants garantis à la construction :
//   n = p·q, p != q, e·d ≡ 1 (mod (p-1)(q-1))
// La primalité de p et q et leur taille sont garanties par KeyGenerator
// et contrôlées par key_verify::verify_key pour les clés chargées.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyTuple {
    n: BigUint,
    e: BigUint,
    p: BigUint,
    q: BigUint,
    d: BigUint,
}

impl KeyTuple {
    /// Reconstruit une clé à partir de ses cinq composantes en vérifiant
    /// sa cohérence structurelle.
    pub fn from_parts(
        n: BigUint,
        e: BigUint,
        p: BigUint,
        q: BigUint,
        d: BigUint,
    ) -> Result<Self, CryptoError> {
        let two = BigUint::from(2u32);
        if p < two || q < two {
            return Err(CryptoError::KeyCoherenceError("p et q doivent être >= 2".into()));
        }
        if p == q {
            return Err(CryptoError::KeyCoherenceError("p == q".into()));
        }
        if n != &p * &q {
            return Err(CryptoError::KeyCoherenceError("n != p*q".into()));
        }

        let phi = (&p - 1u32) * (&q - 1u32);
        if ((&e * &d) % &phi) != BigUint::one() {
            return Err(CryptoError::KeyCoherenceError("e*d != 1 mod phi".into()));
        }

        Ok(KeyTuple { n, e, p, q, d })
    }

    pub fn n(&self) -> &BigUint { &self.n }
    pub fn e(&self) -> &BigUint { &self.e }
    pub fn p(&self) -> &BigUint { &self.p }
    pub fn q(&self) -> &BigUint { &self.q }
    pub fn d(&self) -> &BigUint { &self.d }

    /// phi(n) = (p-1)(q-1), None une fois la clé zeroisée
    pub fn phi(&self) -> Option<BigUint> {
        if self.p.is_zero() || self.q.is_zero() {
            return None;
        }
        Some((&self.p - 1u32) * (&self.q - 1u32))
    }

    /// Les champs dans l'ordre du format fichier : n, e, p, q, d
    pub fn fields(&self) -> [(char, &BigUint); 5] {
        [
            ('n', &self.n),
            ('e', &self.e),
            ('p', &self.p),
            ('q', &self.q),
            ('d', &self.d),
        ]
    }
}

impl Zeroize for KeyTuple {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.p);
        zeroize_biguint(&mut self.q);
        zeroize_biguint(&mut self.d);
    }
}

impl Drop for KeyTuple {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Configuration du générateur
// ============================================================================
#[derive(Clone, Debug, PartialEq)]
pub struct KeyGenConfig {
    /// Budget total de tirages (paire p, q ou nouveau q) avant RetriesExhausted
    pub max_attempts: u32,
    /// Rounds Miller-Rabin ; None => miller_rabin_rounds(bits / 2)
    pub miller_rabin_rounds: Option<u32>,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        KeyGenConfig {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            miller_rabin_rounds: None,
        }
    }
}

// ============================================================================
// Génération de clés RSA
//
// p et q sont tirés dans [2^(b/2-1), 2^(b/2)-1] (bit de poids fort forcé),
// donc chacun a exactement b/2 bits. q est retiré tant que q == p.
// Si gcd(e, phi) != 1 la paire est jetée et retirée, dans la limite
// de max_attempts tirages au total.
//
// Cas limite b = 4 : la plage est [2, 3], la seule paire distincte est
// {2, 3}, d'où n = 6, phi = 2 et d = 1.
// ============================================================================
#[derive(Clone, Debug, Default)]
pub struct KeyGenerator {
    config: KeyGenConfig,
}

impl KeyGenerator {
    pub fn new(config: KeyGenConfig) -> Self {
        KeyGenerator { config }
    }

    /// Génère une clé de `bits` bits avec l'entropie système
    pub fn generate(&self, bits: u64) -> Result<KeyTuple, CryptoError> {
        self.generate_with_rng(bits, &mut OsRng)
    }

    pub fn generate_with_rng<R>(&self, bits: u64, rng: &mut R) -> Result<KeyTuple, CryptoError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        if bits < 4 || bits % 2 != 0 {
            return Err(CryptoError::InvalidKeySize { requested: bits });
        }

        let half = bits / 2;
        let rounds = self
            .config
            .miller_rabin_rounds
            .unwrap_or_else(|| miller_rabin_rounds(half));
        let max_attempts = self.config.max_attempts;
        let e = BigUint::from(PUBLIC_EXPONENT);

        let mut attempts = 0u32;
        while attempts < max_attempts {
            attempts += 1;

            let p = generate_prime(half, rounds, rng)?;
            let mut q = generate_prime(half, rounds, rng)?;
            while q == p {
                if attempts >= max_attempts {
                    return Err(CryptoError::RetriesExhausted { bits, attempts });
                }
                attempts += 1;
                debug!(bits, attempt = attempts, "q == p, nouveau tirage de q");
                q = generate_prime(half, rounds, rng)?;
            }

            let phi = (&p - 1u32) * (&q - 1u32);

            match mod_inverse(&e, &phi) {
                Ok(d) => {
                    let n = &p * &q;
                    debug!(bits, attempts, "clé RSA générée");
                    return Ok(KeyTuple { n, e, p, q, d });
                }
                Err(CryptoError::NoModularInverse) => {
                    warn!(
                        bits,
                        attempt = attempts,
                        "gcd(e, phi) != 1 : inverse modulaire impossible, nouveau tirage de p et q"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Err(CryptoError::RetriesExhausted { bits, attempts })
    }
}

/// Génère une clé RSA de `bits` bits avec la configuration par défaut
pub fn rsa_keygen(bits: u64) -> Result<KeyTuple, CryptoError> {
    KeyGenerator::default().generate(bits)
}

// ============================================================================
// Tests unitaires
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::math::is_probable_prime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Source d'aléa constante : toujours le même premier, donc toujours q == p
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 { 0 }
        fn next_u64(&mut self) -> u64 { 0 }
        fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0) }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl CryptoRng for ZeroRng {}

    fn assert_key_invariants(key: &KeyTuple, bits: u64) {
        let mut rng = StdRng::seed_from_u64(7);
        let half = bits / 2;
        let lower = BigUint::one() << (half - 1);
        let upper = (BigUint::one() << half) - 1u32;

        assert!(is_probable_prime(key.p(), 20, &mut rng));
        assert!(is_probable_prime(key.q(), 20, &mut rng));
        assert_ne!(key.p(), key.q());
        for prime in [key.p(), key.q()] {
            assert!(prime >= &lower && prime <= &upper);
            assert_eq!(prime.bits(), half);
        }
        assert_eq!(key.n(), &(key.p() * key.q()));
        assert_eq!(key.e(), &BigUint::from(PUBLIC_EXPONENT));
        assert_eq!((key.e() * key.d()) % key.phi().unwrap(), BigUint::one());
    }

    #[test]
    fn test_generated_keys_satisfy_invariants() {
        let generator = KeyGenerator::default();
        let mut rng = StdRng::seed_from_u64(42);
        for bits in [8u64, 16, 64, 128, 256] {
            let key = generator.generate_with_rng(bits, &mut rng).unwrap();
            assert_key_invariants(&key, bits);
        }
    }

    #[test]
    fn test_rsa_keygen_uses_os_rng() {
        let key = rsa_keygen(128).unwrap();
        assert_key_invariants(&key, 128);
    }

    #[test]
    fn test_degenerate_four_bit_key_is_pinned() {
        let generator = KeyGenerator::default();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let key = generator.generate_with_rng(4, &mut rng).unwrap();
            assert_eq!(key.n(), &BigUint::from(6u32));
            assert_eq!(key.phi(), Some(BigUint::from(2u32)));
            assert_eq!(key.d(), &BigUint::one());
            let mut primes = [key.p().clone(), key.q().clone()];
            primes.sort();
            assert_eq!(primes, [BigUint::from(2u32), BigUint::from(3u32)]);
        }
    }

    #[test]
    fn test_six_bit_key_uses_five_and_seven() {
        let mut rng = StdRng::seed_from_u64(3);
        let key = KeyGenerator::default().generate_with_rng(6, &mut rng).unwrap();
        assert_eq!(key.n(), &BigUint::from(35u32));
        assert_eq!(key.d(), &BigUint::from(17u32));
    }

    #[test]
    fn test_invalid_key_sizes_are_rejected() {
        let generator = KeyGenerator::default();
        let mut rng = StdRng::seed_from_u64(1);
        for bits in [0u64, 1, 2, 3, 7, 1025] {
            assert_eq!(
                generator.generate_with_rng(bits, &mut rng),
                Err(CryptoError::InvalidKeySize { requested: bits })
            );
        }
    }

    #[test]
    fn test_retry_budget_is_bounded() {
        let generator = KeyGenerator::new(KeyGenConfig {
            max_attempts: 4,
            miller_rabin_rounds: Some(10),
        });
        assert_eq!(
            generator.generate_with_rng(6, &mut ZeroRng),
            Err(CryptoError::RetriesExhausted { bits: 6, attempts: 4 })
        );
    }

    #[test]
    fn test_zero_attempts_fails_immediately() {
        let generator = KeyGenerator::new(KeyGenConfig {
            max_attempts: 0,
            miller_rabin_rounds: None,
        });
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(
            generator.generate_with_rng(64, &mut rng),
            Err(CryptoError::RetriesExhausted { bits: 64, attempts: 0 })
        );
    }

    #[test]
    fn test_from_parts_checks_coherence() {
        let big = |v: u32| BigUint::from(v);
        // p = 61, q = 53, phi = 3120, d = 65537^-1 mod 3120 = 2753
        let key = KeyTuple::from_parts(big(3233), big(65537), big(61), big(53), big(2753)).unwrap();
        assert_eq!(key.phi(), Some(big(3120)));

        assert!(matches!(
            KeyTuple::from_parts(big(3234), big(65537), big(61), big(53), big(2753)),
            Err(CryptoError::KeyCoherenceError(_))
        ));
        assert!(matches!(
            KeyTuple::from_parts(big(3233), big(65537), big(61), big(53), big(2754)),
            Err(CryptoError::KeyCoherenceError(_))
        ));
        assert!(matches!(
            KeyTuple::from_parts(big(3721), big(65537), big(61), big(61), big(1)),
            Err(CryptoError::KeyCoherenceError(_))
        ));
        assert!(matches!(
            KeyTuple::from_parts(big(0), big(65537), big(0), big(53), big(1)),
            Err(CryptoError::KeyCoherenceError(_))
        ));
    }

    #[test]
    fn test_zeroize_clears_secret_fields() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut key = KeyGenerator::default().generate_with_rng(64, &mut rng).unwrap();
        let n = key.n().clone();
        key.zeroize();
        assert!(key.p().is_zero());
        assert!(key.q().is_zero());
        assert!(key.d().is_zero());
        assert_eq!(key.n(), &n);
    }

    #[test]
    fn test_phi_is_none_after_zeroize() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut key = KeyGenerator::default().generate_with_rng(32, &mut rng).unwrap();
        assert!(key.phi().is_some());
        key.zeroize();
        assert_eq!(key.phi(), None);
    }
}
