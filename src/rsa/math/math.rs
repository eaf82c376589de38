use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use num_integer::Integer;
use rand_core::RngCore;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire, couvre jusqu'à 2999)
// 2 est traité à part : les candidats de plus de 2 bits sont toujours impairs.
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,1009,1013,1021,
   1031,1033,1039,1049,1051,1061,1063,1069,1087,1091,
   1093,1097,1103,1109,1117,1123,1129,1151,1153,1163,
   1171,1181,1187,1193,1201,1213,1217,1223,1229,1231,
   1237,1249,1259,1277,1279,1283,1289,1291,1297,1301,
   1303,1307,1319,1321,1327,1361,1367,1373,1381,1399,
   1409,1423,1427,1429,1433,1439,1447,1451,1453,1459,
   1471,1481,1483,1487,1489,1493,1499,1511,1523,1531,
   1543,1549,1553,1559,1567,1571,1579,1583,1597,1601,
   1607,1609,1613,1619,1621,1627,1637,1657,1663,1667,
   1669,1693,1697,1699,1709,1721,1723,1733,1741,1747,
   1753,1759,1777,1783,1787,1789,1801,1811,1823,1831,
   1847,1861,1867,1871,1873,1877,1879,1889,1901,1907,
   1913,1931,1933,1949,1951,1973,1979,1987,1993,1997,
   1999,2003,2011,2017,2027,2029,2039,2053,2063,2069,
   2081,2083,2087,2089,2099,2111,2113,2129,2131,2137,
   2141,2143,2153,2161,2179,2203,2207,2213,2221,2237,
   2239,2243,2251,2267,2269,2273,2281,2287,2293,2297,
   2309,2311,2333,2339,2341,2347,2351,2357,2371,2377,
   2381,2383,2389,2393,2399,2411,2417,2423,2437,2441,
   2447,2459,2467,2473,2477,2503,2521,2531,2539,2543,
   2549,2551,2557,2579,2591,2593,2609,2617,2621,2633,
   2647,2657,2659,2663,2671,2677,2683,2687,2689,2693,
   2699,2707,2711,2713,2719,2729,2731,2741,2749,2753,
   2767,2777,2789,2791,2797,2801,2803,2819,2833,2837,
   2843,2851,2857,2861,2879,2887,2897,2903,2909,2917,
   2927,2939,2953,2957,2963,2969,2971,2999,
];

// ---------------------------------------------------------------------------
// Nombre de rounds Miller-Rabin en fonction de la taille du premier
//
// Probabilité d'erreur <= 2^-100 pour un candidat aléatoire
// (FIPS 186-4, table C.3). En dessous de 512 bits la table ne donne
// rien ; 40 rounds y coûtent peu.
// ---------------------------------------------------------------------------
pub fn miller_rabin_rounds(prime_bits: u64) -> u32 {
    match prime_bits {
        0..=511     => 40,
        512..=1023  => 7,
        1024..=1535 => 5,
        _           => 4,
    }
}

// ---------------------------------------------------------------------------
// Tire un premier d'exactement `prime_bits` bits, dans
// [2^(prime_bits-1), 2^prime_bits - 1].
//
// Le bit de poids fort est forcé. Le bit 0 est forcé dès que prime_bits >= 3
// (la plage ne contient alors que des nombres >= 4, donc aucun pair premier).
// Pour prime_bits == 2 la plage est [2, 3] et les deux sont tirés.
// ---------------------------------------------------------------------------
pub fn generate_prime<R>(prime_bits: u64, rounds: u32, rng: &mut R) -> Result<BigUint, CryptoError>
where
    R: RngCore + ?Sized,
{
    if prime_bits < 2 {
        return Err(CryptoError::InvalidKeySize { requested: prime_bits * 2 });
    }

    loop {
        let mut candidate = rng.gen_biguint(prime_bits);
        candidate.set_bit(prime_bits - 1, true);
        if prime_bits >= 3 {
            candidate.set_bit(0, true);
        }

        // is_probable_prime commence par la division par SMALL_PRIMES
        if is_probable_prime(&candidate, rounds, rng) {
            debug_assert_eq!(candidate.bits(), prime_bits);
            return Ok(candidate);
        }
    }
}

// n mod m pour m < 2^32, sans allocation : Horner sur les chiffres base 2^32,
// du poids fort au poids faible.
fn rem_small(n: &BigUint, m: u64) -> u64 {
    n.iter_u32_digits()
        .rev()
        .fold(0u64, |r, digit| ((r << 32) | u64::from(digit)) % m)
}

// ---------------------------------------------------------------------------
// Test de primalité probabiliste : division par les petits premiers puis
// `rounds` témoins de Miller-Rabin tirés dans [2, n-2].
// ---------------------------------------------------------------------------
pub fn is_probable_prime<R>(n: &BigUint, rounds: u32, rng: &mut R) -> bool
where
    R: RngCore + ?Sized,
{
    let two = BigUint::from(2u32);
    if n < &two { return false; }
    if n == &two { return true; }
    if n.is_even() { return false; }
    let small = n.to_u64();
    for &p in SMALL_PRIMES {
        if small == Some(p) { return true; }
        if rem_small(n, p) == 0 { return false; }
    }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a,n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    if n.is_zero() {
        return Err(CryptoError::NoModularInverse);
    }

    let (g, x) = extended_gcd(a, n);
    if !g.is_one() {
        return Err(CryptoError::NoModularInverse);
    }

    let n_big = BigInt::from(n.clone());
    let mut x_mod = x % &n_big;
    if x_mod < BigInt::zero() {
        x_mod += &n_big;
    }

    x_mod.to_biguint().ok_or(CryptoError::NegativeConversion)
}

// Euclide étendu : retourne (gcd, s) avec a·s ≡ gcd (mod b)
fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r.to_biguint().unwrap_or_default(), old_s)
}

// ============================================================================
// Tests unitaires
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_small_primes_and_composites() {
        let mut rng = rng();
        for p in [2u32, 3, 5, 7, 2999, 3001, 65537] {
            assert!(is_probable_prime(&BigUint::from(p), 20, &mut rng), "{p} est premier");
        }
        for c in [0u32, 1, 4, 9, 561, 1105, 3007, 65535] {
            assert!(!is_probable_prime(&BigUint::from(c), 20, &mut rng), "{c} est composé");
        }
    }

    #[test]
    fn test_mersenne_prime_127() {
        let mut rng = rng();
        let m127 = (BigUint::one() << 127u32) - BigUint::one();
        assert!(is_probable_prime(&m127, 20, &mut rng));
        // 2^128 - 1 = (2^64 - 1)(2^64 + 1)
        let m128 = (BigUint::one() << 128u32) - BigUint::one();
        assert!(!is_probable_prime(&m128, 20, &mut rng));
    }

    #[test]
    fn test_generate_prime_exact_bit_length() {
        let mut rng = rng();
        for bits in [2u64, 3, 8, 16, 64, 128] {
            let p = generate_prime(bits, miller_rabin_rounds(bits), &mut rng).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(is_probable_prime(&p, 20, &mut rng));
        }
    }

    #[test]
    fn test_generate_prime_two_bits_covers_two_and_three() {
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(generate_prime(2, 10, &mut rng).unwrap());
        }
        assert!(seen.contains(&BigUint::from(2u32)));
        assert!(seen.contains(&BigUint::from(3u32)));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_generate_prime_rejects_one_bit() {
        let mut rng = rng();
        assert!(matches!(
            generate_prime(1, 10, &mut rng),
            Err(CryptoError::InvalidKeySize { .. })
        ));
    }

    #[test]
    fn test_rem_small_matches_biguint_rem() {
        let n = (BigUint::one() << 200u32) + BigUint::from(12_345u32);
        for m in [3u64, 7, 2999] {
            let expected = (&n % BigUint::from(m)).to_u64().unwrap();
            assert_eq!(rem_small(&n, m), expected);
        }
        assert_eq!(rem_small(&BigUint::zero(), 7), 0);
    }

    #[test]
    fn test_mod_inverse() {
        let e = BigUint::from(65537u32);
        let phi = BigUint::from(3120u32); // (61-1)(53-1)
        let d = mod_inverse(&e, &phi).unwrap();
        assert_eq!((&e * &d) % &phi, BigUint::one());
        assert_eq!(d, BigUint::from(2753u32));

        assert_eq!(
            mod_inverse(&BigUint::from(6u32), &BigUint::from(9u32)),
            Err(CryptoError::NoModularInverse)
        );
        assert_eq!(
            mod_inverse(&e, &BigUint::from(2u32)).unwrap(),
            BigUint::one()
        );
    }

    #[test]
    fn test_rounds_decrease_with_size() {
        assert_eq!(miller_rabin_rounds(32), 40);
        assert_eq!(miller_rabin_rounds(512), 7);
        assert_eq!(miller_rabin_rounds(1024), 5);
        assert_eq!(miller_rabin_rounds(7680), 4);
    }
}
