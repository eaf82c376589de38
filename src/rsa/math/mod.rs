// Réexporte toutes les fonctions mathématiques

mod math;

pub use math::{generate_prime, is_probable_prime, miller_rabin_rounds, mod_inverse};
