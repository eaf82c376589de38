pub mod rsa_keygen;

pub use rsa_keygen::{
    KeyTuple, KeyGenConfig, KeyGenerator, rsa_keygen,
    PUBLIC_EXPONENT, DEFAULT_MAX_ATTEMPTS,
};
