pub mod math;
pub mod rsa_keygen;
pub mod rsa_encrypt;
pub mod rsa_decrypt;
