pub mod rsa_decrypt;

pub use rsa_decrypt::rsa_decrypt;
