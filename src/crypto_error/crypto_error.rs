// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Les fonctions de fichiers retournent io::Result et convertissent ces
// erreurs en io::ErrorKind::InvalidData.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Taille de clé impaire ou < 4 bits (bornes p, q sans signification)
    InvalidKeySize { requested: u64 },
    /// Le message m est >= n
    MessageOutOfRange,
    /// Le chiffré c est >= n
    CiphertextOutOfRange,

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,
    /// Conversion BigInt -> BigUint échouée (résultat négatif — invariant interne)
    NegativeConversion,
    /// Budget de tirages (p, q) épuisé sans paire inversible
    RetriesExhausted { bits: u64, attempts: u32 },

    // --- Erreurs de parsing des fichiers de paramètres ---
    /// Parsing hexadécimal invalide dans un champ
    HexParseError,
    /// Champ hex trop long : vecteur DoS potentiel (conversion BigUint coûteuse)
    HexFieldTooLong { actual: usize, maximum: usize },
    /// Ligne qui ne respecte pas `nom = 0x<hex>`
    MalformedLine { line: usize },
    /// Champ inattendu à cette position (ordre n, e, p, q, d)
    UnexpectedField { line: usize, expected: char, found: String },
    /// Le fichier se termine au milieu d'une clé
    TruncatedKey { lines: usize },
    /// n != p*q, p == q ou e*d != 1 mod phi : fichier corrompu ou falsifié
    KeyCoherenceError(String),

    // --- Vérification ---
    /// Une propriété de la clé n'est pas satisfaite
    VerificationFailed(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKeySize { requested } =>
                write!(f, "Taille de clé {requested} bits invalide : doit être paire et >= 4"),
            CryptoError::MessageOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n)"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::NegativeConversion =>
                write!(f, "Conversion interne BigInt -> BigUint : résultat négatif inattendu"),
            CryptoError::RetriesExhausted { bits, attempts } =>
                write!(f, "Génération {bits} bits abandonnée après {attempts} tentatives"),
            CryptoError::HexParseError =>
                write!(f, "Parsing hexadécimal invalide dans le fichier de paramètres"),
            CryptoError::HexFieldTooLong { actual, maximum } =>
                write!(f, "Champ hexadécimal trop long : {actual} caractères (maximum autorisé : {maximum})"),
            CryptoError::MalformedLine { line } =>
                write!(f, "Ligne {line} mal formée : attendu `nom = 0x<hex>`"),
            CryptoError::UnexpectedField { line, expected, found } =>
                write!(f, "Ligne {line} : champ `{expected}` attendu, `{found}` trouvé"),
            CryptoError::TruncatedKey { lines } =>
                write!(f, "Fichier tronqué : {lines} lignes, pas un multiple de 5"),
            CryptoError::KeyCoherenceError(msg) =>
                write!(f, "Clé incohérente : {msg}"),
            CryptoError::VerificationFailed(msg) =>
                write!(f, "Vérification échouée : {msg}"),
        }
    }
}

impl std::error::Error for CryptoError {}
