use std::fs;
use std::io;
use std::path::Path;
use num_bigint::BigUint;
use num_traits::Num;
use crate::rsa::rsa_keygen::KeyTuple;
use crate::crypto_error::CryptoError;

// ============================================================================
// Format des fichiers rsa_<bits>_params.txt
//
// Cinq lignes par clé, dans l'ordre n, e, p, q, d :
//   n = 0x<hex minuscule>
// Aucune ligne d'en-tête ni de séparateur entre les clés.
// ============================================================================

/// Taille maximale d'un fichier de paramètres en octets (1 Mo).
/// Dix clés 15360 bits occupent environ 120 Ko.
pub const MAX_PARAMS_FILE_BYTES: u64 = 1 << 20;

/// Longueur maximale d'un champ hexadécimal en caractères.
/// Couvre n jusqu'à 32768 bits (8192 hex) ; un n de 15360 bits en fait 3840.
pub const MAX_HEX_FIELD_LEN: usize = 8_192;

const FIELD_ORDER: [char; 5] = ['n', 'e', 'p', 'q', 'd'];

pub fn params_file_name(bits: u64) -> String {
    format!("rsa_{bits}_params.txt")
}

// ============================================================================
// Écriture
// ============================================================================

pub fn format_params(keys: &[KeyTuple]) -> String {
    let mut out = String::new();
    for key in keys {
        for (name, value) in key.fields() {
            out.push_str(&format!("{name} = 0x{value:x}\n"));
        }
    }
    out
}

/// Écrit les clés dans `path` (fichier écrasé s'il existe).
/// Les erreurs I/O remontent telles quelles.
pub fn save_params_file(keys: &[KeyTuple], path: impl AsRef<Path>) -> io::Result<()> {
    fs::write(path, format_params(keys))
}

// ============================================================================
// Lecture
// ============================================================================

/// Convertit une string hex minuscule en BigUint.
///
/// Vérifie la longueur du champ AVANT la conversion pour éviter une
/// conversion BigUint géante (vecteur DoS CPU).
pub fn hex_to_biguint(hex_str: &str) -> Result<BigUint, CryptoError> {
    if hex_str.len() > MAX_HEX_FIELD_LEN {
        return Err(CryptoError::HexFieldTooLong {
            actual:  hex_str.len(),
            maximum: MAX_HEX_FIELD_LEN,
        });
    }
    if hex_str.is_empty() || !hex_str.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(CryptoError::HexParseError);
    }
    BigUint::from_str_radix(hex_str, 16)
        .map_err(|_| CryptoError::HexParseError)
}

fn parse_line(line: &str, line_no: usize, expected: char) -> Result<BigUint, CryptoError> {
    let (name, value) = line
        .split_once(" = ")
        .ok_or(CryptoError::MalformedLine { line: line_no })?;

    if name != expected.to_string() {
        return Err(CryptoError::UnexpectedField {
            line: line_no,
            expected,
            found: name.to_string(),
        });
    }

    let hex = value
        .strip_prefix("0x")
        .ok_or(CryptoError::MalformedLine { line: line_no })?;
    hex_to_biguint(hex)
}

/// Relit un contenu produit par format_params, clé par clé, dans l'ordre.
/// Chaque clé doit passer KeyTuple::from_parts.
pub fn parse_params(text: &str) -> Result<Vec<KeyTuple>, CryptoError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() % FIELD_ORDER.len() != 0 {
        return Err(CryptoError::TruncatedKey { lines: lines.len() });
    }

    let mut keys = Vec::with_capacity(lines.len() / FIELD_ORDER.len());
    for (index, chunk) in lines.chunks(FIELD_ORDER.len()).enumerate() {
        let first_line = index * FIELD_ORDER.len() + 1;
        let field = |offset: usize| parse_line(chunk[offset], first_line + offset, FIELD_ORDER[offset]);

        let n = field(0)?;
        let e = field(1)?;
        let p = field(2)?;
        let q = field(3)?;
        let d = field(4)?;
        keys.push(KeyTuple::from_parts(n, e, p, q, d)?);
    }
    Ok(keys)
}

// ============================================================================
// Vérification de taille de fichier (DoS protection)
// ============================================================================

fn check_file_size(path: &Path) -> io::Result<()> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_PARAMS_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de paramètres trop grand : {} octets (maximum autorisé : {} octets)",
                meta.len(),
                MAX_PARAMS_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

pub fn load_params_file(path: impl AsRef<Path>) -> io::Result<Vec<KeyTuple>> {
    let path = path.as_ref();
    check_file_size(path)?;
    let raw = fs::read_to_string(path)?;
    parse_params(&raw)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}
