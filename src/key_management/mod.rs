pub mod param_file;
pub mod key_verify;

// Réexportations param_file
pub use param_file::{
    MAX_PARAMS_FILE_BYTES, MAX_HEX_FIELD_LEN,
    params_file_name, format_params, save_params_file,
    hex_to_biguint, parse_params, load_params_file,
};

// Réexportations key_verify
pub use key_verify::{verify_key, verify_params_file};
