//! Random token generation for plugin identity fields.

use rand::Rng;

/// Alphabet used for generated plugin tokens
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of a generated `pluginID`
pub const PLUGIN_ID_LEN: usize = 16;

/// Length of a generated `pluginKey`
pub const PLUGIN_KEY_LEN: usize = 32;

/// Generate a random token of the given length over the fixed alphabet
pub fn generate_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}
