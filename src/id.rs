use rand::seq::SliceRandom;
use rand::thread_rng;

/// Characters paste ids are drawn from. Everything here is safe in a URL
/// path segment without encoding.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const ID_LENGTH: usize = 8;

/// Generate a fresh paste id.
pub fn generate_id() -> String {
    let mut rng = thread_rng();
    (0..ID_LENGTH)
        .map(|_| *ALPHABET.choose(&mut rng).unwrap() as char)
        .collect()
}
