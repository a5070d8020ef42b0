use rand::{Rng, distr::Alphanumeric};

pub const STORE_KEY_LEN: usize = 32;

pub fn generate_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STORE_KEY_LEN)
        .map(char::from)
        .collect()
}

/// `{client_url}/error?message=...`
pub fn error_redirect_url(client_url: &str, message: &str) -> String {
    format!(
        "{client_url}/error?message={}",
        urlencoding::encode(message)
    )
}

/// `{client_url}/roast?data=...`; base64url needs no further escaping.
pub fn roast_redirect_url(client_url: &str, encoded: &str) -> String {
    format!("{client_url}/roast?data={encoded}")
}

/// `{client_url}/roast?id=...` for payloads parked in the holding map.
pub fn stored_roast_redirect_url(client_url: &str, key: &str) -> String {
    format!("{client_url}/roast?id={key}")
}
