use crate::{apple, config::AppleCredentials, error};

/// Prints a freshly signed MusicKit developer token.
pub fn apple_token() {
    let Some(credentials) = AppleCredentials::from_env() else {
        error!("APPLE_TEAM_ID, APPLE_KEY_ID and APPLE_PRIVATE_KEY must all be set");
    };

    match apple::developer_token(&credentials) {
        Ok(token) => println!("{token}"),
        Err(e) => error!("{}", e),
    }
}
