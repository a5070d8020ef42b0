use crate::{config::Config, error, info, server, success, warning};

pub async fn serve(port: Option<u16>, open: bool) {
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => error!("{}. Please check your .env file.", e),
    };
    if let Some(port) = port {
        config.port = port;
    }

    let local = format!("http://127.0.0.1:{}", config.port);
    success!("tasteroast is running!");
    info!("Local:        {}", local);
    info!("Redirect URI: {}", config.spotify.redirect_uri);
    info!("(Make sure this is added to your Spotify app settings)");
    if config.apple.is_none() {
        warning!("Apple Music credentials not set, Apple Music endpoints are disabled");
    }

    let state = match server::AppState::from_config(config) {
        Ok(s) => s,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    if open {
        let login_url = format!("{local}/login");
        if webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            )
        }
    }

    if let Err(e) = server::start_api_server(state).await {
        error!("{}", e);
    }
}
