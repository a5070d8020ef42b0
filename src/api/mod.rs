//! # API Module
//!
//! HTTP endpoints of the tasteroast server, built on
//! [Axum](https://docs.rs/axum). All handlers share [`crate::server::AppState`].
//!
//! ## Endpoints
//!
//! ### Spotify
//!
//! - [`login`] - redirects to the Spotify authorization page
//! - [`callback`] - OAuth redirect target; exchanges the code, runs the roast
//!   pipeline and redirects to the presentation layer with the encoded result
//!
//! ### Apple Music
//!
//! - [`apple_token`] - issues a MusicKit developer token
//! - [`apple_roast`] - roasts a listening bundle posted by the browser
//!
//! Both answer `503` when Apple credentials are not configured.
//!
//! ### Presentation support
//!
//! - [`stored_roast`] - fetches a roast parked in the holding map
//!
//! ### Monitoring
//!
//! - [`health`] - status, version and server time
//!
//! ## Error handling
//!
//! No handler lets an error escape: the callback turns every
//! [`crate::error::RoastError`] into a redirect to the error page, JSON
//! endpoints into `{"error": "..."}` with a matching status code.

mod apple;
mod callback;
mod health;
mod login;
mod roast;

pub use apple::apple_roast;
pub use apple::apple_token;
pub use callback::CallbackParams;
pub use callback::callback;
pub use callback::deliver;
pub use health::health;
pub use login::login;
pub use roast::stored_roast;
