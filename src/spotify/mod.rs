//! # Spotify Integration Module
//!
//! The integration layer between tasteroast and the Spotify Web API. It
//! covers the two pieces of a roast that talk to Spotify directly:
//!
//! ```text
//! Callback handler
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code grant)
//!     └── Fan-out fetcher (ten read-only calls)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] builds the authorize URL and exchanges the authorization code
//! for an access token. The token is used once for the fan-out and dropped;
//! it is never stored or refreshed.
//!
//! ## Fan-out
//!
//! [`fetch`] issues the fixed request set of [`fetch::DEFAULT_REQUESTS`]
//! concurrently. A failing request never aborts its siblings and never
//! returns an error: it yields an [`fetch::UpstreamOutcome::Failure`] that
//! the classifier in [`crate::roast`] inspects afterwards.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - authorization code exchange
//! - `GET /me/following` - followed artists
//! - `GET /me/top/artists` - top artists, three time ranges
//! - `GET /me/top/tracks` - top tracks, three time ranges
//! - `GET /me/player/recently-played` - play history
//! - `GET /me/playlists` - the user's playlists
//! - `GET /me/tracks` - saved tracks

pub mod auth;
pub mod fetch;
