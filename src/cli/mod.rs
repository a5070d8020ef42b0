//! # CLI Module
//!
//! User-facing commands of the `tasteroast` binary. Output goes through the
//! crate's console macros ([`crate::info`], [`crate::success`],
//! [`crate::warning`], [`crate::error`]); fatal problems such as missing
//! configuration end the process with exit code 1.
//!
//! ## Commands
//!
//! - [`serve`] - runs the HTTP server, optionally opening the login page
//! - [`decode`] - decodes a `?data=` payload and prints the roast with its summary
//! - [`apple_token`] - signs a MusicKit developer token for local testing
//!
//! ## Usage
//!
//! ```bash
//! tasteroast serve --open
//! tasteroast decode eyJyb2FzdCI6...
//! tasteroast apple-token
//! ```

mod apple;
mod decode;
mod serve;

pub use apple::apple_token;
pub use decode::decode;
pub use serve::serve;
