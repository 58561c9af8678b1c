//! Secret resolution.
//!
//! The only secret Tabletalk needs is the Google API key, and the only
//! place it is ever read from is the environment. It never appears in
//! `config.toml`, logs, or error messages.

pub mod env;
