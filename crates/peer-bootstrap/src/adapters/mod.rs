//! # Adapters
//!
//! Concrete implementations for the outbound ports and config loading.
//!
//! - `resolver` - multiaddr-style seed address parsing (always available)
//! - `config` - TOML config loading (feature `toml-config`)

pub mod resolver;

#[cfg(feature = "toml-config")]
pub mod config;

pub use resolver::MultiaddrResolver;

#[cfg(feature = "toml-config")]
pub use config::TomlConfigLoader;
