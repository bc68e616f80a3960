//! Domain Layer - Pure bootstrap types with no I/O
//!
//! - Peer identity, address and dial context
//! - Configuration and its validation
//! - The resolved seed address book
//! - Error taxonomy
//! - Sweep reports and counters

pub mod address_book;
pub mod config;
pub mod entities;
pub mod errors;
pub mod report;

pub use address_book::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
pub use report::*;
