//! Supported-language configuration.
//!
//! The registry is the single source of truth for which languages
//! translations are materialized in. It is built from configuration and
//! injected into the `Translator`; nothing here is a process global.

mod registry;

pub use registry::{LanguageConfig, LanguageRegistry, MAX_CODE_LEN};
