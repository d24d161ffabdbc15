/// Module for managing the textual side of the language: radix-aware
/// literal parsing and the per-source token scanner.
pub mod lang;

/// Module for the runtime: the flash arena and stacks, the dictionary,
/// the inner and outer interpreters, and the built-in word set.
#[macro_use]
pub mod runtime;

/// Interpreter version, reported by the startup banner as MM.NN.RR.
pub const VERSION: &str = "00.17.02";

/// Locale tag reported by the startup banner.
pub const LOCALE: &str = "EN";
