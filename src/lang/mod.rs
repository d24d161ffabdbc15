/// Module for parsing and formatting numeric literals in any radix the
/// interpreter supports.
pub mod numbers;

/// Module for the input source descriptor and the token scanner that
/// walks its line buffer.
pub mod source;
