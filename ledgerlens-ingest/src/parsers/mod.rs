//! Bank-specific statement parsers

pub mod icici;
