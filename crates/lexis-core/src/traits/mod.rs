//! Core traits for lexis backends.

mod word_store;

pub use word_store::*;
