//! Script preparation between the writer and the speech model.

mod normalizer;

pub use normalizer::{strip_markup, ScriptNormalizer};
