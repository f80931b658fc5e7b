//! Helpers for emitting the meta file and patching the built document.

pub mod meta;
pub mod replace;
