//! Modpack CLI - inspect and unpack buildpackages.

pub mod commands;
pub mod output;
