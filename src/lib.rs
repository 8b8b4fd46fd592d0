#![doc(html_root_url = "https://maxmcc.github.io/rust-jvm/")]

//! Decodes Java class files and runs the entry method of a single class against a small native
//! bridge standing in for the Java standard library.

#[macro_use]
extern crate log;

pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod util;
pub mod vm;

pub use crate::error::{Error, Result};
pub use crate::parser::class_file::parse_class_file;

/// Decodes `bytes` as a class file and runs its `main` method.
pub fn run_class_bytes(bytes: &[u8], natives: &vm::NativeBridge) -> Result<Option<vm::Value>> {
    let class = parse_class_file(bytes)?;
    vm::run_main(&class, natives)
}
