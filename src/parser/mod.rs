//! Contains a parser for a Java class file.
//!
//! # Examples
//!
//! Basic usage:
//! ```no_run
//! use rust_jvm::parser::class_file::parse_class_file;
//!
//! let data = std::fs::read("HelloWorld.class").unwrap();
//! let class = parse_class_file(&data).unwrap();
//! println!("{}", class.name().unwrap());
//! ```

pub mod class_file;
pub mod cursor;
