//! A minimal interpreter for the bytecode of a single decoded class.

pub mod bytecode;
pub mod constant_pool;
pub mod frame;
pub mod native;
pub mod sig;
pub mod value;

use crate::error::{Error, Result};
use crate::model::class_file::{ClassFile, CodeAttribute, MethodInfo};

pub use crate::vm::constant_pool::symref;
pub use crate::vm::frame::Frame;
pub use crate::vm::native::{NativeBridge, NativeMethod};
pub use crate::vm::value::{NativeObject, Value};

/// The number of local variable slots given to the entry method, regardless of its declared
/// `max_locals`.
pub const MAIN_LOCALS: usize = 16;

/// Runs every code attribute of `method` in order against a fresh frame, returning the result of
/// the last one. `locals` builds the local variable array of each frame.
fn execute<F>(class: &ClassFile, method: &MethodInfo, natives: &NativeBridge, mut locals: F)
              -> Result<Option<Value>>
    where F: FnMut(&CodeAttribute) -> Vec<Value>
{
    if method.code.is_empty() {
        return Err(Error::MissingCode {
            name: class.method_name(method)?,
            descriptor: class.constant_pool.utf8_string(method.descriptor_index)?.into_owned(),
        });
    }

    let mut result = None;
    for code in &method.code {
        result = Frame::new(class, code, locals(code)).run(natives)?;
    }
    Ok(result)
}

/// Invokes `method` with `args` as its leading local variables; the rest are zero.
pub fn invoke(class: &ClassFile, method: &MethodInfo, args: Vec<Value>, natives: &NativeBridge)
              -> Result<Option<Value>> {
    execute(class, method, natives, |code| {
        let mut locals = args.clone();
        locals.resize((code.max_locals as usize).max(args.len()), Value::default());
        locals
    })
}

/// Runs the class's method named `main` with `MAIN_LOCALS` zeroed local variables.
pub fn run_main(class: &ClassFile, natives: &NativeBridge) -> Result<Option<Value>> {
    let main = class.find_method_by_name("main").ok_or_else(|| Error::MethodNotFound {
        name: String::from("main"),
        descriptor: String::new(),
    })?;
    info!("running {}.main", class.name().unwrap_or_default());
    execute(class, main, natives, |_| vec![Value::default(); MAIN_LOCALS])
}
