//! Internal representations of the values an interpreter frame works with.

use std::any::Any;
use std::fmt;
use std::num::Wrapping;
use std::rc::Rc;

use crate::model::class_file::constant_pool_index;

/// A value on the operand stack or in a local variable slot.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 32-bit integral value, representing the Java types `byte`, `char`, `short`, `int` and
    /// `boolean`.
    Int(Wrapping<i32>),
    /// A constant pool index pushed by `ldc`, resolved only when it is consumed.
    Constant(constant_pool_index),
    /// A `Fieldref` index pushed by `getstatic`, resolved through the native bridge when it is
    /// used as the receiver of a call.
    StaticField(constant_pool_index),
    /// Text resolved from a `String` constant.
    String(Rc<str>),
    /// An object owned by the host, such as a print stream.
    Native(NativeObject),
}

impl Value {
    pub fn int(value: i32) -> Self {
        Value::Int(Wrapping(value))
    }

    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match *self {
            Value::Int(_) => "int",
            Value::Constant(_) => "constant",
            Value::StaticField(_) => "static field",
            Value::String(_) => "string",
            Value::Native(_) => "native object",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(Wrapping(0))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Constant(a), Value::Constant(b)) => a == b,
            (Value::StaticField(a), Value::StaticField(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Int(Wrapping(value)) => write!(f, "{}", value),
            Value::Constant(index) => write!(f, "#{}", index),
            Value::StaticField(index) => write!(f, "static #{}", index),
            Value::String(ref text) => f.write_str(text),
            Value::Native(ref object) => write!(f, "{:?}", object),
        }
    }
}

/// A shared handle to a host object. The interpreter never looks inside; native methods
/// downcast it to the type they expect.
#[derive(Clone)]
pub struct NativeObject(Rc<dyn Any>);

impl NativeObject {
    pub fn new<T: Any>(object: T) -> Self {
        NativeObject(Rc::new(object))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native object>")
    }
}
