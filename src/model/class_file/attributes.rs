use super::u1;
use super::u2;
use super::constant_pool_index;

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionTableEntry {
    /// Indicates the (inclusive) start of the range in the `code` array at
    /// which the exception handler is active. The exception handler is active
    /// in the range `[start_pc, end_pc)`.
    pub start_pc: u2,
    /// Indicates the (exclusive) end of the range in the `code` array at which
    /// the exception handler is active.
    pub end_pc: u2,
    /// The start of the exception handler in the `code` array.
    pub handler_pc: u2,
    /// Zero, or an index of a `Class` entry naming the exceptions this handler
    /// catches. The interpreter never dispatches to handlers; the table is kept
    /// for completeness only.
    pub catch_type: constant_pool_index,
}

/// The body of a `Code` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    /// A valid index into the `constant_pool` table naming the attribute,
    /// i.e. a `Utf8` entry reading `"Code"`.
    pub attribute_name_index: constant_pool_index,
    /// The maximum depth of the operand stack of this method.
    pub max_stack: u2,
    /// The number of local variables in the local variable array allocated
    /// upon invocation of this method, including the slots used to pass
    /// parameters.
    pub max_locals: u2,
    /// The bytes of JVM code that implement the method.
    pub code: Vec<u1>,
    pub exception_table: Vec<ExceptionTableEntry>,
    /// Nested attributes such as `LineNumberTable`, kept opaque.
    pub attributes: Vec<AttributeInfo>,
}

/// An attribute the interpreter does not look inside of.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub attribute_name_index: constant_pool_index,
    pub info: Vec<u1>,
}
