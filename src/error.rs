//! Contains the error type shared by the decoder and the interpreter.
//!
//! Every fault is fatal: decoding or execution stops at the point of detection and the error is
//! handed back to the caller unchanged.

use std::io;

use crate::model::class_file::constant_pool::Tag;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The class file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The first four bytes are not `0xCAFEBABE`.
    #[error("bad magic number {found:#010x}")]
    BadMagic { found: u32 },
    /// A constant pool entry carries a tag this decoder does not know.
    #[error("unknown constant pool tag {tag} for entry #{index}")]
    UnknownConstantTag { tag: u8, index: u16 },
    /// A read ran past the end of the buffer.
    #[error("unexpected end of input at byte {position}: needed {needed} bytes, {remaining} left")]
    UnexpectedEof { position: usize, needed: usize, remaining: usize },

    /// A constant pool index is 0 or past the end of the pool.
    #[error("constant pool index #{index} is out of range (pool holds {len} entries)")]
    PoolIndexOutOfRange { index: u16, len: usize },
    /// A constant pool entry is not of the expected variant.
    #[error("constant pool entry #{index} is a {actual}, expected a {expected}")]
    PoolTypeMismatch { index: u16, expected: Tag, actual: Tag },
    /// A descriptor string does not follow the descriptor grammar.
    #[error("malformed descriptor {descriptor:?}")]
    MalformedDescriptor { descriptor: String },

    #[error("operand stack underflow at pc {pc}")]
    StackUnderflow { pc: usize },
    #[error("local variable {index} is out of range (frame has {len} slots)")]
    LocalIndexOutOfRange { index: usize, len: usize },
    /// A stack value of the wrong kind reached an instruction.
    #[error("expected {expected} operand at pc {pc}, found {found}")]
    OperandTypeMismatch { pc: usize, expected: &'static str, found: String },
    #[error("unknown opcode {opcode:#04x} at pc {pc}")]
    UnknownOpcode { opcode: u8, pc: usize },
    /// Execution reached the end of the code array without a return instruction.
    #[error("fell off the end of the code at pc {pc}")]
    FellOffCode { pc: usize },
    #[error("no method {name}{descriptor} in class")]
    MethodNotFound { name: String, descriptor: String },
    /// The invoked method is `native` or `abstract` and has nothing to run.
    #[error("method {name}{descriptor} has no Code attribute")]
    MissingCode { name: String, descriptor: String },
    #[error("no native binding for {class}.{member}")]
    NativeBindingNotFound { class: String, member: String },
}
