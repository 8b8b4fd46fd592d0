use std::rc::Rc;

use crate::error::{Error, Result};
use crate::model::class_file::{ClassFile, CodeAttribute};
use crate::parser::cursor::Cursor;
use crate::vm;
use crate::vm::bytecode::{mnemonic, opcode};
use crate::vm::constant_pool::{resolve_field_ref, resolve_method_ref};
use crate::vm::native::NativeBridge;
use crate::vm::sig::{MethodDescriptor, Type};
use crate::vm::value::Value;

/// A frame is used to store data and partial results for one method invocation, and to hand its
/// return value back to the caller.
#[derive(Debug)]
pub struct Frame<'a> {
    /// The class containing the currently executing method.
    current_class: &'a ClassFile,
    /// Contains the bytecode currently executing in this frame.
    method_code: &'a CodeAttribute,
    /// Reads instructions and their immediate operands from `method_code`.
    code: Cursor<'a>,
    /// Offset of the instruction being executed.
    pc: usize,
    /// The local variables of the current method. The length is fixed for the life of the frame.
    local_variables: Vec<Value>,
    /// The operand stack manipulated by the instructions of the current method.
    operand_stack: Vec<Value>,
}

impl<'a> Frame<'a> {
    pub fn new(current_class: &'a ClassFile, method_code: &'a CodeAttribute,
               local_variables: Vec<Value>) -> Self {
        Frame {
            current_class,
            method_code,
            code: Cursor::new(&method_code.code),
            pc: 0,
            local_variables,
            operand_stack: Vec::with_capacity(method_code.max_stack as usize),
        }
    }

    fn push(&mut self, value: Value) {
        self.operand_stack.push(value);
    }

    fn pop(&mut self) -> Result<Value> {
        self.operand_stack.pop().ok_or(Error::StackUnderflow { pc: self.pc })
    }

    fn type_mismatch<T>(&self, expected: &'static str, found: &Value) -> Result<T> {
        Err(Error::OperandTypeMismatch {
            pc: self.pc,
            expected,
            found: found.kind().to_owned(),
        })
    }

    /// Pops `count` values, returned in the order they were pushed.
    fn pop_args(&mut self, count: usize) -> Result<Vec<Value>> {
        if self.operand_stack.len() < count {
            return Err(Error::StackUnderflow { pc: self.pc });
        }
        let start = self.operand_stack.len() - count;
        Ok(self.operand_stack.split_off(start))
    }

    fn load(&mut self, index: usize) -> Result<()> {
        let value = self.local_variables.get(index).cloned().ok_or(Error::LocalIndexOutOfRange {
            index,
            len: self.local_variables.len(),
        })?;
        self.push(value);
        Ok(())
    }

    fn store(&mut self, index: usize) -> Result<()> {
        let len = self.local_variables.len();
        if index >= len {
            return Err(Error::LocalIndexOutOfRange { index, len });
        }
        self.local_variables[index] = self.pop()?;
        Ok(())
    }

    /// Turns a popped argument into the form a native method receives: `ldc` indices for
    /// reference parameters are resolved to their string constants, primitives pass through.
    fn native_arg(&self, ty: &Type, arg: Value) -> Result<Value> {
        match (ty.is_reference(), arg) {
            (true, Value::Constant(index)) => {
                let text = self.current_class.constant_pool.string_constant(index)?;
                Ok(Value::String(Rc::from(text.as_ref())))
            }
            (true, arg @ Value::String(_)) | (true, arg @ Value::Native(_)) => Ok(arg),
            (false, arg @ Value::Int(_)) => Ok(arg),
            (true, ref other) => self.type_mismatch("reference", other),
            (false, ref other) => self.type_mismatch("int", other),
        }
    }

    fn invoke_virtual(&mut self, index: u16, natives: &NativeBridge) -> Result<()> {
        let class = self.current_class;
        let constant_pool = &class.constant_pool;
        let method = resolve_method_ref(constant_pool, index)?;
        let descriptor = MethodDescriptor::parse(method.descriptor())?;

        let popped = self.pop_args(descriptor.params.len())?;
        let args = descriptor.params.iter()
            .zip(popped)
            .map(|(ty, arg)| self.native_arg(ty, arg))
            .collect::<Result<Vec<_>>>()?;

        let field_index = match self.pop()? {
            Value::StaticField(field_index) => field_index,
            ref other => return self.type_mismatch("static field", other),
        };
        let field = resolve_field_ref(constant_pool, field_index)?;
        let receiver = natives.static_field(field.owning_class_name(), field.member_name())?;
        let native_method = natives.method(method.owning_class_name(), method.member_name())?;

        debug!("invokevirtual {}.{}{} on {}.{} with {} args", method.owning_class_name(),
               method.member_name(), method.descriptor(), field.owning_class_name(),
               field.member_name(), args.len());
        if let Some(value) = native_method.invoke(receiver, &args)? {
            self.push(value);
        }
        Ok(())
    }

    fn invoke_static(&mut self, index: u16, natives: &NativeBridge) -> Result<()> {
        let class = self.current_class;
        let method = resolve_method_ref(&class.constant_pool, index)?;
        let descriptor = MethodDescriptor::parse(method.descriptor())?;
        let args = self.pop_args(descriptor.params.len())?;

        let target = class.find_method(method.name_index, method.descriptor())
            .ok_or_else(|| Error::MethodNotFound {
                name: method.member_name().to_owned(),
                descriptor: method.descriptor().to_owned(),
            })?;

        debug!("invokestatic {}.{}{} with {:?}", method.owning_class_name(),
               method.member_name(), method.descriptor(), args);
        if let Some(value) = vm::invoke(class, target, args, natives)? {
            debug!("{} returned {}", method.member_name(), value);
            self.push(value);
        }
        Ok(())
    }

    /// Executes the method's code until a return instruction, yielding the returned value for
    /// `ireturn` and `None` for `return`.
    pub fn run(mut self, natives: &NativeBridge) -> Result<Option<Value>> {
        trace!("new frame: {} code bytes, max_stack {}, {} locals", self.method_code.code.len(),
               self.method_code.max_stack, self.local_variables.len());
        loop {
            if self.code.is_at_end() {
                return Err(Error::FellOffCode { pc: self.code.position() });
            }
            self.pc = self.code.position();
            let op = self.code.read_u1()?;
            trace!("{:>5}: {} (stack depth {})", self.pc, mnemonic(op), self.operand_stack.len());

            match op {
                opcode::BIPUSH => {
                    // the immediate is pushed as an unsigned byte
                    let value = self.code.read_u1()?;
                    self.push(Value::int(value as i32));
                },
                opcode::LDC => {
                    let index = self.code.read_u1()?;
                    self.push(Value::Constant(index as u16));
                },

                opcode::ILOAD_0 => self.load(0)?,
                opcode::ILOAD_1 => self.load(1)?,
                opcode::ILOAD_2 => self.load(2)?,
                opcode::ILOAD_3 => self.load(3)?,
                opcode::ISTORE_0 => self.store(0)?,
                opcode::ISTORE_1 => self.store(1)?,
                opcode::ISTORE_2 => self.store(2)?,
                opcode::ISTORE_3 => self.store(3)?,

                opcode::IADD => {
                    let rhs = self.pop()?;
                    let lhs = self.pop()?;
                    match (lhs, rhs) {
                        (Value::Int(lhs), Value::Int(rhs)) => self.push(Value::Int(lhs + rhs)),
                        (Value::Int(_), ref other) | (ref other, _) =>
                            return self.type_mismatch("int", other),
                    }
                },

                opcode::IRETURN => return self.pop().map(Some),
                opcode::RETURN => return Ok(None),

                opcode::GETSTATIC => {
                    let index = self.code.read_u2()?;
                    let field = resolve_field_ref(&self.current_class.constant_pool, index)?;
                    trace!("       => {}.{} {}", field.owning_class_name(), field.member_name(),
                           field.descriptor());
                    self.push(Value::StaticField(index));
                },
                opcode::INVOKEVIRTUAL => {
                    let index = self.code.read_u2()?;
                    self.invoke_virtual(index, natives)?;
                },
                opcode::INVOKESTATIC => {
                    let index = self.code.read_u2()?;
                    self.invoke_static(index, natives)?;
                },

                _ => return Err(Error::UnknownOpcode { opcode: op, pc: self.pc }),
            }
        }
    }
}
