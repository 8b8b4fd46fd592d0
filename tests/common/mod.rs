//! Assembles class files byte by byte for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

const UTF8: u8 = 1;
const CLASS: u8 = 7;
const STRING: u8 = 8;
const FIELD_REF: u8 = 9;
const METHOD_REF: u8 = 10;
const NAME_AND_TYPE: u8 = 12;

struct Method {
    name_index: u16,
    descriptor_index: u16,
    max_stack: u16,
    max_locals: u16,
    /// `None` for a method declared without a `Code` attribute.
    code: Option<Vec<u8>>,
}

/// Builds a class file with a constant pool, a single class entry for itself and any number of
/// methods, each with one `Code` attribute.
pub struct ClassBuilder {
    pool: Vec<Vec<u8>>,
    this_class: u16,
    code_name: u16,
    methods: Vec<Method>,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        let mut builder = ClassBuilder { pool: vec![], this_class: 0, code_name: 0, methods: vec![] };
        builder.this_class = builder.class(name);
        builder.code_name = builder.utf8("Code");
        builder
    }

    fn push(&mut self, entry: Vec<u8>) -> u16 {
        self.pool.push(entry);
        self.pool.len() as u16
    }

    pub fn raw(&mut self, entry: &[u8]) -> u16 {
        self.push(entry.to_vec())
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        let mut entry = vec![UTF8];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.push(entry)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.push(two(CLASS, name_index))
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let string_index = self.utf8(text);
        self.push(two(STRING, string_index))
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.push(four(NAME_AND_TYPE, name_index, descriptor_index))
    }

    pub fn field_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type = self.name_and_type(name, descriptor);
        self.push(four(FIELD_REF, class_index, name_and_type))
    }

    pub fn method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type = self.name_and_type(name, descriptor);
        self.push(four(METHOD_REF, class_index, name_and_type))
    }

    /// A method ref to a method of the class being built, sharing the pool entries of its name
    /// and descriptor with the method declaration.
    pub fn own_method_ref(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.shared_utf8(name);
        let descriptor_index = self.shared_utf8(descriptor);
        let name_and_type = self.push(four(NAME_AND_TYPE, name_index, descriptor_index));
        let this_class = self.this_class;
        self.push(four(METHOD_REF, this_class, name_and_type))
    }

    /// Declares a method. The name and descriptor reuse existing `Utf8` entries when present.
    pub fn method(&mut self, name: &str, descriptor: &str, max_stack: u16, max_locals: u16,
                  code: &[u8]) -> &mut Self {
        let name_index = self.shared_utf8(name);
        let descriptor_index = self.shared_utf8(descriptor);
        self.methods.push(Method {
            name_index,
            descriptor_index,
            max_stack,
            max_locals,
            code: Some(code.to_vec()),
        });
        self
    }

    /// Declares a method with no `Code` attribute, as for `native` methods.
    pub fn native_method(&mut self, name: &str, descriptor: &str) -> &mut Self {
        let name_index = self.shared_utf8(name);
        let descriptor_index = self.shared_utf8(descriptor);
        self.methods.push(Method {
            name_index,
            descriptor_index,
            max_stack: 0,
            max_locals: 0,
            code: None,
        });
        self
    }

    fn shared_utf8(&mut self, text: &str) -> u16 {
        let mut expected = vec![UTF8];
        expected.extend_from_slice(&(text.len() as u16).to_be_bytes());
        expected.extend_from_slice(text.as_bytes());
        match self.pool.iter().position(|entry| *entry == expected) {
            Some(position) => position as u16 + 1,
            None => self.push(expected),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34];
        bytes.extend_from_slice(&(self.pool.len() as u16 + 1).to_be_bytes());
        for entry in &self.pool {
            bytes.extend_from_slice(entry);
        }
        // access flags, this class, no super class, no interfaces or fields
        bytes.extend_from_slice(&0x0021u16.to_be_bytes());
        bytes.extend_from_slice(&self.this_class.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        bytes.extend_from_slice(&(self.methods.len() as u16).to_be_bytes());
        for method in &self.methods {
            bytes.extend_from_slice(&0x0009u16.to_be_bytes());
            bytes.extend_from_slice(&method.name_index.to_be_bytes());
            bytes.extend_from_slice(&method.descriptor_index.to_be_bytes());
            let code = match method.code {
                Some(ref code) => code,
                None => {
                    bytes.extend_from_slice(&0u16.to_be_bytes());
                    continue;
                }
            };
            bytes.extend_from_slice(&1u16.to_be_bytes());

            bytes.extend_from_slice(&self.code_name.to_be_bytes());
            let length = 2 + 2 + 4 + code.len() + 2 + 2;
            bytes.extend_from_slice(&(length as u32).to_be_bytes());
            bytes.extend_from_slice(&method.max_stack.to_be_bytes());
            bytes.extend_from_slice(&method.max_locals.to_be_bytes());
            bytes.extend_from_slice(&(code.len() as u32).to_be_bytes());
            bytes.extend_from_slice(code);
            bytes.extend_from_slice(&[0, 0, 0, 0]);
        }

        // no class attributes
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }
}

fn two(tag: u8, index: u16) -> Vec<u8> {
    let mut entry = vec![tag];
    entry.extend_from_slice(&index.to_be_bytes());
    entry
}

fn four(tag: u8, first: u16, second: u16) -> Vec<u8> {
    let mut entry = two(tag, first);
    entry.extend_from_slice(&second.to_be_bytes());
    entry
}

/// A writer whose contents stay readable after it has been handed to a print stream.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
