//! Structures for the [Java SE 8 JVM class file
//! format](https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html), restricted to the
//! parts this virtual machine decodes.

pub mod attributes;
pub mod constant_pool;

use std::collections::HashMap;

pub use self::attributes::{AttributeInfo, CodeAttribute, ExceptionTableEntry};
pub use self::constant_pool::ConstantPoolInfo;
pub use self::constant_pool::ConstantPool;

use crate::error::Result;

/// Represents an unsigned one-byte quantity.
#[allow(non_camel_case_types)]
pub type u1 = u8;

/// Represents an unsigned two-byte quantity.
#[allow(non_camel_case_types)]
pub type u2 = u16;

/// Represents an unsigned four-byte quantity.
#[allow(non_camel_case_types)]
pub type u4 = u32;

/// Represents an index into the constant pool.
#[allow(non_camel_case_types)]
pub type constant_pool_index = constant_pool::constant_pool_index;

/// The magic number identifying the class file format.
pub const MAGIC: u4 = 0xCAFEBABE;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Mask of flags used to denote access permissions to and properties of
    /// this field.
    pub access_flags: u2,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry
    /// at that index must be a `ConstantPoolInfo::Utf8` structure representing
    /// a valid unqualified name denoting a field.
    pub name_index: constant_pool_index,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry
    /// at that index must be a `ConstantPoolInfo::Utf8` structure representing
    /// a valid field descriptor.
    pub descriptor_index: constant_pool_index,
    /// The attributes associated with this field.
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    /// Mask of flags used to denote access permissions to and properties of
    /// this method.
    pub access_flags: u2,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry
    /// at that index must be a `ConstantPoolInfo::Utf8` structure representing
    /// a valid unqualified name denoting a method.
    pub name_index: constant_pool_index,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry
    /// at that index must be a `ConstantPoolInfo::Utf8` structure representing
    /// a valid method descriptor.
    pub descriptor_index: constant_pool_index,
    /// The `Code` attributes of this method, in file order. Conventionally there is exactly one;
    /// `native` and `abstract` methods have none.
    pub code: Vec<CodeAttribute>,
    /// Every other attribute associated with this method.
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    /// Minor version number
    pub minor_version: u2,
    /// Major version number
    pub major_version: u2,
    /// Table of structures representing various string constants, class and
    /// interface names, field names, and other constants. The `constant_pool`
    /// table is indexed from 1 to `constant_pool_count - 1`.
    pub constant_pool: ConstantPool,
    /// Mask of flags used to denote access permissions to and properties of
    /// this class or interface.
    pub access_flags: u2,
    /// A valid index into the `constant_pool` table. The `constant_pool` entry
    /// at that index must be a `ConstantPoolInfo::Class` structure representing
    /// the class defined by this class file.
    pub this_class: constant_pool_index,
    /// Either zero or a valid index into the `constant_pool` table of a
    /// `ConstantPoolInfo::Class` structure denoting the direct superclass.
    pub super_class: constant_pool_index,
    /// `Class` entries of the direct superinterfaces, in source order.
    pub interfaces: Vec<constant_pool_index>,
    /// Contains only those fields declared by this class or interface.
    pub fields: Vec<FieldInfo>,
    /// Contains only those methods declared by this class or interface.
    pub methods: Vec<MethodInfo>,
    /// Contains the attributes of this class.
    pub attributes: Vec<AttributeInfo>,
    /// Positions in `methods` keyed by the pool index of the method name.
    method_index: HashMap<constant_pool_index, Vec<usize>>,
}

impl ClassFile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(minor_version: u2, major_version: u2, constant_pool: ConstantPool,
               access_flags: u2, this_class: constant_pool_index,
               super_class: constant_pool_index, interfaces: Vec<constant_pool_index>,
               fields: Vec<FieldInfo>, methods: Vec<MethodInfo>,
               attributes: Vec<AttributeInfo>) -> Self {
        let mut method_index: HashMap<constant_pool_index, Vec<usize>> = HashMap::new();
        for (position, method) in methods.iter().enumerate() {
            method_index.entry(method.name_index).or_default().push(position);
        }
        ClassFile {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
            method_index,
        }
    }

    /// The binary name of this class, e.g. `java/lang/Object`.
    pub fn name(&self) -> Result<String> {
        self.constant_pool.class_name(self.this_class).map(|name| name.into_owned())
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<String> {
        self.constant_pool.utf8_string(method.name_index).map(|name| name.into_owned())
    }

    /// Looks up a method by the pool index of its name. When several methods share the name, the
    /// one whose descriptor reads `descriptor` wins; a lone candidate is returned regardless of
    /// its descriptor.
    pub fn find_method(&self, name_index: constant_pool_index, descriptor: &str)
                       -> Option<&MethodInfo> {
        let positions = self.method_index.get(&name_index)?;
        if let [position] = positions[..] {
            return self.methods.get(position);
        }
        positions.iter()
            .map(|&position| &self.methods[position])
            .find(|method| {
                self.constant_pool.utf8_bytes(method.descriptor_index)
                    .map(|bytes| bytes == descriptor.as_bytes())
                    .unwrap_or(false)
            })
    }

    /// Finds the first method whose name reads `name`.
    pub fn find_method_by_name(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|method| {
            self.constant_pool.utf8_bytes(method.name_index)
                .map(|bytes| bytes == name.as_bytes())
                .unwrap_or(false)
        })
    }
}
