use std::borrow::Cow;
use std::fmt;

use super::u1;
use super::u2;
use crate::error::{Error, Result};
use crate::util::one_indexed_vec::OneIndexedVec;

#[allow(non_camel_case_types)]
pub type constant_pool_index = u2;

pub mod tags {
    use super::super::u1;
    pub const UTF_8: u1 = 1;
    pub const CLASS: u1 = 7;
    pub const STRING: u1 = 8;
    pub const FIELD_REF: u1 = 9;
    pub const METHOD_REF: u1 = 10;
    pub const NAME_AND_TYPE: u1 = 12;
}

/// The kinds of constant pool entry this decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Class,
    FieldRef,
    MethodRef,
    String,
    NameAndType,
    Utf8,
}

impl Tag {
    /// Maps a raw tag byte to a `Tag`, or `None` if the byte names an unsupported entry kind.
    pub fn from_byte(tag: u1) -> Option<Tag> {
        match tag {
            tags::CLASS => Some(Tag::Class),
            tags::FIELD_REF => Some(Tag::FieldRef),
            tags::METHOD_REF => Some(Tag::MethodRef),
            tags::STRING => Some(Tag::String),
            tags::NAME_AND_TYPE => Some(Tag::NameAndType),
            tags::UTF_8 => Some(Tag::Utf8),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Tag::Class => "Class",
            Tag::FieldRef => "Fieldref",
            Tag::MethodRef => "Methodref",
            Tag::String => "String",
            Tag::NameAndType => "NameAndType",
            Tag::Utf8 => "Utf8",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolInfo {
    /// A class or interface. `name_index` must point at a `Utf8` holding the binary class name.
    Class { name_index: constant_pool_index },
    FieldRef { class_index: constant_pool_index, name_and_type_index: constant_pool_index },
    MethodRef { class_index: constant_pool_index, name_and_type_index: constant_pool_index },
    String { string_index: constant_pool_index },
    NameAndType {
        name_index: constant_pool_index,
        descriptor_index: constant_pool_index,
    },
    Utf8 { bytes: Vec<u1> },
}

impl ConstantPoolInfo {
    pub fn tag(&self) -> Tag {
        match *self {
            ConstantPoolInfo::Class { .. } => Tag::Class,
            ConstantPoolInfo::FieldRef { .. } => Tag::FieldRef,
            ConstantPoolInfo::MethodRef { .. } => Tag::MethodRef,
            ConstantPoolInfo::String { .. } => Tag::String,
            ConstantPoolInfo::NameAndType { .. } => Tag::NameAndType,
            ConstantPoolInfo::Utf8 { .. } => Tag::Utf8,
        }
    }

    /// The pool indices this entry refers to, each paired with the tag the target must carry.
    pub fn references(&self) -> Vec<(constant_pool_index, Tag)> {
        match *self {
            ConstantPoolInfo::Class { name_index } => vec![(name_index, Tag::Utf8)],
            ConstantPoolInfo::FieldRef { class_index, name_and_type_index }
            | ConstantPoolInfo::MethodRef { class_index, name_and_type_index } => vec![
                (class_index, Tag::Class),
                (name_and_type_index, Tag::NameAndType),
            ],
            ConstantPoolInfo::String { string_index } => vec![(string_index, Tag::Utf8)],
            ConstantPoolInfo::NameAndType { name_index, descriptor_index } => {
                vec![(name_index, Tag::Utf8), (descriptor_index, Tag::Utf8)]
            }
            ConstantPoolInfo::Utf8 { .. } => vec![],
        }
    }
}

impl fmt::Display for ConstantPoolInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConstantPoolInfo::Class { name_index } => write!(f, "Class\t#{}", name_index),
            ConstantPoolInfo::FieldRef { class_index, name_and_type_index } =>
                write!(f, "Fieldref\t#{}.#{}", class_index, name_and_type_index),
            ConstantPoolInfo::MethodRef { class_index, name_and_type_index } =>
                write!(f, "Methodref\t#{}.#{}", class_index, name_and_type_index),
            ConstantPoolInfo::String { string_index } => write!(f, "String\t#{}", string_index),
            ConstantPoolInfo::NameAndType { name_index, descriptor_index } =>
                write!(f, "NameAndType\t#{}:#{}", name_index, descriptor_index),
            ConstantPoolInfo::Utf8 { ref bytes } =>
                write!(f, "Utf8\t{}", String::from_utf8_lossy(bytes)),
        }
    }
}

/// A `Class` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassInfo {
    pub name_index: constant_pool_index,
}

/// A `Fieldref` or `Methodref` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef {
    pub class_index: constant_pool_index,
    pub name_and_type_index: constant_pool_index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameAndType {
    pub name_index: constant_pool_index,
    pub descriptor_index: constant_pool_index,
}

/// The constant pool of a class file. Entries are addressed from 1 to `len()`; index 0 is
/// reserved and never resolves.
///
/// The typed accessors are the only place entry tags are checked. Each fails with
/// `Error::PoolIndexOutOfRange` for index 0 or an index past the end, and with
/// `Error::PoolTypeMismatch` when the entry is of another kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
    entries: OneIndexedVec<ConstantPoolInfo>,
}

impl ConstantPool {
    pub fn from_zero_indexed_vec(vec: Vec<ConstantPoolInfo>) -> Self {
        ConstantPool { entries: OneIndexedVec::from(vec) }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries with their pool index.
    pub fn iter(&self) -> impl Iterator<Item = (constant_pool_index, &ConstantPoolInfo)> {
        self.entries.indexed().map(|(i, entry)| (i as constant_pool_index, entry))
    }

    pub fn get(&self, index: constant_pool_index) -> Result<&ConstantPoolInfo> {
        self.entries.get(index as usize).ok_or(Error::PoolIndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Fails unless the entry at `index` exists and carries `expected`.
    pub fn expect_tag(&self, index: constant_pool_index, expected: Tag) -> Result<()> {
        let actual = self.get(index)?.tag();
        if actual == expected {
            Ok(())
        } else {
            Err(Error::PoolTypeMismatch { index, expected, actual })
        }
    }

    fn mismatch<T>(&self, index: constant_pool_index, expected: Tag, actual: &ConstantPoolInfo)
                   -> Result<T> {
        Err(Error::PoolTypeMismatch { index, expected, actual: actual.tag() })
    }

    pub fn class_info(&self, index: constant_pool_index) -> Result<ClassInfo> {
        match *self.get(index)? {
            ConstantPoolInfo::Class { name_index } => Ok(ClassInfo { name_index }),
            ref other => self.mismatch(index, Tag::Class, other),
        }
    }

    pub fn field_ref(&self, index: constant_pool_index) -> Result<MemberRef> {
        match *self.get(index)? {
            ConstantPoolInfo::FieldRef { class_index, name_and_type_index } =>
                Ok(MemberRef { class_index, name_and_type_index }),
            ref other => self.mismatch(index, Tag::FieldRef, other),
        }
    }

    pub fn method_ref(&self, index: constant_pool_index) -> Result<MemberRef> {
        match *self.get(index)? {
            ConstantPoolInfo::MethodRef { class_index, name_and_type_index } =>
                Ok(MemberRef { class_index, name_and_type_index }),
            ref other => self.mismatch(index, Tag::MethodRef, other),
        }
    }

    pub fn name_and_type(&self, index: constant_pool_index) -> Result<NameAndType> {
        match *self.get(index)? {
            ConstantPoolInfo::NameAndType { name_index, descriptor_index } =>
                Ok(NameAndType { name_index, descriptor_index }),
            ref other => self.mismatch(index, Tag::NameAndType, other),
        }
    }

    pub fn utf8_bytes(&self, index: constant_pool_index) -> Result<&[u1]> {
        match *self.get(index)? {
            ConstantPoolInfo::Utf8 { ref bytes } => Ok(bytes),
            ref other => self.mismatch(index, Tag::Utf8, other),
        }
    }

    /// The text of a `Utf8` entry. Bytes that are not valid UTF-8 are replaced rather than
    /// rejected, since class files use a modified encoding.
    pub fn utf8_string(&self, index: constant_pool_index) -> Result<Cow<str>> {
        self.utf8_bytes(index).map(String::from_utf8_lossy)
    }

    /// Follows a `String` entry to the text it names.
    pub fn string_constant(&self, index: constant_pool_index) -> Result<Cow<str>> {
        match *self.get(index)? {
            ConstantPoolInfo::String { string_index } => self.utf8_string(string_index),
            ref other => self.mismatch(index, Tag::String, other),
        }
    }

    /// Follows a `Class` entry to the class name.
    pub fn class_name(&self, index: constant_pool_index) -> Result<Cow<str>> {
        let class = self.class_info(index)?;
        self.utf8_string(class.name_index)
    }
}
