//! Type descriptors, parsed from the compact textual form used in class files.

use std::str::Chars;

use crate::error::{Error, Result};

/// A field type, or a parameter or return type of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    /// An object type, holding the binary class name, e.g. `java/lang/String`.
    Reference(String),
    Array(Box<Type>),
}

impl Type {
    /// Parses a single field descriptor such as `I` or `Ljava/lang/String;`.
    pub fn new(descriptor: &str) -> Result<Self> {
        let mut chars = descriptor.chars();
        let ty = Self::next(&mut chars).ok_or_else(|| malformed(descriptor))?;
        match chars.next() {
            None => Ok(ty),
            Some(_) => Err(malformed(descriptor)),
        }
    }

    fn next(chars: &mut Chars) -> Option<Self> {
        let ty = match chars.next()? {
            'B' => Type::Byte,
            'C' => Type::Char,
            'D' => Type::Double,
            'F' => Type::Float,
            'I' => Type::Int,
            'J' => Type::Long,
            'S' => Type::Short,
            'Z' => Type::Boolean,
            'L' => {
                let mut name = String::new();
                loop {
                    match chars.next()? {
                        ';' => break,
                        c => name.push(c),
                    }
                }
                if name.is_empty() {
                    return None;
                }
                Type::Reference(name)
            }
            '[' => Type::Array(Box::new(Self::next(chars)?)),
            _ => return None,
        };
        Some(ty)
    }

    /// Whether values of this type are object references rather than primitives.
    pub fn is_reference(&self) -> bool {
        matches!(*self, Type::Reference(_) | Type::Array(_))
    }
}

/// The parameter and return types of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub params: Vec<Type>,
    /// `None` for `void` methods.
    pub return_type: Option<Type>,
}

impl MethodDescriptor {
    /// Parses a method descriptor such as `(ILjava/lang/String;)V`.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let params_and_return = descriptor.strip_prefix('(').ok_or_else(|| malformed(descriptor))?;
        let (params, return_type) = params_and_return.split_once(')')
            .ok_or_else(|| malformed(descriptor))?;

        let mut chars = params.chars();
        let mut param_types = vec![];
        while !chars.as_str().is_empty() {
            param_types.push(Type::next(&mut chars).ok_or_else(|| malformed(descriptor))?);
        }

        let return_type = match return_type {
            "V" => None,
            ty => Some(Type::new(ty).map_err(|_| malformed(descriptor))?),
        };
        Ok(MethodDescriptor { params: param_types, return_type })
    }
}

fn malformed(descriptor: &str) -> Error {
    Error::MalformedDescriptor { descriptor: descriptor.to_owned() }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_method_descriptors() {
        let descriptor = MethodDescriptor::parse("(ILjava/lang/String;[[J)V").unwrap();
        assert_eq!(descriptor.params, vec![
            Type::Int,
            Type::Reference(String::from("java/lang/String")),
            Type::Array(Box::new(Type::Array(Box::new(Type::Long)))),
        ]);
        assert_eq!(descriptor.return_type, None);

        let descriptor = MethodDescriptor::parse("(II)I").unwrap();
        assert_eq!(descriptor.params, vec![Type::Int, Type::Int]);
        assert_eq!(descriptor.return_type, Some(Type::Int));

        let descriptor = MethodDescriptor::parse("()Ljava/lang/Object;").unwrap();
        assert!(descriptor.params.is_empty());
        assert!(descriptor.return_type.unwrap().is_reference());
    }

    #[test]
    fn rejects_malformed_descriptors() {
        for descriptor in ["", "II)V", "(II", "(Q)V", "(L;)V", "(Ljava/lang/String)V", "()",
                           "()II", "(["] {
            assert!(matches!(MethodDescriptor::parse(descriptor),
                             Err(Error::MalformedDescriptor { .. })),
                    "{:?} should not parse", descriptor);
        }
        assert!(Type::new("IZ").is_err());
        assert_eq!(Type::new("Z").unwrap(), Type::Boolean);
    }
}
