//! Resolution of member references in the constant pool to the names they stand for.

use crate::error::Result;
use crate::model::class_file::constant_pool::{constant_pool_index, MemberRef};
use crate::model::class_file::ConstantPool;

/// A reference to an unresolved structure in the constant pool, spelled out by name.
pub mod symref {

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Method {
        pub class: String,
        pub name: String,
        pub descriptor: String,
        /// Pool index of the `Utf8` entry holding the method name.
        pub name_index: u16,
    }

    impl Method {
        pub fn owning_class_name(&self) -> &str {
            &self.class
        }

        pub fn member_name(&self) -> &str {
            &self.name
        }

        pub fn descriptor(&self) -> &str {
            &self.descriptor
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Field {
        pub class: String,
        pub name: String,
        pub descriptor: String,
    }

    impl Field {
        pub fn owning_class_name(&self) -> &str {
            &self.class
        }

        pub fn member_name(&self) -> &str {
            &self.name
        }

        pub fn descriptor(&self) -> &str {
            &self.descriptor
        }
    }
}

/// Member ref → Class → Utf8 for the class name, member ref → NameAndType → Utf8 twice for the
/// member name and descriptor.
fn resolve_member(constant_pool: &ConstantPool, member: MemberRef)
                  -> Result<(String, String, String, constant_pool_index)> {
    let class = constant_pool.class_name(member.class_index)?.into_owned();
    let name_and_type = constant_pool.name_and_type(member.name_and_type_index)?;
    let name = constant_pool.utf8_string(name_and_type.name_index)?.into_owned();
    let descriptor = constant_pool.utf8_string(name_and_type.descriptor_index)?.into_owned();
    Ok((class, name, descriptor, name_and_type.name_index))
}

pub fn resolve_method_ref(constant_pool: &ConstantPool, index: constant_pool_index)
                          -> Result<symref::Method> {
    let member = constant_pool.method_ref(index)?;
    let (class, name, descriptor, name_index) = resolve_member(constant_pool, member)?;
    Ok(symref::Method { class, name, descriptor, name_index })
}

pub fn resolve_field_ref(constant_pool: &ConstantPool, index: constant_pool_index)
                         -> Result<symref::Field> {
    let member = constant_pool.field_ref(index)?;
    let (class, name, descriptor, _) = resolve_member(constant_pool, member)?;
    Ok(symref::Field { class, name, descriptor })
}
