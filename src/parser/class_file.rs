use crate::error::{Error, Result};
use crate::model::class_file::constant_pool::{self, Tag};
use crate::model::class_file::{
    u2, AttributeInfo, ClassFile, CodeAttribute, ConstantPool, ConstantPoolInfo,
    ExceptionTableEntry, FieldInfo, MethodInfo, MAGIC,
};
use crate::parser::cursor::Cursor;

pub type ConstantPoolIndex = constant_pool::constant_pool_index;

const CODE_ATTRIBUTE_NAME: &[u8] = b"Code";

fn magic(input: &mut Cursor) -> Result<()> {
    let found = input.read_u4()?;
    if found != MAGIC {
        return Err(Error::BadMagic { found });
    }
    Ok(())
}

fn cp_info(input: &mut Cursor, index: u2) -> Result<ConstantPoolInfo> {
    let tag = input.read_u1()?;
    let tag = match Tag::from_byte(tag) {
        Some(tag) => tag,
        None => return Err(Error::UnknownConstantTag { tag, index }),
    };
    let info = match tag {
        Tag::Class => ConstantPoolInfo::Class { name_index: input.read_u2()? },
        Tag::FieldRef => ConstantPoolInfo::FieldRef {
            class_index: input.read_u2()?,
            name_and_type_index: input.read_u2()?,
        },
        Tag::MethodRef => ConstantPoolInfo::MethodRef {
            class_index: input.read_u2()?,
            name_and_type_index: input.read_u2()?,
        },
        Tag::String => ConstantPoolInfo::String { string_index: input.read_u2()? },
        Tag::NameAndType => ConstantPoolInfo::NameAndType {
            name_index: input.read_u2()?,
            descriptor_index: input.read_u2()?,
        },
        Tag::Utf8 => {
            let length = input.read_u2()?;
            ConstantPoolInfo::Utf8 { bytes: input.read_bytes(length as usize)?.to_vec() }
        }
    };
    Ok(info)
}

/// Reads `constant_pool_count - 1` entries. A count of zero is treated like one, i.e. an empty
/// pool.
fn constant_pool(input: &mut Cursor) -> Result<ConstantPool> {
    let constant_pool_count = input.read_u2()?;
    let mut entries = Vec::with_capacity(constant_pool_count.saturating_sub(1) as usize);
    for index in 1..constant_pool_count {
        entries.push(cp_info(input, index)?);
    }
    Ok(ConstantPool::from_zero_indexed_vec(entries))
}

/// Checks that every reference held by a pool entry lands on an entry of the right kind, so that
/// the resolver never meets a dangling reference at run time.
fn verify_constant_pool(constant_pool: &ConstantPool) -> Result<()> {
    for (_, entry) in constant_pool.iter() {
        for (target, tag) in entry.references() {
            constant_pool.expect_tag(target, tag)?;
        }
    }
    Ok(())
}

fn cp_index_tag(input: &mut Cursor, constant_pool: &ConstantPool, tag: Tag)
                -> Result<ConstantPoolIndex> {
    let index = input.read_u2()?;
    constant_pool.expect_tag(index, tag)?;
    Ok(index)
}

fn maybe_cp_index_tag(input: &mut Cursor, constant_pool: &ConstantPool, tag: Tag)
                      -> Result<ConstantPoolIndex> {
    let index = input.read_u2()?;
    if index != 0 {
        constant_pool.expect_tag(index, tag)?;
    }
    Ok(index)
}

fn attribute_info(input: &mut Cursor, attribute_name_index: ConstantPoolIndex)
                  -> Result<AttributeInfo> {
    let attribute_length = input.read_u4()?;
    let info = input.read_bytes(attribute_length as usize)?.to_vec();
    Ok(AttributeInfo { attribute_name_index, info })
}

fn attribute(input: &mut Cursor) -> Result<AttributeInfo> {
    let attribute_name_index = input.read_u2()?;
    attribute_info(input, attribute_name_index)
}

fn attributes(input: &mut Cursor) -> Result<Vec<AttributeInfo>> {
    let attributes_count = input.read_u2()?;
    (0..attributes_count).map(|_| attribute(input)).collect()
}

fn exception_table_entry(input: &mut Cursor) -> Result<ExceptionTableEntry> {
    Ok(ExceptionTableEntry {
        start_pc: input.read_u2()?,
        end_pc: input.read_u2()?,
        handler_pc: input.read_u2()?,
        catch_type: input.read_u2()?,
    })
}

/// Decodes the body of a `Code` attribute whose name index and length have already been read.
fn code_attribute(input: &mut Cursor, attribute_name_index: ConstantPoolIndex)
                  -> Result<CodeAttribute> {
    let attribute_length = input.read_u4()? as usize;
    let start = input.position();
    let max_stack = input.read_u2()?;
    let max_locals = input.read_u2()?;
    let code_length = input.read_u4()?;
    let code = input.read_bytes(code_length as usize)?.to_vec();
    let exception_table_length = input.read_u2()?;
    let exception_table = (0..exception_table_length)
        .map(|_| exception_table_entry(input))
        .collect::<Result<Vec<_>>>()?;
    let attributes = attributes(input)?;

    let consumed = input.position() - start;
    if consumed != attribute_length {
        warn!("Code attribute declares {} bytes but its contents took {}",
              attribute_length, consumed);
    }

    Ok(CodeAttribute {
        attribute_name_index,
        max_stack,
        max_locals,
        code,
        exception_table,
        attributes,
    })
}

fn field(input: &mut Cursor, constant_pool: &ConstantPool) -> Result<FieldInfo> {
    Ok(FieldInfo {
        access_flags: input.read_u2()?,
        name_index: cp_index_tag(input, constant_pool, Tag::Utf8)?,
        descriptor_index: cp_index_tag(input, constant_pool, Tag::Utf8)?,
        attributes: attributes(input)?,
    })
}

fn method(input: &mut Cursor, constant_pool: &ConstantPool) -> Result<MethodInfo> {
    let access_flags = input.read_u2()?;
    let name_index = cp_index_tag(input, constant_pool, Tag::Utf8)?;
    let descriptor_index = cp_index_tag(input, constant_pool, Tag::Utf8)?;
    let attributes_count = input.read_u2()?;

    let mut code = vec![];
    let mut attributes = vec![];
    for _ in 0..attributes_count {
        let attribute_name_index = input.read_u2()?;
        let is_code = constant_pool.utf8_bytes(attribute_name_index)
            .map(|name| name == CODE_ATTRIBUTE_NAME)
            .unwrap_or(false);
        if is_code {
            code.push(code_attribute(input, attribute_name_index)?);
        } else {
            attributes.push(attribute_info(input, attribute_name_index)?);
        }
    }

    Ok(MethodInfo { access_flags, name_index, descriptor_index, code, attributes })
}

/// Decodes a class file from the front of `bytes`, returning it with the number of bytes it
/// occupied. Anything after the class attributes is left unread.
pub fn parse_class_file_prefix(bytes: &[u8]) -> Result<(ClassFile, usize)> {
    let mut input = Cursor::new(bytes);

    magic(&mut input)?;
    let minor_version = input.read_u2()?;
    let major_version = input.read_u2()?;
    let constant_pool = constant_pool(&mut input)?;
    verify_constant_pool(&constant_pool)?;

    let access_flags = input.read_u2()?;
    let this_class = cp_index_tag(&mut input, &constant_pool, Tag::Class)?;
    let super_class = maybe_cp_index_tag(&mut input, &constant_pool, Tag::Class)?;

    let interfaces_count = input.read_u2()?;
    let interfaces = (0..interfaces_count)
        .map(|_| cp_index_tag(&mut input, &constant_pool, Tag::Class))
        .collect::<Result<Vec<_>>>()?;

    let fields_count = input.read_u2()?;
    let fields = (0..fields_count)
        .map(|_| field(&mut input, &constant_pool))
        .collect::<Result<Vec<_>>>()?;

    let methods_count = input.read_u2()?;
    let methods = (0..methods_count)
        .map(|_| method(&mut input, &constant_pool))
        .collect::<Result<Vec<_>>>()?;

    let attributes = attributes(&mut input)?;

    let class_file = ClassFile::new(minor_version, major_version, constant_pool, access_flags,
                                    this_class, super_class, interfaces, fields, methods,
                                    attributes);
    Ok((class_file, input.position()))
}

/// Decodes a complete class file.
///
/// The grammar is positional, so every section is read in file order. Constant pool references
/// are checked before anything that depends on them is read. Trailing bytes after the class
/// attributes are reported with a warning but are not an error.
pub fn parse_class_file(bytes: &[u8]) -> Result<ClassFile> {
    let (class_file, consumed) = parse_class_file_prefix(bytes)?;
    if consumed != bytes.len() {
        warn!("class file has {} trailing bytes after byte {}", bytes.len() - consumed, consumed);
    }
    debug!("decoded class {} (version {}.{}): {} constants, {} fields, {} methods",
           class_file.name().unwrap_or_default(), class_file.major_version,
           class_file.minor_version, class_file.constant_pool.len(), class_file.fields.len(),
           class_file.methods.len());
    Ok(class_file)
}
