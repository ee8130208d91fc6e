//! Per-table item layout constants and section annotators.
//!
//! One block per id table: the fixed item stride, the sub-field offsets
//! where the item has internal structure, and (for the tables the dump
//! covers) the annotator that renders the table's rows. Annotators resolve
//! referenced strings and types for the human-readable column where they
//! decode, and fall back to the raw index where they do not - a dump of a
//! corrupt file must still render.

use bitflags::bitflags;
use log::warn;

use crate::dex::annotated_bytes::AnnotatedBytes;
use crate::dex::dex_file::DexFile;
use crate::dex::error::DexError;
use crate::dex::read_u2;

bitflags! {
    /// Class-level access flags from a class_def_item.
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x1;
        const PRIVATE = 0x2;
        const PROTECTED = 0x4;
        const STATIC = 0x8;
        const FINAL = 0x10;
        const INTERFACE = 0x200;
        const ABSTRACT = 0x400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }
}

/// string_id_item: a single offset to the string's data.
pub struct StringIdItem;

impl StringIdItem {
    pub const ITEM_SIZE: usize = 4;

    pub(crate) fn annotate_section(
        out: &mut AnnotatedBytes,
        dex: &DexFile,
        item_count: u32,
    ) -> Result<(), DexError> {
        out.annotate(0, format!("string_id_item section ({} items)", item_count));
        for i in 0..item_count as i32 {
            let offset = dex.get_string_id_item_offset(i)?;
            let data_offset = dex.read_small_uint(offset)?;
            let text = match dex.get_string(i) {
                Ok(s) => format!(
                    "string_id_item[{}]: string_data_off = 0x{:x} \"{}\"",
                    i, data_offset, s
                ),
                Err(e) => {
                    warn!("string_id_item[{}] does not decode: {}", i, e);
                    format!(
                        "string_id_item[{}]: string_data_off = 0x{:x} <undecodable>",
                        i, data_offset
                    )
                }
            };
            out.annotate(Self::ITEM_SIZE, text);
        }
        Ok(())
    }
}

/// type_id_item: a single string index holding the descriptor.
pub struct TypeIdItem;

impl TypeIdItem {
    pub const ITEM_SIZE: usize = 4;

    pub(crate) fn annotate_section(
        out: &mut AnnotatedBytes,
        dex: &DexFile,
        item_count: u32,
    ) -> Result<(), DexError> {
        out.annotate(0, format!("type_id_item section ({} items)", item_count));
        for i in 0..item_count as i32 {
            let offset = dex.get_type_id_item_offset(i)?;
            let descriptor_index = dex.read_small_uint(offset)?;
            let text = match dex.get_type(i) {
                Ok(descriptor) => format!(
                    "type_id_item[{}]: descriptor_idx = {} // {}",
                    i, descriptor_index, descriptor
                ),
                Err(_) => format!(
                    "type_id_item[{}]: descriptor_idx = {} // <unresolved>",
                    i, descriptor_index
                ),
            };
            out.annotate(Self::ITEM_SIZE, text);
        }
        Ok(())
    }
}

/// proto_id_item: shorty string, return type and parameter list offset.
pub struct ProtoIdItem;

impl ProtoIdItem {
    pub const ITEM_SIZE: usize = 12;

    pub const SHORTY_IDX_OFFSET: usize = 0;
    pub const RETURN_TYPE_IDX_OFFSET: usize = 4;
    pub const PARAMETERS_OFF_OFFSET: usize = 8;

    pub(crate) fn annotate_section(
        out: &mut AnnotatedBytes,
        dex: &DexFile,
        item_count: u32,
    ) -> Result<(), DexError> {
        out.annotate(0, format!("proto_id_item section ({} items)", item_count));
        for i in 0..item_count as i32 {
            let offset = dex.get_proto_id_item_offset(i)?;
            out.annotate(0, format!("proto_id_item[{}]", i));
            out.indent();

            let shorty_index = dex.read_small_uint(offset + Self::SHORTY_IDX_OFFSET)?;
            let shorty = dex
                .get_string(shorty_index as i32)
                .unwrap_or_else(|_| "<unresolved>".to_string());
            out.annotate(4, format!("shorty_idx = {} // \"{}\"", shorty_index, shorty));

            let return_type_index = dex.read_small_uint(offset + Self::RETURN_TYPE_IDX_OFFSET)?;
            let return_type = dex
                .get_type(return_type_index as i32)
                .unwrap_or_else(|_| "<unresolved>".to_string());
            out.annotate(
                4,
                format!("return_type_idx = {} // {}", return_type_index, return_type),
            );

            let parameters_offset = dex.read_small_uint(offset + Self::PARAMETERS_OFF_OFFSET)?;
            out.annotate(4, format!("parameters_off = 0x{:x}", parameters_offset));

            out.deindent();
        }
        Ok(())
    }
}

/// field_id_item: owning class, field type and name.
pub struct FieldIdItem;

impl FieldIdItem {
    pub const ITEM_SIZE: usize = 8;

    pub const CLASS_IDX_OFFSET: usize = 0;
    pub const TYPE_IDX_OFFSET: usize = 2;
    pub const NAME_IDX_OFFSET: usize = 4;

    pub(crate) fn annotate_section(
        out: &mut AnnotatedBytes,
        dex: &DexFile,
        item_count: u32,
    ) -> Result<(), DexError> {
        out.annotate(0, format!("field_id_item section ({} items)", item_count));
        for i in 0..item_count as i32 {
            let offset = dex.get_field_id_item_offset(i)?;
            out.annotate(0, format!("field_id_item[{}]", i));
            out.indent();

            let mut ix = offset + Self::CLASS_IDX_OFFSET;
            let class_index = read_u2(dex.data(), &mut ix)?;
            let class_descriptor = dex
                .get_type(class_index as i32)
                .unwrap_or_else(|_| "<unresolved>".to_string());
            out.annotate(2, format!("class_idx = {} // {}", class_index, class_descriptor));

            let mut ix = offset + Self::TYPE_IDX_OFFSET;
            let type_index = read_u2(dex.data(), &mut ix)?;
            let type_descriptor = dex
                .get_type(type_index as i32)
                .unwrap_or_else(|_| "<unresolved>".to_string());
            out.annotate(2, format!("type_idx = {} // {}", type_index, type_descriptor));

            let name_index = dex.read_small_uint(offset + Self::NAME_IDX_OFFSET)?;
            let name = dex
                .get_string(name_index as i32)
                .unwrap_or_else(|_| "<unresolved>".to_string());
            out.annotate(4, format!("name_idx = {} // \"{}\"", name_index, name));

            out.deindent();
        }
        Ok(())
    }
}

/// method_id_item: owning class, prototype and name. The diagnostic dump
/// does not cover this table; the layout is still needed by higher layers
/// resolving method references from an item offset.
pub struct MethodIdItem;

impl MethodIdItem {
    pub const ITEM_SIZE: usize = 8;

    pub const CLASS_IDX_OFFSET: usize = 0;
    pub const PROTO_IDX_OFFSET: usize = 2;
    pub const NAME_IDX_OFFSET: usize = 4;
}

/// class_def_item: fixed 32-byte record; the offset-valued fields point
/// into the data section.
pub struct ClassDefItem;

impl ClassDefItem {
    pub const ITEM_SIZE: usize = 32;

    pub const CLASS_IDX_OFFSET: usize = 0;
    pub const ACCESS_FLAGS_OFFSET: usize = 4;
    pub const SUPERCLASS_IDX_OFFSET: usize = 8;
    pub const INTERFACES_OFF_OFFSET: usize = 12;
    pub const SOURCE_FILE_IDX_OFFSET: usize = 16;
    pub const ANNOTATIONS_OFF_OFFSET: usize = 20;
    pub const CLASS_DATA_OFF_OFFSET: usize = 24;
    pub const STATIC_VALUES_OFF_OFFSET: usize = 28;
}

/// type_list: u4 size followed by u2 type indices.
pub struct TypeList;

impl TypeList {
    pub const SIZE_OFFSET: usize = 0;
    pub const LIST_OFFSET: usize = 4;
}
