/* Dex container reading */

use std::fs;
use std::io::Write;
use std::path::Path;

use log::warn;

use crate::dex::annotated_bytes::AnnotatedBytes;
use crate::dex::class::ClassSet;
use crate::dex::error::{DexError, Table};
use crate::dex::header;
use crate::dex::items::{ClassDefItem, FieldIdItem, MethodIdItem, ProtoIdItem, StringIdItem, TypeIdItem};
use crate::dex::mutf8;
use crate::dex::{read_u4, read_uleb128};

/* Constants */
/// Reserved index meaning "no value" for string and type references.
pub const NO_INDEX: i32 = -1;

/// A validated, read-only DEX container: the raw buffer plus the cached
/// (count, start offset) pair of each id table. Item offsets are always
/// recomputed from an index, and nothing past the header is validated until
/// it is first accessed - empty tables legitimately carry a start offset
/// of 0.
#[derive(Debug)]
pub struct DexFile
{
    data: Vec<u8>,
    string_count: u32,
    string_start_offset: u32,
    type_count: u32,
    type_start_offset: u32,
    proto_count: u32,
    proto_start_offset: u32,
    field_count: u32,
    field_start_offset: u32,
    method_count: u32,
    method_start_offset: u32,
    class_count: u32,
    class_start_offset: u32,
}

impl DexFile
{
    /// Validates the header of `bytes` and builds the container. Fails
    /// without constructing anything when the magic, endian tag or header
    /// length is unacceptable.
    pub fn from_bytes(bytes: &[u8]) -> Result<DexFile, DexError>
    {
        if bytes.len() < header::HEADER_SIZE
        {
            return Err(DexError::Truncated { offset: 0, needed: header::HEADER_SIZE });
        }

        verify_magic(bytes)?;
        verify_endian(bytes)?;

        let read = |offset: usize| -> Result<u32, DexError> {
            let mut ix = offset;
            read_u4(bytes, &mut ix)
        };

        let file_size = read(header::FILE_SIZE_OFFSET)?;
        if file_size as usize != bytes.len()
        {
            warn!("header file_size {} does not match buffer length {}", file_size, bytes.len());
        }

        Ok(DexFile {
            string_count: read(header::STRING_COUNT_OFFSET)?,
            string_start_offset: read(header::STRING_START_OFFSET)?,
            type_count: read(header::TYPE_COUNT_OFFSET)?,
            type_start_offset: read(header::TYPE_START_OFFSET)?,
            proto_count: read(header::PROTO_COUNT_OFFSET)?,
            proto_start_offset: read(header::PROTO_START_OFFSET)?,
            field_count: read(header::FIELD_COUNT_OFFSET)?,
            field_start_offset: read(header::FIELD_START_OFFSET)?,
            method_count: read(header::METHOD_COUNT_OFFSET)?,
            method_start_offset: read(header::METHOD_START_OFFSET)?,
            class_count: read(header::CLASS_COUNT_OFFSET)?,
            class_start_offset: read(header::CLASS_START_OFFSET)?,
            data: bytes.to_vec(),
        })
    }

    pub fn from_file(path: &Path) -> Result<DexFile, DexError>
    {
        let bytes = fs::read(path).map_err(|e| DexError::Io { message: e.to_string() })?;
        DexFile::from_bytes(&bytes)
    }

    /// The raw buffer.
    pub fn data(&self) -> &[u8]
    {
        &self.data
    }

    /// Raw little-endian u32 read at an absolute offset.
    pub fn read_small_uint(&self, offset: usize) -> Result<u32, DexError>
    {
        let mut ix = offset;
        read_u4(&self.data, &mut ix)
    }

    /// Raw little-endian i32 read at an absolute offset.
    pub fn read_int(&self, offset: usize) -> Result<i32, DexError>
    {
        Ok(self.read_small_uint(offset)? as i32)
    }

    /// A cursor positioned at `offset`.
    pub fn reader_at(&self, offset: usize) -> DexReader<'_>
    {
        DexReader { dex: self, offset }
    }

    // Every table shares one resolution rule: bounds-check the index
    // against the cached count, then start + index * stride.
    fn item_offset(&self, table: Table, index: i32, count: u32, start: u32, item_size: usize) -> Result<usize, DexError>
    {
        if index < 0 || index as u32 >= count
        {
            return Err(DexError::IndexOutOfRange { table, index, count });
        }
        Ok(start as usize + index as usize * item_size)
    }

    pub fn get_string_id_item_offset(&self, index: i32) -> Result<usize, DexError>
    {
        self.item_offset(Table::Strings, index, self.string_count, self.string_start_offset, StringIdItem::ITEM_SIZE)
    }

    pub fn get_type_id_item_offset(&self, index: i32) -> Result<usize, DexError>
    {
        self.item_offset(Table::Types, index, self.type_count, self.type_start_offset, TypeIdItem::ITEM_SIZE)
    }

    pub fn get_proto_id_item_offset(&self, index: i32) -> Result<usize, DexError>
    {
        self.item_offset(Table::Protos, index, self.proto_count, self.proto_start_offset, ProtoIdItem::ITEM_SIZE)
    }

    pub fn get_field_id_item_offset(&self, index: i32) -> Result<usize, DexError>
    {
        self.item_offset(Table::Fields, index, self.field_count, self.field_start_offset, FieldIdItem::ITEM_SIZE)
    }

    pub fn get_method_id_item_offset(&self, index: i32) -> Result<usize, DexError>
    {
        self.item_offset(Table::Methods, index, self.method_count, self.method_start_offset, MethodIdItem::ITEM_SIZE)
    }

    pub fn get_class_def_item_offset(&self, index: i32) -> Result<usize, DexError>
    {
        self.item_offset(Table::Classes, index, self.class_count, self.class_start_offset, ClassDefItem::ITEM_SIZE)
    }

    /// Resolves a string index to its decoded text. The string data is a
    /// uleb128 UTF-16 code-unit count followed by modified UTF-8 bytes; the
    /// byte count is inferred from the UTF-16 count during decoding.
    pub fn get_string(&self, index: i32) -> Result<String, DexError>
    {
        let string_offset = self.get_string_id_item_offset(index)?;
        let string_data_offset = self.read_small_uint(string_offset)?;
        let mut reader = self.reader_at(string_data_offset as usize);
        let utf16_length = reader.read_small_uleb128()?;
        mutf8::decode(&self.data, reader.offset(), utf16_length)
    }

    /// As `get_string`, except an index of -1 means "no string". Any other
    /// out-of-range index is still an error.
    pub fn get_optional_string(&self, index: i32) -> Result<Option<String>, DexError>
    {
        if index == NO_INDEX
        {
            return Ok(None);
        }
        Ok(Some(self.get_string(index)?))
    }

    /// Resolves a type index to its descriptor string. A type is nothing
    /// but an embedded string index; errors from either resolution step
    /// propagate unchanged.
    pub fn get_type(&self, index: i32) -> Result<String, DexError>
    {
        let type_offset = self.get_type_id_item_offset(index)?;
        let string_index = self.read_small_uint(type_offset)?;
        self.get_string(string_index as i32)
    }

    /// As `get_type`, except an index of -1 means "no type".
    pub fn get_optional_type(&self, index: i32) -> Result<Option<String>, DexError>
    {
        if index == NO_INDEX
        {
            return Ok(None);
        }
        Ok(Some(self.get_type(index)?))
    }

    pub fn get_class_count(&self) -> u32
    {
        self.class_count
    }

    /// The lazy, fixed-size view over the class_defs table.
    pub fn get_classes(&self) -> ClassSet<'_>
    {
        ClassSet::new(self)
    }

    /// Writes a width-wrapped annotated hex dump of the header and the
    /// string, type, proto and field id tables, in file order, skipping
    /// tables with no items. `width` is the number of bytes per dump line.
    /// On failure the output already written to `out` is left as-is.
    pub fn dump_to(&self, out: &mut dyn Write, width: usize) -> Result<(), DexError>
    {
        let mut annotated = AnnotatedBytes::new(width);
        header::annotate_section(&mut annotated, self, 1)?;

        if self.string_count > 0
        {
            annotated.skip_to(self.get_string_id_item_offset(0)?);
            annotated.annotate(0, " ".to_string());
            StringIdItem::annotate_section(&mut annotated, self, self.string_count)?;
        }

        if self.type_count > 0
        {
            annotated.skip_to(self.get_type_id_item_offset(0)?);
            annotated.annotate(0, " ".to_string());
            TypeIdItem::annotate_section(&mut annotated, self, self.type_count)?;
        }

        if self.proto_count > 0
        {
            annotated.skip_to(self.get_proto_id_item_offset(0)?);
            annotated.annotate(0, " ".to_string());
            ProtoIdItem::annotate_section(&mut annotated, self, self.proto_count)?;
        }

        if self.field_count > 0
        {
            annotated.skip_to(self.get_field_id_item_offset(0)?);
            annotated.annotate(0, " ".to_string());
            FieldIdItem::annotate_section(&mut annotated, self, self.field_count)?;
        }

        annotated.write_annotations(out, &self.data)
    }
}

fn verify_magic(bytes: &[u8]) -> Result<(), DexError>
{
    for accepted in &header::MAGIC_VALUES
    {
        if bytes[..header::MAGIC_LENGTH] == accepted[..]
        {
            return Ok(());
        }
    }
    let mut magic = [0u8; header::MAGIC_LENGTH];
    magic.copy_from_slice(&bytes[..header::MAGIC_LENGTH]);
    Err(DexError::InvalidMagic { magic })
}

fn verify_endian(bytes: &[u8]) -> Result<(), DexError>
{
    let mut ix = header::ENDIAN_TAG_OFFSET;
    let tag = read_u4(bytes, &mut ix)?;
    if tag == header::BIG_ENDIAN_TAG
    {
        return Err(DexError::UnsupportedEndianness);
    }
    if tag != header::LITTLE_ENDIAN_TAG
    {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[header::ENDIAN_TAG_OFFSET..header::ENDIAN_TAG_OFFSET + 4]);
        return Err(DexError::InvalidEndianTag { tag: raw });
    }
    Ok(())
}

/// A cheap position-carrying cursor over a container's buffer. Created at
/// an offset, reads advance it; the container is never mutated.
#[derive(Debug, Clone)]
pub struct DexReader<'a>
{
    dex: &'a DexFile,
    offset: usize,
}

impl DexReader<'_>
{
    pub fn offset(&self) -> usize
    {
        self.offset
    }

    /// Reads a uleb128 that must fit a non-negative i32, the only range
    /// valid for DEX sizes and offsets.
    pub fn read_small_uleb128(&mut self) -> Result<u32, DexError>
    {
        let start = self.offset;
        let value = read_uleb128(&self.dex.data, &mut self.offset)?;
        if value > i32::MAX as u32
        {
            return Err(DexError::MalformedStringData { offset: start });
        }
        Ok(value)
    }
}
