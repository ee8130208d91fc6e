//! DEX header layout: accepted magic values, endian tags, field offsets
//! and the header section annotator.
//! https://source.android.com/docs/core/runtime/dex-format#header-item

use crate::dex::annotated_bytes::AnnotatedBytes;
use crate::dex::dex_file::DexFile;
use crate::dex::error::DexError;

/// Accepted `dex\n<version>\0` magic values. Version 036 never shipped and
/// is rejected by the runtime, so it is absent here too.
pub const MAGIC_VALUES: [[u8; 8]; 6] = [
    *b"dex\n035\0",
    *b"dex\n037\0",
    *b"dex\n038\0",
    *b"dex\n039\0",
    *b"dex\n040\0",
    *b"dex\n041\0",
];

pub const MAGIC_LENGTH: usize = 8;

pub const LITTLE_ENDIAN_TAG: u32 = 0x12345678;
pub const BIG_ENDIAN_TAG: u32 = 0x78563412;

pub const HEADER_SIZE: usize = 0x70;

/* Header field offsets */
pub const CHECKSUM_OFFSET: usize = 8;
pub const SIGNATURE_OFFSET: usize = 12;
pub const SIGNATURE_SIZE: usize = 20;
pub const FILE_SIZE_OFFSET: usize = 32;
pub const HEADER_SIZE_OFFSET: usize = 36;
pub const ENDIAN_TAG_OFFSET: usize = 40;
pub const LINK_SIZE_OFFSET: usize = 44;
pub const LINK_OFF_OFFSET: usize = 48;
pub const MAP_OFF_OFFSET: usize = 52;
pub const STRING_COUNT_OFFSET: usize = 56;
pub const STRING_START_OFFSET: usize = 60;
pub const TYPE_COUNT_OFFSET: usize = 64;
pub const TYPE_START_OFFSET: usize = 68;
pub const PROTO_COUNT_OFFSET: usize = 72;
pub const PROTO_START_OFFSET: usize = 76;
pub const FIELD_COUNT_OFFSET: usize = 80;
pub const FIELD_START_OFFSET: usize = 84;
pub const METHOD_COUNT_OFFSET: usize = 88;
pub const METHOD_START_OFFSET: usize = 92;
pub const CLASS_COUNT_OFFSET: usize = 96;
pub const CLASS_START_OFFSET: usize = 100;
pub const DATA_SIZE_OFFSET: usize = 104;
pub const DATA_OFF_OFFSET: usize = 108;

/// Annotates the header region field by field. `item_count` is part of the
/// shared annotator signature; the header is always a single item.
pub(crate) fn annotate_section(
    out: &mut AnnotatedBytes,
    dex: &DexFile,
    _item_count: u32,
) -> Result<(), DexError> {
    out.annotate(0, "header_item".to_string());
    out.indent();

    let version: String = dex.data()[4..7].iter().map(|&b| b as char).collect();
    out.annotate(MAGIC_LENGTH, format!("magic: dex\\n{}\\0", version));
    out.annotate(
        4,
        format!("checksum: 0x{:08x}", dex.read_small_uint(CHECKSUM_OFFSET)?),
    );
    out.annotate(SIGNATURE_SIZE, "signature".to_string());
    out.annotate(
        4,
        format!("file_size: {}", dex.read_small_uint(FILE_SIZE_OFFSET)?),
    );
    out.annotate(
        4,
        format!("header_size: {}", dex.read_small_uint(HEADER_SIZE_OFFSET)?),
    );
    out.annotate(
        4,
        format!("endian_tag: 0x{:08x}", dex.read_small_uint(ENDIAN_TAG_OFFSET)?),
    );
    out.annotate(
        4,
        format!("link_size: {}", dex.read_small_uint(LINK_SIZE_OFFSET)?),
    );
    out.annotate(
        4,
        format!("link_off: 0x{:x}", dex.read_small_uint(LINK_OFF_OFFSET)?),
    );
    out.annotate(
        4,
        format!("map_off: 0x{:x}", dex.read_small_uint(MAP_OFF_OFFSET)?),
    );

    let tables = [
        ("string_ids", STRING_COUNT_OFFSET, STRING_START_OFFSET),
        ("type_ids", TYPE_COUNT_OFFSET, TYPE_START_OFFSET),
        ("proto_ids", PROTO_COUNT_OFFSET, PROTO_START_OFFSET),
        ("field_ids", FIELD_COUNT_OFFSET, FIELD_START_OFFSET),
        ("method_ids", METHOD_COUNT_OFFSET, METHOD_START_OFFSET),
        ("class_defs", CLASS_COUNT_OFFSET, CLASS_START_OFFSET),
    ];
    for (name, count_offset, start_offset) in tables {
        out.annotate(
            4,
            format!("{}_size: {}", name, dex.read_small_uint(count_offset)?),
        );
        out.annotate(
            4,
            format!("{}_off: 0x{:x}", name, dex.read_small_uint(start_offset)?),
        );
    }

    out.annotate(
        4,
        format!("data_size: {}", dex.read_small_uint(DATA_SIZE_OFFSET)?),
    );
    out.annotate(
        4,
        format!("data_off: 0x{:x}", dex.read_small_uint(DATA_OFF_OFFSET)?),
    );

    out.deindent();
    Ok(())
}
