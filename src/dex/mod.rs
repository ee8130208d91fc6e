pub mod error;
pub mod header;
pub mod items;

pub(crate) mod annotated_bytes;
pub(crate) mod class;
pub(crate) mod dex_file;
pub(crate) mod leb;
pub(crate) mod mutf8;

pub use class::{ClassDef, ClassSet};
pub use dex_file::{DexFile, DexReader, NO_INDEX};

use crate::dex::error::DexError;
use crate::dex::leb::decode_uleb128;

// Basic little-endian reads against a cursor position
pub(crate) fn read_u2(bytes: &[u8], ix: &mut usize) -> Result<u16, DexError>
{
    if bytes.len() < *ix + 2
    {
        return Err(DexError::Truncated { offset: *ix, needed: 2 });
    }
    let result = ((bytes[*ix + 1] as u16) << 8) | (bytes[*ix] as u16);
    *ix += 2;
    Ok(result)
}

pub(crate) fn read_u4(bytes: &[u8], ix: &mut usize) -> Result<u32, DexError>
{
    if bytes.len() < *ix + 4
    {
        return Err(DexError::Truncated { offset: *ix, needed: 4 });
    }
    let result =
        ((bytes[*ix + 3] as u32) << 24) | ((bytes[*ix + 2] as u32) << 16) | ((bytes[*ix + 1] as u32) << 8) | (bytes[*ix] as u32);
    *ix += 4;
    Ok(result)
}

pub(crate) fn read_uleb128(bytes: &[u8], ix: &mut usize) -> Result<u32, DexError>
{
    if *ix >= bytes.len()
    {
        return Err(DexError::Truncated { offset: *ix, needed: 1 });
    }
    let (val, size) = decode_uleb128(&bytes[*ix..]);
    *ix += size;
    Ok(val)
}
