use std::fmt;

/// The six fixed-stride id tables of a DEX container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table
{
    Strings,
    Types,
    Protos,
    Fields,
    Methods,
    Classes,
}

impl Table
{
    pub fn name(&self) -> &'static str
    {
        match self
        {
            Table::Strings => "string",
            Table::Types => "type",
            Table::Protos => "proto",
            Table::Fields => "field",
            Table::Methods => "method",
            Table::Classes => "class",
        }
    }
}

impl fmt::Display for Table
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.name())
    }
}

/// Everything that can go wrong reading a DEX container. Each variant
/// carries the raw values a caller needs to branch on the failure without
/// parsing a message.
#[derive(Debug, PartialEq, Eq)]
pub enum DexError
{
    /// The leading 8 bytes match none of the accepted magic values.
    InvalidMagic { magic: [u8; 8] },
    /// The endian tag is the recognised big-endian constant. Big endian
    /// files are rejected rather than reinterpreted.
    UnsupportedEndianness,
    /// The endian tag is neither of the two recognised constants.
    InvalidEndianTag { tag: [u8; 4] },
    /// A table lookup with an index outside `[0, count)`.
    IndexOutOfRange { table: Table, index: i32, count: u32 },
    /// String data that cannot be decoded as modified UTF-8.
    MalformedStringData { offset: usize },
    /// A fixed-width or uleb128 read past the end of the buffer.
    Truncated { offset: usize, needed: usize },
    /// Failure loading a file from disk.
    Io { message: String },
    /// Write failure propagated from a dump sink.
    SinkWrite { message: String },
}

impl fmt::Display for DexError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            DexError::InvalidMagic { magic } =>
            {
                write!(f, "Invalid magic value:")?;
                for b in magic
                {
                    write!(f, " {:02x}", b)?;
                }
                Ok(())
            }
            DexError::UnsupportedEndianness =>
            {
                write!(f, "Big endian dex files are not supported")
            }
            DexError::InvalidEndianTag { tag } =>
            {
                write!(f, "Invalid endian tag:")?;
                for b in tag
                {
                    write!(f, " {:02x}", b)?;
                }
                Ok(())
            }
            DexError::IndexOutOfRange { table, index, count } =>
            {
                write!(f, "{} index out of bounds: {} (count {})", table, index, count)
            }
            DexError::MalformedStringData { offset } =>
            {
                write!(f, "Malformed string data at offset 0x{:x}", offset)
            }
            DexError::Truncated { offset, needed } =>
            {
                write!(f, "Unexpected end of buffer reading {} bytes at offset 0x{:x}", needed, offset)
            }
            DexError::Io { message } =>
            {
                write!(f, "io error: {}", message)
            }
            DexError::SinkWrite { message } =>
            {
                write!(f, "dump sink write failure: {}", message)
            }
        }
    }
}

impl std::error::Error for DexError {}
