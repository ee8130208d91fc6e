//! Lazy views over the class_defs table.
//!
//! Nothing here copies bytes out of the container: a `ClassDef` is an
//! offset plus a borrow of the owning `DexFile`, and every accessor is a
//! fresh read against the buffer.

use crate::dex::dex_file::DexFile;
use crate::dex::error::DexError;
use crate::dex::items::{AccessFlags, ClassDefItem, TypeList};
use crate::dex::read_u2;

/// The fixed-size, index-addressable view over the class_defs table.
/// Elements are built from their computed offset on every access and never
/// cached; iteration is in definition order, which is the order the
/// compiler emitted the classes and is semantically meaningful.
#[derive(Debug, Clone, Copy)]
pub struct ClassSet<'a> {
    dex: &'a DexFile,
}

impl<'a> ClassSet<'a> {
    pub(crate) fn new(dex: &'a DexFile) -> ClassSet<'a> {
        ClassSet { dex }
    }

    pub fn len(&self) -> usize {
        self.dex.get_class_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the view of class `index`, fresh and independent on each
    /// call.
    pub fn get(&self, index: i32) -> Result<ClassDef<'a>, DexError> {
        let offset = self.dex.get_class_def_item_offset(index)?;
        Ok(ClassDef { dex: self.dex, offset })
    }

    /// Iterates the classes in definition order.
    pub fn iter(&self) -> impl Iterator<Item = Result<ClassDef<'a>, DexError>> + 'a {
        let set = *self;
        (0..set.len() as i32).map(move |index| set.get(index))
    }
}

/// One class definition, anchored at its class_def_item offset.
#[derive(Debug, Clone)]
pub struct ClassDef<'a> {
    dex: &'a DexFile,
    offset: usize,
}

impl ClassDef<'_> {
    /// The class_def_item offset this view is anchored at.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// JNI descriptor of the class itself, e.g. `Lcom/example/Main;`.
    pub fn type_descriptor(&self) -> Result<String, DexError> {
        let type_index = self
            .dex
            .read_small_uint(self.offset + ClassDefItem::CLASS_IDX_OFFSET)?;
        self.dex.get_type(type_index as i32)
    }

    pub fn access_flags(&self) -> Result<AccessFlags, DexError> {
        let raw = self
            .dex
            .read_small_uint(self.offset + ClassDefItem::ACCESS_FLAGS_OFFSET)?;
        Ok(AccessFlags::from_bits_retain(raw))
    }

    /// Descriptor of the superclass, or `None` when the field holds the
    /// NO_INDEX marker (only `java.lang.Object` has no superclass).
    pub fn superclass(&self) -> Result<Option<String>, DexError> {
        let index = self
            .dex
            .read_int(self.offset + ClassDefItem::SUPERCLASS_IDX_OFFSET)?;
        self.dex.get_optional_type(index)
    }

    /// Source file name, when the compiler recorded one.
    pub fn source_file(&self) -> Result<Option<String>, DexError> {
        let index = self
            .dex
            .read_int(self.offset + ClassDefItem::SOURCE_FILE_IDX_OFFSET)?;
        self.dex.get_optional_string(index)
    }

    /// Descriptors of the directly implemented interfaces in type_list
    /// order. An offset of 0 means the class implements none.
    pub fn interfaces(&self) -> Result<Vec<String>, DexError> {
        let list_offset = self
            .dex
            .read_small_uint(self.offset + ClassDefItem::INTERFACES_OFF_OFFSET)?
            as usize;
        if list_offset == 0 {
            return Ok(vec![]);
        }

        let size = self.dex.read_small_uint(list_offset + TypeList::SIZE_OFFSET)?;
        let mut descriptors = vec![];
        let mut ix = list_offset + TypeList::LIST_OFFSET;
        for _ in 0..size {
            let type_index = read_u2(self.dex.data(), &mut ix)?;
            descriptors.push(self.dex.get_type(type_index as i32)?);
        }
        Ok(descriptors)
    }
}

// Two views of the same item in the same container are equal even though
// each access builds a fresh, non-aliased value.
impl PartialEq for ClassDef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dex, other.dex) && self.offset == other.offset
    }
}

impl Eq for ClassDef<'_> {}
