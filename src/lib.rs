//! # Dexview
//!
//! A library for zero-copy reading of Android DEX file containers
//!
use crate::dex::dex_file::DexFile;
use crate::dex::error::DexError;

pub mod dex;
mod tests;

/// Collects the JNI descriptor of every class in the container, in
/// definition order.
///
/// # Examples
///
/// ```no_run
///  use dexview::class_descriptors;
///  use dexview::dex::DexFile;
///  use std::path::Path;
///
///  let dex = DexFile::from_file(Path::new("classes.dex")).unwrap();
///  let descriptors = class_descriptors(&dex).unwrap();
///  println!("{:} classes.", descriptors.len());
/// ```
pub fn class_descriptors(dex: &DexFile) -> Result<Vec<String>, DexError> {
    let mut results = vec![];

    for class in dex.get_classes().iter() {
        results.push(class?.type_descriptor()?);
    }

    Ok(results)
}
