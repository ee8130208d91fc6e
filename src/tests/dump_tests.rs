use std::io::{self, Write};

use crate::dex::dex_file::DexFile;
use crate::dex::error::DexError;
use crate::tests::fixtures::{sample_dex_bytes, DexBuilder};

fn dump(dex: &DexFile) -> String {
    let mut out = vec![];
    dex.dump_to(&mut out, 16).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn dump_sections_appear_in_file_order() {
    let dex = DexFile::from_bytes(&sample_dex_bytes()).unwrap();
    let text = dump(&dex);

    let header_at = text.find("header_item").unwrap();
    let strings_at = text.find("string_id_item section").unwrap();
    let types_at = text.find("type_id_item section").unwrap();
    let protos_at = text.find("proto_id_item section").unwrap();
    let fields_at = text.find("field_id_item section").unwrap();
    assert!(header_at < strings_at);
    assert!(strings_at < types_at);
    assert!(types_at < protos_at);
    assert!(protos_at < fields_at);

    // The method and class_def tables are not part of this dump
    assert!(!text.contains("method_id_item"));
    assert!(!text.contains("class_def_item"));
}

#[test]
fn dump_annotates_header_fields() {
    let dex = DexFile::from_bytes(&sample_dex_bytes()).unwrap();
    let text = dump(&dex);
    assert!(text.contains("magic: dex\\n035\\0"));
    assert!(text.contains("endian_tag: 0x12345678"));
    assert!(text.contains("string_ids_size: 7"));
    assert!(text.contains("class_defs_size: 1"));
}

#[test]
fn dump_resolves_referenced_names() {
    let dex = DexFile::from_bytes(&sample_dex_bytes()).unwrap();
    let text = dump(&dex);
    assert!(text.contains("\"hello\""));
    assert!(text.contains("Lcom/example/Main;"));
    assert!(text.contains("shorty_idx = 5 // \"V\""));
}

#[test]
fn dump_skips_zero_count_tables() {
    // No strings, two types: the strings section must be absent while the
    // types section still renders, with its string references unresolved.
    let bytes = DexBuilder::new().type_id(0).type_id(1).build();
    let dex = DexFile::from_bytes(&bytes).unwrap();
    let text = dump(&dex);
    assert!(!text.contains("string_id_item"));
    assert!(text.contains("type_id_item section (2 items)"));
    assert!(text.contains("<unresolved>"));
    assert!(!text.contains("proto_id_item"));
    assert!(!text.contains("field_id_item"));
}

struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn dump_write_failure_surfaces_as_sink_error() {
    let dex = DexFile::from_bytes(&sample_dex_bytes()).unwrap();
    let err = dex.dump_to(&mut FailingSink, 16).unwrap_err();
    assert!(matches!(err, DexError::SinkWrite { .. }));
}
