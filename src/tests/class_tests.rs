use crate::dex::dex_file::DexFile;
use crate::dex::error::{DexError, Table};
use crate::dex::items::AccessFlags;
use crate::tests::fixtures::{sample_dex_bytes, ClassSpec, DexBuilder};

fn sample_dex() -> DexFile {
    DexFile::from_bytes(&sample_dex_bytes()).unwrap()
}

#[test]
fn class_set_has_fixed_size() {
    let dex = sample_dex();
    let classes = dex.get_classes();
    assert_eq!(dex.get_class_count(), 1);
    assert_eq!(classes.len(), 1);
    assert!(!classes.is_empty());
    assert_eq!(
        classes.get(1).unwrap_err(),
        DexError::IndexOutOfRange { table: Table::Classes, index: 1, count: 1 }
    );
    assert_eq!(
        classes.get(-1).unwrap_err(),
        DexError::IndexOutOfRange { table: Table::Classes, index: -1, count: 1 }
    );
}

#[test]
fn elements_rebuild_fresh_and_compare_equal() {
    let dex = sample_dex();
    let classes = dex.get_classes();
    let first = classes.get(0).unwrap();
    let second = classes.get(0).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.offset(), second.offset());
}

#[test]
fn class_accessors_resolve_through_the_tables() {
    let dex = sample_dex();
    let class = dex.get_classes().get(0).unwrap();
    assert_eq!(class.type_descriptor().unwrap(), "Lcom/example/Main;");
    assert_eq!(
        class.superclass().unwrap().as_deref(),
        Some("Ljava/lang/Object;")
    );
    assert_eq!(class.source_file().unwrap().as_deref(), Some("Main.java"));
    assert_eq!(class.interfaces().unwrap(), vec!["Lrun/Task;"]);

    let flags = class.access_flags().unwrap();
    assert!(flags.contains(AccessFlags::PUBLIC));
    assert!(flags.contains(AccessFlags::FINAL));
    assert!(!flags.contains(AccessFlags::INTERFACE));
}

#[test]
fn no_index_markers_read_as_none() {
    let bytes = DexBuilder::new()
        .string("Ljava/lang/Object;")
        .type_id(0)
        .class(ClassSpec::new(0))
        .build();
    let dex = DexFile::from_bytes(&bytes).unwrap();
    let class = dex.get_classes().get(0).unwrap();
    assert_eq!(class.type_descriptor().unwrap(), "Ljava/lang/Object;");
    assert_eq!(class.superclass().unwrap(), None);
    assert_eq!(class.source_file().unwrap(), None);
    assert_eq!(class.interfaces().unwrap(), Vec::<String>::new());
}

#[test]
fn iteration_yields_definition_order() {
    let bytes = DexBuilder::new()
        .string("LA;")
        .string("LB;")
        .string("LC;")
        .type_id(0)
        .type_id(1)
        .type_id(2)
        .class(ClassSpec::new(0))
        .class(ClassSpec::new(2))
        .class(ClassSpec::new(1))
        .build();
    let dex = DexFile::from_bytes(&bytes).unwrap();
    let descriptors: Vec<String> = dex
        .get_classes()
        .iter()
        .map(|class| class.unwrap().type_descriptor().unwrap())
        .collect();
    assert_eq!(descriptors, vec!["LA;", "LC;", "LB;"]);
}

#[test]
fn lib_level_descriptor_helper() {
    let dex = sample_dex();
    assert_eq!(
        crate::class_descriptors(&dex).unwrap(),
        vec!["Lcom/example/Main;"]
    );
}
