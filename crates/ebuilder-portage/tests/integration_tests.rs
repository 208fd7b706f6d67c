//! Integration tests using fixture trees.

use ebuilder_core::{BuildScriptRecord, Coordinate, DEFAULT_SLOT};
use ebuilder_portage::{EbuildParser, IndexOptions, TreeIndexer};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn coord(gav: &str) -> Coordinate {
    gav.parse().unwrap()
}

fn parse_fixture(relative: &str) -> BuildScriptRecord {
    EbuildParser::default()
        .parse(&fixture(relative))
        .unwrap_or_else(|e| panic!("failed to parse {relative}: {e}"))
}

#[test]
fn test_fixture_commons_imaging() {
    let record =
        parse_fixture("portage/dev-java/commons-imaging/commons-imaging-1.0_alpha3-r2.ebuild");

    assert_eq!(
        record,
        BuildScriptRecord {
            category: "dev-java".into(),
            name: "commons-imaging".into(),
            version_spec: "1.0_alpha3-r2".into(),
            slot: "1".into(),
            use_flag: String::new(),
            inherited_capabilities: vec!["java-pkg-2".into(), "java-pkg-simple".into()],
            provided_coordinates: vec![coord("org.apache.commons:commons-imaging:1.0_alpha3")],
        }
    );
}

#[test]
fn test_fixture_icu4j() {
    let record = parse_fixture("portage/dev-java/icu4j/icu4j-75.1.ebuild");

    assert_eq!(
        record,
        BuildScriptRecord {
            category: "dev-java".into(),
            name: "icu4j".into(),
            version_spec: "75.1".into(),
            slot: "0".into(),
            use_flag: String::new(),
            inherited_capabilities: vec!["java-pkg-2".into(), "java-pkg-simple".into()],
            provided_coordinates: vec![
                coord("com.ibm.icu:icu4j:75.1"),
                coord("com.ibm.icu:icu4j-charset:75.1"),
                coord("com.ibm.icu:icu4j-localespi:75.1"),
            ],
        }
    );
}

#[test]
fn test_fixture_java_getopt() {
    let record = parse_fixture("portage/dev-java/java-getopt/java-getopt-1.0.14-r3.ebuild");

    assert_eq!(
        record,
        BuildScriptRecord {
            category: "dev-java".into(),
            name: "java-getopt".into(),
            version_spec: "1.0.14-r3".into(),
            slot: "1".into(),
            use_flag: String::new(),
            inherited_capabilities: vec!["java-pkg-2".into(), "java-pkg-simple".into()],
            provided_coordinates: vec![coord("gnu.getopt:java-getopt:1.0.14")],
        }
    );
}

#[test]
fn test_fixture_without_slot() {
    let record = parse_fixture("portage/dev-java/ant-junit/ant-junit-1.10.14.ebuild");
    assert_eq!(record.slot, DEFAULT_SLOT);
    assert_eq!(record.inherited_capabilities, ["ant-tasks"]);
    assert!(record.provided_coordinates.is_empty());
}

#[test]
fn test_fixture_optional_java() {
    let record = parse_fixture("portage/dev-libs/protobuf/protobuf-21.12.ebuild");
    assert_eq!(record.use_flag, "java");
    assert_eq!(record.slot, "0/32");
    assert_eq!(record.inherited_capabilities, ["java-pkg-opt-2"]);
    assert_eq!(
        record.provided_coordinates,
        [coord("com.google.protobuf:protobuf-java:3.21.12")]
    );
}

#[test]
fn test_fixture_tree_index() {
    let result = TreeIndexer::default().build_index(&[fixture("portage")]);

    assert!(result.failures.is_empty(), "{:?}", result.failures);
    // 1 + 3 + 1 + 1 coordinates, hello and ant-junit provide none
    assert_eq!(result.index.len(), 6);

    let getopt = result.index.get(&coord("gnu.getopt:java-getopt:1.0.14")).unwrap();
    assert_eq!(getopt.version_spec, "1.0.14-r3");

    let icu = result.index.get(&coord("com.ibm.icu:icu4j-localespi:75.1")).unwrap();
    assert_eq!(icu.atom(), "dev-java/icu4j:0");

    assert!(result.index.get(&coord("gnu.getopt:java-getopt:1.0.13")).is_none());
}

#[test]
fn test_fixture_overlay_overrides_tree() {
    let indexer = TreeIndexer::new(
        EbuildParser::default(),
        IndexOptions {
            warn_on_duplicates: false,
        },
    );
    let result = indexer.build_index(&[fixture("portage"), fixture("overlay")]);

    assert_eq!(result.index.len(), 6);
    let getopt = result.index.get(&coord("gnu.getopt:java-getopt:1.0.14")).unwrap();
    assert_eq!(getopt.version_spec, "1.0.14-r4");

    let result = indexer.build_index(&[fixture("overlay"), fixture("portage")]);
    let getopt = result.index.get(&coord("gnu.getopt:java-getopt:1.0.14")).unwrap();
    assert_eq!(getopt.version_spec, "1.0.14-r3");
}

#[test]
fn test_fixture_index_twice_equal() {
    let indexer = TreeIndexer::default();
    let roots = [fixture("portage"), fixture("overlay")];
    assert_eq!(indexer.build_index(&roots).index, indexer.build_index(&roots).index);
}
