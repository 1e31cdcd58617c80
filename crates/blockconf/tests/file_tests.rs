use blockconf::source::{self, Compression};
use blockconf::{BlockPolicy, Error, Node, ParserConfig};
use blockconf_test_utils::{forest, write_fixture, FOREST};
use std::io::Write;

#[test]
fn plain_file() {
    let (_dir, path) = write_fixture("forest.conf", FOREST);
    assert_eq!(Node::from_path(&path).unwrap(), forest());
}

#[test]
fn zstd_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.conf.zst");
    assert_eq!(Compression::from_path(&path), Compression::Zstd);

    let mut sink = source::create(&path).unwrap();
    forest().write_to(&mut sink).unwrap();
    sink.finish().unwrap();

    assert_eq!(Node::from_path(&path).unwrap(), forest());
}

#[test]
fn gzip_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.conf.gz");
    assert_eq!(Compression::from_path(&path), Compression::Gzip);

    let mut sink = source::create(&path).unwrap();
    forest().write_to(&mut sink).unwrap();
    sink.finish().unwrap();

    assert_eq!(Node::from_path(&path).unwrap(), forest());
}

#[test]
fn missing_file_is_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Node::from_path(dir.path().join("nope.conf")).unwrap_err();
    assert!(matches!(err, Error::Source(_)));
    assert!(!err.is_parse());
}

#[test]
fn parse_error_names_the_file() {
    let (_dir, path) = write_fixture("bad.conf", "a = 1\nb\n");
    let err = Node::from_path(&path).unwrap_err();
    match &err {
        Error::Parse { path: label, line, .. } => {
            assert_eq!(*line, 2);
            assert!(label.ends_with("bad.conf"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("bad.conf line 2"));
}

#[test]
fn lenient_file_with_open_block() {
    let (_dir, path) = write_fixture("open.conf", "tree{\nname = oak\n");
    assert!(Node::from_path(&path).is_err());

    let config = ParserConfig::new().with_blocks(BlockPolicy::Lenient);
    let root = Node::from_path_with(&path, config).unwrap();
    let tree = root.get_unique_block("tree").unwrap();
    assert_eq!(tree.raw_values("name"), ["oak"]);
}

#[test]
fn reader_input() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FOREST.as_bytes()).unwrap();
    let reader = source::open(file.path()).unwrap();
    let root = Node::from_reader(reader, "forest").unwrap();
    assert_eq!(root.count_blocks("tree"), 2);
}
