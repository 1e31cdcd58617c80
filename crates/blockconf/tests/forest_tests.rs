use blockconf::{Error, Node};
use blockconf_test_utils::{forest, COMPACT_TREE, FOREST};
use pretty_assertions::assert_eq;

#[test]
fn compact_tree_scenario() {
    let root = Node::parse_str(COMPACT_TREE).unwrap();

    assert_eq!(root.count_blocks("tree"), 1);
    let tree = root.get_unique_block("tree").unwrap();
    assert_eq!(tree.raw_values("name"), ["cool tree"]);

    let branches = tree.get_blocks("branch").unwrap();
    assert_eq!(branches.len(), 2);
    assert!(branches[0].get_yes_no("broken").unwrap());
    assert!(!branches[1].get_yes_no("broken").unwrap());
}

#[test]
fn forest_walk() {
    let forest = forest();
    let mut report = Vec::new();

    for tree in forest.find_blocks("tree") {
        report.push(format!("tree {}", tree.get_unique_value::<String>("name").unwrap()));
        let trunk = tree.get_unique_block("trunk").unwrap();
        report.push(format!("size {}", trunk.get_unique_value::<usize>("size").unwrap()));
        report.push(format!("type {}", trunk.get_unique_value::<String>("type").unwrap()));

        for branch in tree.find_blocks("branch") {
            if branch.get_yes_no_or("broken", false).unwrap() {
                report.push("broken".to_string());
                continue;
            }
            report.push("alive".to_string());
            for leave in branch.find_blocks("leave") {
                let color = leave
                    .get_unique_value_or("color", "green".to_string())
                    .unwrap();
                report.push(format!("leave {color}"));
            }
        }
    }

    assert_eq!(
        report,
        [
            "tree cool tree",
            "size 10",
            "type big and ugly",
            "broken",
            "alive",
            "leave green",
            "leave yellow",
            "leave yellow",
            "tree dead tree",
            "size 2",
            "type small",
        ]
    );
}

#[test]
fn empty_block_is_retrievable() {
    let root = Node::parse_str("x{}\n").unwrap();
    let x = root.get_unique_block("x").unwrap();
    assert_eq!(x.value_keys().count(), 0);
    assert_eq!(x.children().count(), 0);
}

#[test]
fn unknown_keys_are_lenient_where_asked() {
    let forest = forest();
    assert!(forest.find_blocks("missing").is_empty());
    assert!(forest.find_values::<String>("missing").unwrap().is_empty());
    assert_eq!(forest.count_values("missing"), 0);
    assert_eq!(forest.count_blocks("missing"), 0);
}

#[test]
fn accessor_error_keeps_tree_usable() {
    let forest = forest();
    let err = forest.get_unique_block("tree").unwrap_err();
    assert!(matches!(err, Error::MultipleBlocks { count: 2, .. }));

    // still fine afterwards
    assert_eq!(forest.get_blocks("tree").unwrap().len(), 2);
}

#[test]
fn blocks_are_read_only_views() {
    let forest = forest();
    let first = forest.find_blocks("tree")[0].clone();
    drop(forest);
    assert_eq!(first.get_unique_value::<String>("name").unwrap(), "cool tree");
}

#[test]
fn comments_and_blank_lines_are_transparent() {
    let plain = Node::parse_str("a=1\nb{\nc=2\n}\n").unwrap();
    let noisy = Node::parse_str("# top\n\na=1 # one\n\n   \nb{ # open\n# inside\nc=2\n} # close\n\n").unwrap();
    assert_eq!(plain, noisy);
}

#[test]
fn parse_error_line_in_forest() {
    let broken = FOREST.replacen("   broken=no", "   broken no", 1);
    match Node::parse_str(&broken).unwrap_err() {
        Error::Parse { line, path, .. } => {
            assert_eq!(line, 14);
            assert_eq!(path, blockconf::ANONYMOUS);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
