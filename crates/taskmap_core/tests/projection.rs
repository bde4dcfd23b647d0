use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use taskmap_core::{
    aggregate, diff, project, AggregationPolicy, FilterMode, Node, NodeId, TreeError,
};

const POLICY: AggregationPolicy = AggregationPolicy::LeafWeighted;

fn ids(list: &[&str]) -> BTreeSet<NodeId> {
    list.iter().map(|id| NodeId::new(*id)).collect()
}

fn two_leaf_root() -> Node {
    Node::branch("root", vec![Node::leaf("a", false), Node::leaf("b", true)])
}

/// root (incomplete)
/// ├── done (complete)
/// │   ├── d1 ✓
/// │   └── d2 ✓
/// ├── mixed
/// │   ├── m1 ✓
/// │   ├── m2 □
/// │   └── nested (complete)
/// │       └── n1 ✓
/// └── open □
fn sample() -> Node {
    Node::branch(
        "root",
        vec![
            Node::branch("done", vec![Node::leaf("d1", true), Node::leaf("d2", true)]),
            Node::branch(
                "mixed",
                vec![
                    Node::leaf("m1", true),
                    Node::leaf("m2", false),
                    Node::branch("nested", vec![Node::leaf("n1", true)]),
                ],
            ),
            Node::leaf("open", false),
        ],
    )
}

#[test]
fn all_mode_keeps_every_node() {
    let tree = sample();
    let snapshot = project(&tree, FilterMode::All, POLICY).unwrap();

    let expected: BTreeSet<NodeId> = tree.ids().into_iter().collect();
    assert_eq!(snapshot.visible_ids(), &expected);
    assert_eq!(snapshot.tree().ids(), tree.ids());
    assert!(snapshot.virtual_root().is_none());
}

#[test]
fn uncompleted_example_keeps_only_open_leaf() {
    let snapshot = project(&two_leaf_root(), FilterMode::Uncompleted, POLICY).unwrap();

    assert_eq!(snapshot.visible_ids(), &ids(&["root", "a"]));
    let tree = snapshot.tree();
    assert_eq!(tree.id, NodeId::new("root"));
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].id, NodeId::new("a"));
}

#[test]
fn uncompleted_prunes_checked_leaves_and_finished_branches() {
    let snapshot = project(&sample(), FilterMode::Uncompleted, POLICY).unwrap();

    assert_eq!(
        snapshot.visible_ids(),
        &ids(&["root", "mixed", "m2", "open"])
    );
    snapshot.tree().walk(&mut |node, _| {
        if node.is_leaf() {
            assert!(!node.checked, "{} is checked", node.id);
        }
    });
}

#[test]
fn uncompleted_on_finished_tree_yields_empty_placeholder() {
    let tree = Node::branch("root", vec![Node::leaf("a", true), Node::leaf("b", true)]);
    let snapshot = project(&tree, FilterMode::Uncompleted, POLICY).unwrap();

    assert!(snapshot.is_empty());
    let placeholder = snapshot.virtual_root().expect("placeholder root");
    assert!(!tree.contains(placeholder));
    assert_eq!(&snapshot.tree().id, placeholder);
    assert!(snapshot.tree().children.is_empty());
}

#[test]
fn completed_promotes_nested_completed_subtrees() {
    let snapshot = project(&sample(), FilterMode::Completed, POLICY).unwrap();

    assert_eq!(
        snapshot.visible_ids(),
        &ids(&["done", "d1", "d2", "m1", "nested", "n1"])
    );
    let top: Vec<&str> = snapshot
        .tree()
        .children
        .iter()
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(top, vec!["done", "m1", "nested"]);
    assert_eq!(snapshot.virtual_root(), Some(&snapshot.tree().id));
}

#[test]
fn completed_never_shows_partial_nodes() {
    let mut aggregated = sample();
    aggregate(&mut aggregated, POLICY);
    let snapshot = project(&sample(), FilterMode::Completed, POLICY).unwrap();

    for id in snapshot.visible_ids() {
        let source = aggregated.find(id).unwrap();
        assert_eq!(source.cached_completion().unwrap().percentage, 100, "{id}");
    }
}

#[test]
fn completed_prunes_partial_children_of_rounded_roots() {
    // 199 of 200 leaves rounds to 100%, the lone open leaf must still go.
    let mut leaves: Vec<Node> = (0..199)
        .map(|n| Node::leaf(format!("leaf-{n}"), true))
        .collect();
    leaves.push(Node::leaf("straggler", false));
    let tree = Node::branch("root", leaves);

    let snapshot = project(&tree, FilterMode::Completed, POLICY).unwrap();
    assert!(snapshot.is_visible(&NodeId::new("root")));
    assert!(!snapshot.is_visible(&NodeId::new("straggler")));
    assert_eq!(snapshot.visible_ids().len(), 200);
}

#[test]
fn completed_with_nothing_done_is_an_empty_wrapper() {
    let tree = Node::branch("root", vec![Node::leaf("a", false)]);
    let snapshot = project(&tree, FilterMode::Completed, POLICY).unwrap();
    assert!(snapshot.is_empty());
    assert!(snapshot.tree().children.is_empty());
}

#[test]
fn projection_is_deterministic() {
    for mode in FilterMode::ALL {
        let first = project(&sample(), mode, POLICY).unwrap();
        let second = project(&sample(), mode, POLICY).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn projection_rejects_malformed_trees() {
    let tree = Node::branch("root", vec![Node::leaf("a", false), Node::leaf("a", true)]);
    assert_eq!(
        project(&tree, FilterMode::All, POLICY).unwrap_err(),
        TreeError::DuplicateId("a".into())
    );
}

#[test]
fn diff_classifies_entering_and_exiting() {
    let all = project(&sample(), FilterMode::All, POLICY).unwrap();
    let open = project(&sample(), FilterMode::Uncompleted, POLICY).unwrap();

    let changes = diff(all.visible_ids(), open.visible_ids());
    assert!(changes.entering.is_empty());
    assert_eq!(
        changes.exiting,
        ids(&["done", "d1", "d2", "m1", "nested", "n1"])
    );

    let back = diff(open.visible_ids(), all.visible_ids());
    assert_eq!(back.entering, changes.exiting);
    assert!(back.exiting.is_empty());
}

#[test]
fn diff_of_identical_sets_is_empty() {
    let set = ids(&["a", "b", "c"]);
    assert!(diff(&set, &set).is_empty());
    assert!(diff(&BTreeSet::new(), &BTreeSet::new()).is_empty());
}
