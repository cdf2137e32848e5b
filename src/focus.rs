//! Focus/pending selection over any flagged tree.
//!
//! Focused nodes are searched with a post-order traversal: the flag of a
//! node is looked at after all of its children. A focused node with
//! focused descendants loses its focus, with a warning, in favor of those
//! descendants. When nothing is focused the whole tree is selected.

use crate::diagnostics::DiagnosticSink;
use crate::flag::Flag;

/// The capabilities selection needs from a tree node.
pub trait FocusTree: Sized {
    fn flag(&self) -> Flag;

    fn children(&self) -> &[Self];

    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    fn warn(&self, sink: &mut dyn DiagnosticSink, message: &str);
}

/// Counts of flags that influenced a selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlagStat {
    /// Nodes whose focus was honored.
    pub focus_count: usize,
    /// Skipped subtrees met while collecting leaves.
    pub skip_count: usize,
}

impl FlagStat {
    /// True when some node was focused or skipped.
    pub fn any(&self) -> bool {
        self.focus_count > 0 || self.skip_count > 0
    }
}

/// Leaves selected for execution, in document order.
#[derive(Debug)]
pub struct Selection<'t, T> {
    pub leaves: Vec<&'t T>,
    pub stat: FlagStat,
}

/// Select the leaves to run below `root`.
pub fn extract_selected_leaves<'t, T: FocusTree>(
    root: &'t T,
    sink: &mut dyn DiagnosticSink,
) -> Selection<'t, T> {
    let mut focused = Vec::new();
    find_focused_nodes(root, &mut focused, sink);

    let mut stat = FlagStat {
        focus_count: focused.len(),
        skip_count: 0,
    };
    if focused.is_empty() {
        focused.push(root);
    }

    let mut leaves = Vec::new();
    for node in focused {
        collect_leaves(node, &mut leaves, &mut stat);
    }

    Selection { leaves, stat }
}

fn find_focused_nodes<'t, T: FocusTree>(
    node: &'t T,
    focused: &mut Vec<&'t T>,
    sink: &mut dyn DiagnosticSink,
) {
    let flag = node.flag();
    if flag == Flag::Skip {
        return;
    }

    let initial_len = focused.len();
    for child in node.children() {
        find_focused_nodes(child, focused, sink);
    }

    if flag == Flag::Focus {
        if focused.len() > initial_len {
            node.warn(
                sink,
                "This node is marked as focused and it has focused descendants. \
                 The focus on this node is ignored in favor of that of its descendants.",
            );
        } else {
            focused.push(node);
        }
    }
}

fn collect_leaves<'t, T: FocusTree>(node: &'t T, leaves: &mut Vec<&'t T>, stat: &mut FlagStat) {
    if node.flag() == Flag::Skip {
        stat.skip_count += 1;
        return;
    }
    for child in node.children() {
        collect_leaves(child, leaves, stat);
    }
    if node.is_leaf() {
        leaves.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;

    #[derive(Debug)]
    struct Node {
        name: &'static str,
        flag: Flag,
        children: Vec<Node>,
    }

    impl FocusTree for Node {
        fn flag(&self) -> Flag {
            self.flag
        }

        fn children(&self) -> &[Node] {
            &self.children
        }

        fn warn(&self, sink: &mut dyn DiagnosticSink, message: &str) {
            sink.warn(None, &format!("{}: {}", self.name, message));
        }
    }

    fn leaf(name: &'static str, flag: Flag) -> Node {
        Node {
            name,
            flag,
            children: vec![],
        }
    }

    fn branch(name: &'static str, flag: Flag, children: Vec<Node>) -> Node {
        Node {
            name,
            flag,
            children,
        }
    }

    fn names(selection: &Selection<'_, Node>) -> Vec<&'static str> {
        selection.leaves.iter().map(|n| n.name).collect()
    }

    #[test]
    fn test_no_focus_selects_everything() {
        let tree = branch(
            "A",
            Flag::None,
            vec![
                leaf("B", Flag::None),
                branch("C", Flag::None, vec![leaf("D", Flag::None), leaf("E", Flag::None)]),
            ],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        let selection = extract_selected_leaves(&tree, &mut sink);

        assert_eq!(names(&selection), vec!["B", "D", "E"]);
        assert_eq!(selection.stat, FlagStat::default());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_descendant_focus_wins_over_ancestor() {
        // A{ B{FOCUS}, C{FOCUS}{ D{FOCUS}, E } }
        let tree = branch(
            "A",
            Flag::None,
            vec![
                branch("B", Flag::Focus, vec![leaf("B1", Flag::None), leaf("B2", Flag::None)]),
                branch(
                    "C",
                    Flag::Focus,
                    vec![
                        branch("D", Flag::Focus, vec![leaf("D1", Flag::None)]),
                        leaf("E", Flag::None),
                    ],
                ),
            ],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        let selection = extract_selected_leaves(&tree, &mut sink);

        assert_eq!(names(&selection), vec!["B1", "B2", "D1"]);
        assert_eq!(selection.stat.focus_count, 2);
        assert_eq!(sink.len(), 1);
        assert!(sink[0].message.starts_with("C: "));
    }

    #[test]
    fn test_focused_leaf_in_deep_tree() {
        //      1
        //     / \
        //    2F  3
        //   / \   \
        //  4   5   6F
        //     / \
        //    7F  8
        //   / \
        //  9   10
        let tree = branch(
            "1",
            Flag::None,
            vec![
                branch(
                    "2",
                    Flag::Focus,
                    vec![
                        leaf("4", Flag::None),
                        branch(
                            "5",
                            Flag::None,
                            vec![
                                branch(
                                    "7",
                                    Flag::Focus,
                                    vec![leaf("9", Flag::None), leaf("10", Flag::None)],
                                ),
                                leaf("8", Flag::None),
                            ],
                        ),
                    ],
                ),
                branch("3", Flag::None, vec![leaf("6", Flag::Focus)]),
            ],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        let selection = extract_selected_leaves(&tree, &mut sink);

        assert_eq!(names(&selection), vec!["9", "10", "6"]);
    }

    #[test]
    fn test_skipped_subtree_is_pruned_and_counted_once() {
        let tree = branch(
            "A",
            Flag::None,
            vec![
                branch(
                    "B",
                    Flag::Skip,
                    vec![leaf("B1", Flag::Skip), leaf("B2", Flag::None)],
                ),
                leaf("C", Flag::None),
                leaf("D", Flag::Skip),
            ],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        let selection = extract_selected_leaves(&tree, &mut sink);

        assert_eq!(names(&selection), vec!["C"]);
        assert_eq!(selection.stat.skip_count, 2);
        assert_eq!(selection.stat.focus_count, 0);
    }

    #[test]
    fn test_focus_inside_skip_is_ignored() {
        let tree = branch(
            "A",
            Flag::None,
            vec![
                branch("B", Flag::Skip, vec![leaf("B1", Flag::Focus)]),
                leaf("C", Flag::None),
            ],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        let selection = extract_selected_leaves(&tree, &mut sink);

        assert_eq!(names(&selection), vec!["C"]);
        assert_eq!(selection.stat.focus_count, 0);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let tree = branch(
            "A",
            Flag::None,
            vec![leaf("B", Flag::Focus), leaf("C", Flag::None), leaf("D", Flag::Focus)],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        let first = names(&extract_selected_leaves(&tree, &mut sink));
        let second = names(&extract_selected_leaves(&tree, &mut sink));
        assert_eq!(first, vec!["B", "D"]);
        assert_eq!(first, second);
    }
}
