//! Text rendering of an artifact tree.

use std::collections::HashSet;
use std::sync::Arc;

use modtree_core::artifact::Artifact;

/// Render `root` with `├──`/`└──` connectors.
///
/// A node shared through the resolution cache is expanded the first time it
/// is printed and marked `(*)` afterwards. `max_depth` limits how many levels
/// below the root are shown.
pub fn render_tree(root: &Artifact, max_depth: Option<usize>) -> String {
    let mut output = format!("{root}\n");
    let mut expanded: HashSet<*const Artifact> = HashSet::new();
    let count = root.dependencies.len();
    for (i, dep) in root.dependencies.iter().enumerate() {
        render_subtree(&mut output, dep, "", i == count - 1, 1, max_depth, &mut expanded);
    }
    output
}

fn render_subtree(
    output: &mut String,
    node: &Arc<Artifact>,
    prefix: &str,
    is_last: bool,
    depth: usize,
    max_depth: Option<usize>,
    expanded: &mut HashSet<*const Artifact>,
) {
    let connector = if is_last { "└── " } else { "├── " };

    if !node.is_leaf() && !expanded.insert(Arc::as_ptr(node)) {
        output.push_str(&format!("{prefix}{connector}{node} (*)\n"));
        return;
    }
    output.push_str(&format!("{prefix}{connector}{node}\n"));

    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let count = node.dependencies.len();
    for (i, dep) in node.dependencies.iter().enumerate() {
        render_subtree(
            output,
            dep,
            &child_prefix,
            i == count - 1,
            depth + 1,
            max_depth,
            expanded,
        );
    }
}
