//! Assembles the nested category tree from a flat list.

use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Category, TreeNode};

/// Build the forest rooted at categories whose `parent` is `None`.
///
/// Categories are grouped by parent once and expanded with an explicit stack,
/// so depth is bounded by memory rather than the call stack. Siblings are
/// ordered by name at every level. A category whose parent is not in
/// `categories` is unreachable from a root and is left out together with its
/// subtree.
pub fn build_tree(categories: Vec<Category>) -> Vec<TreeNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<Category>> = HashMap::new();
    for category in categories {
        by_parent.entry(category.parent).or_default().push(category);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| a.name.cmp(&b.name));
    }

    // Pre-order walk: every parent is emitted before its children.
    let mut preorder: Vec<Category> = Vec::new();
    let mut stack: Vec<Category> = by_parent
        .remove(&None)
        .unwrap_or_default()
        .into_iter()
        .rev()
        .collect();
    while let Some(category) = stack.pop() {
        if let Some(children) = by_parent.remove(&Some(category.id)) {
            stack.extend(children.into_iter().rev());
        }
        preorder.push(category);
    }

    // Reverse pre-order finishes every child before its parent. Siblings are
    // therefore collected back to front and flipped when their parent is built.
    let mut finished: HashMap<Option<Uuid>, Vec<TreeNode>> = HashMap::new();
    for category in preorder.into_iter().rev() {
        let parent = category.parent;
        let mut children = finished.remove(&Some(category.id)).unwrap_or_default();
        children.reverse();

        let mut node = TreeNode::leaf(category);
        node.children = children;
        finished.entry(parent).or_default().push(node);
    }

    let mut roots = finished.remove(&None).unwrap_or_default();
    roots.reverse();
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateCategory;

    fn category(name: &str, parent: Option<&Category>) -> Category {
        Category::new(CreateCategory {
            name: name.to_string(),
            parent: parent.map(|p| p.id),
            ..Default::default()
        })
    }

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(vec![]).is_empty());
    }

    #[test]
    fn test_nests_and_sorts_siblings() {
        let clothing = category("Clothing", None);
        let books = category("Books", None);
        let shirts = category("Shirts", Some(&clothing));
        let jackets = category("Jackets", Some(&clothing));
        let denim = category("Denim", Some(&jackets));

        let tree = build_tree(vec![
            shirts.clone(),
            clothing.clone(),
            denim.clone(),
            books.clone(),
            jackets.clone(),
        ]);

        assert_eq!(names(&tree), vec!["Books", "Clothing"]);
        assert!(tree[0].children.is_empty());
        assert_eq!(names(&tree[1].children), vec!["Jackets", "Shirts"]);
        assert_eq!(names(&tree[1].children[0].children), vec!["Denim"]);
        assert_eq!(tree[1].children[0].children[0].id, denim.id);
    }

    #[test]
    fn test_missing_parent_drops_subtree() {
        let hidden = category("Hidden", None);
        let orphan = category("Orphan", Some(&hidden));
        let grandchild = category("Grandchild", Some(&orphan));
        let visible = category("Visible", None);

        let tree = build_tree(vec![orphan, grandchild, visible]);

        assert_eq!(names(&tree), vec!["Visible"]);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_deep_chain() {
        let mut chain = vec![category("n0", None)];
        for i in 1..1_000 {
            let next = category(&format!("n{}", i), chain.last());
            chain.push(next);
        }

        let tree = build_tree(chain);

        let mut depth = 0;
        let mut level = &tree;
        while let Some(node) = level.first() {
            depth += 1;
            level = &node.children;
        }
        assert_eq!(depth, 1_000);
    }
}
