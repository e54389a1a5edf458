//! Route tree storage and editing.
//!
//! The tree is a nest of [`Children`] maps keyed by literal segment text. Each
//! node owns its children outright; there are no parent pointers, so removal
//! re-walks from the root to find the parent.
//!
//! Every node created by [`RouteTree::insert`] carries the full path it
//! represents, which is what lets structural nodes such as `/foo` in
//! `/foo/:bar` show up in resolved route chains.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::pattern::PathMatcher;
use super::walk::{self, Step};
use crate::error::RouterError;
use crate::info::RouteInfo;

/// Info a structural node adopted from the first route attached beneath it.
#[derive(Debug, Clone)]
struct Layout {
    /// Route of the child the info was copied from
    from: String,
    info: RouteInfo,
}

#[derive(Debug, Clone)]
struct SiblingKey {
    priority: u32,
    key: String,
}

/// Child nodes of a tree level, kept in matching order.
#[derive(Debug, Clone, Default)]
pub struct Children {
    nodes: HashMap<String, RouteNode>,
    /// Ascending priority; equal priorities keep insertion order
    keys: Vec<SiblingKey>,
}

impl Children {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Child keys in matching order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&RouteNode> {
        self.nodes.get(key)
    }

    /// Child nodes in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> {
        self.keys.iter().filter_map(|k| self.nodes.get(&k.key))
    }

    /// Whether any sibling at this level is a splat.
    pub fn has_splat(&self) -> bool {
        self.iter().any(|node| node.pattern.is_splat())
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut RouteNode> {
        self.nodes.get_mut(key)
    }

    /// Existing child for `step`, or a new one inserted at its priority slot.
    fn entry(&mut self, step: &Step<'_>, matcher: PathMatcher) -> &mut RouteNode {
        match self.nodes.entry(step.segment.to_string()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let priority = matcher.priority();
                let at = self.keys.partition_point(|k| k.priority <= priority);
                self.keys.insert(
                    at,
                    SiblingKey {
                        priority,
                        key: step.segment.to_string(),
                    },
                );
                e.insert(RouteNode::new(matcher, step.consumed))
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<RouteNode> {
        let node = self.nodes.remove(key)?;
        self.keys.retain(|k| k.key != key);
        self.keys.sort_by_key(|k| k.priority);
        Some(node)
    }
}

/// One segment of the route tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    pattern: PathMatcher,
    route: String,
    info: Option<RouteInfo>,
    layout: Option<Layout>,
    children: Children,
}

impl RouteNode {
    fn new(pattern: PathMatcher, route: &str) -> Self {
        Self {
            pattern,
            route: route.to_string(),
            info: None,
            layout: None,
            children: Children::default(),
        }
    }

    pub fn pattern(&self) -> &PathMatcher {
        &self.pattern
    }

    /// Full path this node represents.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Info attached by an `add` at exactly this path.
    pub fn info(&self) -> Option<&RouteInfo> {
        self.info.as_ref()
    }

    /// Info reported for this node: its own, else the adopted layout info.
    pub fn effective_info(&self) -> Option<&RouteInfo> {
        self.info
            .as_ref()
            .or_else(|| self.layout.as_ref().map(|l| &l.info))
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    fn attach(&mut self, info: RouteInfo) {
        match self.info.as_mut() {
            Some(existing) => existing.merge(info),
            None => self.info = Some(info),
        }
    }
}

/// The whole route tree. Its top level only ever holds the root `/` node.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    roots: Children,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &Children {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Attach `info` at `full_path`, creating intermediate nodes as needed.
    ///
    /// Re-inserting at an existing path merges fields into the node's info and
    /// keeps its children. The node's immediate parent adopts a copy of the
    /// info (without `key`) as layout info if it has none yet; the root `/`
    /// never adopts.
    ///
    /// # Errors
    ///
    /// [`RouterError::SlashInCustomExpr`] or [`RouterError::InvalidPattern`];
    /// both are detected before the tree is touched.
    pub fn insert(&mut self, full_path: &str, info: RouteInfo) -> Result<(), RouterError> {
        let steps = walk::segments(full_path)?;
        let matchers = steps
            .iter()
            .map(|step| {
                PathMatcher::compile(step.segment).map_err(|e| match e {
                    RouterError::InvalidPattern {
                        pattern, reason, ..
                    } => RouterError::InvalidPattern {
                        route: full_path.to_string(),
                        pattern,
                        reason,
                    },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut levels = steps.iter().zip(matchers);
        let Some((root_step, root_matcher)) = levels.next() else {
            return Ok(());
        };
        let root = self.roots.entry(root_step, root_matcher);

        let mut path: Vec<(&Step<'_>, PathMatcher)> = levels.collect();
        let Some((leaf_step, leaf_matcher)) = path.pop() else {
            root.attach(info);
            return Ok(());
        };
        let parent_is_root = path.is_empty();

        let mut parent = root;
        for (step, matcher) in path {
            parent = parent.children.entry(step, matcher);
        }

        let leaf = parent.children.entry(leaf_step, leaf_matcher);
        let adopted = Layout {
            from: leaf.route.clone(),
            info: info.as_layout(),
        };
        leaf.attach(info);

        if !parent_is_root && parent.layout.is_none() {
            parent.layout = Some(adopted);
        }
        Ok(())
    }

    /// Remove the node at `full_path`.
    ///
    /// The root `/` is never detached; removing it only clears its own info.
    /// Any other node is detached together with its subtree, and its parent
    /// forgets layout info adopted from it. `requested` is the path as the
    /// caller wrote it, used in errors.
    ///
    /// # Errors
    ///
    /// [`RouterError::NotFound`] if any segment of the path has no node.
    pub fn remove(&mut self, full_path: &str, requested: &str) -> Result<(), RouterError> {
        let steps = walk::segments(full_path)?;
        let keys: Vec<&str> = steps.iter().map(|s| s.segment).collect();
        let not_found = |segment: &str| RouterError::not_found(requested, segment);

        let Some((leaf, ancestors)) = keys.split_last() else {
            return Err(not_found(full_path));
        };

        let Some((root_key, between)) = ancestors.split_first() else {
            let root = self.roots.get_mut(leaf).ok_or_else(|| not_found(leaf))?;
            root.info = None;
            return Ok(());
        };

        let mut parent = self
            .roots
            .get_mut(root_key)
            .ok_or_else(|| not_found(root_key))?;
        for key in between {
            parent = parent
                .children
                .get_mut(key)
                .ok_or_else(|| not_found(key))?;
        }

        let removed = parent.children.remove(leaf).ok_or_else(|| not_found(leaf))?;
        if parent
            .layout
            .as_ref()
            .is_some_and(|layout| layout.from == removed.route)
        {
            parent.layout = None;
        }
        Ok(())
    }

    /// Routes that carry their own info, parents before children.
    pub fn patterns(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_patterns(&self.roots, &mut out);
        out
    }
}

fn collect_patterns(level: &Children, out: &mut Vec<String>) {
    for node in level.iter() {
        if node.info.is_some() {
            out.push(node.route.clone());
        }
        collect_patterns(&node.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(paths: &[&str]) -> RouteTree {
        let mut tree = RouteTree::new();
        for path in paths {
            tree.insert(path, RouteInfo::new().with("key", *path)).unwrap();
        }
        tree
    }

    fn node<'t>(tree: &'t RouteTree, keys: &[&str]) -> &'t RouteNode {
        let mut level = tree.roots();
        let mut found = None;
        for key in keys {
            let n = level.get(key).unwrap();
            level = n.children();
            found = Some(n);
        }
        found.unwrap()
    }

    #[test]
    fn test_insert_creates_intermediate_nodes_with_routes() {
        let tree = tree_with(&["/foo/nested/:value"]);
        assert_eq!(node(&tree, &["/"]).route(), "/");
        assert_eq!(node(&tree, &["/", "/foo"]).route(), "/foo");
        assert_eq!(node(&tree, &["/", "/foo", "/nested"]).route(), "/foo/nested");
        let leaf = node(&tree, &["/", "/foo", "/nested", "/:value"]);
        assert_eq!(leaf.route(), "/foo/nested/:value");
        assert_eq!(leaf.info().and_then(|i| i.key()), Some("/foo/nested/:value"));
        assert!(node(&tree, &["/", "/foo"]).info().is_none());
    }

    #[test]
    fn test_children_sorted_by_priority() {
        let tree = tree_with(&["/*any", "/:name", "/about", "/a"]);
        let keys: Vec<&str> = node(&tree, &["/"]).children().keys().collect();
        assert_eq!(keys, vec!["/about", "/a", "/:name", "/*any"]);
    }

    #[test]
    fn test_equal_priorities_keep_insertion_order() {
        let tree = tree_with(&["/:b", "/:a"]);
        let keys: Vec<&str> = node(&tree, &["/"]).children().keys().collect();
        assert_eq!(keys, vec!["/:b", "/:a"]);
    }

    #[test]
    fn test_reinsert_merges_and_keeps_children() {
        let mut tree = RouteTree::new();
        tree.insert("/auth", RouteInfo::new().with("is", "old").with("keep", true))
            .unwrap();
        tree.insert("/auth/login", RouteInfo::new()).unwrap();
        tree.insert("/auth", RouteInfo::new().with("is", "new")).unwrap();

        let auth = node(&tree, &["/", "/auth"]);
        let info = auth.info().unwrap();
        assert_eq!(info.get("is").and_then(|v| v.as_str()), Some("new"));
        assert!(info.get("keep").is_some());
        assert_eq!(auth.children().len(), 1);
    }

    #[test]
    fn test_parent_adopts_first_child_info_without_key() {
        let mut tree = RouteTree::new();
        tree.insert("/example/*_", RouteInfo::new().with("is", "fallback").with("key", "f"))
            .unwrap();
        tree.insert("/example/", RouteInfo::new().with("is", "root")).unwrap();

        let example = node(&tree, &["/", "/example"]);
        assert!(example.info().is_none());
        let layout = example.effective_info().unwrap();
        assert_eq!(layout.get("is").and_then(|v| v.as_str()), Some("fallback"));
        assert_eq!(layout.key(), None);

        // the root never adopts
        assert!(node(&tree, &["/"]).effective_info().is_none());
    }

    #[test]
    fn test_parent_adopts_key_of_nested_child() {
        let mut tree = RouteTree::new();
        tree.insert("/test/", RouteInfo::new().with("key", "test").with("nested", true))
            .unwrap();
        tree.insert("/test/props", RouteInfo::new().with("key", "props").with("nested", true))
            .unwrap();

        let layout = node(&tree, &["/", "/test"]).effective_info().unwrap();
        assert_eq!(layout.key(), Some("test"));
    }

    #[test]
    fn test_remove_forgets_adopted_layout() {
        let mut tree = RouteTree::new();
        tree.insert("/auth/", RouteInfo::new().with("is", "old")).unwrap();
        tree.remove("/auth/", "/auth/").unwrap();
        assert!(node(&tree, &["/", "/auth"]).effective_info().is_none());

        tree.insert("/auth/", RouteInfo::new().with("is", "new")).unwrap();
        let layout = node(&tree, &["/", "/auth"]).effective_info().unwrap();
        assert_eq!(layout.get("is").and_then(|v| v.as_str()), Some("new"));
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut tree = tree_with(&["/foo", "/foo/bar", "/baz"]);
        tree.remove("/foo", "/foo").unwrap();
        let keys: Vec<&str> = node(&tree, &["/"]).children().keys().collect();
        assert_eq!(keys, vec!["/baz"]);
    }

    #[test]
    fn test_remove_root_clears_info_only() {
        let mut tree = tree_with(&["/", "/foo"]);
        tree.remove("/", "/").unwrap();
        let root = node(&tree, &["/"]);
        assert!(root.info().is_none());
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_remove_missing_path_fails() {
        let mut tree = tree_with(&["/foo"]);
        let err = tree.remove("/foo/not/exists", "/foo/not/exists").unwrap_err();
        assert_eq!(err, RouterError::not_found("/foo/not/exists", "/not"));
        assert!(tree.remove("/:a/:b", "/:a/:b").is_err());
    }

    #[test]
    fn test_invalid_pattern_names_full_route_and_leaves_tree_untouched() {
        let mut tree = RouteTree::new();
        let err = tree.insert("/ok/:foo(/:bar)", RouteInfo::new()).unwrap_err();
        match err {
            RouterError::InvalidPattern { route, pattern, .. } => {
                assert_eq!(route, "/ok/:foo(/:bar)");
                assert_eq!(pattern, "/:foo(");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_patterns_lists_routes_with_info() {
        let mut tree = RouteTree::new();
        tree.insert("/", RouteInfo::new()).unwrap();
        tree.insert("/a/b", RouteInfo::new()).unwrap();
        tree.insert("/c", RouteInfo::new()).unwrap();
        assert_eq!(tree.patterns(), vec!["/", "/a/b", "/c"]);
    }
}
