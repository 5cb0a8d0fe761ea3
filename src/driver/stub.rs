//! Scripted in-memory driver
//!
//! Builds an arena from an [`ElementNode`] tree and answers driver calls from
//! it. CSS and XPath are not evaluated: their results are scripted per query
//! with [`StubDriver::script`] and friends. Tag-name and link-text finders are
//! answered from the tree itself.

use crate::dom::ElementNode;
use crate::driver::{Driver, DriverError, DriverResult, How};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Handle into a [`StubDriver`] arena (pre-order position in the tree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubHandle(pub usize);

/// One driver query as the stub received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub how: How,
    pub value: String,
    pub scope: Option<StubHandle>,
    pub frame: Option<StubHandle>,
    /// `true` for `find_one`, `false` for `find_all`
    pub single: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    how: How,
    value: String,
    scope: Option<usize>,
    frame: Option<usize>,
}

#[derive(Debug)]
struct StubNode {
    node: ElementNode,
    parent: Option<usize>,
    children: Vec<usize>,
    attached: bool,
}

pub struct StubDriver {
    nodes: RefCell<Vec<StubNode>>,
    scripted: RefCell<HashMap<QueryKey, Vec<usize>>>,
    stale_finds: Cell<usize>,
    stale_reads: Cell<usize>,
    frame: Cell<Option<usize>>,
    log: RefCell<Vec<QueryRecord>>,
    frame_switches: RefCell<Vec<Option<StubHandle>>>,
}

impl StubDriver {
    /// Create a driver whose top document is `root` and its descendants
    pub fn new(root: ElementNode) -> Self {
        let mut nodes = Vec::new();
        Self::flatten(root, None, &mut nodes);
        Self {
            nodes: RefCell::new(nodes),
            scripted: RefCell::new(HashMap::new()),
            stale_finds: Cell::new(0),
            stale_reads: Cell::new(0),
            frame: Cell::new(None),
            log: RefCell::new(Vec::new()),
            frame_switches: RefCell::new(Vec::new()),
        }
    }

    /// Create a driver from a JSON-encoded [`ElementNode`] tree
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    fn flatten(node: ElementNode, parent: Option<usize>, nodes: &mut Vec<StubNode>) -> usize {
        let id = nodes.len();
        let children = node.children.clone();
        nodes.push(StubNode { node, parent, children: Vec::new(), attached: true });
        for child in children {
            let child_id = Self::flatten(child, Some(id), nodes);
            nodes[id].children.push(child_id);
        }
        id
    }

    /// The document element
    pub fn root(&self) -> StubHandle {
        StubHandle(0)
    }

    /// First node (in document order) whose `id` attribute equals `id`
    pub fn by_id(&self, id: &str) -> Option<StubHandle> {
        self.nodes
            .borrow()
            .iter()
            .position(|n| n.node.id().map(String::as_str) == Some(id))
            .map(StubHandle)
    }

    /// Every node with the given tag, in document order
    pub fn by_tag(&self, tag: &str) -> Vec<StubHandle> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.node.is_tag(tag))
            .map(|(i, _)| StubHandle(i))
            .collect()
    }

    /// Script the result of a document-level query in the top document
    pub fn script(&self, how: How, value: impl Into<String>, results: &[StubHandle]) {
        self.script_key(how, value.into(), None, None, results);
    }

    /// Script the result of a query scoped to an element
    pub fn script_in(&self, scope: StubHandle, how: How, value: impl Into<String>, results: &[StubHandle]) {
        self.script_key(how, value.into(), Some(scope.0), None, results);
    }

    /// Script the result of a document-level query while focused on a frame
    pub fn script_in_frame(&self, frame: StubHandle, how: How, value: impl Into<String>, results: &[StubHandle]) {
        self.script_key(how, value.into(), None, Some(frame.0), results);
    }

    fn script_key(&self, how: How, value: String, scope: Option<usize>, frame: Option<usize>, results: &[StubHandle]) {
        let key = QueryKey { how, value, scope, frame };
        self.scripted
            .borrow_mut()
            .insert(key, results.iter().map(|h| h.0).collect());
    }

    /// Make the next `count` find calls fail with a stale reference
    pub fn inject_stale_finds(&self, count: usize) {
        self.stale_finds.set(count);
    }

    /// Make the next `count` attribute, text or display reads fail with a stale reference
    pub fn inject_stale_reads(&self, count: usize) {
        self.stale_reads.set(count);
    }

    /// Detach a node (and its subtree) from the document
    pub fn invalidate(&self, handle: StubHandle) {
        let mut nodes = self.nodes.borrow_mut();
        let mut pending = vec![handle.0];
        while let Some(id) = pending.pop() {
            if let Some(node) = nodes.get_mut(id) {
                node.attached = false;
                pending.extend(node.children.iter().copied());
            }
        }
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<QueryRecord> {
        self.log.borrow().clone()
    }

    pub fn clear_queries(&self) {
        self.log.borrow_mut().clear();
    }

    /// Frame switches received so far
    pub fn frame_switches(&self) -> Vec<Option<StubHandle>> {
        self.frame_switches.borrow().clone()
    }

    /// Frame currently in focus
    pub fn current_frame(&self) -> Option<StubHandle> {
        self.frame.get().map(StubHandle)
    }

    fn with_node<T>(&self, handle: &StubHandle, f: impl FnOnce(&ElementNode) -> T) -> DriverResult<T> {
        let nodes = self.nodes.borrow();
        match nodes.get(handle.0) {
            Some(node) if node.attached => Ok(f(&node.node)),
            Some(_) => Err(DriverError::Stale),
            None => Err(DriverError::Other(format!("unknown handle {}", handle.0))),
        }
    }

    fn read<T>(&self, handle: &StubHandle, f: impl FnOnce(&ElementNode) -> T) -> DriverResult<T> {
        let remaining = self.stale_reads.get();
        if remaining > 0 {
            self.stale_reads.set(remaining - 1);
            return Err(DriverError::Stale);
        }
        self.with_node(handle, f)
    }

    fn ancestors_visible(&self, id: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(id);
        while let Some(i) = current {
            if !nodes[i].node.is_visible {
                return false;
            }
            current = nodes[i].parent;
        }
        true
    }

    /// Descendants of `id` in document order, not crossing into frames
    fn descendants(&self, id: usize, include_self: bool) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        if include_self {
            out.push(id);
        }
        let mut stack: Vec<usize> = nodes[id].children.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            if !nodes[i].attached {
                continue;
            }
            out.push(i);
            if !nodes[i].node.is_frame() {
                stack.extend(nodes[i].children.iter().rev().copied());
            }
        }
        out
    }

    fn evaluate(&self, how: How, value: &str, scope: Option<&StubHandle>) -> DriverResult<Vec<StubHandle>> {
        let remaining = self.stale_finds.get();
        if remaining > 0 {
            self.stale_finds.set(remaining - 1);
            return Err(DriverError::Stale);
        }
        if let Some(scope) = scope {
            self.with_node(scope, |_| ())?;
        }

        let frame = self.frame.get();
        let key = QueryKey {
            how,
            value: value.to_string(),
            scope: scope.map(|h| h.0),
            frame,
        };
        if let Some(results) = self.scripted.borrow().get(&key) {
            let nodes = self.nodes.borrow();
            return Ok(results
                .iter()
                .filter(|&&id| nodes.get(id).is_some_and(|n| n.attached))
                .map(|&id| StubHandle(id))
                .collect());
        }

        let pool = match (scope, frame) {
            (Some(scope), _) => self.descendants(scope.0, false),
            (None, Some(frame)) => self.descendants(frame, false),
            (None, None) => self.descendants(0, true),
        };
        let nodes = self.nodes.borrow();
        let matches = pool.into_iter().filter(|&id| {
            let node = &nodes[id].node;
            match how {
                How::TagName => node.is_tag(value),
                How::LinkText => {
                    node.is_tag("a") && self.ancestors_visible(id) && node.rendered_text().trim() == value
                }
                How::PartialLinkText => {
                    node.is_tag("a") && self.ancestors_visible(id) && node.rendered_text().contains(value)
                }
                How::Css | How::XPath => false,
            }
        });
        Ok(matches.map(StubHandle).collect())
    }

    fn record(&self, how: How, value: &str, scope: Option<&StubHandle>, single: bool) {
        self.log.borrow_mut().push(QueryRecord {
            how,
            value: value.to_string(),
            scope: scope.copied(),
            frame: self.frame.get().map(StubHandle),
            single,
        });
    }
}

impl Driver for StubDriver {
    type Handle = StubHandle;

    fn find_one(&self, how: How, value: &str, scope: Option<&StubHandle>) -> DriverResult<Option<StubHandle>> {
        self.record(how, value, scope, true);
        Ok(self.evaluate(how, value, scope)?.into_iter().next())
    }

    fn find_all(&self, how: How, value: &str, scope: Option<&StubHandle>) -> DriverResult<Vec<StubHandle>> {
        self.record(how, value, scope, false);
        self.evaluate(how, value, scope)
    }

    fn get_attribute(&self, handle: &StubHandle, name: &str) -> DriverResult<Option<String>> {
        self.read(handle, |node| node.get_attribute(name).cloned())
    }

    fn get_text(&self, handle: &StubHandle) -> DriverResult<String> {
        let text = self.read(handle, ElementNode::rendered_text)?;
        Ok(if self.ancestors_visible(handle.0) { text } else { String::new() })
    }

    fn get_text_content(&self, handle: &StubHandle) -> DriverResult<String> {
        self.read(handle, ElementNode::full_text)
    }

    fn get_tag_name(&self, handle: &StubHandle) -> DriverResult<String> {
        self.with_node(handle, |node| node.tag_name.clone())
    }

    fn is_displayed(&self, handle: &StubHandle) -> DriverResult<bool> {
        self.read(handle, |_| ())?;
        Ok(self.ancestors_visible(handle.0))
    }

    fn switch_to_frame(&self, frame: Option<&StubHandle>) -> DriverResult<()> {
        self.frame_switches.borrow_mut().push(frame.copied());
        match frame {
            None => {
                self.frame.set(None);
                Ok(())
            }
            Some(handle) => {
                let is_frame = self
                    .with_node(handle, ElementNode::is_frame)
                    .map_err(|_| DriverError::NoSuchFrame(format!("{:?}", handle)))?;
                if !is_frame {
                    return Err(DriverError::NoSuchFrame(format!("{:?} is not a frame", handle)));
                }
                self.frame.set(Some(handle.0));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tree() -> ElementNode {
        ElementNode::new("html").with_children(vec![ElementNode::new("body").with_children(vec![
            ElementNode::new("a").with_attribute("id", "home").with_text("Home page"),
            ElementNode::new("div")
                .with_attribute("class", "content")
                .with_visibility(false)
                .with_children(vec![ElementNode::new("a").with_text("Hidden link")]),
            ElementNode::new("iframe").with_attribute("id", "frame").with_children(vec![
                ElementNode::new("a").with_text("Framed"),
            ]),
        ])])
    }

    #[test]
    fn test_pre_order_handles() {
        let driver = StubDriver::new(create_test_tree());
        assert_eq!(driver.root(), StubHandle(0));
        assert_eq!(driver.by_id("home"), Some(StubHandle(2)));
        assert_eq!(driver.by_tag("a"), vec![StubHandle(2), StubHandle(4), StubHandle(6)]);
    }

    #[test]
    fn test_native_tag_name_does_not_cross_frames() {
        let driver = StubDriver::new(create_test_tree());
        let links = driver.find_all(How::TagName, "a", None).unwrap();
        assert_eq!(links, vec![StubHandle(2), StubHandle(4)]);

        driver.switch_to_frame(Some(&StubHandle(5))).unwrap();
        let framed = driver.find_all(How::TagName, "a", None).unwrap();
        assert_eq!(framed, vec![StubHandle(6)]);

        driver.switch_to_frame(None).unwrap();
        assert_eq!(driver.current_frame(), None);
    }

    #[test]
    fn test_link_text() {
        let driver = StubDriver::new(create_test_tree());
        assert_eq!(driver.find_one(How::LinkText, "Home page", None).unwrap(), Some(StubHandle(2)));
        assert_eq!(driver.find_all(How::PartialLinkText, "link", None).unwrap(), vec![]);
    }

    #[test]
    fn test_scripted_queries_and_log() {
        let driver = StubDriver::new(create_test_tree());
        driver.script(How::XPath, ".//*", &[StubHandle(1), StubHandle(2)]);

        assert_eq!(driver.find_all(How::XPath, ".//*", None).unwrap(), vec![StubHandle(1), StubHandle(2)]);
        assert!(driver.find_all(How::Css, "div", None).unwrap().is_empty());

        let log = driver.queries();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].how, How::XPath);
        assert!(!log[0].single);
    }

    #[test]
    fn test_visibility_and_text() {
        let driver = StubDriver::new(create_test_tree());
        let hidden_link = StubHandle(4);
        assert!(!driver.is_displayed(&hidden_link).unwrap());
        assert_eq!(driver.get_text(&hidden_link).unwrap(), "");
        assert_eq!(driver.get_text_content(&hidden_link).unwrap(), "Hidden link");
        assert_eq!(driver.get_tag_name(&hidden_link).unwrap(), "a");
    }

    #[test]
    fn test_stale_injection_and_invalidation() {
        let driver = StubDriver::new(create_test_tree());
        driver.inject_stale_finds(1);
        assert_eq!(driver.find_all(How::TagName, "a", None), Err(DriverError::Stale));
        assert!(driver.find_all(How::TagName, "a", None).is_ok());

        driver.invalidate(StubHandle(2));
        assert_eq!(driver.get_attribute(&StubHandle(2), "id"), Err(DriverError::Stale));
        assert_eq!(driver.find_all(How::TagName, "a", None).unwrap(), vec![StubHandle(4)]);
    }

    #[test]
    fn test_stale_reads() {
        let driver = StubDriver::new(create_test_tree());
        driver.inject_stale_reads(2);
        assert_eq!(driver.is_displayed(&StubHandle(2)), Err(DriverError::Stale));
        assert_eq!(driver.get_attribute(&StubHandle(2), "id"), Err(DriverError::Stale));
        assert_eq!(driver.get_tag_name(&StubHandle(2)).unwrap(), "a");
        assert_eq!(driver.get_attribute(&StubHandle(2), "id").unwrap().as_deref(), Some("home"));
    }

    #[test]
    fn test_switch_to_non_frame_fails() {
        let driver = StubDriver::new(create_test_tree());
        let result = driver.switch_to_frame(Some(&StubHandle(2)));
        assert!(matches!(result, Err(DriverError::NoSuchFrame(_))));
    }
}
