//! Static DOM descriptions
//!
//! [`ElementNode`] describes an element tree without a browser behind it. The
//! [`StubDriver`](crate::driver::StubDriver) serves queries from such trees.

pub mod element;

pub use element::ElementNode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag_name, "div");
    }
}
