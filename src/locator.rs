//! Finding elements on the page by class name and child position

use std::fmt;

use crate::error::{BridgeError, Result};
use crate::pixels::{PixelBuffer, Region};

/// A node in the page tree
pub trait PageNode: Clone {
    /// Child at `index`, counting every child node (text nodes included)
    fn child(&self, index: u32) -> Option<Self>;
}

/// Read-only view of the page the bridge extracts pixels from.
///
/// The browser implementation lives in [`crate::web::WebPage`]; tests use a
/// fake tree so they can run without a DOM.
pub trait Page {
    type Node: PageNode;

    /// First element in document order carrying `class`
    fn first_by_class(&self, class: &str) -> Option<Self::Node>;

    /// Draw `node` onto a fresh offscreen surface sized to its rendered
    /// dimensions and read the whole surface back.
    ///
    /// `selector` is only used to describe `node` in errors.
    fn snapshot(&self, node: &Self::Node, selector: &str) -> Result<PixelBuffer>;

    /// Read `region` from the 2D drawing context of a canvas node
    fn read_region(&self, node: &Self::Node, region: Region, selector: &str) -> Result<PixelBuffer>;
}

/// "First element with this class, then these children"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPath {
    pub class: String,
    pub children: Vec<u32>,
}

impl ElementPath {
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, index: u32) -> Self {
        self.children.push(index);
        self
    }

    /// Selector text for the first `depth` child steps
    fn describe(&self, depth: usize) -> String {
        let mut selector = format!(".{}", self.class);
        for index in &self.children[..depth] {
            selector.push_str(&format!(" > child[{}]", index));
        }
        selector
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(self.children.len()))
    }
}

/// Resolve `path` against `page`. The error names the path up to and
/// including the first missing step.
pub fn locate<P: Page>(page: &P, path: &ElementPath) -> Result<P::Node> {
    let mut node = page
        .first_by_class(&path.class)
        .ok_or_else(|| BridgeError::ElementNotFound {
            selector: path.describe(0),
        })?;

    for (depth, index) in path.children.iter().enumerate() {
        node = node
            .child(*index)
            .ok_or_else(|| BridgeError::ElementNotFound {
                selector: path.describe(depth + 1),
            })?;
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNode, FakePage};

    fn page() -> FakePage {
        FakePage::new(vec![
            FakeNode::div(&["header"], vec![]),
            FakeNode::div(
                &["wrapper"],
                vec![
                    FakeNode::text(),
                    FakeNode::div(&["target"], vec![FakeNode::div(&["inner"], vec![])]),
                ],
            ),
            FakeNode::div(&["target", "second"], vec![]),
        ])
    }

    #[test]
    fn test_display_path() {
        let path = ElementPath::class("gen").child(0).child(2);
        assert_eq!(path.to_string(), ".gen > child[0] > child[2]");
        assert_eq!(ElementPath::class("img").to_string(), ".img");
    }

    #[test]
    fn test_locate_first_in_document_order() {
        let page = page();
        let node = locate(&page, &ElementPath::class("target")).unwrap();
        assert!(!node.has_class("second"));
    }

    #[test]
    fn test_locate_children() {
        let page = page();
        let node = locate(&page, &ElementPath::class("wrapper").child(1).child(0)).unwrap();
        assert!(node.has_class("inner"));
    }

    #[test]
    fn test_missing_class() {
        let page = page();
        let err = locate(&page, &ElementPath::class("absent").child(0)).unwrap_err();
        assert_eq!(
            err,
            BridgeError::ElementNotFound {
                selector: ".absent".into()
            }
        );
    }

    #[test]
    fn test_missing_child_names_depth() {
        let page = page();
        let err = locate(&page, &ElementPath::class("wrapper").child(1).child(5)).unwrap_err();
        assert_eq!(
            err,
            BridgeError::ElementNotFound {
                selector: ".wrapper > child[1] > child[5]".into()
            }
        );

        let err = locate(&page, &ElementPath::class("header").child(0).child(0)).unwrap_err();
        assert_eq!(
            err,
            BridgeError::ElementNotFound {
                selector: ".header > child[0]".into()
            }
        );
    }
}
