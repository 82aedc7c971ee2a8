//! In-memory page used by unit tests in place of the browser DOM

use std::rc::Rc;

use crate::error::{BridgeError, Result};
use crate::locator::{Page, PageNode};
use crate::pixels::{PixelBuffer, Region};

#[derive(Debug, Clone, PartialEq)]
pub enum FakeKind {
    Text,
    Div,
    Image(PixelBuffer),
    Canvas(PixelBuffer),
}

#[derive(Debug)]
struct FakeElement {
    kind: FakeKind,
    classes: Vec<String>,
    children: Vec<FakeNode>,
}

#[derive(Debug, Clone)]
pub struct FakeNode(Rc<FakeElement>);

impl FakeNode {
    fn new(kind: FakeKind, classes: &[&str], children: Vec<FakeNode>) -> Self {
        FakeNode(Rc::new(FakeElement {
            kind,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            children,
        }))
    }

    pub fn text() -> Self {
        Self::new(FakeKind::Text, &[], vec![])
    }

    pub fn div(classes: &[&str], children: Vec<FakeNode>) -> Self {
        Self::new(FakeKind::Div, classes, children)
    }

    pub fn image(classes: &[&str], pixels: PixelBuffer) -> Self {
        Self::new(FakeKind::Image(pixels), classes, vec![])
    }

    pub fn canvas(classes: &[&str], pixels: PixelBuffer) -> Self {
        Self::new(FakeKind::Canvas(pixels), classes, vec![])
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.classes.iter().any(|c| c == class)
    }

    fn find(&self, class: &str) -> Option<FakeNode> {
        if self.has_class(class) {
            return Some(self.clone());
        }
        self.0.children.iter().find_map(|child| child.find(class))
    }
}

impl PageNode for FakeNode {
    fn child(&self, index: u32) -> Option<Self> {
        self.0.children.get(index as usize).cloned()
    }
}

/// Fake document: a forest of nodes searched depth-first
pub struct FakePage {
    roots: Vec<FakeNode>,
}

impl FakePage {
    pub fn new(roots: Vec<FakeNode>) -> Self {
        Self { roots }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Page for FakePage {
    type Node = FakeNode;

    fn first_by_class(&self, class: &str) -> Option<FakeNode> {
        self.roots.iter().find_map(|root| root.find(class))
    }

    fn snapshot(&self, node: &FakeNode, selector: &str) -> Result<PixelBuffer> {
        let pixels = match &node.0.kind {
            FakeKind::Image(pixels) | FakeKind::Canvas(pixels) => pixels,
            _ => {
                return Err(BridgeError::UnexpectedElement {
                    selector: selector.to_string(),
                    expected: "drawable image",
                })
            }
        };
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(BridgeError::EmptySurface {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        Ok(pixels.clone())
    }

    fn read_region(&self, node: &FakeNode, region: Region, selector: &str) -> Result<PixelBuffer> {
        match &node.0.kind {
            FakeKind::Canvas(pixels) => Ok(pixels.crop(region)),
            _ => Err(BridgeError::UnexpectedElement {
                selector: selector.to_string(),
                expected: "2d canvas",
            }),
        }
    }
}
