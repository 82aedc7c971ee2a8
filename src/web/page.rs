use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Node};

use crate::error::{describe_js, BridgeError, Result};
use crate::locator::{Page, PageNode};
use crate::pixels::{PixelBuffer, Region};

impl PageNode for Node {
    fn child(&self, index: u32) -> Option<Self> {
        self.child_nodes().item(index)
    }
}

/// Something `drawImage` accepts
enum Drawable<'a> {
    Image(&'a HtmlImageElement),
    Canvas(&'a HtmlCanvasElement),
}

/// The live browser document
pub struct WebPage {
    document: Document,
}

impl WebPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Page of the global `window`
    pub fn current() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| BridgeError::Host("no global `window.document`".into()))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Detached canvas used as a scratch surface
    fn offscreen_canvas(&self, width: u32, height: u32) -> Result<HtmlCanvasElement> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| BridgeError::Canvas(describe_js(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BridgeError::Canvas("created element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Ok(canvas)
    }
}

fn context_2d(canvas: &HtmlCanvasElement, selector: &str) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| BridgeError::Canvas(describe_js(&e)))?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or_else(|| BridgeError::UnexpectedElement {
            selector: selector.to_string(),
            expected: "2d canvas",
        })
}

fn read_pixels(ctx: &CanvasRenderingContext2d, region: Region) -> Result<PixelBuffer> {
    if region.is_empty() {
        return Err(BridgeError::EmptySurface {
            width: region.width,
            height: region.height,
        });
    }
    let image_data = ctx
        .get_image_data(
            region.x as f64,
            region.y as f64,
            region.width as f64,
            region.height as f64,
        )
        .map_err(|e| BridgeError::Canvas(describe_js(&e)))?;
    let Clamped(data) = image_data.data();
    PixelBuffer::new(region.width, region.height, data)
}

impl Page for WebPage {
    type Node = Node;

    fn first_by_class(&self, class: &str) -> Option<Node> {
        self.document
            .get_elements_by_class_name(class)
            .item(0)
            .map(Node::from)
    }

    fn snapshot(&self, node: &Node, selector: &str) -> Result<PixelBuffer> {
        let (source, width, height) = if let Some(img) = node.dyn_ref::<HtmlImageElement>() {
            (Drawable::Image(img), img.width(), img.height())
        } else if let Some(canvas) = node.dyn_ref::<HtmlCanvasElement>() {
            (Drawable::Canvas(canvas), canvas.width(), canvas.height())
        } else {
            return Err(BridgeError::UnexpectedElement {
                selector: selector.to_string(),
                expected: "drawable image",
            });
        };

        if width == 0 || height == 0 {
            return Err(BridgeError::EmptySurface { width, height });
        }

        let surface = self.offscreen_canvas(width, height)?;
        let ctx = context_2d(&surface, "offscreen canvas")?;
        match source {
            Drawable::Image(img) => ctx.draw_image_with_html_image_element(img, 0.0, 0.0),
            Drawable::Canvas(canvas) => ctx.draw_image_with_html_canvas_element(canvas, 0.0, 0.0),
        }
        .map_err(|e| BridgeError::Canvas(describe_js(&e)))?;

        read_pixels(&ctx, Region::at_origin(width, height))
    }

    fn read_region(&self, node: &Node, region: Region, selector: &str) -> Result<PixelBuffer> {
        let canvas = node
            .dyn_ref::<HtmlCanvasElement>()
            .ok_or_else(|| BridgeError::UnexpectedElement {
                selector: selector.to_string(),
                expected: "2d canvas",
            })?;
        read_pixels(&context_2d(canvas, selector)?, region)
    }
}
