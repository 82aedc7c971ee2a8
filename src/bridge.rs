//! Answers the UI's pixel requests by reading the page's images

use std::rc::Rc;

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::locator::{locate, ElementPath, Page};
use crate::pixels::{PixelBuffer, Region};
use crate::ports::{
    SignalPorts, CANDIDATE_IMAGE, REQUEST_CANDIDATE_IMAGE, REQUEST_UPLOADED_IMAGE, UPLOADED_IMAGE,
};

/// Size of the generated candidate, read from the canvas origin.
/// Candidates are always rendered at this size.
pub const CANDIDATE_SIZE: u32 = 100;

/// Reads pixels off the page on request and sends them back over the ports
pub struct PixelBridge<P, S> {
    page: P,
    ports: Rc<S>,
    uploaded_image: ElementPath,
    candidate_canvas: ElementPath,
}

impl<P: Page, S: SignalPorts> PixelBridge<P, S> {
    pub fn new(page: P, ports: Rc<S>, config: &BridgeConfig) -> Self {
        Self {
            page,
            ports,
            uploaded_image: ElementPath::class(config.uploaded_image_class.clone()),
            // The canvas sits two levels below the container
            candidate_canvas: ElementPath::class(config.generated_image_class.clone())
                .child(0)
                .child(0),
        }
    }

    pub fn ports(&self) -> &Rc<S> {
        &self.ports
    }

    /// Rasterize the uploaded image at its rendered size
    pub fn uploaded_image_pixels(&self) -> Result<PixelBuffer> {
        let node = locate(&self.page, &self.uploaded_image)?;
        self.page.snapshot(&node, &self.uploaded_image.to_string())
    }

    /// Read the fixed candidate region from the generated canvas
    pub fn candidate_image_pixels(&self) -> Result<PixelBuffer> {
        let node = locate(&self.page, &self.candidate_canvas)?;
        self.page.read_region(
            &node,
            Region::at_origin(CANDIDATE_SIZE, CANDIDATE_SIZE),
            &self.candidate_canvas.to_string(),
        )
    }

    pub fn handle_uploaded_image_request(&self) -> Result<()> {
        log::debug!("{} received", REQUEST_UPLOADED_IMAGE);
        let pixels = self.uploaded_image_pixels().map_err(|e| {
            log::error!("{} failed: {}", REQUEST_UPLOADED_IMAGE, e);
            e
        })?;
        log::debug!(
            "sending {}x{} upload ({} bytes)",
            pixels.width(),
            pixels.height(),
            pixels.len()
        );
        self.ports.send(UPLOADED_IMAGE, &pixels)
    }

    pub fn handle_candidate_image_request(&self) -> Result<()> {
        log::debug!("{} received", REQUEST_CANDIDATE_IMAGE);
        let pixels = self.candidate_image_pixels().map_err(|e| {
            log::error!("{} failed: {}", REQUEST_CANDIDATE_IMAGE, e);
            e
        })?;
        self.ports.send(CANDIDATE_IMAGE, &pixels)
    }
}

impl<P: Page + 'static, S: SignalPorts + 'static> PixelBridge<P, S> {
    /// Subscribe both request handlers. The bridge stays alive for as long
    /// as the returned guard does.
    pub fn listen(self) -> Result<Listening<S::Subscription>> {
        let bridge = Rc::new(self);

        let ports = bridge.ports.clone();

        let uploaded = {
            let bridge = bridge.clone();
            ports.on_receive(
                REQUEST_UPLOADED_IMAGE,
                Box::new(move || bridge.handle_uploaded_image_request()),
            )?
        };
        let candidate = ports.on_receive(
            REQUEST_CANDIDATE_IMAGE,
            Box::new(move || bridge.handle_candidate_image_request()),
        )?;

        log::info!(
            "listening on {} and {}",
            REQUEST_UPLOADED_IMAGE,
            REQUEST_CANDIDATE_IMAGE
        );
        Ok(Listening {
            _uploaded: uploaded,
            _candidate: candidate,
        })
    }
}

/// Both request subscriptions; dropping it detaches the bridge
pub struct Listening<T> {
    _uploaded: T,
    _candidate: T,
}
