//! Named, fire-and-forget signal channels between the UI and the bridge

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::pixels::PixelBuffer;

/// Inbound: the UI wants the uploaded image
pub const REQUEST_UPLOADED_IMAGE: &str = "requestUploadedImage";
/// Outbound: pixels of the uploaded image
pub const UPLOADED_IMAGE: &str = "uploadedImage";
/// Inbound: the UI wants the current candidate
pub const REQUEST_CANDIDATE_IMAGE: &str = "requestCandidateImage";
/// Outbound: pixels of the candidate
pub const CANDIDATE_IMAGE: &str = "candidateImage";

/// Callback run when a request signal arrives. Request payloads are ignored.
pub type RequestHandler = Box<dyn Fn() -> Result<()>>;

/// Publish/subscribe surface of the embedded application
pub trait SignalPorts {
    /// Keeps a handler registered; dropping it unsubscribes
    type Subscription;

    /// Emit `pixels` on an outbound channel
    fn send(&self, channel: &str, pixels: &PixelBuffer) -> Result<()>;

    /// Register `handler` for an inbound channel
    fn on_receive(&self, channel: &str, handler: RequestHandler) -> Result<Self::Subscription>;
}

#[derive(Default)]
struct Channels {
    next_id: Cell<u64>,
    handlers: RefCell<HashMap<String, Vec<(u64, Rc<RequestHandler>)>>>,
    sent: RefCell<HashMap<String, Vec<PixelBuffer>>>,
}

/// Ports that live entirely in process memory
#[derive(Clone, Default)]
pub struct MemoryPorts {
    channels: Rc<Channels>,
}

impl MemoryPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal `channel` and run every handler subscribed to it.
    ///
    /// Handlers run in registration order; the first error stops delivery
    /// and is returned.
    pub fn deliver(&self, channel: &str) -> Result<()> {
        // Clone out so handlers may subscribe or send without a live borrow
        let handlers: Vec<Rc<RequestHandler>> = self
            .channels
            .handlers
            .borrow()
            .get(channel)
            .map(|hs| hs.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler()?;
        }
        Ok(())
    }

    /// Everything sent on `channel` so far, oldest first
    pub fn sent(&self, channel: &str) -> Vec<PixelBuffer> {
        self.channels
            .sent
            .borrow()
            .get(channel)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of handlers currently subscribed to `channel`
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .handlers
            .borrow()
            .get(channel)
            .map_or(0, |hs| hs.len())
    }
}

impl SignalPorts for MemoryPorts {
    type Subscription = MemorySubscription;

    fn send(&self, channel: &str, pixels: &PixelBuffer) -> Result<()> {
        self.channels
            .sent
            .borrow_mut()
            .entry(channel.to_string())
            .or_default()
            .push(pixels.clone());
        Ok(())
    }

    fn on_receive(&self, channel: &str, handler: RequestHandler) -> Result<MemorySubscription> {
        let id = self.channels.next_id.get();
        self.channels.next_id.set(id + 1);
        self.channels
            .handlers
            .borrow_mut()
            .entry(channel.to_string())
            .or_default()
            .push((id, Rc::new(handler)));

        Ok(MemorySubscription {
            channels: Rc::downgrade(&self.channels),
            channel: channel.to_string(),
            id,
        })
    }
}

/// Registration token for [`MemoryPorts`]
pub struct MemorySubscription {
    channels: Weak<Channels>,
    channel: String,
    id: u64,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        if let Some(channels) = self.channels.upgrade() {
            if let Some(handlers) = channels.handlers.borrow_mut().get_mut(&self.channel) {
                handlers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
