use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;

use crate::error::{describe_js, BridgeError, Result};
use crate::pixels::PixelBuffer;
use crate::ports::{RequestHandler, SignalPorts};

type PortCallback = Closure<dyn Fn(JsValue) -> std::result::Result<(), JsValue>>;

/// Ports object of an embedded application, `app.ports.<name>` with
/// `subscribe`, `unsubscribe` and `send` methods.
pub struct ElmPorts {
    ports: JsValue,
}

impl ElmPorts {
    pub fn from_app(app: &JsValue) -> Result<Self> {
        let ports = Reflect::get(app, &JsValue::from_str("ports"))
            .map_err(|e| BridgeError::port("ports", describe_js(&e)))?;
        if !ports.is_object() {
            return Err(BridgeError::port("ports", "application exposes no ports"));
        }
        Ok(Self { ports })
    }

    fn port(&self, name: &str) -> Result<JsValue> {
        let port = Reflect::get(&self.ports, &JsValue::from_str(name))
            .map_err(|e| BridgeError::port(name, describe_js(&e)))?;
        if port.is_undefined() || port.is_null() {
            return Err(BridgeError::port(name, "not declared by the application"));
        }
        Ok(port)
    }
}

fn method(port: &JsValue, name: &str, method: &str) -> Result<Function> {
    Reflect::get(port, &JsValue::from_str(method))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| BridgeError::port(name, format!("has no `{}` method", method)))
}

impl SignalPorts for ElmPorts {
    type Subscription = ElmSubscription;

    fn send(&self, channel: &str, pixels: &PixelBuffer) -> Result<()> {
        let port = self.port(channel)?;
        let send = method(&port, channel, "send")?;

        // Ports decode a list of ints, not a typed array
        let values: Array = pixels.as_bytes().iter().map(|b| JsValue::from(*b)).collect();
        send.call1(&port, &values)
            .map_err(|e| BridgeError::port(channel, describe_js(&e)))?;
        Ok(())
    }

    fn on_receive(&self, channel: &str, handler: RequestHandler) -> Result<ElmSubscription> {
        let port = self.port(channel)?;
        let subscribe = method(&port, channel, "subscribe")?;

        let callback: PortCallback =
            Closure::new(move |_payload: JsValue| handler().map_err(JsValue::from));
        subscribe
            .call1(&port, callback.as_ref())
            .map_err(|e| BridgeError::port(channel, describe_js(&e)))?;

        Ok(ElmSubscription {
            port,
            channel: channel.to_string(),
            callback,
        })
    }
}

/// Live `subscribe` registration; unsubscribes when dropped
pub struct ElmSubscription {
    port: JsValue,
    channel: String,
    callback: PortCallback,
}

impl Drop for ElmSubscription {
    fn drop(&mut self) {
        let result = method(&self.port, &self.channel, "unsubscribe").and_then(|unsubscribe| {
            unsubscribe
                .call1(&self.port, self.callback.as_ref())
                .map(|_| ())
                .map_err(|e| BridgeError::port(&self.channel, describe_js(&e)))
        });
        if let Err(e) = result {
            log::warn!("could not unsubscribe: {}", e);
        }
    }
}
