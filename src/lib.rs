mod bridge;
mod config;
mod error;
mod locator;
mod pixels;
mod ports;

#[cfg(test)]
mod testing;

pub mod web;

pub use bridge::*;
pub use config::*;
pub use error::*;
pub use locator::*;
pub use pixels::*;
pub use ports::*;
