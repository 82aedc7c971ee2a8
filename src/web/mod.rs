//! Browser adapters: the DOM page, application ports and startup
mod boot;
mod page;
mod ports;

pub use boot::*;
pub use page::*;
pub use ports::*;
