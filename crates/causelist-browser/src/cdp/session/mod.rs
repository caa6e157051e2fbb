//! CDP page session for interacting with a single page.

mod core;
mod dom;
mod frame;
mod js;
mod navigation;

pub use self::core::PageSession;
pub use self::frame::FrameContext;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
