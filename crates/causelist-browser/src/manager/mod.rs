//! Browser instance manager.
//!
//! Launches a dedicated Chrome with remote debugging, a persistent profile
//! whose preferences make PDFs download instead of opening in the viewer,
//! and the switches that keep the automation banner and
//! `navigator.webdriver` out of sight.

mod manager_core;
mod manager_prefs;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
