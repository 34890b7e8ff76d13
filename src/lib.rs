//! ChatGPT share → PDF conversion service.
//!
//! An HTTP service that loads a shared conversation page in headless
//! Chromium, extracts the conversation turns from the DOM, and renders
//! either a styled text reconstruction or a full-page screenshot fallback
//! into a downloadable PDF.

pub mod browser;
pub mod config;
pub mod constants;
pub mod convert;
pub mod render;
pub mod scrape;
pub mod share_url;
pub mod web;
