//! Base image cache lookup.

pub mod cache;

pub use cache::ImageCache;
