//! Photoframe - host tooling for color e-paper frames
//!
//! Converts PNG photos into packed 4-bit frame buffers with the
//! `epaper-dither` pipeline, and manages the settings and palette files
//! that drive it. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
