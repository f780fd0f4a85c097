//! Utility modules shared across the pipeline.

pub mod date;
pub mod git;
pub mod html;
pub mod mime;
