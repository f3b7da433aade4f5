//! Mosaic Playground - Experiments and Examples
//!
//! This crate provides an executable for experimenting with Mosaic
//! pipelines on small generated datasets.
//!
//! # Available Binaries
//!
//! - **`pipeline-runner`**: build the demo datasets, print their structure,
//!   and preflight or execute pipelines described in JSON
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in demo pipeline
//! cargo run --package mosaic-playground --bin pipeline-runner -- demo
//!
//! # Print the demo pipeline as JSON, edit it, and run it
//! cargo run --package mosaic-playground --bin pipeline-runner -- example > pipeline.json
//! cargo run --package mosaic-playground --bin pipeline-runner -- run pipeline.json
//! ```

pub mod data;
pub mod utils;

pub use data::{create_demo_registry, create_rgb_image, create_strip_mesh_sources, demo_pipeline};
pub use utils::{
    format_array_preview, init_logging, print_array_preview, print_divider, print_header,
    print_report,
};
