//! # Component Code Generation
//!
//! Renders component view models into target-language source files.

mod component_codegen;

pub use component_codegen::*;
