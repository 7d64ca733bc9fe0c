//! Front end of the MFront material description language
//!
//! Reads `.mfront` files, tokenizes them and analyses them with the material
//! property or the behaviour dialect, producing a description of the model.

pub mod batch;
pub mod code_block;
pub mod config;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod symbols;
pub mod syntax;
pub mod tokens;

pub use batch::{BatchConfig, BatchError, BatchResults};
pub use pipeline::{ParsedModel, PipelineError, PipelineOutput, PipelineResult};
