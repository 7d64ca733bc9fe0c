//! Keyword driven analysis of MFront files
//!
//! [`DslBase`] holds the token cursor and the reading primitives shared by
//! every dialect, [`Dsl`] the keyword dispatch loop. The material property
//! and behaviour dialects build on both.

pub mod behaviour;
pub mod dsl;
pub mod dsl_base;
pub mod error;
pub mod integer_evaluator;
pub mod material_property;

pub use behaviour::{BehaviourDescription, BehaviourDsl};
pub use dsl::{Dsl, KeywordHandler, KeywordTable};
pub use dsl_base::{CodeBlockParserOptions, DslBase, FileDescription};
pub use error::{DslError, DslResult};
pub use integer_evaluator::IntegerEvaluator;
pub use material_property::{MaterialPropertyDescription, MaterialPropertyDsl};
