//! Choice of the dialect analysing a file

use super::PipelineError;
use crate::syntax::behaviour::BEHAVIOUR_DSL_NAMES;
use crate::syntax::MaterialPropertyDsl;
use crate::tokens::Token;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dialect {
    MaterialProperty,
    Behaviour,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::MaterialProperty => MaterialPropertyDsl::name(),
            Dialect::Behaviour => "Behaviour",
        }
    }

    pub fn from_dsl_name(name: &str) -> Option<Self> {
        if name == MaterialPropertyDsl::name() {
            Some(Dialect::MaterialProperty)
        } else if BEHAVIOUR_DSL_NAMES.contains(&name) {
            Some(Dialect::Behaviour)
        } else {
            None
        }
    }
}

/// `@DSL`/`@Parser` decides; otherwise the first of `@Behaviour` and `@Law`
pub fn detect_dialect(tokens: &[Token]) -> Result<Dialect, PipelineError> {
    let mut words = tokens.iter().filter(|token| !token.is_comment());
    while let Some(token) = words.next() {
        match token.value.as_str() {
            "@DSL" | "@Parser" => {
                let Some(name) = words.next() else {
                    break;
                };
                return Dialect::from_dsl_name(&name.value).ok_or_else(|| PipelineError::UnknownDsl {
                    name: name.value.clone(),
                    line: name.line,
                });
            }
            "@Behaviour" => return Ok(Dialect::Behaviour),
            "@Law" => return Ok(Dialect::MaterialProperty),
            _ => {}
        }
    }
    Ok(Dialect::MaterialProperty)
}
