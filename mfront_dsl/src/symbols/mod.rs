//! Variable registries of the models built by the DSLs
//!
//! Names are shared between every role of a model: a name declared once,
//! whatever its role, can't be declared again, nor reused as a glossary or
//! entry name.

pub mod behaviour_data;
pub mod glossary;
pub mod names;
pub mod reserved;
pub mod variable;

use crate::syntax::error::{DslError, DslResult};

pub use behaviour_data::{AttributeValue, BehaviourData, VariableRole};
pub use glossary::{is_glossary_name, GLOSSARY_NAMES};
pub use names::NameRegistry;
pub use reserved::{default_reserved_names, is_supported_type, SUPPORTED_TYPES};
pub use variable::{
    BoundsDescription, BoundsKind, StaticValue, StaticVariableDescription, VariableDescription,
    VariableDescriptionContainer,
};

/// Append bounds, refusing a second declaration for the same variable
pub(crate) fn insert_bounds(
    bounds: &mut Vec<BoundsDescription>,
    new_bounds: BoundsDescription,
) -> DslResult<()> {
    if let Some(previous) = bounds.iter().find(|b| b.variable == new_bounds.variable) {
        return Err(DslError::state(
            format!(
                "bounds for variable '{}' already declared at line {}",
                new_bounds.variable, previous.line
            ),
            Some(new_bounds.line),
        ));
    }
    bounds.push(new_bounds);
    Ok(())
}
