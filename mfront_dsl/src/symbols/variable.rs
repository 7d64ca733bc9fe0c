//! Variable and static variable descriptions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescription {
    pub type_name: String,
    pub name: String,
    /// 1 for scalars
    pub array_size: u32,
    pub line: usize,
    pub description: String,
}

impl VariableDescription {
    pub fn new(type_name: &str, name: &str, array_size: u32, line: usize) -> Self {
        Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            array_size,
            line,
            description: String::new(),
        }
    }

    pub fn is_array(&self) -> bool {
        self.array_size > 1
    }
}

/// Variables of one role, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableDescriptionContainer(Vec<VariableDescription>);

impl VariableDescriptionContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&VariableDescription> {
        self.0.iter().find(|v| v.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut VariableDescription> {
        self.0.iter_mut().find(|v| v.name == name)
    }

    pub fn push(&mut self, variable: VariableDescription) {
        self.0.push(variable);
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableDescription> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a VariableDescriptionContainer {
    type Item = &'a VariableDescription;
    type IntoIter = std::slice::Iter<'a, VariableDescription>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Value of a static variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaticValue {
    Integer(i64),
    Real(f64),
}

impl fmt::Display for StaticValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticValue::Integer(v) => write!(f, "{v}"),
            StaticValue::Real(v) => write!(f, "{v}"),
        }
    }
}

/// A compile time constant of the generated class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticVariableDescription {
    pub type_name: String,
    pub name: String,
    pub line: usize,
    pub value: StaticValue,
}

impl StaticVariableDescription {
    pub fn new(type_name: &str, name: &str, line: usize, value: StaticValue) -> Self {
        Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            line,
            value,
        }
    }
}

/// Which side(s) of a bounds declaration are finite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsKind {
    Lower,
    Upper,
    LowerAndUpper,
}

/// `@Bounds x in [lower:upper];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsDescription {
    pub variable: String,
    pub kind: BoundsKind,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub line: usize,
}

impl BoundsDescription {
    pub fn new(variable: &str, lower: Option<f64>, upper: Option<f64>, line: usize) -> Option<Self> {
        let kind = match (lower, upper) {
            (Some(_), Some(_)) => BoundsKind::LowerAndUpper,
            (Some(_), None) => BoundsKind::Lower,
            (None, Some(_)) => BoundsKind::Upper,
            (None, None) => return None,
        };
        Some(Self {
            variable: variable.to_string(),
            kind,
            lower,
            upper,
            line,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower.map_or(true, |l| value >= l) && self.upper.map_or(true, |u| value <= u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_lookup_keeps_declaration_order() {
        let mut inputs = VariableDescriptionContainer::new();
        inputs.push(VariableDescription::new("real", "strain", 1, 3));
        inputs.push(VariableDescription::new("real", "E", 1, 3));
        assert_eq!(inputs.names(), vec!["strain", "E"]);
        assert!(inputs.contains("E"));
        assert!(!inputs.contains("nu"));
        assert!(!inputs.get("strain").map_or(true, |v| v.is_array()));
    }

    #[test]
    fn test_bounds_kind_follows_finite_sides() {
        let upper = BoundsDescription::new("x", None, Some(1.0), 1).map(|b| b.kind);
        assert_eq!(upper, Some(BoundsKind::Upper));
        assert!(BoundsDescription::new("x", None, None, 1).is_none());

        let both = BoundsDescription::new("x", Some(0.0), Some(1.0), 1);
        assert!(both.as_ref().map_or(false, |b| b.contains(0.5) && !b.contains(2.0)));
    }
}
