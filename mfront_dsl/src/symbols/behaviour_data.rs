//! Variables, code blocks and metadata of a behaviour
//!
//! Every declaration goes through the same collision checks, performed
//! before anything is modified: a failed declaration leaves the data as it
//! was.

use super::glossary::is_glossary_name;
use super::names::NameRegistry;
use super::variable::{
    BoundsDescription, StaticVariableDescription, VariableDescription,
    VariableDescriptionContainer,
};
use super::insert_bounds;
use crate::code_block::{CodeBlock, CodeBlocksAggregator, Mode, Position};
use crate::lexical::is_valid_identifier;
use crate::syntax::error::{DslError, DslResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Role of a variable inside a behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableRole {
    MaterialProperty,
    StateVariable,
    AuxiliaryStateVariable,
    IntegrationVariable,
    ExternalStateVariable,
    LocalVariable,
    Parameter,
}

impl VariableRole {
    pub const ALL: [VariableRole; 7] = [
        VariableRole::MaterialProperty,
        VariableRole::StateVariable,
        VariableRole::AuxiliaryStateVariable,
        VariableRole::IntegrationVariable,
        VariableRole::ExternalStateVariable,
        VariableRole::LocalVariable,
        VariableRole::Parameter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableRole::MaterialProperty => "material property",
            VariableRole::StateVariable => "state variable",
            VariableRole::AuxiliaryStateVariable => "auxiliary state variable",
            VariableRole::IntegrationVariable => "integration variable",
            VariableRole::ExternalStateVariable => "external state variable",
            VariableRole::LocalVariable => "local variable",
            VariableRole::Parameter => "parameter",
        }
    }

    /// Whether declaring `x` also declares its increment `dx`
    pub fn has_increment(&self) -> bool {
        matches!(
            self,
            VariableRole::StateVariable
                | VariableRole::IntegrationVariable
                | VariableRole::ExternalStateVariable
        )
    }
}

/// Typed behaviour attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    UnsignedShort(u16),
    Double(f64),
    String(String),
}

impl AttributeValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::UnsignedShort(_) => "unsigned short",
            AttributeValue::Double(_) => "double",
            AttributeValue::String(_) => "string",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BehaviourData {
    material_properties: VariableDescriptionContainer,
    state_variables: VariableDescriptionContainer,
    auxiliary_state_variables: VariableDescriptionContainer,
    integration_variables: VariableDescriptionContainer,
    external_state_variables: VariableDescriptionContainer,
    local_variables: VariableDescriptionContainer,
    parameters: VariableDescriptionContainer,
    static_variables: Vec<StaticVariableDescription>,
    names: NameRegistry,
    members: BTreeSet<String>,
    static_members: BTreeSet<String>,
    code_blocks: BTreeMap<String, CodeBlocksAggregator>,
    parameters_default_values: BTreeMap<String, f64>,
    integer_parameters_default_values: BTreeMap<String, i32>,
    unsigned_short_parameters_default_values: BTreeMap<String, u16>,
    attributes: BTreeMap<String, AttributeValue>,
    bounds: Vec<BoundsDescription>,
    physical_bounds: Vec<BoundsDescription>,
}

impl Default for BehaviourData {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviourData {
    /// Empty behaviour knowing the temperature, its increment and the time increment
    pub fn new() -> Self {
        let mut data = Self {
            material_properties: VariableDescriptionContainer::new(),
            state_variables: VariableDescriptionContainer::new(),
            auxiliary_state_variables: VariableDescriptionContainer::new(),
            integration_variables: VariableDescriptionContainer::new(),
            external_state_variables: VariableDescriptionContainer::new(),
            local_variables: VariableDescriptionContainer::new(),
            parameters: VariableDescriptionContainer::new(),
            static_variables: Vec::new(),
            names: NameRegistry::with_default_reserved_names(),
            members: BTreeSet::new(),
            static_members: BTreeSet::new(),
            code_blocks: BTreeMap::new(),
            parameters_default_values: BTreeMap::new(),
            integer_parameters_default_values: BTreeMap::new(),
            unsigned_short_parameters_default_values: BTreeMap::new(),
            attributes: BTreeMap::new(),
            bounds: Vec::new(),
            physical_bounds: Vec::new(),
        };
        let mut temperature = VariableDescription::new("temperature", "T", 1, 0);
        temperature.description = "temperature".to_string();
        for name in ["T", "dT", "dt"] {
            data.members.insert(name.to_string());
            data.names.reserve_unchecked(name);
        }
        data.external_state_variables.push(temperature);
        data.names.bind_glossary_name_unchecked("T", "Temperature");
        data
    }

    fn container(&self, role: VariableRole) -> &VariableDescriptionContainer {
        match role {
            VariableRole::MaterialProperty => &self.material_properties,
            VariableRole::StateVariable => &self.state_variables,
            VariableRole::AuxiliaryStateVariable => &self.auxiliary_state_variables,
            VariableRole::IntegrationVariable => &self.integration_variables,
            VariableRole::ExternalStateVariable => &self.external_state_variables,
            VariableRole::LocalVariable => &self.local_variables,
            VariableRole::Parameter => &self.parameters,
        }
    }

    fn container_mut(&mut self, role: VariableRole) -> &mut VariableDescriptionContainer {
        match role {
            VariableRole::MaterialProperty => &mut self.material_properties,
            VariableRole::StateVariable => &mut self.state_variables,
            VariableRole::AuxiliaryStateVariable => &mut self.auxiliary_state_variables,
            VariableRole::IntegrationVariable => &mut self.integration_variables,
            VariableRole::ExternalStateVariable => &mut self.external_state_variables,
            VariableRole::LocalVariable => &mut self.local_variables,
            VariableRole::Parameter => &mut self.parameters,
        }
    }

    pub fn variables(&self, role: VariableRole) -> &VariableDescriptionContainer {
        self.container(role)
    }

    /// Role and description of a declared variable
    pub fn find_variable(&self, name: &str) -> Option<(VariableRole, &VariableDescription)> {
        VariableRole::ALL
            .iter()
            .find_map(|role| self.container(*role).get(name).map(|v| (*role, v)))
    }

    pub fn is_variable_name(&self, name: &str) -> bool {
        self.find_variable(name).is_some()
    }

    fn check_member_name(&self, name: &str, line: usize) -> DslResult<()> {
        if !is_valid_identifier(name, true) {
            return Err(DslError::malformed(
                "BehaviourData::addVariable",
                format!("variable name '{name}' is not valid"),
                line,
            ));
        }
        if is_glossary_name(name) {
            return Err(DslError::collision(
                name,
                "a glossary name can't be used as a variable name",
                line,
            ));
        }
        if self.members.contains(name) || self.static_members.contains(name) {
            return Err(DslError::collision(name, "member already declared", line));
        }
        self.names.check_name(name, line)
    }

    /// Declare a variable; state like roles also declare the increment
    pub fn add_variable(&mut self, role: VariableRole, variable: VariableDescription) -> DslResult<()> {
        let mut new_members = vec![variable.name.clone()];
        if role.has_increment() {
            new_members.push(format!("d{}", variable.name));
        }
        for name in &new_members {
            self.check_member_name(name, variable.line)?;
        }
        for name in new_members {
            self.names.reserve_unchecked(&name);
            self.members.insert(name);
        }
        self.container_mut(role).push(variable);
        Ok(())
    }

    pub fn add_static_variable(&mut self, variable: StaticVariableDescription) -> DslResult<()> {
        self.check_member_name(&variable.name, variable.line)?;
        self.names.reserve_unchecked(&variable.name);
        self.static_members.insert(variable.name.clone());
        self.static_variables.push(variable);
        Ok(())
    }

    /// Reserve a name that is not a variable
    pub fn reserve_name(&mut self, name: &str, line: usize) -> DslResult<()> {
        self.names.reserve(name, line)
    }

    pub fn static_variables(&self) -> &[StaticVariableDescription] {
        &self.static_variables
    }

    pub fn member_names(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn static_member_names(&self) -> &BTreeSet<String> {
        &self.static_members
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    // === CODE BLOCKS ===

    pub fn set_code(
        &mut self,
        name: &str,
        block: &CodeBlock,
        mode: Mode,
        position: Position,
    ) -> DslResult<()> {
        if let Some(aggregator) = self.code_blocks.get_mut(name) {
            match mode {
                Mode::Create => {
                    return Err(DslError::state(
                        format!(
                            "a code block named '{name}' already exists; use option 'Append' \
                             to append to it or option 'Replace' to replace it"
                        ),
                        None,
                    ))
                }
                Mode::CreateButDontReplace => return Ok(()),
                Mode::CreateOrReplace => return Ok(aggregator.replace(block, position)?),
                Mode::CreateOrAppend => {}
            }
        }
        self.code_blocks
            .entry(name.to_string())
            .or_default()
            .set(block, position)?;
        Ok(())
    }

    pub fn has_code(&self, name: &str) -> bool {
        self.code_blocks.contains_key(name)
    }

    /// The aggregated block; it can't be modified afterwards
    pub fn get_code_block(&mut self, name: &str) -> DslResult<&CodeBlock> {
        match self.code_blocks.get_mut(name) {
            Some(aggregator) => Ok(aggregator.get()),
            None => Err(DslError::state(
                format!("no code block associated with '{name}'"),
                None,
            )),
        }
    }

    pub fn code_block_names(&self) -> Vec<&str> {
        self.code_blocks.keys().map(String::as_str).collect()
    }

    // === PARAMETERS ===

    fn parameter(&self, name: &str, line: usize) -> DslResult<&VariableDescription> {
        self.parameters
            .get(name)
            .ok_or_else(|| DslError::state(format!("no parameter named '{name}'"), Some(line)))
    }

    fn check_parameter_type(&self, name: &str, expected: &str, line: usize) -> DslResult<u32> {
        let parameter = self.parameter(name, line)?;
        if parameter.type_name != expected {
            return Err(DslError::state(
                format!(
                    "parameter '{name}' is of type '{}', not '{expected}'",
                    parameter.type_name
                ),
                Some(line),
            ));
        }
        Ok(parameter.array_size)
    }

    pub fn set_parameter_default_value(&mut self, name: &str, value: f64, line: usize) -> DslResult<()> {
        if self.check_parameter_type(name, "real", line)? != 1 {
            return Err(DslError::state(
                format!("parameter '{name}' is an array, an index is required"),
                Some(line),
            ));
        }
        insert_default(&mut self.parameters_default_values, name.to_string(), value, line)
    }

    pub fn set_parameter_array_default_value(
        &mut self,
        name: &str,
        index: u32,
        value: f64,
        line: usize,
    ) -> DslResult<()> {
        let size = self.check_parameter_type(name, "real", line)?;
        if size == 1 {
            return Err(DslError::state(format!("parameter '{name}' is not an array"), Some(line)));
        }
        if index >= size {
            return Err(DslError::state(
                format!("index {index} is out of bounds for parameter '{name}' of size {size}"),
                Some(line),
            ));
        }
        insert_default(
            &mut self.parameters_default_values,
            format!("{name}[{index}]"),
            value,
            line,
        )
    }

    pub fn set_integer_parameter_default_value(&mut self, name: &str, value: i32, line: usize) -> DslResult<()> {
        self.check_parameter_type(name, "int", line)?;
        insert_default(&mut self.integer_parameters_default_values, name.to_string(), value, line)
    }

    pub fn set_unsigned_short_parameter_default_value(
        &mut self,
        name: &str,
        value: u16,
        line: usize,
    ) -> DslResult<()> {
        self.check_parameter_type(name, "ushort", line)?;
        insert_default(
            &mut self.unsigned_short_parameters_default_values,
            name.to_string(),
            value,
            line,
        )
    }

    /// Default of a real parameter; array elements are keyed `name[i]`
    pub fn parameter_default_value(&self, key: &str) -> Option<f64> {
        self.parameters_default_values.get(key).copied()
    }

    pub fn integer_parameter_default_value(&self, name: &str) -> Option<i32> {
        self.integer_parameters_default_values.get(name).copied()
    }

    pub fn unsigned_short_parameter_default_value(&self, name: &str) -> Option<u16> {
        self.unsigned_short_parameters_default_values.get(name).copied()
    }

    // === ATTRIBUTES ===

    pub fn set_attribute(&mut self, name: &str, value: AttributeValue, allow_redefinition: bool) -> DslResult<()> {
        if let Some(previous) = self.attributes.get(name) {
            if !allow_redefinition {
                return Err(DslError::state(format!("attribute '{name}' already declared"), None));
            }
            if std::mem::discriminant(previous) != std::mem::discriminant(&value) {
                return Err(DslError::state(
                    format!(
                        "attribute '{name}' already declared with type '{}'",
                        previous.type_name()
                    ),
                    None,
                ));
            }
        }
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get_attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    // === EXTERNAL NAMES ===

    fn check_variable_name(&self, name: &str, line: usize) -> DslResult<()> {
        if self.is_variable_name(name) {
            Ok(())
        } else {
            Err(DslError::state(format!("no variable named '{name}'"), Some(line)))
        }
    }

    pub fn set_glossary_name(&mut self, variable: &str, glossary: &str, line: usize) -> DslResult<()> {
        self.check_variable_name(variable, line)?;
        self.names.set_glossary_name(variable, glossary, line)
    }

    pub fn set_entry_name(&mut self, variable: &str, entry: &str, line: usize) -> DslResult<()> {
        self.check_variable_name(variable, line)?;
        self.names.set_entry_name(variable, entry, line)
    }

    pub fn external_name<'a>(&'a self, variable: &'a str) -> &'a str {
        self.names.external_name(variable)
    }

    pub fn variable_from_external_name(&self, external: &str) -> Option<&str> {
        self.names.variable_from_external_name(external)
    }

    pub fn is_glossary_name_used(&self, name: &str) -> bool {
        self.names.is_glossary_name_used(name)
    }

    pub fn is_used_as_entry_name(&self, name: &str) -> bool {
        self.names.is_used_as_entry_name(name)
    }

    // === BOUNDS ===

    pub fn set_bounds(&mut self, bounds: BoundsDescription) -> DslResult<()> {
        self.check_variable_name(&bounds.variable, bounds.line)?;
        insert_bounds(&mut self.bounds, bounds)
    }

    pub fn set_physical_bounds(&mut self, bounds: BoundsDescription) -> DslResult<()> {
        self.check_variable_name(&bounds.variable, bounds.line)?;
        insert_bounds(&mut self.physical_bounds, bounds)
    }

    pub fn bounds(&self) -> &[BoundsDescription] {
        &self.bounds
    }

    pub fn physical_bounds(&self) -> &[BoundsDescription] {
        &self.physical_bounds
    }
}

fn insert_default<T>(map: &mut BTreeMap<String, T>, key: String, value: T, line: usize) -> DslResult<()> {
    if map.contains_key(&key) {
        return Err(DslError::state(
            format!("default value for '{key}' already defined"),
            Some(line),
        ));
    }
    map.insert(key, value);
    Ok(())
}
