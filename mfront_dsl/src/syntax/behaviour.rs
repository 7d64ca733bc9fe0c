//! Reduced behaviour dialect
//!
//! Declares the variables of a behaviour and fills its code blocks. Code
//! block keywords accept an option list selecting how the block is merged
//! with a previous one of the same name:
//!
//! ```text
//! @Integrator<Append, AtEnd>{ ... }
//! ```

use crate::code_block::{Mode, Position};
use crate::config::runtime::RuntimeConfig;
use crate::lexical::is_valid_identifier;
use crate::symbols::{
    is_supported_type, AttributeValue, BehaviourData, BoundsDescription,
    StaticVariableDescription, VariableDescription, VariableRole,
};
use crate::syntax::dsl::{Dsl, KeywordTable};
use crate::syntax::dsl_base::{CodeBlockParserOptions, DslBase, FileDescription};
use crate::syntax::error::{DslError, DslResult};
use crate::tokens::Token;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Names accepted by `@DSL` that select this dialect
pub const BEHAVIOUR_DSL_NAMES: &[&str] = &[
    "DefaultDSL",
    "Default",
    "DefaultFiniteStrainDSL",
    "Implicit",
    "ImplicitII",
    "IsotropicMisesCreep",
    "IsotropicMisesPlasticFlow",
    "IsotropicStrainHardeningMisesCreep",
    "MultipleIsotropicMisesFlows",
    "RungeKutta",
];

pub const USE_QT: &str = "UseQt";

/// Default value of a parameter, read before the parameter is registered
#[derive(Debug, Clone, PartialEq)]
enum ParameterDefault {
    Real(f64),
    Int(i32),
    UnsignedShort(u16),
    Array(Vec<f64>),
}

#[derive(Debug, Clone, Serialize)]
pub struct BehaviourDescription {
    pub name: String,
    pub data: BehaviourData,
    pub integer_constants: BTreeMap<String, i64>,
    pub includes: String,
    pub sources: String,
    pub file_description: FileDescription,
}

pub struct BehaviourDsl {
    base: DslBase,
    name: String,
    data: BehaviourData,
}

fn keyword_table() -> KeywordTable<BehaviourDsl> {
    let mut table = KeywordTable::new();
    table.register(";", BehaviourDsl::treat_lonely_separator);
    table.register("@DSL", BehaviourDsl::treat_parser);
    table.register("@Parser", BehaviourDsl::treat_parser);
    table.register("@Behaviour", BehaviourDsl::treat_behaviour);
    table.register("@Author", BehaviourDsl::treat_author);
    table.register("@Date", BehaviourDsl::treat_date);
    table.register("@Description", BehaviourDsl::treat_description);
    table.register("@Includes", BehaviourDsl::treat_includes);
    table.register("@Sources", BehaviourDsl::treat_sources);
    table.register("@Import", BehaviourDsl::treat_import);
    table.register("@UseQt", BehaviourDsl::treat_use_qt);
    table.register("@MaterialProperty", BehaviourDsl::treat_material_property);
    table.register("@Coef", BehaviourDsl::treat_material_property);
    table.register("@StateVariable", BehaviourDsl::treat_state_variable);
    table.register("@StateVar", BehaviourDsl::treat_state_variable);
    table.register("@AuxiliaryStateVariable", BehaviourDsl::treat_auxiliary_state_variable);
    table.register("@AuxiliaryStateVar", BehaviourDsl::treat_auxiliary_state_variable);
    table.register("@ExternalStateVariable", BehaviourDsl::treat_external_state_variable);
    table.register("@ExternalStateVar", BehaviourDsl::treat_external_state_variable);
    table.register("@LocalVariable", BehaviourDsl::treat_local_variable);
    table.register("@Parameter", BehaviourDsl::treat_parameter);
    table.register("@StaticVariable", BehaviourDsl::treat_static_var);
    table.register("@StaticVar", BehaviourDsl::treat_static_var);
    table.register("@IntegerConstant", BehaviourDsl::treat_integer_constant);
    table.register("@Bounds", BehaviourDsl::treat_bounds);
    table.register("@PhysicalBounds", BehaviourDsl::treat_physical_bounds);
    table.register("@InitLocalVariables", BehaviourDsl::treat_init_local_variables);
    table.register("@InitializeLocalVariables", BehaviourDsl::treat_init_local_variables);
    table.register("@Integrator", BehaviourDsl::treat_integrator);
    table.register("@ComputeStress", BehaviourDsl::treat_compute_stress);
    table.register(
        "@UpdateAuxiliaryStateVariables",
        BehaviourDsl::treat_update_auxiliary_state_variables,
    );
    table.register("@TangentOperator", BehaviourDsl::treat_tangent_operator);
    table
}

impl Dsl for BehaviourDsl {
    fn base(&self) -> &DslBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DslBase {
        &mut self.base
    }

    fn keywords() -> &'static KeywordTable<Self> {
        static KEYWORDS: OnceLock<KeywordTable<BehaviourDsl>> = OnceLock::new();
        KEYWORDS.get_or_init(keyword_table)
    }

    fn class_name(&self) -> &str {
        &self.name
    }

    fn add_static_variable(&mut self, variable: StaticVariableDescription) -> DslResult<()> {
        self.data.add_static_variable(variable)
    }

    fn treat_unknown_token(&mut self, token: &Token) -> DslResult<()> {
        if self.data.is_variable_name(&token.value) && self.base.tokens().check(".") {
            return self.treat_method(&token.value, token.line);
        }
        Err(DslError::UnknownKeyword {
            token: token.value.clone(),
            line: token.line,
        })
    }
}

impl BehaviourDsl {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            base: DslBase::new(config),
            name: String::new(),
            data: BehaviourData::new(),
        }
    }

    pub fn data(&self) -> &BehaviourData {
        &self.data
    }

    pub fn into_description(self) -> BehaviourDescription {
        let integer_constants = self.base.integer_constants().clone();
        let Self { base, name, data } = self;
        BehaviourDescription {
            name,
            data,
            integer_constants,
            includes: base.includes,
            sources: base.sources,
            file_description: base.file_description,
        }
    }

    fn treat_behaviour(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Behaviour";
        if !self.name.is_empty() {
            return Err(DslError::state("behaviour name already defined", Some(self.base.current_line())));
        }
        let line = self.base.current_line();
        let name = self.base.read_only_one_token(HANDLER)?;
        if !is_valid_identifier(&name, true) {
            return Err(DslError::malformed(HANDLER, format!("invalid behaviour name '{name}'"), line));
        }
        self.name = name;
        Ok(())
    }

    fn treat_use_qt(&mut self) -> DslResult<()> {
        let value = self.base.read_boolean_value("@UseQt")?;
        self.base.read_specified_token("@UseQt", ";")?;
        self.data.set_attribute(USE_QT, AttributeValue::Bool(value), false)
    }

    // === VARIABLES ===

    /// `type name [ '[' size ']' ], ...;`
    fn read_variables(&mut self, handler: &str, role: VariableRole) -> DslResult<()> {
        let line = self.base.current_line();
        let type_name = self.base.read_type(handler)?;
        if !is_supported_type(&type_name) {
            return Err(DslError::malformed(
                handler,
                format!("type '{type_name}' is not supported"),
                line,
            ));
        }
        for variable in self.base.read_var_list(handler, &type_name, true)? {
            self.data.add_variable(role, variable)?;
        }
        Ok(())
    }

    fn treat_material_property(&mut self) -> DslResult<()> {
        self.read_variables("@MaterialProperty", VariableRole::MaterialProperty)
    }

    fn treat_state_variable(&mut self) -> DslResult<()> {
        self.read_variables("@StateVariable", VariableRole::StateVariable)
    }

    fn treat_auxiliary_state_variable(&mut self) -> DslResult<()> {
        self.read_variables("@AuxiliaryStateVariable", VariableRole::AuxiliaryStateVariable)
    }

    fn treat_external_state_variable(&mut self) -> DslResult<()> {
        self.read_variables("@ExternalStateVariable", VariableRole::ExternalStateVariable)
    }

    fn treat_local_variable(&mut self) -> DslResult<()> {
        self.read_variables("@LocalVariable", VariableRole::LocalVariable)
    }

    /// `@Parameter [type] name[size] [= value], ...;`, the type defaulting to `real`
    ///
    /// Scalar defaults may be given later with `setDefaultValue`, array
    /// defaults come with the declaration.
    fn treat_parameter(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Parameter";
        let explicit_type = self.base.tokens().peek().map_or(false, |next| {
            is_valid_identifier(&next.value, false) || next.value == "::" || next.value == "<"
        });
        let line = self.base.current_line();
        let type_name = if explicit_type {
            self.base.read_type(HANDLER)?
        } else {
            "real".to_string()
        };
        if !matches!(type_name.as_str(), "real" | "int" | "ushort") {
            return Err(DslError::malformed(
                HANDLER,
                format!("type '{type_name}' is not supported for parameters"),
                line,
            ));
        }
        loop {
            let name = self.base.current_token(HANDLER, "expected parameter name")?;
            self.base.advance();
            let size = self.base.read_array_size(HANDLER, &name.value, type_name == "real")?;
            let default = self.read_parameter_default(HANDLER, &name.value, &type_name, size, name.line)?;
            let mut variable = VariableDescription::new(&type_name, &name.value, size, name.line);
            variable.description = self.base.current_comment.clone();
            self.data.add_variable(VariableRole::Parameter, variable)?;
            if let Some(default) = default {
                self.set_parameter_default(&name.value, default, name.line)?;
            }

            let separator = self.base.current_token(HANDLER, "expected ',' or ';'")?;
            self.base.advance();
            match separator.value.as_str() {
                "," => continue,
                ";" => return Ok(()),
                other => {
                    return Err(DslError::malformed(
                        HANDLER,
                        format!("',' or ';' expected, read '{other}'"),
                        separator.line,
                    ))
                }
            }
        }
    }

    fn read_parameter_default(
        &mut self,
        handler: &str,
        name: &str,
        type_name: &str,
        size: u32,
        line: usize,
    ) -> DslResult<Option<ParameterDefault>> {
        if size > 1 {
            if self.base.tokens().check("=") {
                self.base.advance();
            }
            if !self.base.tokens().check("{") {
                return Err(DslError::malformed(
                    handler,
                    format!("default values of the parameter array '{name}' must be given with the array"),
                    line,
                ));
            }
            let values = self.base.read_array_of_double(handler)?;
            if values.len() != size as usize {
                return Err(DslError::malformed(
                    handler,
                    format!(
                        "{} default values given for parameter '{name}' of size {size}",
                        values.len()
                    ),
                    line,
                ));
            }
            return Ok(Some(ParameterDefault::Array(values)));
        }
        let default = match type_name {
            "int" => self
                .base
                .read_initialisation_value::<i32>(handler, false)?
                .map(ParameterDefault::Int),
            "ushort" => self
                .base
                .read_initialisation_value::<u16>(handler, false)?
                .map(ParameterDefault::UnsignedShort),
            _ => self
                .base
                .read_initialisation_value::<f64>(handler, false)?
                .map(ParameterDefault::Real),
        };
        Ok(default)
    }

    fn set_parameter_default(&mut self, name: &str, default: ParameterDefault, line: usize) -> DslResult<()> {
        match default {
            ParameterDefault::Real(value) => self.data.set_parameter_default_value(name, value, line),
            ParameterDefault::Int(value) => self.data.set_integer_parameter_default_value(name, value, line),
            ParameterDefault::UnsignedShort(value) => {
                self.data.set_unsigned_short_parameter_default_value(name, value, line)
            }
            ParameterDefault::Array(values) => {
                for (index, value) in values.into_iter().enumerate() {
                    self.data
                        .set_parameter_array_default_value(name, index as u32, value, line)?;
                }
                Ok(())
            }
        }
    }

    fn treat_bounds(&mut self) -> DslResult<()> {
        let bounds = self.read_bounds_description("@Bounds")?;
        self.data.set_bounds(bounds)
    }

    fn treat_physical_bounds(&mut self) -> DslResult<()> {
        let bounds = self.read_bounds_description("@PhysicalBounds")?;
        self.data.set_physical_bounds(bounds)
    }

    fn read_bounds_description(&mut self, handler: &str) -> DslResult<BoundsDescription> {
        let variable = self.base.current_token(handler, "expected a variable name")?;
        self.base.advance();
        let (lower, upper) = self.base.read_bounds(handler)?;
        BoundsDescription::new(&variable.value, lower, upper, variable.line)
            .ok_or_else(|| DslError::malformed(handler, "both bounds are infinite", variable.line))
    }

    /// `variable.method(argument);`
    fn treat_method(&mut self, variable: &str, line: usize) -> DslResult<()> {
        const HANDLER: &str = "treat_method";
        self.base.read_specified_token(HANDLER, ".")?;
        let method = self.base.current_token(HANDLER, "expected method name")?;
        self.base.advance();
        self.base.read_specified_token(HANDLER, "(")?;
        match method.value.as_str() {
            "setGlossaryName" => {
                let glossary = self.base.read_string(HANDLER)?;
                self.data.set_glossary_name(variable, &glossary, line)?;
            }
            "setEntryName" => {
                let entry = self.base.read_string(HANDLER)?;
                self.data.set_entry_name(variable, &entry, line)?;
            }
            "setDefaultValue" => {
                let type_name = match self.data.variables(VariableRole::Parameter).get(variable) {
                    Some(parameter) => parameter.type_name.clone(),
                    None => {
                        return Err(DslError::malformed(
                            HANDLER,
                            "method setDefaultValue is reserved for parameters",
                            method.line,
                        ))
                    }
                };
                let default = match type_name.as_str() {
                    "int" => ParameterDefault::Int(self.base.read_int(HANDLER)?),
                    "ushort" => ParameterDefault::UnsignedShort(self.base.read_unsigned_short(HANDLER)?),
                    _ => ParameterDefault::Real(self.base.read_double(HANDLER)?),
                };
                self.set_parameter_default(variable, default, line)?;
            }
            other => {
                return Err(DslError::malformed(
                    HANDLER,
                    format!(
                        "unknown method '{other}', valid methods are 'setGlossaryName', \
                         'setEntryName' and 'setDefaultValue'"
                    ),
                    method.line,
                ))
            }
        }
        self.base.read_specified_token(HANDLER, ")")?;
        self.base.read_specified_token(HANDLER, ";")
    }

    // === CODE BLOCKS ===

    /// Optional `<Option, ...>` list of a code block keyword
    fn read_code_block_options(&mut self, handler: &str) -> DslResult<(Mode, Position)> {
        let mut mode = Mode::Create;
        let mut position = Position::Body;
        for option in self.base.read_list(handler, "<", ">")? {
            let requested_mode = match option.value.as_str() {
                "Append" => Mode::CreateOrAppend,
                "Replace" => Mode::CreateOrReplace,
                "AtBeginning" => {
                    position = Position::AtBeginning;
                    continue;
                }
                "AtEnd" => {
                    position = Position::AtEnd;
                    continue;
                }
                "Body" => {
                    position = Position::Body;
                    continue;
                }
                other => {
                    return Err(DslError::malformed(
                        handler,
                        format!("unknown option '{other}'"),
                        option.line,
                    ))
                }
            };
            if mode != Mode::Create && mode != requested_mode {
                return Err(DslError::malformed(
                    handler,
                    "options 'Append' and 'Replace' are exclusive",
                    option.line,
                ));
            }
            mode = requested_mode;
        }
        Ok((mode, position))
    }

    fn treat_code_block(&mut self, handler: &str, block_name: &str) -> DslResult<()> {
        let (mode, position) = self.read_code_block_options(handler)?;
        let options = CodeBlockParserOptions {
            members: self.data.member_names().clone(),
            static_members: self.data.static_member_names().clone(),
            qualify_members: true,
            qualify_static_members: true,
            ..CodeBlockParserOptions::default()
        };
        let block = self.base.read_next_block(&options, &self.name)?;
        self.data.set_code(block_name, &block, mode, position)
    }

    fn treat_init_local_variables(&mut self) -> DslResult<()> {
        self.treat_code_block("@InitLocalVariables", "InitializeLocalVariables")
    }

    fn treat_integrator(&mut self) -> DslResult<()> {
        self.treat_code_block("@Integrator", "Integrator")
    }

    fn treat_compute_stress(&mut self) -> DslResult<()> {
        self.treat_code_block("@ComputeStress", "ComputeStress")
    }

    fn treat_update_auxiliary_state_variables(&mut self) -> DslResult<()> {
        self.treat_code_block("@UpdateAuxiliaryStateVariables", "UpdateAuxiliaryStateVariables")
    }

    fn treat_tangent_operator(&mut self) -> DslResult<()> {
        self.treat_code_block("@TangentOperator", "TangentOperator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::DslPreferences;
    use assert_matches::assert_matches;

    fn dsl() -> BehaviourDsl {
        let mut dsl = BehaviourDsl::new(&RuntimeConfig::default());
        dsl.base.preferences = DslPreferences {
            register_line_directives: true,
            pedantic: false,
            debug_mode: true,
        };
        dsl
    }

    fn analyse(source: &str) -> DslResult<BehaviourDescription> {
        let mut dsl = dsl();
        dsl.analyse_string(source)?;
        Ok(dsl.into_description())
    }

    const NORTON: &str = "@DSL Default;
@Behaviour Norton;
@MaterialProperty real young;
@StateVariable real p;
@AuxiliaryStateVariable real f;
@LocalVariable real seq;
@Parameter real A = 2.5;
@StaticVariable real C = 2;
@Integrator{
  seq = A*p + C;
  dp = seq*dt;
}
@Integrator<Append,AtEnd>{
  f = p;
}
";

    #[test]
    fn test_variables_and_code_blocks() {
        let mut description = analyse(NORTON).unwrap();
        assert_eq!(description.name, "Norton");
        let data = &mut description.data;
        assert_eq!(data.variables(VariableRole::StateVariable).names(), vec!["p"]);
        assert!(data.member_names().contains("dp"));
        assert_eq!(data.parameter_default_value("A"), Some(2.5));
        assert_eq!(
            data.get_code_block("Integrator").unwrap().code,
            "this->seq = this->A*(this->p) + Norton::C;\n\
             this->dp = this->seq*(this->dt);\n\
             this->f = this->p;"
        );
    }

    #[test]
    fn test_code_block_options() {
        let twice = analyse("@Behaviour B;\n@Integrator{ a; }\n@Integrator{ b; }").unwrap_err();
        assert_matches!(twice.root_cause(), DslError::State { .. });

        let mut replaced =
            analyse("@Behaviour B;\n@Integrator{ a; }\n@Integrator<Replace>{ b; }").unwrap();
        assert_eq!(replaced.data.get_code_block("Integrator").unwrap().code, "b;");

        let mut prepended =
            analyse("@Behaviour B;\n@ComputeStress{ a; }\n@ComputeStress<Append,AtBeginning>{ b; }")
                .unwrap();
        assert_eq!(prepended.data.get_code_block("ComputeStress").unwrap().code, "b;\na;");

        let unknown = analyse("@Behaviour B;\n@Integrator<Prepend>{ a; }").unwrap_err();
        assert_matches!(unknown.root_cause(), DslError::MalformedConstruct { .. });
        let exclusive = analyse("@Behaviour B;\n@Integrator<Append,Replace>{ a; }").unwrap_err();
        assert_matches!(exclusive.root_cause(), DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_parameters() {
        let description = analyse(
            "@Parameter real A = 1, B[2] = {3, 4};\n@Parameter int nb = 3;\n@Parameter ushort ns{2};\n@Parameter D = 5;",
        )
        .unwrap();
        let data = &description.data;
        assert_eq!(data.parameter_default_value("A"), Some(1.0));
        assert_eq!(data.parameter_default_value("B[1]"), Some(4.0));
        assert_eq!(data.integer_parameter_default_value("nb"), Some(3));
        assert_eq!(data.unsigned_short_parameter_default_value("ns"), Some(2));
        assert_eq!(data.parameter_default_value("D"), Some(5.0));

        let wrong_size = analyse("@Parameter real B[2] = {1};").unwrap_err();
        assert_matches!(wrong_size.root_cause(), DslError::MalformedConstruct { .. });
        let array_without_values = analyse("@Parameter real B[2];").unwrap_err();
        assert_matches!(array_without_values.root_cause(), DslError::MalformedConstruct { .. });
        let infinite = analyse("@Parameter real A = inf;").unwrap_err();
        assert_matches!(infinite.root_cause(), DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_set_default_value_follows_parameter_type() {
        let description = analyse(
            "@Parameter real A;\n@Parameter int n;\n@Parameter ushort s;\n\
             A.setDefaultValue(2.5);\nn.setDefaultValue(-4);\ns.setDefaultValue(7);",
        )
        .unwrap();
        let data = &description.data;
        assert_eq!(data.parameter_default_value("A"), Some(2.5));
        assert_eq!(data.integer_parameter_default_value("n"), Some(-4));
        assert_eq!(data.unsigned_short_parameter_default_value("s"), Some(7));

        let not_an_int = analyse("@Parameter int n;\nn.setDefaultValue(1.5);").unwrap_err();
        assert_matches!(not_an_int.root_cause(), DslError::MalformedConstruct { line: 2, .. });
        let twice = analyse("@Parameter int n = 1;\nn.setDefaultValue(2);").unwrap_err();
        assert_matches!(twice.root_cause(), DslError::State { .. });
        let not_a_parameter = analyse("@StateVariable real p;\np.setDefaultValue(2);").unwrap_err();
        assert_matches!(not_a_parameter.root_cause(), DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_rejected_parameter_is_not_registered() {
        let mut dsl = dsl();
        let error = dsl.analyse_string("@Parameter real B[2] = {1};").unwrap_err();
        assert_matches!(error.root_cause(), DslError::MalformedConstruct { .. });
        assert!(!dsl.data().variables(VariableRole::Parameter).contains("B"));
        assert!(!dsl.data().is_variable_name("B"));
    }

    #[test]
    fn test_array_size_arithmetic_errors() {
        let by_zero = analyse("@IntegerConstant N = 2;\n@StateVariable real a[N/0];").unwrap_err();
        assert_matches!(by_zero.root_cause(), DslError::InvalidExpression { line: 2, .. });

        let overflow =
            analyse("@StateVariable real a[(0-9223372036854775807-1)/(0-1)];").unwrap_err();
        assert_matches!(
            overflow.root_cause(),
            DslError::InvalidExpression { message, .. } if message == "integer overflow"
        );

        let product = analyse("@LocalVariable real b[9223372036854775807*2];").unwrap_err();
        assert_matches!(product.root_cause(), DslError::InvalidExpression { .. });
    }

    #[test]
    fn test_glossary_and_entry_names() {
        let description = analyse(
            "@StateVariable real x[3];\nx.setGlossaryName(\"Strain\");\n@StateVariable real y;\ny.setEntryName(\"MyY\");",
        )
        .unwrap();
        assert_eq!(description.data.external_name("x"), "Strain");
        assert_eq!(description.data.variable_from_external_name("MyY"), Some("y"));
        assert_eq!(description.data.external_name("T"), "Temperature");

        let error = analyse(
            "@StateVariable real x[3];\nx.setGlossaryName(\"Strain\");\n@StateVariable real y;\ny.setEntryName(\"Strain\");",
        )
        .unwrap_err();
        assert_matches!(error, DslError::NameCollision { line: 4, .. });
    }

    #[test]
    fn test_collisions_and_types() {
        let increment = analyse("@StateVariable real p;\n@LocalVariable real dp;").unwrap_err();
        assert_matches!(increment.root_cause(), DslError::NameCollision { .. });
        let temperature = analyse("@LocalVariable real T;").unwrap_err();
        assert_matches!(temperature.root_cause(), DslError::NameCollision { .. });
        let unsupported = analyse("@LocalVariable matrix m;").unwrap_err();
        assert_matches!(unsupported.root_cause(), DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_bounds_attributes_and_constants() {
        let description = analyse(
            "@IntegerConstant N = 2;\n@StateVariable real e[N+1];\n@StateVariable real p;\n\
             @Bounds p in [0:*[;\n@PhysicalBounds T in [0:*[;\n@UseQt true;",
        )
        .unwrap();
        let data = &description.data;
        assert_eq!(data.variables(VariableRole::StateVariable).get("e").map(|v| v.array_size), Some(3));
        assert_eq!(data.bounds().len(), 1);
        assert_eq!(data.physical_bounds()[0].variable, "T");
        assert_eq!(data.get_attribute(USE_QT), Some(&AttributeValue::Bool(true)));
        assert_eq!(description.integer_constants.get("N"), Some(&2));

        let undeclared = analyse("@Bounds q in [0:1];").unwrap_err();
        assert_matches!(undeclared.root_cause(), DslError::State { .. });
        let twice = analyse("@UseQt true;\n@UseQt false;").unwrap_err();
        assert_matches!(twice.root_cause(), DslError::State { .. });
    }
}
