//! The `MaterialLaw` dialect: one output computed from scalar inputs
//!
//! ```text
//! @Law YoungModulus;
//! @Output E;
//! @Input T;
//! T.setGlossaryName("Temperature");
//! @Function{ E = 2.e11 - 1.e8 * T; }
//! ```

use crate::config::compile_time::dsl::MAX_BLOCK_NESTING;
use crate::config::runtime::RuntimeConfig;
use crate::lexical::is_valid_identifier;
use crate::symbols::{
    insert_bounds, BoundsDescription, NameRegistry, StaticValue, StaticVariableDescription,
    VariableDescriptionContainer,
};
use crate::syntax::dsl::{Dsl, KeywordTable};
use crate::syntax::dsl_base::{unquote, DslBase, FileDescription};
use crate::syntax::error::{DslError, DslResult};
use crate::tokens::{Token, TokenFlag};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

const ASSIGNMENT_OPERATORS: [&str; 5] = ["=", "+=", "-=", "*=", "/="];

/// Body of the law
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LawFunction {
    pub body: String,
    pub line: usize,
    /// Whether the body assigns the output
    pub modified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialPropertyDescription {
    pub law: String,
    pub material: String,
    pub library: String,
    pub interfaces: BTreeSet<String>,
    pub inputs: VariableDescriptionContainer,
    pub output: String,
    pub parameters: Vec<String>,
    pub parameter_default_values: BTreeMap<String, f64>,
    pub static_variables: Vec<StaticVariableDescription>,
    pub bounds: Vec<BoundsDescription>,
    pub physical_bounds: Vec<BoundsDescription>,
    pub names: NameRegistry,
    pub function: LawFunction,
    pub includes: String,
    pub sources: String,
    pub file_description: FileDescription,
}

impl Default for MaterialPropertyDescription {
    fn default() -> Self {
        let mut names = NameRegistry::with_default_reserved_names();
        names.reserve_unchecked("params");
        Self {
            law: String::new(),
            material: String::new(),
            library: String::new(),
            interfaces: BTreeSet::new(),
            inputs: VariableDescriptionContainer::new(),
            output: String::new(),
            parameters: Vec::new(),
            parameter_default_values: BTreeMap::new(),
            static_variables: Vec::new(),
            bounds: Vec::new(),
            physical_bounds: Vec::new(),
            names,
            function: LawFunction::default(),
            includes: String::new(),
            sources: String::new(),
            file_description: FileDescription::default(),
        }
    }
}

impl MaterialPropertyDescription {
    pub fn class_name(&self) -> &str {
        &self.law
    }

    /// `material_law` when a material is given, `law` otherwise
    pub fn function_name(&self) -> String {
        if self.material.is_empty() {
            self.law.clone()
        } else {
            format!("{}_{}", self.material, self.law)
        }
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name)
    }

    /// Output, inputs and parameters accept method calls
    fn is_method_target(&self, name: &str) -> bool {
        (!self.output.is_empty() && self.output == name)
            || self.inputs.contains(name)
            || self.is_parameter(name)
    }
}

pub struct MaterialPropertyDsl {
    base: DslBase,
    description: MaterialPropertyDescription,
}

fn keyword_table() -> KeywordTable<MaterialPropertyDsl> {
    let mut table = KeywordTable::new();
    table.register(";", MaterialPropertyDsl::treat_lonely_separator);
    table.register("@Material", MaterialPropertyDsl::treat_material);
    table.register("@Library", MaterialPropertyDsl::treat_library);
    table.register("@DSL", MaterialPropertyDsl::treat_parser);
    table.register("@Parser", MaterialPropertyDsl::treat_parser);
    table.register("@Law", MaterialPropertyDsl::treat_law);
    table.register("@Author", MaterialPropertyDsl::treat_author);
    table.register("@Date", MaterialPropertyDsl::treat_date);
    table.register("@Includes", MaterialPropertyDsl::treat_includes);
    table.register("@Sources", MaterialPropertyDsl::treat_sources);
    table.register("@StaticVar", MaterialPropertyDsl::treat_static_var);
    table.register("@StaticVariable", MaterialPropertyDsl::treat_static_var);
    table.register("@IntegerConstant", MaterialPropertyDsl::treat_integer_constant);
    table.register("@Parameter", MaterialPropertyDsl::treat_parameter);
    table.register("@Constant", MaterialPropertyDsl::treat_constant);
    table.register("@Description", MaterialPropertyDsl::treat_description);
    table.register("@Input", MaterialPropertyDsl::treat_input);
    table.register("@Output", MaterialPropertyDsl::treat_output);
    table.register("@Function", MaterialPropertyDsl::treat_function);
    table.register("@Import", MaterialPropertyDsl::treat_import);
    table.register("@Interface", MaterialPropertyDsl::treat_interface);
    table.register("@Bounds", MaterialPropertyDsl::treat_bounds);
    table.register("@PhysicalBounds", MaterialPropertyDsl::treat_physical_bounds);
    table
}

impl Dsl for MaterialPropertyDsl {
    fn base(&self) -> &DslBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DslBase {
        &mut self.base
    }

    fn keywords() -> &'static KeywordTable<Self> {
        static KEYWORDS: OnceLock<KeywordTable<MaterialPropertyDsl>> = OnceLock::new();
        KEYWORDS.get_or_init(keyword_table)
    }

    fn class_name(&self) -> &str {
        self.description.class_name()
    }

    fn add_static_variable(&mut self, variable: StaticVariableDescription) -> DslResult<()> {
        self.description.names.reserve(&variable.name, variable.line)?;
        self.description.static_variables.push(variable);
        Ok(())
    }

    fn treat_unknown_token(&mut self, token: &Token) -> DslResult<()> {
        if self.description.is_method_target(&token.value) {
            return self.treat_method(&token.value);
        }
        if token.value.starts_with('@') && self.base.tokens().check("[") {
            // no interface is available to treat interface specific keywords
            self.base.read_list("unknown keyword", "[", "]")?;
            return self.base.ignore_keyword(&token.value);
        }
        Err(DslError::UnknownKeyword {
            token: token.value.clone(),
            line: token.line,
        })
    }
}

impl MaterialPropertyDsl {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            base: DslBase::new(config),
            description: MaterialPropertyDescription::default(),
        }
    }

    pub fn name() -> &'static str {
        "MaterialLaw"
    }

    pub fn description(&self) -> &MaterialPropertyDescription {
        &self.description
    }

    pub fn into_description(self) -> MaterialPropertyDescription {
        let Self { base, mut description } = self;
        description.file_description = base.file_description;
        description.includes = base.includes;
        description.sources = base.sources;
        description
    }

    fn read_identifier(&mut self, handler: &str, what: &str) -> DslResult<(String, usize)> {
        let line = self.base.current_line();
        let name = self.base.read_only_one_token(handler)?;
        if !is_valid_identifier(&name, true) {
            return Err(DslError::malformed(handler, format!("invalid {what} '{name}'"), line));
        }
        Ok((name, line))
    }

    fn treat_material(&mut self) -> DslResult<()> {
        if !self.description.material.is_empty() {
            return Err(DslError::state("material name already defined", Some(self.base.current_line())));
        }
        self.description.material = self.read_identifier("@Material", "material name")?.0;
        Ok(())
    }

    fn treat_library(&mut self) -> DslResult<()> {
        if !self.description.library.is_empty() {
            return Err(DslError::state("library name already defined", Some(self.base.current_line())));
        }
        self.description.library = self.read_identifier("@Library", "library name")?.0;
        Ok(())
    }

    fn treat_law(&mut self) -> DslResult<()> {
        if !self.description.law.is_empty() {
            return Err(DslError::state("law name has already been declared", Some(self.base.current_line())));
        }
        self.description.law = self.read_identifier("@Law", "law name")?.0;
        Ok(())
    }

    fn treat_interface(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Interface";
        let token = self.base.current_token(HANDLER, "expected interface name")?;
        self.base.advance();
        self.base.read_specified_token(HANDLER, ";")?;
        let name = match token.flag {
            TokenFlag::String => unquote(&token.value).to_string(),
            _ => token.value,
        };
        self.description.interfaces.insert(name);
        Ok(())
    }

    /// `@Constant name value;`
    fn treat_constant(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Constant";
        let name = self.base.current_token(HANDLER, "cannot read variable name")?;
        if !is_valid_identifier(&name.value, true) {
            return Err(DslError::malformed(
                HANDLER,
                format!("constant name '{}' is not valid", name.value),
                name.line,
            ));
        }
        self.base.advance();
        let value = self.base.read_initialisation_value::<f64>(HANDLER, true)?;
        self.base.read_specified_token(HANDLER, ";")?;
        let value = value.ok_or_else(|| {
            DslError::malformed(HANDLER, format!("no value given for '{}'", name.value), name.line)
        })?;
        self.add_static_variable(StaticVariableDescription::new(
            "real",
            &name.value,
            name.line,
            StaticValue::Real(value),
        ))
    }

    /// `@Parameter name [= value];`
    fn treat_parameter(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Parameter";
        let name = self.base.current_token(HANDLER, "expected parameter name")?;
        if !is_valid_identifier(&name.value, true) {
            return Err(DslError::malformed(
                HANDLER,
                format!("parameter name '{}' is not valid", name.value),
                name.line,
            ));
        }
        self.base.advance();
        let value = self.base.read_initialisation_value::<f64>(HANDLER, false)?;
        self.base.read_specified_token(HANDLER, ";")?;
        self.description.names.reserve(&name.value, name.line)?;
        if let Some(value) = value {
            self.description
                .parameter_default_values
                .insert(name.value.clone(), value);
        }
        self.description.parameters.push(name.value);
        Ok(())
    }

    fn treat_input(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Input";
        let inputs = self.base.read_var_list(HANDLER, "real", false)?;
        for (index, input) in inputs.iter().enumerate() {
            self.description.names.check_name(&input.name, input.line)?;
            if inputs[..index].iter().any(|other| other.name == input.name) {
                return Err(DslError::collision(&input.name, "name already reserved", input.line));
            }
        }
        for input in inputs {
            self.description.names.reserve_unchecked(&input.name);
            self.description.inputs.push(input);
        }
        Ok(())
    }

    fn treat_output(&mut self) -> DslResult<()> {
        if !self.description.output.is_empty() {
            return Err(DslError::state("output already defined", Some(self.base.current_line())));
        }
        let (output, line) = self.read_identifier("@Output", "output name")?;
        self.description.names.reserve(&output, line)?;
        self.description.output = output;
        Ok(())
    }

    fn treat_bounds(&mut self) -> DslResult<()> {
        self.register_bounds("@Bounds", false)
    }

    fn treat_physical_bounds(&mut self) -> DslResult<()> {
        self.register_bounds("@PhysicalBounds", true)
    }

    /// `name in [l:u];` on an input
    fn register_bounds(&mut self, handler: &str, physical: bool) -> DslResult<()> {
        let variable = self.base.current_token(handler, "expected a variable name")?;
        if !self.description.inputs.contains(&variable.value) {
            return Err(DslError::malformed(
                handler,
                format!("'{}' is not an input", variable.value),
                variable.line,
            ));
        }
        self.base.advance();
        let (lower, upper) = self.base.read_bounds(handler)?;
        let bounds = BoundsDescription::new(&variable.value, lower, upper, variable.line)
            .ok_or_else(|| DslError::malformed(handler, "both bounds are infinite", variable.line))?;
        let container = if physical {
            &mut self.description.physical_bounds
        } else {
            &mut self.description.bounds
        };
        insert_bounds(container, bounds)
    }

    /// `variable.method(argument);`
    fn treat_method(&mut self, variable: &str) -> DslResult<()> {
        const HANDLER: &str = "treat_method";
        self.base.read_specified_token(HANDLER, ".")?;
        let method = self.base.current_token(HANDLER, "expected method name")?;
        if !matches!(
            method.value.as_str(),
            "setGlossaryName" | "setEntryName" | "setDefaultValue"
        ) {
            return Err(DslError::malformed(
                HANDLER,
                format!(
                    "unknown method '{}', valid methods are 'setGlossaryName', \
                     'setEntryName' and 'setDefaultValue'",
                    method.value
                ),
                method.line,
            ));
        }
        self.base.advance();
        self.base.read_specified_token(HANDLER, "(")?;
        match method.value.as_str() {
            "setGlossaryName" => {
                let glossary = self.base.read_string(HANDLER)?;
                self.description
                    .names
                    .set_glossary_name(variable, &glossary, method.line)?;
            }
            "setEntryName" => {
                let entry = self.base.read_string(HANDLER)?;
                self.description.names.set_entry_name(variable, &entry, method.line)?;
            }
            _ => {
                if !self.description.is_parameter(variable) {
                    return Err(DslError::malformed(
                        HANDLER,
                        "method setDefaultValue is reserved for parameters",
                        method.line,
                    ));
                }
                let value = self.base.read_double(HANDLER)?;
                if self.description.parameter_default_values.contains_key(variable) {
                    return Err(DslError::state(
                        format!("default value already defined for variable '{variable}'"),
                        Some(method.line),
                    ));
                }
                self.description
                    .parameter_default_values
                    .insert(variable.to_string(), value);
            }
        }
        self.base.read_specified_token(HANDLER, ")")?;
        self.base.read_specified_token(HANDLER, ";")
    }

    /// `@Function{...}`: copied with one space between words, assignments
    /// to the output tracked, assignments to inputs rejected
    fn treat_function(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Function";
        if !self.description.function.body.is_empty() {
            return Err(DslError::state("function already defined", Some(self.base.current_line())));
        }
        if self.description.output.is_empty() {
            self.description.names.reserve("res", self.base.current_line())?;
            self.description.output = "res".to_string();
        }
        let line = self.base.current_line();
        self.base.read_specified_token(HANDLER, "{")?;
        let first = self.base.current_token(HANDLER, "expected body of function")?;
        if first.value == "}" {
            return Err(DslError::malformed(HANDLER, "function is empty", first.line));
        }

        let emit_line_markers = self.base.preferences.emit_line_directives();
        let file_name = self.base.file_description.file_name.clone();
        let line_marker = |line: usize| format!("#line {line} \"{file_name}\"\n");

        let mut body = String::new();
        if emit_line_markers {
            body.push_str(&line_marker(first.line));
        }
        let mut current_line = first.line;
        let mut new_line = true;
        let mut new_instruction = true;
        let mut opened_brackets = 1usize;
        let mut opened_parenthesis = 0usize;
        let mut modified = false;
        loop {
            let token = self
                .base
                .current_token(HANDLER, "unexpected end of file while reading body of function")?;
            self.base.advance();
            if token.value == "}" && opened_brackets == 1 {
                break;
            }
            if token.line != current_line {
                current_line = token.line;
                body.push('\n');
                if emit_line_markers {
                    body.push_str(&line_marker(current_line));
                }
                new_line = true;
            }
            match token.value.as_str() {
                "{" => {
                    opened_brackets += 1;
                    if opened_brackets > MAX_BLOCK_NESTING {
                        return Err(DslError::malformed(HANDLER, "too many nested blocks", token.line));
                    }
                    body.push('{');
                    new_instruction = true;
                }
                "}" => {
                    opened_brackets -= 1;
                    body.push('}');
                }
                "(" => {
                    opened_parenthesis += 1;
                    body.push('(');
                }
                ")" => {
                    if opened_parenthesis == 0 {
                        return Err(DslError::malformed(HANDLER, "unbalanced parenthesis", token.line));
                    }
                    opened_parenthesis -= 1;
                    body.push(')');
                }
                ";" => {
                    body.push(';');
                    new_instruction = true;
                }
                word => {
                    if !new_line && !body.ends_with('(') {
                        body.push(' ');
                    }
                    let is_variable =
                        word == self.description.output || self.description.inputs.contains(word);
                    let operator = self
                        .base
                        .current()
                        .filter(|next| ASSIGNMENT_OPERATORS.contains(&next.value.as_str()))
                        .map(|next| next.value.clone());
                    match operator {
                        Some(operator) if is_variable && new_instruction => {
                            if word != self.description.output {
                                return Err(DslError::malformed(
                                    HANDLER,
                                    format!("trying to modify variable '{word}'"),
                                    token.line,
                                ));
                            }
                            modified = true;
                            body.push_str(word);
                            body.push(' ');
                            body.push_str(&operator);
                            self.base.advance();
                        }
                        _ => body.push_str(word),
                    }
                    new_instruction = false;
                }
            }
            new_line = false;
        }
        if opened_parenthesis != 0 {
            return Err(DslError::malformed(HANDLER, "unbalanced parenthesis", current_line));
        }
        if !modified {
            return Err(DslError::malformed(HANDLER, "function does not modify output", line));
        }
        self.description.function = LawFunction {
            body,
            line,
            modified,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::DslPreferences;
    use crate::symbols::BoundsKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn dsl() -> MaterialPropertyDsl {
        let mut dsl = MaterialPropertyDsl::new(&RuntimeConfig::default());
        dsl.base.preferences = DslPreferences {
            register_line_directives: true,
            pedantic: false,
            debug_mode: true,
        };
        dsl
    }

    fn analyse(source: &str) -> DslResult<MaterialPropertyDescription> {
        let mut dsl = dsl();
        dsl.analyse_string(source)?;
        Ok(dsl.into_description())
    }

    #[test]
    fn test_simple_law() {
        let description = analyse(
            "@Law MyLaw;\n@Output stress;\n@Input strain,E;\n@Function{\n  stress = E*strain;\n}\n",
        )
        .unwrap();
        assert_eq!(description.law, "MyLaw");
        assert_eq!(description.class_name(), "MyLaw");
        assert_eq!(description.output, "stress");
        assert_eq!(description.inputs.names(), vec!["strain", "E"]);
        assert!(description.inputs.iter().all(|i| i.type_name == "real"));
        assert!(description.function.modified);
        assert_eq!(description.function.body, "stress = E * strain;");
        assert_eq!(description.function.line, 4);
        assert_eq!(description.file_description.file_name, "user defined string");
    }

    #[test]
    fn test_function_must_modify_output() {
        let error = analyse("@Law MyLaw;\n@Output stress;\n@Input strain,E;\n@Function{ E*strain; }")
            .unwrap_err();
        assert_matches!(&error, DslError::Keyword { keyword, .. } if keyword == "@Function");
        assert_matches!(
            error.root_cause(),
            DslError::MalformedConstruct { message, .. } if message == "function does not modify output"
        );
    }

    #[test]
    fn test_function_errors() {
        let modify_input = analyse("@Output y;\n@Input x;\n@Function{ x = 2; y = x; }").unwrap_err();
        assert_matches!(
            modify_input.root_cause(),
            DslError::MalformedConstruct { message, .. } if message.contains("'x'")
        );
        let parenthesis = analyse("@Output y;\n@Function{ y = 2); }").unwrap_err();
        assert_matches!(
            parenthesis.root_cause(),
            DslError::MalformedConstruct { message, .. } if message == "unbalanced parenthesis"
        );
        let unterminated = analyse("@Output y;\n@Function{ y = 2;").unwrap_err();
        assert_matches!(unterminated.root_cause(), DslError::UnexpectedEndOfFile { .. });
        let empty = analyse("@Output y;\n@Function{}").unwrap_err();
        assert_matches!(empty.root_cause(), DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_default_output_and_line_markers() {
        let mut dsl = MaterialPropertyDsl::new(&RuntimeConfig::default());
        dsl.base.preferences.debug_mode = false;
        dsl.base.preferences.register_line_directives = true;
        dsl.analyse_string("@Input x;\n@Function{\n  res = 2 * x;\n  if(x > 1){\n    res += 1;\n  }\n}")
            .unwrap();
        let description = dsl.into_description();
        assert_eq!(description.output, "res");
        assert_eq!(
            description.function.body,
            "#line 3 \"user defined string\"\nres = 2 * x;\n\
             #line 4 \"user defined string\"\nif(x > 1){\n\
             #line 5 \"user defined string\"\nres += 1;\n\
             #line 6 \"user defined string\"\n}"
        );
    }

    #[test]
    fn test_function_name() {
        let description = analyse("@Material Steel;\n@Law YoungModulus;\n@Output E;\n@Function{ E = 1; }")
            .unwrap();
        assert_eq!(description.function_name(), "Steel_YoungModulus");
        assert_eq!(description.class_name(), "YoungModulus");
    }

    #[test]
    fn test_bounds() {
        let description = analyse(
            "@Input x, y, z;\n@Bounds x in [0:1];\n@Bounds y in ]*:2];\n@PhysicalBounds z in [0:*[;",
        )
        .unwrap();
        assert_eq!(description.bounds.len(), 2);
        assert_eq!(description.bounds[0].kind, BoundsKind::LowerAndUpper);
        assert_eq!(description.bounds[1].kind, BoundsKind::Upper);
        assert_eq!(description.physical_bounds[0].kind, BoundsKind::Lower);
    }

    #[test]
    fn test_bounds_declared_twice() {
        let error = analyse("@Input x;\n@Bounds x in [0:1];\n@Bounds x in [0:1];").unwrap_err();
        assert_matches!(&error, DslError::Keyword { line: 3, .. });
        assert_matches!(
            error.root_cause(),
            DslError::State { message, .. } if message.contains("'x' already declared")
        );
        let unknown = analyse("@Bounds x in [0:1];").unwrap_err();
        assert_matches!(unknown.root_cause(), DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_external_names() {
        let description = analyse(
            "@Output E;\n@Input x, y;\nx.setGlossaryName(\"Strain\");\ny.setEntryName(\"MyEntry\");",
        )
        .unwrap();
        assert_eq!(description.names.external_name("x"), "Strain");
        assert_eq!(description.names.external_name("y"), "MyEntry");

        let error = analyse(
            "@Output E;\n@Input x, y;\nx.setGlossaryName(\"Strain\");\ny.setEntryName(\"Strain\");",
        )
        .unwrap_err();
        assert_matches!(error, DslError::NameCollision { line: 4, .. });
    }

    #[test]
    fn test_parameters_and_constants() {
        let description = analyse(
            "@Parameter A = 2;\n@Parameter B;\nB.setDefaultValue(-3.5);\n@Constant C 4.;\n@StaticVar int N = 3;",
        )
        .unwrap();
        assert_eq!(description.parameters, vec!["A", "B"]);
        assert_eq!(description.parameter_default_values["A"], 2.0);
        assert_eq!(description.parameter_default_values["B"], -3.5);
        assert_eq!(description.static_variables[0].value, StaticValue::Real(4.0));
        assert_eq!(description.static_variables[1].value, StaticValue::Integer(3));

        let twice = analyse("@Parameter A = 2;\nA.setDefaultValue(3);").unwrap_err();
        assert_matches!(twice, DslError::State { .. });
        let not_a_parameter = analyse("@Input x;\nx.setDefaultValue(3);").unwrap_err();
        assert_matches!(not_a_parameter, DslError::MalformedConstruct { .. });
    }

    #[test]
    fn test_name_collisions() {
        let duplicate = analyse("@Input x;\n@Parameter x;").unwrap_err();
        assert_matches!(duplicate.root_cause(), DslError::NameCollision { .. });
        let reserved = analyse("@Input params;").unwrap_err();
        assert_matches!(reserved.root_cause(), DslError::NameCollision { .. });
        let in_list = analyse("@Input x, x;").unwrap_err();
        assert_matches!(in_list.root_cause(), DslError::NameCollision { .. });
        let output_twice = analyse("@Output a;\n@Output b;").unwrap_err();
        assert_matches!(output_twice.root_cause(), DslError::State { .. });
    }

    #[test]
    fn test_unknown_keywords() {
        assert_matches!(
            analyse("@Law A;\n@Unknown;"),
            Err(DslError::UnknownKeyword { line: 2, .. })
        );
        let description = analyse("@Interface c;\n@CastemOption [castem] { a; };\n@Law A;").unwrap();
        assert_eq!(description.law, "A");
        assert!(description.interfaces.contains("c"));
    }

    #[test]
    fn test_shared_keywords() {
        let description = analyse(
            "@DSL MaterialLaw;\n@Author Jane Doe;\n@Date 2024;\n@Description{ A law }\n\
             @Includes{\n#include <cmath>\n}\n@IntegerConstant N = 2;\n;",
        )
        .unwrap();
        assert_eq!(description.file_description.author_name, "Jane Doe");
        assert_eq!(description.file_description.date, "2024");
        assert_eq!(description.file_description.description, "* A law ");
        assert_eq!(description.includes, "#include <cmath>\n");
    }

    #[test]
    fn test_import() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inputs.mfront"), "@Input x, y;\n").unwrap();
        let main = dir.path().join("law.mfront");
        fs::write(
            &main,
            "@Law L;\n@Output z;\n@Import \"inputs.mfront\";\n@Function{ z = x + y; }\n",
        )
        .unwrap();

        let mut dsl = dsl();
        dsl.analyse_file(&main).unwrap();
        let description = dsl.into_description();
        assert_eq!(description.inputs.names(), vec!["x", "y"]);
        assert_eq!(description.file_description.file_name, main.display().to_string());
    }

    #[test]
    fn test_import_cycle_is_detected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.mfront"), "@Import \"b.mfront\";\n").unwrap();
        fs::write(dir.path().join("b.mfront"), "@Import \"a.mfront\";\n").unwrap();

        let mut dsl = dsl();
        let error = dsl.analyse_file(&dir.path().join("a.mfront")).unwrap_err();
        assert_matches!(error.root_cause(), DslError::ImportCycle { .. });
    }

    #[test]
    fn test_import_of_missing_file() {
        let error = analyse("@Import \"missing.mfront\";").unwrap_err();
        assert_matches!(error.root_cause(), DslError::FileProcessing(_));
    }
}
