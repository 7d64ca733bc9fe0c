//! Token cursor and reader primitives shared by every DSL
//!
//! Readers consume exactly the tokens of the construct they read and fail
//! fast, with the line of the offending token, on anything unexpected.

use crate::code_block::CodeBlock;
use crate::config::compile_time::dsl::{MAX_ARRAY_SIZE, MAX_BLOCK_NESTING};
use crate::config::runtime::{DslPreferences, RuntimeConfig};
use crate::file_processor::FileProcessor;
use crate::lexical::{is_valid_identifier, strip_comments, TokenizerOptions};
use crate::logging::codes;
use crate::symbols::VariableDescription;
use crate::syntax::error::{DslError, DslResult};
use crate::syntax::integer_evaluator;
use crate::tokens::{Token, TokenFlag, TokenStream};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::str::FromStr;

/// File name used for in-memory sources
pub const USER_DEFINED_STRING: &str = "user defined string";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileDescription {
    pub file_name: String,
    pub author_name: String,
    pub date: String,
    pub description: String,
}

/// How `read_next_block` copies a block
#[derive(Debug, Clone)]
pub struct CodeBlockParserOptions {
    pub members: BTreeSet<String>,
    pub static_members: BTreeSet<String>,
    pub delim_open: String,
    pub delim_close: String,
    /// Prefix static members with `ClassName::`
    pub qualify_static_members: bool,
    /// Prefix members with `this->`
    pub qualify_members: bool,
    /// Accept `;` outside nested blocks
    pub allow_semicolon: bool,
    /// Emit `#line` markers unless in debug mode
    pub register_line: bool,
}

impl Default for CodeBlockParserOptions {
    fn default() -> Self {
        Self {
            members: BTreeSet::new(),
            static_members: BTreeSet::new(),
            delim_open: "{".to_string(),
            delim_close: "}".to_string(),
            qualify_static_members: false,
            qualify_members: false,
            allow_semicolon: true,
            register_line: true,
        }
    }
}

/// Remove the delimiting quotes of a string or character token
pub fn unquote(value: &str) -> &str {
    if value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn append_line(buffer: &mut String, text: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(text);
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Values produced by the numeric readers
pub trait Numeric: FromStr {
    /// `false` for values no source literal stands for, such as `inf`
    fn is_finite_value(&self) -> bool {
        true
    }
}

impl Numeric for f64 {
    fn is_finite_value(&self) -> bool {
        self.is_finite()
    }
}

impl Numeric for i32 {}
impl Numeric for i64 {}
impl Numeric for u16 {}
impl Numeric for u32 {}

fn parse_numeric<T: Numeric>(literal: &str) -> Option<T> {
    literal.parse::<T>().ok().filter(Numeric::is_finite_value)
}

#[derive(Debug, Clone)]
pub struct DslBase {
    tokens: TokenStream,
    /// Documentation of the keyword being treated
    pub current_comment: String,
    pub file_description: FileDescription,
    pub includes: String,
    pub sources: String,
    integer_constants: BTreeMap<String, i64>,
    /// Files being analysed, outermost first
    pub(crate) import_stack: Vec<PathBuf>,
    /// Directories searched for imported files
    pub search_paths: Vec<PathBuf>,
    pub preferences: DslPreferences,
    pub tokenizer_options: TokenizerOptions,
    pub file_processor: FileProcessor,
}

impl DslBase {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            tokens: TokenStream::default(),
            current_comment: String::new(),
            file_description: FileDescription::default(),
            includes: String::new(),
            sources: String::new(),
            integer_constants: BTreeMap::new(),
            import_stack: Vec::new(),
            search_paths: Vec::new(),
            preferences: config.dsl.clone(),
            tokenizer_options: TokenizerOptions::from_preferences(&config.tokenizer),
            file_processor: FileProcessor::from_preferences(&config.file_processor),
        }
    }

    // === CURSOR ===

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Install freshly tokenized source, comments stripped
    pub(crate) fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = TokenStream::new(strip_comments(tokens));
    }

    /// Install `tokens`, returning the stream in use
    pub(crate) fn swap_tokens(&mut self, tokens: TokenStream) -> TokenStream {
        std::mem::replace(&mut self.tokens, tokens)
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.current()
    }

    pub fn is_at_end(&self) -> bool {
        self.tokens.is_at_end()
    }

    pub fn advance(&mut self) {
        self.tokens.advance();
    }

    pub fn current_line(&self) -> usize {
        self.tokens.current_line()
    }

    fn end_of_file(&self, handler: &str, message: &str) -> DslError {
        match self.tokens.previous() {
            Some(last) => DslError::unexpected_end_of_file(
                handler,
                format!("{message}, after line {}", last.line),
            ),
            None => DslError::unexpected_end_of_file(handler, message),
        }
    }

    pub fn check_not_end_of_file(&self, handler: &str, message: &str) -> DslResult<()> {
        if self.tokens.is_at_end() {
            Err(self.end_of_file(handler, message))
        } else {
            Ok(())
        }
    }

    /// Token under the cursor, or an end of file error
    pub fn current_token(&self, handler: &str, message: &str) -> DslResult<Token> {
        self.tokens
            .current()
            .cloned()
            .ok_or_else(|| self.end_of_file(handler, message))
    }

    // === SIMPLE READERS ===

    pub fn read_specified_token(&mut self, handler: &str, expected: &str) -> DslResult<()> {
        let token = self.current_token(handler, &format!("expected '{expected}'"))?;
        if token.value != expected {
            return Err(DslError::malformed(
                handler,
                format!("expected '{expected}', read '{}'", token.value),
                token.line,
            ));
        }
        self.advance();
        Ok(())
    }

    pub fn read_string(&mut self, handler: &str) -> DslResult<String> {
        let token = self.current_token(handler, "expected a string")?;
        if token.flag != TokenFlag::String {
            return Err(DslError::malformed(
                handler,
                format!("expected a string, read '{}'", token.value),
                token.line,
            ));
        }
        self.advance();
        Ok(unquote(&token.value).to_string())
    }

    /// One value, a detached sign being merged with the number that follows
    pub fn read_value<T: Numeric>(&mut self, handler: &str, what: &str) -> DslResult<T> {
        let token = self.current_token(handler, &format!("expected {what}"))?;
        self.advance();
        let mut literal = token.value;
        if literal == "-" || literal == "+" {
            let number = self.current_token(handler, &format!("expected {what}"))?;
            self.advance();
            literal.push_str(&number.value);
        }
        parse_numeric(&literal).ok_or_else(|| {
            DslError::malformed(handler, format!("failed to read {what} (read '{literal}')"), token.line)
        })
    }

    pub fn read_double(&mut self, handler: &str) -> DslResult<f64> {
        self.read_value(handler, "a floating point value")
    }

    pub fn read_int(&mut self, handler: &str) -> DslResult<i32> {
        self.read_value(handler, "an integer value")
    }

    pub fn read_unsigned_int(&mut self, handler: &str) -> DslResult<u32> {
        self.read_value(handler, "an unsigned integer value")
    }

    pub fn read_unsigned_short(&mut self, handler: &str) -> DslResult<u16> {
        self.read_value(handler, "an unsigned short value")
    }

    pub fn read_boolean_value(&mut self, handler: &str) -> DslResult<bool> {
        let token = self.current_token(handler, "expected a boolean value")?;
        let value = match token.value.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(DslError::malformed(
                    handler,
                    format!("expected 'true' or 'false', read '{other}'"),
                    token.line,
                ))
            }
        };
        self.advance();
        Ok(value)
    }

    /// A single word followed by `;`
    pub fn read_only_one_token(&mut self, handler: &str) -> DslResult<String> {
        let token = self.current_token(handler, "expected a word")?;
        if token.value == ";" {
            return Err(DslError::malformed(handler, "no word read", token.line));
        }
        self.advance();
        self.read_specified_token(handler, ";")?;
        Ok(token.value)
    }

    /// Words up to the next `;`, joined by single spaces
    pub fn read_until_end_of_instruction(&mut self, handler: &str) -> DslResult<String> {
        let mut words = Vec::new();
        loop {
            let token = self.current_token(handler, "expected ';'")?;
            self.advance();
            if token.value == ";" {
                break;
            }
            if token.value.starts_with('@') {
                return Err(DslError::malformed(
                    handler,
                    format!("unexpected keyword '{}', a ';' is probably missing", token.value),
                    token.line,
                ));
            }
            if token.flag == TokenFlag::String {
                words.push(unquote(&token.value).to_string());
            } else {
                words.push(token.value);
            }
        }
        Ok(words.join(" "))
    }

    // === LISTS ===

    /// Items of `begin item, item, ... end`; nothing is read if `begin` is absent
    pub fn read_list(&mut self, handler: &str, begin: &str, end: &str) -> DslResult<Vec<Token>> {
        let mut items = Vec::new();
        self.check_not_end_of_file(handler, &format!("expected '{begin}'"))?;
        if !self.tokens.check(begin) {
            return Ok(items);
        }
        self.advance();
        loop {
            let token = self.current_token(handler, &format!("expected '{end}'"))?;
            self.advance();
            if token.value == end {
                return Ok(items);
            }
            items.push(token);
            let separator = self.current_token(handler, &format!("expected '{end}'"))?;
            if separator.value == "," {
                self.advance();
                let next = self.current_token(handler, &format!("expected '{end}'"))?;
                if next.value == end {
                    return Err(DslError::malformed(handler, "expected a new item", next.line));
                }
            } else if separator.value != end {
                return Err(DslError::malformed(
                    handler,
                    format!("expected ',' or '{end}', read '{}'", separator.value),
                    separator.line,
                ));
            }
        }
    }

    pub fn read_array_of_string(&mut self, handler: &str) -> DslResult<Vec<String>> {
        self.read_list(handler, "{", "}")?
            .into_iter()
            .map(|token| {
                if token.flag == TokenFlag::String {
                    Ok(unquote(&token.value).to_string())
                } else {
                    Err(DslError::malformed(
                        handler,
                        format!("expected a string, read '{}'", token.value),
                        token.line,
                    ))
                }
            })
            .collect()
    }

    pub fn read_string_or_array_of_string(&mut self, handler: &str) -> DslResult<Vec<String>> {
        self.check_not_end_of_file(handler, "expected a string or '{'")?;
        if self.tokens.check("{") {
            self.read_array_of_string(handler)
        } else {
            Ok(vec![self.read_string(handler)?])
        }
    }

    pub fn read_array_of_double(&mut self, handler: &str) -> DslResult<Vec<f64>> {
        self.read_list(handler, "{", "}")?
            .into_iter()
            .map(|token| {
                parse_numeric::<f64>(&token.value).ok_or_else(|| {
                    DslError::malformed(
                        handler,
                        format!("failed to read a floating point value (read '{}')", token.value),
                        token.line,
                    )
                })
            })
            .collect()
    }

    // === TYPES AND VARIABLES ===

    /// `a::b<c, 3>`; `>>` closes two template argument lists
    pub fn read_type(&mut self, handler: &str) -> DslResult<String> {
        let line = self.current_line();
        let (type_name, balanced) = self.read_type_impl(handler)?;
        if !balanced {
            return Err(DslError::malformed(handler, "unbalanced '>'", line));
        }
        Ok(type_name)
    }

    /// The flag is false when a trailing `>>` also closed the enclosing list
    fn read_type_impl(&mut self, handler: &str) -> DslResult<(String, bool)> {
        let token = self.current_token(handler, "expected a type")?;
        if !is_valid_identifier(&token.value, false) {
            return Err(DslError::malformed(
                handler,
                format!("given type '{}' is not valid", token.value),
                token.line,
            ));
        }
        self.advance();
        let mut type_name = token.value;
        while self.tokens.check("::") {
            self.advance();
            let part = self.current_token(handler, "expected a type")?;
            if !is_valid_identifier(&part.value, false) {
                return Err(DslError::malformed(
                    handler,
                    format!("given type '{}' is not valid", part.value),
                    part.line,
                ));
            }
            self.advance();
            type_name.push_str("::");
            type_name.push_str(&part.value);
        }
        if !self.tokens.check("<") {
            return Ok((type_name, true));
        }
        self.advance();
        type_name.push('<');
        loop {
            let argument = self.current_token(handler, "expected a template argument")?;
            if is_integer(&argument.value) {
                self.advance();
                type_name.push_str(&argument.value);
            } else {
                let (nested, balanced) = self.read_type_impl(handler)?;
                type_name.push_str(&nested);
                if !balanced {
                    type_name.push('>');
                    return Ok((type_name, true));
                }
            }
            if self.tokens.check(",") {
                self.advance();
                type_name.push(',');
            } else {
                break;
            }
        }
        if self.tokens.check(">>") {
            self.advance();
            type_name.push('>');
            return Ok((type_name, false));
        }
        self.read_specified_token(handler, ">")?;
        type_name.push('>');
        Ok((type_name, true))
    }

    pub fn register_integer_constant(&mut self, name: &str, value: i64, line: usize) -> DslResult<()> {
        if self.integer_constants.contains_key(name) {
            return Err(DslError::collision(name, "integer constant already defined", line));
        }
        self.integer_constants.insert(name.to_string(), value);
        Ok(())
    }

    pub fn integer_constants(&self) -> &BTreeMap<String, i64> {
        &self.integer_constants
    }

    /// Optional `[ integer-expression ]` after a variable name
    pub fn read_array_size(&mut self, handler: &str, name: &str, allow_array: bool) -> DslResult<u32> {
        let open = match self.tokens.current() {
            Some(token) if token.value == "[" => token.line,
            _ => return Ok(1),
        };
        if !allow_array {
            return Err(DslError::malformed(
                handler,
                format!("variable '{name}' can't be declared an array"),
                open,
            ));
        }
        self.advance();
        let mut expression = Vec::new();
        loop {
            let token = self.current_token(handler, "expected ']'")?;
            self.advance();
            if token.value == "]" {
                break;
            }
            if token.flag != TokenFlag::Standard || token.value == ";" {
                return Err(DslError::malformed(
                    handler,
                    format!("invalid array size for '{name}'"),
                    token.line,
                ));
            }
            expression.push(token.value);
        }
        if expression.is_empty() {
            return Err(DslError::malformed(handler, format!("empty array size for '{name}'"), open));
        }
        let size = integer_evaluator::evaluate(&expression, &self.integer_constants).map_err(
            |message| DslError::InvalidExpression {
                expression: expression.join(" "),
                message,
                line: open,
            },
        )?;
        if size <= 0 || size > i64::from(MAX_ARRAY_SIZE) {
            return Err(DslError::malformed(
                handler,
                format!("invalid array size for '{name}' ({size})"),
                open,
            ));
        }
        Ok(size as u32)
    }

    /// `name [ '[' size ']' ] (',' name ...)* ';'`
    ///
    /// Each variable gets the keyword documentation followed by its own. The
    /// documentation of the closing `;` goes to every variable when none of
    /// them is documented individually.
    pub fn read_var_list(
        &mut self,
        handler: &str,
        type_name: &str,
        allow_array: bool,
    ) -> DslResult<Vec<VariableDescription>> {
        let mut variables = Vec::new();
        let mut documented = false;
        let end_comment = loop {
            let token = self.current_token(handler, "expected ';'")?;
            if !is_valid_identifier(&token.value, true) {
                return Err(DslError::malformed(
                    handler,
                    format!("variable given is not valid (read '{}')", token.value),
                    token.line,
                ));
            }
            self.advance();
            let size = self.read_array_size(handler, &token.value, allow_array)?;
            let separator = self.current_token(handler, "expected ',' or ';'")?;
            self.advance();

            let mut variable = VariableDescription::new(type_name, &token.value, size, token.line);
            variable.description = self.current_comment.clone();
            match separator.value.as_str() {
                "," => {
                    for comment in [&token.comment, &separator.comment] {
                        if !comment.is_empty() {
                            documented = true;
                            append_line(&mut variable.description, comment);
                        }
                    }
                    variables.push(variable);
                }
                ";" => {
                    if token.has_comment() {
                        documented = true;
                        append_line(&mut variable.description, &token.comment);
                    }
                    variables.push(variable);
                    break separator.comment;
                }
                other => {
                    return Err(DslError::malformed(
                        handler,
                        format!("',' or ';' expected after '{}', read '{other}'", token.value),
                        separator.line,
                    ))
                }
            }
        };
        if !documented && !end_comment.is_empty() {
            for variable in &mut variables {
                if !variable.description.is_empty() {
                    variable.description.push(' ');
                }
                variable.description.push_str(&end_comment);
            }
        }
        Ok(variables)
    }

    /// `= v`, `{v}`, `(v)`; a bare value is accepted when the value is mandatory
    pub fn read_initialisation_value<T: Numeric>(
        &mut self,
        handler: &str,
        mandatory: bool,
    ) -> DslResult<Option<T>> {
        let token = self.current_token(handler, "expected an initialisation value")?;
        let close = match token.value.as_str() {
            "=" => None,
            "{" => Some("}"),
            "(" => Some(")"),
            _ if mandatory => return self.read_value(handler, "an initialisation value").map(Some),
            _ => return Ok(None),
        };
        self.advance();
        let value = self.read_value(handler, "an initialisation value")?;
        if let Some(close) = close {
            self.read_specified_token(handler, close)?;
        }
        Ok(Some(value))
    }

    /// `in [l:u];`, `in ]*:u];` or `in [l:*[;`
    pub fn read_bounds(&mut self, handler: &str) -> DslResult<(Option<f64>, Option<f64>)> {
        self.read_specified_token(handler, "in")?;
        let open = self.current_token(handler, "expected '[' or ']'")?;
        self.advance();
        let lower = match open.value.as_str() {
            "[" => Some(self.read_double(handler)?),
            "]" => {
                self.read_specified_token(handler, "*")?;
                None
            }
            other => {
                return Err(DslError::malformed(
                    handler,
                    format!("expected '[' or ']', read '{other}'"),
                    open.line,
                ))
            }
        };
        self.read_specified_token(handler, ":")?;
        let upper = if self.tokens.check("*") {
            self.advance();
            self.read_specified_token(handler, "[")?;
            None
        } else {
            let value = self.read_double(handler)?;
            self.read_specified_token(handler, "]")?;
            Some(value)
        };
        self.read_specified_token(handler, ";")?;
        match (lower, upper) {
            (None, None) => Err(DslError::malformed(
                handler,
                "at least one bound must be finite",
                open.line,
            )),
            (Some(l), Some(u)) if l > u => Err(DslError::malformed(
                handler,
                format!("lower bound ({l}) is greater than upper bound ({u})"),
                open.line,
            )),
            bounds => Ok(bounds),
        }
    }

    // === BLOCKS ===

    fn line_marker(&self, line: usize) -> String {
        format!("#line {line} \"{}\"\n", self.file_description.file_name)
    }

    /// Copy a delimited block, qualifying members and static members
    pub fn read_next_block(
        &mut self,
        options: &CodeBlockParserOptions,
        class_name: &str,
    ) -> DslResult<CodeBlock> {
        const HANDLER: &str = "read_next_block";
        let emit_line_markers = options.register_line && self.preferences.emit_line_directives();
        let mut block = CodeBlock {
            description: self.current_comment.clone(),
            ..CodeBlock::default()
        };

        self.read_specified_token(HANDLER, &options.delim_open)?;
        let first = self.current_token(HANDLER, &format!("expected '{}'", options.delim_close))?;
        if first.value == options.delim_close {
            self.advance();
            return Ok(block);
        }

        let mut code = String::new();
        if emit_line_markers {
            code.push_str(&self.line_marker(first.line));
        }
        let mut current_line = first.line;
        let mut opened = 0usize;
        loop {
            let token = match self.tokens.current() {
                Some(token) => token.clone(),
                None => {
                    return Err(self.end_of_file(
                        HANDLER,
                        &format!("expected the end of a block ({opened} nested block(s) opened)"),
                    ))
                }
            };
            if token.value == options.delim_close && opened == 0 {
                self.advance();
                break;
            }
            if token.line != current_line {
                current_line = token.line;
                code.push('\n');
                if emit_line_markers {
                    code.push_str(&self.line_marker(current_line));
                }
            }
            if token.value == ";" && !options.allow_semicolon && opened == 0 {
                return Err(DslError::malformed(
                    HANDLER,
                    "read ';' before the end of block",
                    token.line,
                ));
            }
            if token.has_comment() {
                append_line(&mut block.description, &token.comment);
            }

            let previous = self.tokens.previous().map_or("", |t| t.value.as_str());
            let after_member_access = matches!(previous, "->" | "." | "::");
            if options.static_members.contains(&token.value) {
                block.static_members.insert(token.value.clone());
                if options.qualify_static_members && !after_member_access {
                    code.push_str(class_name);
                    code.push_str("::");
                }
                code.push_str(&token.value);
            } else if options.members.contains(&token.value) {
                block.members.insert(token.value.clone());
                if options.qualify_members && !after_member_access {
                    if previous == "*" {
                        code.push_str(&format!("(this->{})", token.value));
                    } else {
                        code.push_str("this->");
                        code.push_str(&token.value);
                    }
                } else {
                    code.push_str(&token.value);
                }
            } else {
                code.push_str(&token.value);
            }

            if token.value == options.delim_open {
                opened += 1;
                if opened > MAX_BLOCK_NESTING {
                    return Err(DslError::malformed(HANDLER, "too many nested blocks", token.line));
                }
            } else if token.value == options.delim_close {
                opened -= 1;
            }
            if let Some(next) = self.tokens.peek() {
                let closes_block = opened == 0 && next.value == options.delim_close;
                let end = token.offset + token.width();
                if !closes_block && next.line == token.line && next.offset > end {
                    code.push_str(&" ".repeat(next.offset - end));
                }
            }
            self.advance();
        }
        block.code = code;
        Ok(block)
    }

    /// Body of `@Description{...}`, each source line starting with `* `
    pub fn read_description(&mut self, handler: &str) -> DslResult<String> {
        self.read_specified_token(handler, "{")?;
        let first = self.current_token(handler, "file ended before the end of description")?;
        let mut description = String::from("* ");
        let mut current_line = first.line;
        let mut opened = 1usize;
        loop {
            let token = self.current_token(handler, "file ended before the end of description")?;
            let escaped = self
                .tokens
                .previous()
                .map_or(false, |previous| previous.value.ends_with('\\'));
            if !escaped && token.value == "}" {
                if opened == 1 {
                    self.advance();
                    break;
                }
                opened -= 1;
            }
            if !escaped && token.value == "{" {
                opened += 1;
            }
            while current_line < token.line {
                description.push_str("\n* ");
                current_line += 1;
            }
            if token.flag == TokenFlag::String {
                description.push_str(unquote(&token.value));
            } else {
                description.push_str(&token.value);
            }
            description.push(' ');
            self.advance();
        }
        Ok(description)
    }

    /// Skip the arguments of `keyword`, up to a `;` or a whole `{...}` block
    pub fn ignore_keyword(&mut self, keyword: &str) -> DslResult<()> {
        let handler = "ignore_keyword";
        let message = format!("error while treating keyword '{keyword}'");
        loop {
            let token = self.current_token(handler, &message)?;
            if token.value == ";" {
                self.advance();
                return Ok(());
            }
            if token.value == "{" {
                break;
            }
            self.advance();
        }
        self.advance();
        let mut opened = 1usize;
        while opened != 0 {
            let token = self.current_token(handler, &message)?;
            match token.value.as_str() {
                "{" => opened += 1,
                "}" => opened -= 1,
                _ => {}
            }
            self.advance();
        }
        self.tokens.advance_if(";");
        Ok(())
    }

    /// `;` with nothing to terminate
    pub fn warn_lonely_separator(&self) {
        if !self.preferences.pedantic {
            return;
        }
        let line = self.tokens.previous().map_or(0, |t| t.line);
        crate::log_warning!(
            codes::warnings::LONELY_SEPARATOR,
            "extra ';'",
            line = line,
            "file" => self.file_description.file_name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_str;
    use assert_matches::assert_matches;

    fn base_for(source: &str) -> DslBase {
        let mut base = DslBase::new(&RuntimeConfig::default());
        base.preferences = DslPreferences {
            register_line_directives: true,
            pedantic: false,
            debug_mode: false,
        };
        base.file_description.file_name = "test.mfront".to_string();
        base.set_tokens(tokenize_str(source, &TokenizerOptions::default()).unwrap());
        base
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_readers() {
        let mut base = base_for(r#"; "text" -1.5 12 true @Law"#);
        base.read_specified_token("test", ";").unwrap();
        assert_eq!(base.read_string("test").unwrap(), "text");
        assert_eq!(base.read_double("test").unwrap(), -1.5);
        assert_eq!(base.read_unsigned_short("test").unwrap(), 12);
        assert!(base.read_boolean_value("test").unwrap());
        assert_matches!(
            base.read_specified_token("test", ";"),
            Err(DslError::MalformedConstruct { line: 1, .. })
        );
        base.advance();
        assert_matches!(base.read_string("test"), Err(DslError::UnexpectedEndOfFile { .. }));
    }

    #[test]
    fn test_read_until_end_of_instruction() {
        let mut base = base_for("@Author \"Thomas \"\n  \"Helfer\";\n@Date 12 / 10 / 2014;");
        base.advance();
        assert_eq!(base.read_until_end_of_instruction("@Author").unwrap(), "Thomas Helfer");
        base.advance();
        assert_eq!(base.read_until_end_of_instruction("@Date").unwrap(), "12 / 10 / 2014");

        let mut missing = base_for("@Author Thomas @Date 2014;");
        missing.advance();
        assert_matches!(
            missing.read_until_end_of_instruction("@Author"),
            Err(DslError::MalformedConstruct { .. })
        );
    }

    #[test]
    fn test_lists() {
        let mut base = base_for(r#"{"a", "b"} "c" {1, -2.5} {"d",}"#);
        assert_eq!(base.read_string_or_array_of_string("test").unwrap(), vec!["a", "b"]);
        assert_eq!(base.read_string_or_array_of_string("test").unwrap(), vec!["c"]);
        assert_eq!(base.read_array_of_double("test").unwrap(), vec![1.0, -2.5]);
        assert_matches!(
            base.read_array_of_string("test"),
            Err(DslError::MalformedConstruct { .. })
        );
    }

    #[test]
    fn test_read_type() {
        let mut base = base_for("tfel::math::tvector<3, real> x std::map<int, std::vector<int>> y");
        assert_eq!(base.read_type("test").unwrap(), "tfel::math::tvector<3,real>");
        base.advance();
        assert_eq!(base.read_type("test").unwrap(), "std::map<int,std::vector<int>>");
        assert_eq!(base.current().map(|t| t.value.as_str()), Some("y"));
    }

    #[test]
    fn test_read_var_list_with_array_sizes() {
        let mut base = base_for("a, b[N + 1], c[2*N];");
        base.register_integer_constant("N", 2, 1).unwrap();
        base.current_comment = "documented".to_string();
        let variables = base.read_var_list("test", "real", true).unwrap();
        let sizes: Vec<(&str, u32)> = variables.iter().map(|v| (v.name.as_str(), v.array_size)).collect();
        assert_eq!(sizes, vec![("a", 1), ("b", 3), ("c", 4)]);
        assert!(variables.iter().all(|v| v.description == "documented"));
        assert!(base.is_at_end());
    }

    #[test]
    fn test_read_var_list_errors() {
        let mut no_array = base_for("a[2];");
        assert_matches!(
            no_array.read_var_list("test", "real", false),
            Err(DslError::MalformedConstruct { .. })
        );
        let mut zero = base_for("a[0];");
        assert_matches!(zero.read_var_list("test", "real", true), Err(DslError::MalformedConstruct { .. }));
        let mut unknown = base_for("a[M];");
        assert_matches!(
            unknown.read_var_list("test", "real", true),
            Err(DslError::InvalidExpression { .. })
        );
        let mut unterminated = base_for("a, b");
        assert_matches!(
            unterminated.read_var_list("test", "real", true),
            Err(DslError::UnexpectedEndOfFile { .. })
        );
        let mut keyword = base_for("a, double;");
        assert_matches!(
            keyword.read_var_list("test", "real", true),
            Err(DslError::MalformedConstruct { .. })
        );
    }

    #[test]
    fn test_end_comment_goes_to_every_variable() {
        let mut base = base_for("a, b; //!< shared");
        let variables = base.read_var_list("test", "real", true).unwrap();
        assert!(variables.iter().all(|v| v.description == "shared"));
    }

    #[test]
    fn test_initialisation_values() {
        let mut base = base_for("= 2 {3} (4) ; 5");
        assert_eq!(base.read_initialisation_value::<i32>("test", false).unwrap(), Some(2));
        assert_eq!(base.read_initialisation_value::<i32>("test", false).unwrap(), Some(3));
        assert_eq!(base.read_initialisation_value::<f64>("test", true).unwrap(), Some(4.0));
        assert_eq!(base.read_initialisation_value::<f64>("test", false).unwrap(), None);
        base.advance();
        assert_eq!(base.read_initialisation_value::<i64>("test", true).unwrap(), Some(5));
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let mut base = base_for("inf NaN -infinity 1e999 2.5");
        for _ in 0..4 {
            assert_matches!(base.read_double("test"), Err(DslError::MalformedConstruct { .. }));
        }
        assert_eq!(base.read_double("test").unwrap(), 2.5);

        let mut array = base_for("{1, inf}");
        assert_matches!(array.read_array_of_double("test"), Err(DslError::MalformedConstruct { .. }));
    }

    #[test]
    fn test_read_bounds() {
        let mut base = base_for("in [0:1]; in ]*:2.5]; in [-1:*[; in ]*:*[;");
        assert_eq!(base.read_bounds("test").unwrap(), (Some(0.0), Some(1.0)));
        assert_eq!(base.read_bounds("test").unwrap(), (None, Some(2.5)));
        assert_eq!(base.read_bounds("test").unwrap(), (Some(-1.0), None));
        assert_matches!(base.read_bounds("test"), Err(DslError::MalformedConstruct { .. }));

        let mut reversed = base_for("in [2:1];");
        assert_matches!(reversed.read_bounds("test"), Err(DslError::MalformedConstruct { .. }));
    }

    #[test]
    fn test_next_block_qualifies_members() {
        let mut base = base_for("{\n  x = 2*y;\n  A + x + obj.x;\n}\nnext");
        let options = CodeBlockParserOptions {
            members: names(&["x", "y"]),
            static_members: names(&["A"]),
            qualify_members: true,
            qualify_static_members: true,
            register_line: false,
            ..CodeBlockParserOptions::default()
        };
        let block = base.read_next_block(&options, "Law").unwrap();
        assert_eq!(
            block.code,
            "this->x = 2*(this->y);\nLaw::A + this->x + obj.x;"
        );
        assert_eq!(block.members, names(&["x", "y"]));
        assert_eq!(block.static_members, names(&["A"]));
        assert_eq!(base.current().map(|t| t.value.as_str()), Some("next"));
    }

    #[test]
    fn test_next_block_line_markers_and_nesting() {
        let mut base = base_for("{\n  if(a){\n    b;\n  }\n}");
        let block = base
            .read_next_block(&CodeBlockParserOptions::default(), "Law")
            .unwrap();
        assert_eq!(
            block.code,
            "#line 2 \"test.mfront\"\nif(a){\n#line 3 \"test.mfront\"\nb;\n#line 4 \"test.mfront\"\n}"
        );

        let mut debug = base_for("{\n  a;\n  b;\n}");
        debug.preferences.debug_mode = true;
        let block = debug
            .read_next_block(&CodeBlockParserOptions::default(), "Law")
            .unwrap();
        assert_eq!(block.code, "a;\nb;");
    }

    #[test]
    fn test_next_block_semicolon_and_end_of_file() {
        let options = CodeBlockParserOptions {
            allow_semicolon: false,
            register_line: false,
            ..CodeBlockParserOptions::default()
        };
        let mut nested = base_for("{ f(){ a; } }");
        assert_eq!(nested.read_next_block(&options, "Law").unwrap().code, "f(){ a; }");

        let mut lonely = base_for("{ a; }");
        assert_matches!(
            lonely.read_next_block(&options, "Law"),
            Err(DslError::MalformedConstruct { .. })
        );

        let mut unterminated = base_for("{ a { b }");
        assert_matches!(
            unterminated.read_next_block(&CodeBlockParserOptions::default(), "Law"),
            Err(DslError::UnexpectedEndOfFile { .. })
        );

        let mut empty = base_for("{}");
        empty.current_comment = "doc".to_string();
        let block = empty.read_next_block(&options, "Law").unwrap();
        assert!(block.is_empty());
        assert_eq!(block.description, "doc");
    }

    #[test]
    fn test_ignore_keyword() {
        let mut base = base_for("a b; { c { d } e }; next { x");
        base.ignore_keyword("@A").unwrap();
        base.ignore_keyword("@B").unwrap();
        assert_eq!(base.current().map(|t| t.value.as_str()), Some("next"));
        assert_matches!(base.ignore_keyword("@C"), Err(DslError::UnexpectedEndOfFile { .. }));
    }

    #[test]
    fn test_description_block() {
        let mut base = base_for("{ A law\n  with \\{ braces \\} }\nnext");
        let description = base.read_description("@Description").unwrap();
        assert_eq!(description, "* A law \n* with \\ { braces \\ } ");
        assert_eq!(base.current().map(|t| t.value.as_str()), Some("next"));
    }
}
