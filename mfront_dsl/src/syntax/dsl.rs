//! Keyword dispatch shared by the MFront dialects
//!
//! A dialect owns a [`DslBase`] and a static [`KeywordTable`]. The provided
//! methods of [`Dsl`] drive the analysis loop and implement the keywords
//! every dialect understands (`@Author`, `@Import`, `@StaticVar`, ...).

use crate::config::compile_time::dsl::MAX_IMPORT_DEPTH;
use crate::lexical::{is_valid_identifier, tokenize_str};
use crate::logging::codes;
use crate::symbols::{StaticValue, StaticVariableDescription};
use crate::syntax::dsl_base::{CodeBlockParserOptions, DslBase, USER_DEFINED_STRING};
use crate::syntax::error::{DslError, DslResult};
use crate::tokens::{Token, TokenStream};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub type KeywordHandler<D> = fn(&mut D) -> DslResult<()>;

/// Keyword to handler bindings of a dialect, built once per process
pub struct KeywordTable<D> {
    handlers: HashMap<&'static str, KeywordHandler<D>>,
}

impl<D> Default for KeywordTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> KeywordTable<D> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Panics on a second registration of the same keyword
    pub fn register(&mut self, keyword: &'static str, handler: KeywordHandler<D>) {
        let previous = self.handlers.insert(keyword, handler);
        assert!(previous.is_none(), "keyword '{keyword}' registered twice");
    }

    pub fn get(&self, keyword: &str) -> Option<KeywordHandler<D>> {
        self.handlers.get(keyword).copied()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.handlers.contains_key(keyword)
    }

    /// Registered keywords, sorted
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut keywords: Vec<&'static str> = self.handlers.keys().copied().collect();
        keywords.sort_unstable();
        keywords
    }
}

/// Static variable types holding integral values
fn is_integral_type(type_name: &str) -> bool {
    matches!(
        type_name,
        "int" | "short" | "ushort" | "unsigned short" | "unsigned int" | "long" | "size_t"
    )
}

pub trait Dsl: Sized + 'static {
    fn base(&self) -> &DslBase;

    fn base_mut(&mut self) -> &mut DslBase;

    fn keywords() -> &'static KeywordTable<Self>;

    /// Name used to qualify static members in code blocks
    fn class_name(&self) -> &str;

    fn add_static_variable(&mut self, variable: StaticVariableDescription) -> DslResult<()>;

    /// Called, with the cursor after `token`, for a token with no handler
    fn treat_unknown_token(&mut self, token: &Token) -> DslResult<()> {
        Err(DslError::UnknownKeyword {
            token: token.value.clone(),
            line: token.line,
        })
    }

    // === ANALYSIS ===

    /// Dispatch every token of the current stream
    fn analyse(&mut self) -> DslResult<()> {
        while let Some(token) = self.base().current().cloned() {
            let Some(handler) = Self::keywords().get(&token.value) else {
                self.base_mut().advance();
                self.treat_unknown_token(&token)?;
                continue;
            };
            self.base_mut().current_comment = token.comment.clone();
            self.base_mut().advance();
            let result = handler(self);
            self.base_mut().current_comment.clear();
            result.map_err(|e| DslError::in_keyword(&token.value, token.line, e))?;
        }
        Ok(())
    }

    fn analyse_string(&mut self, source: &str) -> DslResult<()> {
        let tokens = tokenize_str(source, &self.base().tokenizer_options)?;
        let base = self.base_mut();
        base.file_description.file_name = USER_DEFINED_STRING.to_string();
        base.set_tokens(tokens);
        self.analyse()
    }

    fn analyse_file(&mut self, path: &Path) -> DslResult<()> {
        self.import_file(path, 0)?;
        crate::log_success!(
            codes::success::ANALYSIS_COMPLETE,
            "Analysis completed",
            "file" => path.display()
        );
        Ok(())
    }

    /// Tokenize and analyse `path` in place of the current stream
    fn import_file(&mut self, path: &Path, line: usize) -> DslResult<()> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let file = path.display().to_string();
        if self.base().import_stack.contains(&key) {
            return Err(DslError::ImportCycle { file, line });
        }
        if self.base().import_stack.len() >= MAX_IMPORT_DEPTH {
            return Err(DslError::ImportTooDeep {
                file,
                line,
                max: MAX_IMPORT_DEPTH,
            });
        }

        let result = self.base().file_processor.process_file(path)?;
        let tokens = tokenize_str(&result.source, &self.base().tokenizer_options)?;
        self.analyse_tokens(path, tokens)
    }

    /// Analyse tokens read from `path`; relative imports are resolved next to it
    fn analyse_tokens(&mut self, path: &Path, tokens: Vec<Token>) -> DslResult<()> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let base = self.base_mut();
        base.file_description.file_name = path.display().to_string();
        base.set_tokens(tokens);
        base.import_stack.push(key);
        let outcome = self.analyse();
        self.base_mut().import_stack.pop();
        outcome
    }

    /// Imported files are looked up next to the importing file, then in the search paths
    fn resolve_import(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let base = self.base();
        base.import_stack
            .last()
            .and_then(|current| current.parent())
            .into_iter()
            .chain(base.search_paths.iter().map(PathBuf::as_path))
            .map(|directory| directory.join(path))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| path.to_path_buf())
    }

    // === SHARED KEYWORDS ===

    fn treat_lonely_separator(&mut self) -> DslResult<()> {
        self.base().warn_lonely_separator();
        Ok(())
    }

    fn treat_parser(&mut self) -> DslResult<()> {
        self.base_mut().read_until_end_of_instruction("@DSL")?;
        Ok(())
    }

    fn treat_author(&mut self) -> DslResult<()> {
        let base = self.base_mut();
        base.file_description.author_name = base.read_until_end_of_instruction("@Author")?;
        Ok(())
    }

    fn treat_date(&mut self) -> DslResult<()> {
        let base = self.base_mut();
        base.file_description.date = base.read_until_end_of_instruction("@Date")?;
        Ok(())
    }

    fn treat_description(&mut self) -> DslResult<()> {
        let base = self.base_mut();
        let description = base.read_description("@Description")?;
        if !base.file_description.description.is_empty() {
            base.file_description.description.push('\n');
        }
        base.file_description.description.push_str(&description);
        Ok(())
    }

    fn treat_includes(&mut self) -> DslResult<()> {
        let class_name = self.class_name().to_string();
        let base = self.base_mut();
        let block = base.read_next_block(&CodeBlockParserOptions::default(), &class_name)?;
        base.includes.push_str(&block.code);
        if !base.includes.ends_with('\n') {
            base.includes.push('\n');
        }
        Ok(())
    }

    fn treat_sources(&mut self) -> DslResult<()> {
        let class_name = self.class_name().to_string();
        let base = self.base_mut();
        let block = base.read_next_block(&CodeBlockParserOptions::default(), &class_name)?;
        base.sources.push_str(&block.code);
        if !base.sources.ends_with('\n') {
            base.sources.push('\n');
        }
        Ok(())
    }

    /// `@StaticVar type name value;`
    fn treat_static_var(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@StaticVariable";
        let base = self.base_mut();
        let type_token = base.current_token(HANDLER, "cannot read type of static variable")?;
        if !is_valid_identifier(&type_token.value, false) {
            return Err(DslError::malformed(HANDLER, "type given is not valid", type_token.line));
        }
        base.advance();
        let name = base.current_token(HANDLER, "cannot read variable name")?;
        if !is_valid_identifier(&name.value, true) {
            return Err(DslError::malformed(
                HANDLER,
                format!("variable name '{}' is not valid", name.value),
                name.line,
            ));
        }
        base.advance();
        let value = if is_integral_type(&type_token.value) {
            base.read_initialisation_value::<i64>(HANDLER, true)?
                .map(StaticValue::Integer)
        } else {
            base.read_initialisation_value::<f64>(HANDLER, true)?
                .map(StaticValue::Real)
        };
        base.read_specified_token(HANDLER, ";")?;
        let value = value.ok_or_else(|| {
            DslError::malformed(HANDLER, format!("no value given for '{}'", name.value), name.line)
        })?;
        self.add_static_variable(StaticVariableDescription::new(
            &type_token.value,
            &name.value,
            name.line,
            value,
        ))
    }

    /// `@IntegerConstant name value;`
    fn treat_integer_constant(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@IntegerConstant";
        let base = self.base_mut();
        let name = base.current_token(HANDLER, "cannot read the name of the constant")?;
        if !is_valid_identifier(&name.value, true) {
            return Err(DslError::malformed(
                HANDLER,
                format!("constant name '{}' is not valid", name.value),
                name.line,
            ));
        }
        base.advance();
        let value = base.read_initialisation_value::<i64>(HANDLER, true)?;
        base.read_specified_token(HANDLER, ";")?;
        let value = value.ok_or_else(|| {
            DslError::malformed(HANDLER, format!("no value given for '{}'", name.value), name.line)
        })?;
        base.register_integer_constant(&name.value, value, name.line)
    }

    /// `@Import "file";` or `@Import {"a", "b"};`
    ///
    /// Each file is fully analysed by this dialect; the importing stream is
    /// restored afterwards, whatever the outcome.
    fn treat_import(&mut self) -> DslResult<()> {
        const HANDLER: &str = "@Import";
        let line = self.base().current_line();
        let files = self.base_mut().read_string_or_array_of_string(HANDLER)?;
        self.base_mut().read_specified_token(HANDLER, ";")?;

        let base = self.base_mut();
        let saved_tokens = base.swap_tokens(TokenStream::default());
        let saved_file_name = base.file_description.file_name.clone();
        let saved_comment = std::mem::take(&mut base.current_comment);

        let mut outcome = Ok(());
        for file in &files {
            let path = self.resolve_import(file);
            outcome = self
                .import_file(&path, line)
                .map_err(|e| DslError::in_import(file, line, e));
            if outcome.is_err() {
                break;
            }
            crate::log_success!(
                codes::success::IMPORT_COMPLETE,
                "File imported",
                "file" => path.display()
            );
        }

        let base = self.base_mut();
        base.swap_tokens(saved_tokens);
        base.file_description.file_name = saved_file_name;
        base.current_comment = saved_comment;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Vec<u8>) -> DslResult<()> {
        Ok(())
    }

    #[test]
    fn test_keyword_table() {
        let mut table: KeywordTable<Vec<u8>> = KeywordTable::new();
        table.register("@Law", noop);
        table.register(";", noop);
        assert!(table.contains("@Law"));
        assert!(table.get("@Unknown").is_none());
        assert_eq!(table.keywords(), vec![";", "@Law"]);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_keyword_panics() {
        let mut table: KeywordTable<Vec<u8>> = KeywordTable::new();
        table.register("@Law", noop);
        table.register("@Law", noop);
    }
}
