//! Reserved names and external (glossary or entry) names of a model
//!
//! Every declaration reserves its name here. A name can only be reserved
//! once and can't clash with an external name already handed out.

use super::glossary::is_glossary_name;
use super::reserved::default_reserved_names;
use crate::lexical::is_valid_identifier;
use crate::syntax::error::{DslError, DslResult};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, Serialize)]
pub struct NameRegistry {
    reserved: BTreeSet<String>,
    /// variable name -> glossary name
    glossary_names: BTreeMap<String, String>,
    /// variable name -> entry name
    entry_names: BTreeMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_reserved_names() -> Self {
        let mut registry = Self::new();
        registry
            .reserved
            .extend(default_reserved_names().into_iter().map(str::to_string));
        registry
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    pub fn is_glossary_name_used(&self, name: &str) -> bool {
        self.glossary_names.values().any(|g| g == name)
    }

    pub fn is_used_as_entry_name(&self, name: &str) -> bool {
        self.entry_names.values().any(|e| e == name)
    }

    /// Fails if `name` could not be reserved
    pub fn check_name(&self, name: &str, line: usize) -> DslResult<()> {
        if self.is_reserved(name) {
            return Err(DslError::collision(name, "name already reserved", line));
        }
        if self.is_glossary_name_used(name) {
            return Err(DslError::collision(name, "name already used as a glossary name", line));
        }
        if self.is_used_as_entry_name(name) {
            return Err(DslError::collision(name, "name already used as an entry name", line));
        }
        Ok(())
    }

    pub fn reserve(&mut self, name: &str, line: usize) -> DslResult<()> {
        self.check_name(name, line)?;
        self.reserved.insert(name.to_string());
        Ok(())
    }

    /// For names already validated by the caller
    pub(crate) fn reserve_unchecked(&mut self, name: &str) {
        self.reserved.insert(name.to_string());
    }

    pub(crate) fn bind_glossary_name_unchecked(&mut self, variable: &str, glossary: &str) {
        self.glossary_names
            .insert(variable.to_string(), glossary.to_string());
    }

    pub fn set_glossary_name(&mut self, variable: &str, glossary: &str, line: usize) -> DslResult<()> {
        if !is_glossary_name(glossary) {
            return Err(DslError::malformed(
                "setGlossaryName",
                format!("'{glossary}' is not a glossary name"),
                line,
            ));
        }
        self.check_external_name(variable, glossary, line)?;
        self.glossary_names
            .insert(variable.to_string(), glossary.to_string());
        Ok(())
    }

    pub fn set_entry_name(&mut self, variable: &str, entry: &str, line: usize) -> DslResult<()> {
        if is_glossary_name(entry) {
            return Err(DslError::collision(
                entry,
                "this is a glossary name, use 'setGlossaryName' instead",
                line,
            ));
        }
        if !is_valid_identifier(entry, true) {
            return Err(DslError::malformed(
                "setEntryName",
                format!("'{entry}' is not a valid entry name"),
                line,
            ));
        }
        self.check_external_name(variable, entry, line)?;
        self.entry_names
            .insert(variable.to_string(), entry.to_string());
        Ok(())
    }

    fn check_external_name(&self, variable: &str, external: &str, line: usize) -> DslResult<()> {
        if let Some(existing) = self
            .glossary_names
            .get(variable)
            .or_else(|| self.entry_names.get(variable))
        {
            return Err(DslError::collision(
                variable,
                format!("an external name ('{existing}') has already been given to this variable"),
                line,
            ));
        }
        if self.is_glossary_name_used(external) || self.is_used_as_entry_name(external) {
            return Err(DslError::collision(
                external,
                "name already used as a glossary or entry name",
                line,
            ));
        }
        if variable != external && self.is_reserved(external) {
            return Err(DslError::collision(
                external,
                "name already used by another variable or reserved",
                line,
            ));
        }
        Ok(())
    }

    pub fn glossary_name(&self, variable: &str) -> Option<&str> {
        self.glossary_names.get(variable).map(String::as_str)
    }

    pub fn entry_name(&self, variable: &str) -> Option<&str> {
        self.entry_names.get(variable).map(String::as_str)
    }

    /// Name under which a variable is exposed
    pub fn external_name<'a>(&'a self, variable: &'a str) -> &'a str {
        self.glossary_name(variable)
            .or_else(|| self.entry_name(variable))
            .unwrap_or(variable)
    }

    /// Variable exposed under a glossary or entry name
    pub fn variable_from_external_name(&self, external: &str) -> Option<&str> {
        self.glossary_names
            .iter()
            .chain(self.entry_names.iter())
            .find(|(_, e)| e.as_str() == external)
            .map(|(v, _)| v.as_str())
    }

    pub fn glossary_names(&self) -> &BTreeMap<String, String> {
        &self.glossary_names
    }

    pub fn entry_names(&self) -> &BTreeMap<String, String> {
        &self.entry_names
    }

    pub fn reserved_names(&self) -> impl Iterator<Item = &str> {
        self.reserved.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_reserve_rejects_duplicates_and_defaults() {
        let mut names = NameRegistry::with_default_reserved_names();
        names.reserve("E", 1).unwrap();
        assert_matches!(names.reserve("E", 2), Err(DslError::NameCollision { line: 2, .. }));
        assert_matches!(names.reserve("sqrt", 3), Err(DslError::NameCollision { .. }));
    }

    #[test]
    fn test_external_names_are_exclusive() {
        let mut names = NameRegistry::new();
        names.reserve("eto", 1).unwrap();
        names.reserve("sig", 1).unwrap();
        names.set_glossary_name("eto", "Strain", 2).unwrap();

        assert_matches!(
            names.set_entry_name("eto", "total_strain", 3),
            Err(DslError::NameCollision { .. })
        );
        assert_matches!(
            names.set_glossary_name("sig", "Strain", 4),
            Err(DslError::NameCollision { .. })
        );
        assert_matches!(
            names.set_entry_name("sig", "Strain", 5),
            Err(DslError::NameCollision { .. })
        );
        assert_matches!(
            names.set_glossary_name("sig", "NotInGlossary", 6),
            Err(DslError::MalformedConstruct { .. })
        );
        assert_matches!(names.reserve("Strain", 7), Err(DslError::NameCollision { .. }));

        assert_eq!(names.external_name("eto"), "Strain");
        assert_eq!(names.external_name("sig"), "sig");
        assert_eq!(names.variable_from_external_name("Strain"), Some("eto"));
        assert!(names.is_glossary_name_used("Strain"));
    }

    #[test]
    fn test_entry_name_must_not_shadow_another_variable() {
        let mut names = NameRegistry::new();
        names.reserve("a", 1).unwrap();
        names.reserve("b", 1).unwrap();
        assert_matches!(names.set_entry_name("a", "b", 2), Err(DslError::NameCollision { .. }));
        names.set_entry_name("a", "a", 2).unwrap();
        assert!(names.is_used_as_entry_name("a"));
    }
}
