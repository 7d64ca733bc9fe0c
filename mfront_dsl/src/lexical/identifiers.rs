//! Identifier validation and the C++ reserved words

/// C++ keywords and alternative operator spellings
pub const CXX_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "class", "compl", "const", "constexpr",
    "const_cast", "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "return", "short", "signed", "sizeof", "static", "static_assert",
    "static_cast", "struct", "switch", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "wchar_t", "while", "xor", "xor_eq",
];

pub fn is_reserved_cxx_keyword(word: &str) -> bool {
    CXX_KEYWORDS.contains(&word)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Letter or `_` first, then alphanumerics or `_`
pub fn is_valid_identifier(name: &str, check_cxx_keywords: bool) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    if !chars.all(is_identifier_char) {
        return false;
    }
    !(check_cxx_keywords && is_reserved_cxx_keyword(name))
}

/// Like [`is_valid_identifier`] but accepts `::` qualified names
pub fn is_valid_function_identifier(name: &str, check_cxx_keywords: bool) -> bool {
    if name.is_empty() || name.starts_with("::") || name.ends_with("::") {
        return false;
    }
    let all_parts_valid = name
        .split("::")
        .all(|part| is_valid_identifier(part, false));
    all_parts_valid && !(check_cxx_keywords && is_reserved_cxx_keyword(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_valid_identifier("Norton", true));
        assert!(is_valid_identifier("_tmp2", true));
        assert!(!is_valid_identifier("2x", false));
        assert!(!is_valid_identifier("a-b", false));
        assert!(!is_valid_identifier("", false));
        assert!(!is_valid_identifier("class", true));
        assert!(is_valid_identifier("class", false));
    }

    #[test]
    fn test_function_identifiers() {
        assert!(is_valid_function_identifier("std::exp", true));
        assert!(is_valid_function_identifier("pow", true));
        assert!(!is_valid_function_identifier("std:exp", false));
        assert!(!is_valid_function_identifier("std::", false));
        assert!(!is_valid_function_identifier("a:::b", false));
        assert!(!is_valid_function_identifier("return", true));
    }
}
