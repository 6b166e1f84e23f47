/// Reserved words of JavaScript, including strict-mode and literal keywords
const RESERVED_KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Check whether a name is a reserved JavaScript keyword (case-sensitive)
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keywords() {
        for kw in [
            "for", "while", "if", "else", "return", "class", "const", "let", "var", "function",
            "try", "catch", "new", "null", "true", "false",
        ] {
            assert!(is_reserved_keyword(kw), "{} should be reserved", kw);
        }
    }

    #[test]
    fn test_identifiers_are_not_reserved() {
        for name in ["hello", "myVar", "returnValue", "functionName", "letmein"] {
            assert!(!is_reserved_keyword(name), "{} should not be reserved", name);
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_reserved_keyword("Function"));
        assert!(!is_reserved_keyword("Class"));
        assert!(!is_reserved_keyword("Var"));
    }

    #[test]
    fn test_edge_cases() {
        assert!(!is_reserved_keyword(""));
        assert!(!is_reserved_keyword("123"));
        assert!(!is_reserved_keyword("$for"));
        assert!(!is_reserved_keyword("while1"));
        assert!(!is_reserved_keyword("_var"));
    }
}
