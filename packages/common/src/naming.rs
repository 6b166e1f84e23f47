/// Upper-case the first character of a name, leaving the rest untouched
///
/// `userName` → `UserName`, `user_name` → `User_name`, `1abc` → `1abc`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name of the update action generated for a state field (`loading` → `setLoading`)
pub fn action_name(field: &str) -> String {
    format!("set{}", capitalize(field))
}

/// Name of the state interface generated for a slice (`user` → `UserState`)
pub fn interface_name(slice_name: &str) -> String {
    format!("{}State", capitalize(slice_name))
}

/// Whether a name can be written bare as a JavaScript identifier or dotted member
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_camel_case() {
        assert_eq!(capitalize("userName"), "UserName");
        assert_eq!(capitalize("isActive"), "IsActive");
        assert_eq!(capitalize("shoppingCart"), "ShoppingCart");
    }

    #[test]
    fn test_capitalize_keeps_separators() {
        assert_eq!(capitalize("user_name"), "User_name");
        assert_eq!(capitalize("user-name"), "User-name");
        assert_eq!(capitalize("hello world"), "Hello world");
        assert_eq!(capitalize("config.json"), "Config.json");
        assert_eq!(capitalize("v1.2.3"), "V1.2.3");
    }

    #[test]
    fn test_capitalize_only_touches_first_char() {
        assert_eq!(capitalize("UserName"), "UserName");
        assert_eq!(capitalize("HELLO"), "HELLO");
        assert_eq!(capitalize("aAbBcC"), "AAbBcC");
    }

    #[test]
    fn test_capitalize_non_letters() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("1"), "1");
        assert_eq!(capitalize("!"), "!");
        assert_eq!(capitalize(" "), " ");

        let long = format!("1{}", "a".repeat(999));
        assert_eq!(capitalize(&long), long);
    }

    #[test]
    fn test_capitalize_long_string() {
        let long = "a".repeat(1000);
        let expected = format!("A{}", "a".repeat(999));
        assert_eq!(capitalize(&long), expected);
    }

    #[test]
    fn test_action_and_interface_names() {
        assert_eq!(action_name("loading"), "setLoading");
        assert_eq!(action_name("selectedProductId"), "setSelectedProductId");
        assert_eq!(interface_name("examples"), "ExamplesState");
        assert_eq!(interface_name("userProfile"), "UserProfileState");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("userName"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("$ref"));
        assert!(is_identifier("item2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2items"));
        assert!(!is_identifier("first-name"));
        assert!(!is_identifier("setFirst-name"));
    }
}
