//! Identifier conversion: catalog column names are UPPER_SNAKE_CASE, API field
//! names are camelCase. Downstream clients key off the camelCase names, so the
//! conversion must stay bit-exact.

/// Convert an UPPER_SNAKE_CASE identifier to camelCase.
/// e.g. "FIRST_NAME" -> "firstName", "ID" -> "id"
pub fn to_camel_case(s: &str) -> String {
    let mut parts = s.split('_').filter(|p| !p.is_empty());
    let Some(first) = parts.next() else {
        return s.to_lowercase();
    };
    let mut out = first.to_lowercase();
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Pluralize an already-camelCased name: append "s" unless it ends in one.
/// e.g. "item" -> "items", "items" -> "items"
pub fn pluralize(s: &str) -> String {
    if s.ends_with('s') || s.ends_with('S') {
        s.to_string()
    } else {
        format!("{}s", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_multi_part() {
        assert_eq!(to_camel_case("FIRST_NAME"), "firstName");
        assert_eq!(to_camel_case("CREATED_AT_DATE"), "createdAtDate");
    }

    #[test]
    fn camel_case_single_part() {
        assert_eq!(to_camel_case("ID"), "id");
        assert_eq!(to_camel_case("CLIENTS"), "clients");
    }

    #[test]
    fn camel_case_degenerate() {
        assert_eq!(to_camel_case(""), "");
        // no parts at all: the whole string is lowercased as-is
        assert_eq!(to_camel_case("__"), "__");
        assert_eq!(to_camel_case("_NAME_"), "name");
    }

    #[test]
    fn pluralize_appends_s_unless_present() {
        assert_eq!(pluralize("item"), "items");
        assert_eq!(pluralize("items"), "items");
        assert_eq!(pluralize("address"), "address");
    }
}
