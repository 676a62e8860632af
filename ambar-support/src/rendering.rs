//! Text rendering utilities for bean names and error messages.

/// Shortens a fully qualified type path to its simple name.
///
/// This is the short name used for scan exclusions.
///
/// ```
/// use ambar_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::beans::invalid::DemoImpl1");
/// assert_eq!(short, "DemoImpl1");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::beans::Demo>");
/// assert_eq!(short, "Arc<dyn Demo>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Renders names as a back-quoted, comma separated list.
///
/// ```
/// use ambar_support::rendering::render_list;
///
/// assert_eq!(render_list(&["a::X", "b::Y"]), "`a::X`, `b::Y`");
/// ```
pub fn render_list(names: &[impl AsRef<str>]) -> String {
    names
        .iter()
        .map(|name| format!("`{}`", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Picks the catalogued names closest to a requested one.
///
/// Full-path substring hits rank first, then simple-name hits, then
/// names sharing a prefix of three or more characters.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_nested_module_path() {
        assert_eq!(shorten_type_name("app::beans::invalid::DemoImpl3"), "DemoImpl3");
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn app::Demo>"),
            "Arc<dyn Demo>"
        );
    }

    #[test]
    fn shorten_without_path() {
        assert_eq!(shorten_type_name("Demo"), "Demo");
    }

    #[test]
    fn render_empty_list() {
        let names: Vec<&str> = vec![];
        assert_eq!(render_list(&names), "");
    }

    #[test]
    fn suggests_same_simple_name_in_other_module() {
        let available = vec![
            "app::demoinjection::InjectionTargetNamed",
            "app::invalid::DemoImpl1",
        ];

        let suggestions = suggest_similar("other::InjectionTargetNamed", &available, 3);
        assert_eq!(suggestions, vec!["app::demoinjection::InjectionTargetNamed"]);
    }

    #[test]
    fn suggestions_skip_exact_name() {
        let available = vec!["app::Demo"];
        assert!(suggest_similar("app::Demo", &available, 3).is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["app::Database"];
        assert!(suggest_similar("XyzAbcDef", &available, 3).is_empty());
    }
}
