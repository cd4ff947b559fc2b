use serde::Serialize;
use std::collections::BTreeMap;

pub const THEME_STYLE_ID: &str = "client-theme-styles";

/// Resolved CSS custom properties for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThemeTokens {
    /// `--name` (without the dashes) → value, in stable order.
    pub variables: BTreeMap<String, String>,
}

impl ThemeTokens {
    pub fn from_colors(colors: &BTreeMap<String, String>) -> Self {
        let mut variables = BTreeMap::new();
        for (role, value) in colors {
            let value = value.trim();
            if !is_safe_css_value(value) {
                tracing::warn!("⚠️ Dropping color '{}': unsafe CSS value '{}'", role, value);
                continue;
            }
            let name = css_variable_name(role);
            if name.is_empty() {
                continue;
            }
            variables.insert(name, value.to_string());
        }
        Self { variables }
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Body of the `:root` rule.
    pub fn to_css(&self) -> String {
        if self.variables.is_empty() {
            return String::new();
        }
        let declarations: Vec<String> = self
            .variables
            .iter()
            .map(|(name, value)| format!("  --{}: {};", name, value))
            .collect();
        format!(":root {{\n{}\n}}", declarations.join("\n"))
    }
}

/// `cardForeground` → `card-foreground`.
pub fn css_variable_name(role: &str) -> String {
    let mut name = String::with_capacity(role.len() + 4);
    for c in role.trim().chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
        }
    }
    name.trim_start_matches('-').to_string()
}

fn is_safe_css_value(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, '<' | '>' | '{' | '}' | ';') || c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn camel_case_roles_become_kebab_case() {
        assert_eq!(css_variable_name("primary"), "primary");
        assert_eq!(css_variable_name("cardForeground"), "card-foreground");
        assert_eq!(css_variable_name("mutedForeground"), "muted-foreground");
        assert_eq!(css_variable_name("brandAccentLight"), "brand-accent-light");
    }

    #[test]
    fn renders_root_rule() {
        let tokens = ThemeTokens::from_colors(&colors(&[
            ("primary", "oklch(0.6 0.2 30)"),
            ("primaryForeground", "#fff"),
        ]));
        let css = tokens.to_css();
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--primary: oklch(0.6 0.2 30);"));
        assert!(css.contains("--primary-foreground: #fff;"));
    }

    #[test]
    fn unsafe_values_are_dropped() {
        let tokens = ThemeTokens::from_colors(&colors(&[
            ("primary", "red;} body{display:none"),
            ("accent", "</style><script>"),
            ("background", "#000"),
        ]));
        assert_eq!(tokens.variables.len(), 1);
        assert_eq!(tokens.variables["background"], "#000");
    }

    #[test]
    fn no_colors_no_css() {
        assert_eq!(ThemeTokens::from_colors(&BTreeMap::new()).to_css(), "");
    }
}
