//! Prompt templates for correction suggestions.

/// Prompt for proposing a correction to one extracted field.
pub const CORRECTION_PROMPT: &str = r#"Given the field {field} with value {current_value} and context:
{context}
Suggest an improvement or correction for this field."#;

/// Fill the correction prompt for a field.
pub fn format_correction_prompt(field: &str, current_value: &str, context: &str) -> String {
    CORRECTION_PROMPT
        .replace("{field}", field)
        .replace("{current_value}", current_value)
        .replace("{context}", context)
}

/// Build the retrieval query for a field: field name and current value
/// joined by a single space. The exact shape is stable so retrieval is
/// reproducible across runs.
pub fn build_field_query(field: &str, current_value: &str) -> String {
    format!("{field} {current_value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_query_shape() {
        assert_eq!(build_field_query("vendor", "Acme"), "vendor Acme");
    }

    #[test]
    fn test_correction_prompt_embeds_all_parts() {
        let prompt = format_correction_prompt("vendor", "Acme", "Acme Corp Inc.");
        assert!(prompt.contains("field vendor"));
        assert!(prompt.contains("value Acme"));
        assert!(prompt.contains("Acme Corp Inc."));
        assert!(!prompt.contains("{field}"));
    }

    #[test]
    fn test_empty_context_still_forms_a_prompt() {
        let prompt = format_correction_prompt("amount", "42.00", "");
        assert!(prompt.contains("context:\n\nSuggest"));
    }
}
