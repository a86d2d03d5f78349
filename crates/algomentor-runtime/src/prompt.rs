//! First-message prompt augmentation.

use algomentor_protocols::ProblemContext;

/// Prepend serialized problem context to the user's question.
///
/// With no context available the raw text goes out untouched; absence
/// means "no enrichment", never a failure.
pub fn augment_with_context(context: Option<&ProblemContext>, message: &str) -> String {
    let Some(context) = context else {
        return message.to_string();
    };

    let mut formatted = String::from("Context:\n");
    formatted.push_str(&format!(
        "Problem Title: {}\n",
        context.title.as_deref().unwrap_or("N/A")
    ));
    formatted.push_str(&format!(
        "Difficulty: {}\n",
        context.difficulty.as_deref().unwrap_or("N/A")
    ));
    formatted.push_str(&format!(
        "Problem Description: {}\n\n",
        context.description.as_deref().unwrap_or("N/A")
    ));

    if !context.examples.is_empty() {
        formatted.push_str("Examples:\n");
        for (index, example) in context.examples.iter().enumerate() {
            formatted.push_str(&format!("Example {}:\n", index + 1));
            formatted.push_str(&format!("Input: {}\n", example.input));
            formatted.push_str(&format!("Output: {}\n", example.output));
            if let Some(explanation) = &example.explanation {
                formatted.push_str(&format!("Explanation: {}\n", explanation));
            }
            formatted.push('\n');
        }
    }

    if let Some(constraints) = &context.constraints {
        formatted.push_str(&format!("Constraints: {}\n\n", constraints));
    }

    if let Some(code) = &context.user_code {
        formatted.push_str(&format!("Current Code:\n{}\n\n", code));
    }

    formatted.push_str(&format!("User Question:\n{}", message));
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use algomentor_protocols::ProblemExample;

    #[test]
    fn test_no_context_is_raw_text() {
        assert_eq!(augment_with_context(None, "explain this"), "explain this");
    }

    #[test]
    fn test_context_fields_are_serialized() {
        let context = ProblemContext {
            title: Some("Two Sum".to_string()),
            difficulty: Some("Easy".to_string()),
            description: Some("Find two numbers adding to target.".to_string()),
            ..Default::default()
        };

        let prompt = augment_with_context(Some(&context), "hi");
        assert!(prompt.starts_with("Context:\n"));
        assert!(prompt.contains("Problem Title: Two Sum"));
        assert!(prompt.contains("Difficulty: Easy"));
        assert!(prompt.contains("Problem Description: Find two numbers adding to target."));
        assert!(prompt.ends_with("User Question:\nhi"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let context = ProblemContext::default();
        let prompt = augment_with_context(Some(&context), "hi");

        assert!(prompt.contains("Problem Title: N/A"));
        assert!(prompt.contains("Difficulty: N/A"));
        assert!(!prompt.contains("Examples:"));
        assert!(!prompt.contains("Constraints:"));
    }

    #[test]
    fn test_examples_are_numbered() {
        let context = ProblemContext {
            examples: vec![
                ProblemExample {
                    input: "[2,7,11,15], 9".to_string(),
                    output: "[0,1]".to_string(),
                    explanation: Some("2 + 7 = 9".to_string()),
                },
                ProblemExample {
                    input: "[3,3], 6".to_string(),
                    output: "[0,1]".to_string(),
                    explanation: None,
                },
            ],
            ..Default::default()
        };

        let prompt = augment_with_context(Some(&context), "hi");
        assert!(prompt.contains("Example 1:\nInput: [2,7,11,15], 9\nOutput: [0,1]\nExplanation: 2 + 7 = 9\n"));
        assert!(prompt.contains("Example 2:\nInput: [3,3], 6\nOutput: [0,1]\n"));
    }

    #[test]
    fn test_constraints_and_code() {
        let context = ProblemContext {
            constraints: Some("1 <= n <= 10^5".to_string()),
            user_code: Some("fn main() {}".to_string()),
            ..Default::default()
        };

        let prompt = augment_with_context(Some(&context), "why wrong?");
        assert!(prompt.contains("Constraints: 1 <= n <= 10^5"));
        assert!(prompt.contains("Current Code:\nfn main() {}"));
    }
}
