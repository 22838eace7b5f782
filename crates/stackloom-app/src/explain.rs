//! The `explain` use case: look up lint-rule documentation.

use stackloom_types::explain::{self, Explanation, all_rule_ids};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes the known rule ids.
    NotFound {
        identifier: String,
        available_rule_ids: &'static [&'static str],
    },
}

/// Look up an explanation for a rule id.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_ids: all_rule_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("When suppression is acceptable\n");
    out.push_str("------------------------------\n");
    out.push_str(exp.guidance);
    out.push('\n');

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, rule_ids: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule id: {}\n\n", identifier));
    out.push_str("Available rule ids:\n");
    for id in rule_ids {
        out.push_str(&format!("  - {}\n", id));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_known_rule() {
        let output = run_explain("AwsSolutions-S1");
        assert!(matches!(output, ExplainOutput::Found(_)));
    }

    #[test]
    fn explain_unknown_rule_lists_alternatives() {
        let output = run_explain("not_a_rule");
        match output {
            ExplainOutput::NotFound {
                identifier,
                available_rule_ids,
            } => {
                assert_eq!(identifier, "not_a_rule");
                assert!(available_rule_ids.contains(&"AwsSolutions-S1"));
            }
            ExplainOutput::Found(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let output = run_explain("AwsSolutions-ELB2");
        let ExplainOutput::Found(exp) = output else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.contains("Load Balancer Access Logs"));
        assert!(formatted.contains("When suppression is acceptable"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["AwsSolutions-S1", "AwsSolutions-S5"]);
        assert!(formatted.contains("Unknown rule id: missing"));
        assert!(formatted.contains("AwsSolutions-S5"));
    }
}
