//! The `explain` use case: look up operator documentation.

use imgward_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the operator.
    Found(Explanation),
    /// Unknown operator; includes the recognized names.
    NotFound {
        name: String,
        available: &'static [&'static str],
    },
}

/// Look up an explanation for an operator name.
pub fn run_explain(name: &str) -> ExplainOutput {
    match explain::lookup_explanation(name) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            name: name.to_string(),
            available: explain::all_operator_names(),
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
    out.push_str("Notes\n");
    out.push_str("-----\n");
    out.push_str(exp.notes);
    out.push_str("\n\n");
    out.push_str("Example\n");
    out.push_str("-------\n\n");
    out.push_str("```yaml\n");
    out.push_str(exp.example);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(name: &str, available: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown operator: {}\n\n", name));
    out.push_str("Available operators:\n");
    for op in available {
        out.push_str(&format!("  - {}\n", op));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_finds_every_operator() {
        for name in explain::all_operator_names() {
            match run_explain(name) {
                ExplainOutput::Found(exp) => {
                    let text = format_explanation(&exp);
                    assert!(text.contains(exp.title));
                    assert!(text.contains("```yaml"));
                }
                ExplainOutput::NotFound { .. } => panic!("missing explanation for {name}"),
            }
        }
    }

    #[test]
    fn unknown_operator_lists_the_registry() {
        let ExplainOutput::NotFound { name, available } = run_explain("matches_regex") else {
            panic!("expected not found");
        };
        let text = format_not_found(&name, available);
        assert!(text.contains("Unknown operator: matches_regex"));
        assert!(text.contains("- older_than_days"));
        assert!(text.contains("- eq"));
    }
}
