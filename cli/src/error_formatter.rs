use carbonate::CarbonateError;

/// Format a CarbonateError for the terminal
pub fn format_error(error: &CarbonateError) -> String {
    match error {
        CarbonateError::UnreachableFallback { quantity, skipped } => {
            let mut output = format!(
                "Unreachable fallback: '{}' must always resolve but no method applied",
                quantity
            );
            for method in skipped {
                output.push_str(&format!("\n  × {}", method));
            }
            output.push_str("\n  Check that the reference data provides its fallback records");
            output
        }
        CarbonateError::InvalidFact { name, message } => {
            format!(
                "Invalid fact '{}': {}\n  List the accepted facts with: carbonate inputs",
                name, message
            )
        }
        CarbonateError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        CarbonateError::MultipleErrors(errors) => {
            let mut result = String::from("Multiple errors occurred:\n\n");
            for error in errors {
                result.push_str(&format_error(error));
                result.push_str("\n\n");
            }
            result
        }
        other => format!("Error: {}", other),
    }
}
