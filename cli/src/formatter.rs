use carbonate::trace::{RequirementUse, Source};
use carbonate::{GraphRegistry, Outcome, Resolution, TraceEntry, Value};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};

enum LineType {
    Requirement,
    LastRequirement,
    Skipped,
}

impl LineType {
    fn format_line(&self, content: &str) -> String {
        let symbol = match self {
            LineType::Requirement => "├─",
            LineType::LastRequirement => "└─",
            LineType::Skipped => "×",
        };
        format!("{} {}\n", symbol, content)
    }
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_resolution(&self, resolution: &Resolution, explain: bool) -> String {
        let mut output = String::new();

        let facts: Vec<&TraceEntry> = resolution
            .trace
            .entries()
            .iter()
            .filter(|e| e.outcome == Outcome::Fact)
            .collect();
        if !facts.is_empty() {
            output.push_str(&self.format_facts_table(&facts));
            output.push('\n');
        }

        output.push_str(&self.format_result(resolution));
        output.push('\n');

        if explain {
            output.push_str(&self.format_trace(resolution));
            output.push('\n');
        }

        output
    }

    fn format_facts_table(&self, facts: &[&TraceEntry]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Fact").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Left),
        ]));

        for fact in facts {
            table.add_row(Row::from(vec![
                fact.quantity.clone(),
                format_value(fact.value.as_ref()),
            ]));
        }

        table.to_string()
    }

    fn format_result(&self, resolution: &Resolution) -> String {
        let title = format!(
            "{} = {}",
            resolution.quantity,
            format_value(resolution.value.as_ref())
        );

        let mut details = format!("timeframe: {}", resolution.timeframe);
        if let Some(method) = &resolution.method {
            details.push_str(&format!("\nmethod: {}", method));
        }
        if !resolution.compliance.is_empty() {
            let standards: Vec<&str> = resolution
                .compliance
                .standards()
                .map(|s| s.title())
                .collect();
            details.push_str(&format!("\ncomplies with: {}", standards.join(", ")));
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.add_row(Row::from(vec![Cell::new(&title)]));
        table.add_row(Row::from(vec![Cell::new(&details)]));
        table.to_string()
    }

    /// One row per computed quantity, dependencies first
    fn format_trace(&self, resolution: &Resolution) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Quantity").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Right),
            Cell::new("Method").set_alignment(CellAlignment::Left),
        ]));

        for entry in resolution.trace.entries() {
            if entry.outcome == Outcome::Fact {
                continue;
            }
            let method = match &entry.outcome {
                Outcome::Method { name, fallback: true } => format!("{} (fallback)", name),
                Outcome::Method { name, .. } => name.clone(),
                _ => "unresolved".to_string(),
            };
            let mut detail = format!("{}\n", method);
            detail.push_str(&self.format_requirements(&entry.requirements));
            for skipped in &entry.skipped {
                detail.push_str(
                    &LineType::Skipped.format_line(&format!("{}: {}", skipped.method, skipped.reason)),
                );
            }

            table.add_row(Row::from(vec![
                Cell::new(&entry.quantity),
                Cell::new(format_value(entry.value.as_ref())).set_alignment(CellAlignment::Right),
                Cell::new(detail.trim_end()),
            ]));
        }

        table.to_string()
    }

    fn format_requirements(&self, requirements: &[RequirementUse]) -> String {
        let mut output = String::new();
        for (i, requirement) in requirements.iter().enumerate() {
            let source = match &requirement.source {
                Source::Supplied => "fact".to_string(),
                Source::Derived { method } => method.clone(),
                Source::Missing => "unknown".to_string(),
            };
            let marker = if requirement.soft { "?" } else { "" };
            let line = format!("{}{} ← {}", requirement.name, marker, source);
            let line_type = if i + 1 == requirements.len() {
                LineType::LastRequirement
            } else {
                LineType::Requirement
            };
            output.push_str(&line_type.format_line(&line));
        }
        output
    }

    pub fn format_nodes(&self, registry: &GraphRegistry) -> String {
        let mut output = String::new();
        output.push_str(&format!("nodes ({}):\n", registry.len()));

        for node in registry.nodes() {
            let marker = if node.is_guaranteed() {
                " (guaranteed)"
            } else {
                ""
            };
            output.push_str(&format!("\n{}{}\n", node.name(), marker));

            for (i, method) in node.methods().iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, method.name()));
                if !method.hard_requirements().is_empty() {
                    output.push_str(&format!(
                        "       needs: {}\n",
                        method.hard_requirements().join(", ")
                    ));
                }
                if !method.soft_requirements().is_empty() {
                    output.push_str(&format!(
                        "       appreciates: {}\n",
                        method.soft_requirements().join(", ")
                    ));
                }
                if !method.compliance_tags().is_empty() {
                    let standards: Vec<&str> =
                        method.compliance_tags().iter().map(|s| s.name()).collect();
                    output.push_str(&format!("       complies: {}\n", standards.join(", ")));
                }
            }
        }
        output
    }

    pub fn format_inputs(&self, registry: &GraphRegistry) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec!["Input", "Kind", "Syntax"]));

        for (name, kind) in registry.inputs() {
            table.add_row(Row::from(vec![name, kind.name(), kind.syntax()]));
        }

        table.to_string()
    }
}

/// Numbers are rounded to four decimals; undefined values print as `?`
fn format_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.round_dp(4).normalize().to_string(),
        Some(v) => v.to_string(),
        None => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonate::{Catalog, Compliance, Engine, FactStore, Standard, TimeRange};

    fn engine() -> Engine {
        Engine::automobile(Catalog::bundled().unwrap()).unwrap()
    }

    fn resolve(facts: &[&str]) -> Resolution {
        let engine = engine();
        let facts = engine.parse_facts(facts).unwrap();
        engine
            .emission(&facts, Some(TimeRange::year(2010).unwrap()))
            .unwrap()
    }

    #[test]
    fn test_facts_table_lists_supplied_facts() {
        let output = Formatter::new().format_resolution(&resolve(&["daily_distance=40"]), false);

        assert!(output.contains("daily_distance"));
        assert!(output.contains("40"));
        assert!(output.contains("emission = "));
        assert!(output.contains("timeframe: 2010-01-01..2010-12-31"));
        assert!(output.contains("method: from fuel"));
    }

    #[test]
    fn test_no_facts_table_without_facts() {
        let output = Formatter::new().format_resolution(&resolve(&[]), false);
        assert!(!output.contains("Fact"));
    }

    #[test]
    fn test_explain_shows_methods_and_skips() {
        let output = Formatter::new().format_resolution(&resolve(&["daily_distance=40"]), true);

        assert!(output.contains("from daily distance and timeframe"));
        assert!(output.contains("daily_distance ← fact"));
        assert!(output.contains("× from weekly distance and timeframe: weekly_distance is unknown"));
        assert!(output.contains("default (fallback)"));
    }

    #[test]
    fn test_undefined_value_prints_question_mark() {
        let engine = engine();
        let resolution = engine
            .resolve(
                "fuel_type",
                &FactStore::new(),
                Some(TimeRange::year(2010).unwrap()),
                &Compliance::require([Standard::Iso]),
            )
            .unwrap();

        let output = Formatter::new().format_resolution(&resolution, false);

        assert!(output.contains("fuel_type = ?"));
        assert!(output.contains("complies with: ISO 14064-1"));
    }

    #[test]
    fn test_format_value_rounds_numbers() {
        let value = Value::Number(rust_decimal::Decimal::new(1234567, 5));
        assert_eq!(format_value(Some(&value)), "12.3457");
    }

    #[test]
    fn test_nodes_listing() {
        let output = Formatter::new().format_nodes(engine().registry());

        assert!(output.contains("emission (guaranteed)"));
        assert!(output.contains("1. from fuel"));
        assert!(output.contains("needs: fuel_consumed, emission_factor"));
        assert!(output.contains("appreciates: fuel_type"));
        assert!(output.contains("complies: ghg_protocol_scope_1, ghg_protocol_scope_3, iso"));
        assert!(output.contains("energy\n"));
    }

    #[test]
    fn test_inputs_table() {
        let output = Formatter::new().format_inputs(engine().registry());

        assert!(output.contains("daily_distance"));
        assert!(output.contains("make/model/year"));
    }
}
