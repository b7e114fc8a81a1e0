use std::fmt::Display;

use serde::Serialize;

use crate::models::{AnalysisResult, ScalarValue};

pub const REPORT_HEADING: &str = "📋 Relatório de Análise";

const YES: &str = "✅ Sim";
const NO: &str = "❌ Não";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

/// Turns an analysis result into labeled entries, in the order received.
pub fn render(result: &AnalysisResult) -> Report {
    Report {
        entries: result
            .iter()
            .map(|(key, value)| ReportEntry {
                label: format_label(key),
                value: format_value(value),
            })
            .collect(),
    }
}

/// `has_inverted_faces` -> `Has Inverted Faces`
pub fn format_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut word_start = true;
    for c in key.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if word_start && !c.is_whitespace() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        word_start = c.is_whitespace();
    }
    label
}

pub fn format_value(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Bool(true) => YES.to_string(),
        ScalarValue::Bool(false) => NO.to_string(),
        other => other.to_string(),
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", REPORT_HEADING)?;
        for entry in &self.entries {
            writeln!(f, "- {}: {}", entry.label, entry.value)?;
        }
        Ok(())
    }
}
