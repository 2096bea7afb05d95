use pageflow_spec::DisplayLine;
use serde_json::Value;

/// Plain-text rendering of a question record.
pub fn describe_question(question: &Value) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Question: {} ({})",
        question["text"].as_str().unwrap_or_default(),
        question["id"].as_str().unwrap_or_default()
    ));
    lines.push(format!(
        "  Step: {}",
        question["step"].as_str().unwrap_or_default()
    ));
    lines.push(format!(
        "  Format: {} / {}",
        question["format"].as_str().unwrap_or_default(),
        question["type"].as_str().unwrap_or_default()
    ));
    if let Some(options) = question["options"].as_str().filter(|raw| !raw.is_empty()) {
        lines.push(format!("  Options: {}", options));
    }
    if let Some(answers) = question["answers"].as_array().filter(|raw| !raw.is_empty()) {
        let answers = answers
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  Answers: {}", answers));
    }
    if let Some(decision) = question["decision"].as_str() {
        lines.push(format!("  Decision: {}", decision));
    }
    lines.join("\n")
}

/// Plain-text rendering of summary lines, one block per question.
pub fn render_summary(lines: &[DisplayLine]) -> String {
    if lines.is_empty() {
        return "Nothing to summarise.".to_string();
    }
    let mut output = Vec::new();
    for line in lines {
        output.push(format!("{} [{}]", line.sub_heading, line.link));
        for text in &line.lines {
            output.push(format!("  {}", text));
        }
    }
    output.join("\n")
}
