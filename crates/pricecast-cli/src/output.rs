use std::io::Write;

use pricecast_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    out: &mut impl Write,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(out, envelope)?,
    }

    Ok(())
}

fn render_table(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    if let Some(trace_id) = &envelope.meta.trace_id {
        writeln!(out, "trace_id    : {trace_id}")?;
    }
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(
        out,
        "sources     : {}",
        envelope
            .meta
            .source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    if let Some(summary) = prediction_summary(&envelope.data) {
        writeln!(out, "prediction:")?;
        for (label, value) in summary {
            writeln!(out, "  {label:<12}: {value}")?;
        }
    } else {
        writeln!(out, "data:")?;
        let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
        for line in pretty_data.lines() {
            writeln!(out, "  {line}")?;
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Label/value rows for a `predict` payload; `None` for other commands.
fn prediction_summary(data: &Value) -> Option<Vec<(&'static str, String)>> {
    let prediction = data.get("prediction")?;
    let analysis = data.get("analysis")?;
    let display = analysis.get("display")?;
    let text = |value: &Value| match value {
        Value::String(text) => text.clone(),
        Value::Null => String::from("-"),
        other => other.to_string(),
    };

    Some(vec![
        ("symbol", text(&prediction["symbol"])),
        ("company", text(&prediction["company_name"])),
        ("market", text(&analysis["market_badge"])),
        ("current", format!("{} ({})", text(&display["current_price"]), text(&display["daily_change"]))),
        ("target_year", text(&prediction["target_year"])),
        ("projected", format!("{} ({})", text(&display["projected_price"]), text(&display["projected_change"]))),
        ("horizon", text(&analysis["horizon"])),
        ("trend", format!("{}: {}", text(&analysis["headline"]), text(&analysis["description"]))),
        ("confidence", format!("{}%", text(&prediction["projection"]["confidence"]))),
        ("risk", format!("{} (gauge {})", text(&prediction["projection"]["risk_level"]), text(&analysis["risk_gauge"]))),
        ("volatility", text(&display["volatility"])),
        ("momentum", text(&analysis["momentum"])),
        ("support", text(&display["support"])),
        ("resistance", text(&display["resistance"])),
        ("outlook", text(&analysis["price_movement"])),
    ])
}

#[cfg(test)]
mod tests {
    use pricecast_core::{EnvelopeError, EnvelopeMeta, ProviderId};
    use serde_json::json;

    use super::*;

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Simulated], 4)
            .expect("valid meta");
        Envelope::success(meta, data)
    }

    fn rendered(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> String {
        let mut out = Vec::new();
        render(&mut out, envelope, format, pretty).expect("renders");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn ndjson_is_a_single_line() {
        let text = rendered(&envelope(json!({ "closes": [1.0, 2.0] })), OutputFormat::Ndjson, true);
        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(text.trim_end()).expect("valid json");
        assert_eq!(parsed["meta"]["schema_version"], "v1.0.0");
        assert!(parsed.get("errors").is_none());
    }

    #[test]
    fn pretty_json_spans_lines() {
        let text = rendered(&envelope(json!({ "a": 1 })), OutputFormat::Json, true);
        assert!(text.lines().count() > 1);
    }

    #[test]
    fn table_lists_errors_and_raw_data() {
        let mut envelope = envelope(json!({ "quote": null }));
        envelope.errors.push(
            EnvelopeError::new("source.unavailable", "connection refused").expect("valid error"),
        );

        let text = rendered(&envelope, OutputFormat::Table, false);
        assert!(text.contains("sources     : simulated"));
        assert!(text.contains("data:"));
        assert!(text.contains("  - source.unavailable: connection refused"));
    }

    #[test]
    fn table_summarizes_predictions() {
        let data = json!({
            "prediction": {
                "symbol": "GTCO",
                "company_name": "Guaranty Trust Holding Company",
                "target_year": 2030,
                "projection": { "confidence": 62, "risk_level": "medium" }
            },
            "analysis": {
                "market_badge": "Nigerian Market",
                "headline": "Bullish Trend",
                "description": "Strong upward momentum expected",
                "horizon": "4 years ahead",
                "risk_gauge": 60,
                "momentum": "Moderate",
                "price_movement": "Historical analysis indicates strong growth potential with positive momentum indicators.",
                "display": {
                    "current_price": "₦32.15",
                    "daily_change": "+1.20%",
                    "projected_price": "₦45.00",
                    "projected_change": "+39.97%",
                    "volatility": "16.2%",
                    "support": "₦28.94",
                    "resistance": "₦36.97"
                }
            }
        });

        let text = rendered(&envelope(data), OutputFormat::Table, false);
        assert!(text.contains("prediction:"));
        assert!(text.contains("  projected   : ₦45.00 (+39.97%)"));
        assert!(text.contains("  confidence  : 62%"));
        assert!(text.contains("  risk        : medium (gauge 60)"));
        assert!(!text.contains("data:"));
    }
}
