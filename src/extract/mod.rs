use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::errors::ExtractError;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static JSON_FENCE: Pattern = LazyLock::new(|| Regex::new(r"(?i)```json\s*"));
static GREEDY_OBJECT: Pattern = LazyLock::new(|| Regex::new(r"(?s)\{.*\}"));

fn compiled(pattern: &'static Pattern) -> Result<&'static Regex, ExtractError> {
    pattern.as_ref().map_err(|e| ExtractError::Pattern(e.to_string()))
}

/// Removes the first "```json" opener and every remaining triple backtick.
pub fn strip_fences(raw: &str) -> Result<String, ExtractError> {
    let opened = compiled(&JSON_FENCE)?.replacen(raw, 1, "");
    Ok(opened.replace("```", "").trim().to_string())
}

/// Span from the first `{` to the last `}`. Not a parser: braces inside
/// strings or a second object in the text widen the span.
pub fn object_span(text: &str) -> Result<Option<&str>, ExtractError> {
    Ok(compiled(&GREEDY_OBJECT)?.find(text).map(|m| m.as_str()))
}

/// Pulls the plan object out of free-form model output. The object is
/// returned as decoded; its fields are not checked against any schema.
pub fn trip_plan(raw: &str) -> Result<Value, ExtractError> {
    let cleaned = strip_fences(raw)?;
    let span = object_span(&cleaned)?.ok_or(ExtractError::NoObject)?;
    serde_json::from_str(span).map_err(|e| ExtractError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PLAIN: &str = r#"{
  "destination": "Coorg",
  "plan_days": [
    { "day": 1, "title": "Coffee estates", "morning": "Walk", "afternoon": "Abbey Falls", "evening": "Bonfire", "estimated_day_budget": 2500 }
  ],
  "budget_summary": { "total": 9000, "stay": 4000, "travel": 2400, "food": 1600, "activities": 1000 },
  "travel_tips": ["Carry a raincoat"]
}"#;

    #[test]
    fn fenced_and_plain_output_agree() {
        let fenced = format!("```json\n{PLAIN}\n```");
        let upper = format!("Here you go:\n```JSON\n{PLAIN}\n```\nEnjoy!");
        let expected = trip_plan(PLAIN).unwrap();
        assert_eq!(trip_plan(&fenced).unwrap(), expected);
        assert_eq!(trip_plan(&upper).unwrap(), expected);
    }

    #[test]
    fn bare_fences_are_removed_too() {
        let fenced = format!("```\n{PLAIN}\n```");
        assert_eq!(trip_plan(&fenced).unwrap()["destination"], "Coorg");
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let chatty = format!("Sure! Based on your budget:\n{PLAIN}\nLet me know if you need changes.");
        let plan = trip_plan(&chatty).unwrap();
        assert_eq!(plan["plan_days"][0]["title"], "Coffee estates");
        assert_eq!(plan["budget_summary"]["total"], 9000);
    }

    #[test]
    fn decoded_values_survive_reencoding() {
        let plan = trip_plan(PLAIN).unwrap();
        let again: Value = serde_json::from_str(&serde_json::to_string(&plan).unwrap()).unwrap();
        assert_eq!(again, plan);
        assert_eq!(again, serde_json::from_str::<Value>(PLAIN).unwrap());
    }

    #[test]
    fn off_schema_values_are_not_rejected() {
        let text = r#"```json
{"destination":"Gokarna",
 "to_destination_travel":{"mode":"Train","cost":"₹1200","duration_hours":"8-9","notes":null},
 "plan_days":[],
 "surprise_element":"Sunset at Half Moon beach"}
```"#;
        let plan = trip_plan(text).unwrap();
        assert_eq!(plan["to_destination_travel"]["duration_hours"], "8-9");
        assert_eq!(plan["to_destination_travel"]["notes"], Value::Null);
        assert_eq!(plan["surprise_element"], "Sunset at Half Moon beach");

        let again: Value = serde_json::from_str(&plan.to_string()).unwrap();
        assert_eq!(again, plan);
    }

    #[test]
    fn any_object_shape_is_accepted() {
        assert_eq!(trip_plan("{}").unwrap(), json!({}));
        assert_eq!(trip_plan(r#"{"plan_days": "three"}"#).unwrap(), json!({ "plan_days": "three" }));
    }

    #[test]
    fn built_in_patterns_compile() {
        assert!(compiled(&JSON_FENCE).unwrap().is_match("```JSON\n"));
        assert!(compiled(&GREEDY_OBJECT).unwrap().is_match("x {\n} y"));
        assert_eq!(strip_fences("```json\n{}\n```"), Ok("{}".to_string()));
    }

    #[test]
    fn no_brace_means_no_object() {
        assert_eq!(trip_plan("I cannot help with that."), Err(ExtractError::NoObject));
    }

    #[test]
    fn broken_span_is_invalid_json() {
        let err = trip_plan("{ \"destination\": \"Ooty\", }").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson(_)));
    }

    #[test]
    fn two_objects_widen_the_span_and_fail() {
        let text = r#"{"destination": "A"} and also {"destination": "B"}"#;
        assert_eq!(object_span(text), Ok(Some(text)));
        assert!(matches!(trip_plan(text), Err(ExtractError::InvalidJson(_))));
    }

    #[test]
    fn braces_inside_strings_are_kept_when_balanced() {
        let text = r#"{"destination": "Leh", "travel_tips": ["Pack {layers}"]}"#;
        assert_eq!(trip_plan(text).unwrap()["travel_tips"][0], "Pack {layers}");
    }
}
