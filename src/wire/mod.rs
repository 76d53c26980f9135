use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// ========================================
/// Request side: what the form submits
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Chill,
    Explore,
    Adventure,
    Couple,
    Solo,
    Family,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Chill => "chill",
            TripType::Explore => "explore",
            TripType::Adventure => "adventure",
            TripType::Couple => "couple",
            TripType::Solo => "solo",
            TripType::Family => "family",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Backpacker,
    Comfort,
    Premium,
}

impl TravelStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelStyle::Backpacker => "backpacker",
            TravelStyle::Comfort => "comfort",
            TravelStyle::Premium => "premium",
        }
    }

    /// Short phrase used when describing the style to the model.
    pub fn description(&self) -> &'static str {
        match self {
            TravelStyle::Backpacker => "budget-friendly, basic amenities",
            TravelStyle::Comfort => "good hotels, balanced experience",
            TravelStyle::Premium => "luxury stays, premium experiences",
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints collected by the form. Every field is optional on the wire so a
/// missing `origin` reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripConstraints {
    #[serde(default)]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_type: Option<TripType>,
    #[serde(default)]
    pub travel_month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<TravelStyle>,
}

impl TripConstraints {
    /// Presence check for the two fields the prompt cannot do without.
    pub fn has_required_fields(&self) -> bool {
        !self.origin.trim().is_empty() && !self.travel_month.trim().is_empty()
    }
}

/// ========================================
/// Response side: what the model sends back
/// ========================================
///
/// The model's JSON is passed to clients untouched as a `serde_json::Value`.
/// The structs below are a read-only view over it for review, text export and
/// the terminal. Every field tolerates `null`, numbers given as strings and
/// strings given as numbers, so building the view never rejects a plan.

fn text_of(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First decimal number inside `s`, ignoring currency signs and thousands
/// separators: "₹1,200" is 1200, "8-9" is 8.
fn leading_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

fn number_of(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => leading_number(s),
        _ => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text_of(&Value::deserialize(d)?))
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(number_of(&Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(number_of(&Value::deserialize(d)?))
}

fn lenient_day<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(number_of(&Value::deserialize(d)?).map_or(0, |n| n as u32))
}

/// A list of strings, a lone string, or nothing.
fn lenient_texts<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items.iter().map(text_of).filter(|s| !s.is_empty()).collect(),
        Value::Null => Vec::new(),
        other => vec![text_of(&other)],
    })
}

/// Entries that are not objects are skipped rather than failing the list.
fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_record<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(d)? {
        v @ Value::Object(_) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

fn lenient_summary<'de, D: Deserializer<'de>>(d: D) -> Result<BudgetSummary, D::Error> {
    Ok(lenient_record(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TravelLeg {
    #[serde(deserialize_with = "lenient_text")]
    pub mode: String,
    #[serde(deserialize_with = "lenient_number")]
    pub cost: f64,
    /// Kept as text: models write "8-9" as often as 8.
    #[serde(deserialize_with = "lenient_text")]
    pub duration_hours: String,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DayPlan {
    #[serde(deserialize_with = "lenient_day")]
    pub day: u32,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub morning: String,
    #[serde(deserialize_with = "lenient_text")]
    pub afternoon: String,
    #[serde(deserialize_with = "lenient_text")]
    pub evening: String,
    #[serde(deserialize_with = "lenient_number")]
    pub estimated_day_budget: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccommodationSuggestion {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: String,
    #[serde(deserialize_with = "lenient_text")]
    pub price_range: String,
    #[serde(deserialize_with = "lenient_opt_number")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FoodRecommendation {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub cuisine: String,
    #[serde(deserialize_with = "lenient_text")]
    pub price_range: String,
    #[serde(deserialize_with = "lenient_texts")]
    pub must_try: Vec<String>,
}

/// Figures as the model reported them. Nothing checks that the parts add up.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BudgetSummary {
    #[serde(deserialize_with = "lenient_number")]
    pub total: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub stay: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub travel: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub food: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub activities: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TripPlan {
    #[serde(deserialize_with = "lenient_text")]
    pub destination: String,
    #[serde(deserialize_with = "lenient_record")]
    pub to_destination_travel: Option<TravelLeg>,
    #[serde(deserialize_with = "lenient_record")]
    pub return_travel: Option<TravelLeg>,
    #[serde(deserialize_with = "lenient_list")]
    pub plan_days: Vec<DayPlan>,
    #[serde(deserialize_with = "lenient_list")]
    pub accommodation_suggestions: Vec<AccommodationSuggestion>,
    #[serde(deserialize_with = "lenient_list")]
    pub food_recommendations: Vec<FoodRecommendation>,
    #[serde(deserialize_with = "lenient_summary")]
    pub budget_summary: BudgetSummary,
    #[serde(deserialize_with = "lenient_texts")]
    pub travel_tips: Vec<String>,
}

impl TripPlan {
    /// Typed view over a decoded plan. Only a non-object top level fails.
    pub fn view(value: &Value) -> Result<TripPlan, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("plan is not a JSON object"));
        }
        TripPlan::deserialize(value)
    }
}

/// Envelope returned by `POST /api/generate-plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self { success: true, data: Some(data), error: None, details: None }
    }

    pub fn fail(error: impl Into<String>, details: Option<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()), details }
    }
}

/// Body of `GET /api/test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub has_api_key: bool,
    pub api_key_length: usize,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constraints_accept_partial_bodies() {
        let c: TripConstraints = serde_json::from_value(json!({ "origin": "Pune" })).unwrap();
        assert_eq!(c.origin, "Pune");
        assert!(c.travel_month.is_empty());
        assert!(!c.has_required_fields());
    }

    #[test]
    fn whitespace_only_fields_are_missing() {
        let c = TripConstraints {
            origin: "  ".into(),
            travel_month: "May".into(),
            ..Default::default()
        };
        assert!(!c.has_required_fields());
    }

    #[test]
    fn enums_use_lowercase_labels() {
        let c: TripConstraints = serde_json::from_value(json!({
            "origin": "Delhi",
            "travel_month": "March",
            "trip_type": "adventure",
            "travel_style": "premium"
        }))
        .unwrap();
        assert_eq!(c.trip_type, Some(TripType::Adventure));
        assert_eq!(c.travel_style, Some(TravelStyle::Premium));
        assert_eq!(TripType::Family.to_string(), "family");
    }

    #[test]
    fn plan_tolerates_missing_sections() {
        let plan = TripPlan::view(&json!({
            "destination": "Hampi",
            "plan_days": [{ "day": 1, "title": "Boulders" }]
        }))
        .unwrap();
        assert_eq!(plan.destination, "Hampi");
        assert!(plan.to_destination_travel.is_none());
        assert_eq!(plan.plan_days[0].estimated_day_budget, 0.0);
        assert!(plan.travel_tips.is_empty());
    }

    #[test]
    fn accommodation_type_reads_wire_name() {
        let plan = TripPlan::view(&json!({
            "accommodation_suggestions": [{ "name": "Tree House", "type": "Homestay", "price_range": "₹2000" }]
        }))
        .unwrap();
        let acc = &plan.accommodation_suggestions[0];
        assert_eq!(acc.kind, "Homestay");
        assert!(acc.rating.is_none());
    }

    #[test]
    fn view_accepts_nulls_and_string_numbers() {
        let plan = TripPlan::view(&json!({
            "destination": "Gokarna",
            "to_destination_travel": { "mode": "Train", "cost": "₹1,200", "duration_hours": "8-9", "notes": null },
            "return_travel": null,
            "plan_days": [
                { "day": "1", "title": "Om Beach", "morning": null, "estimated_day_budget": "2500 approx" },
                "free day"
            ],
            "accommodation_suggestions": [{ "name": "Zostel", "type": null, "rating": "4.3" }],
            "food_recommendations": [{ "name": "Namaste Cafe", "must_try": "Fish thali" }],
            "budget_summary": { "total": "9000", "stay": 3000, "travel": null },
            "travel_tips": null
        }))
        .unwrap();

        let leg = plan.to_destination_travel.unwrap();
        assert_eq!(leg.cost, 1200.0);
        assert_eq!(leg.duration_hours, "8-9");
        assert_eq!(leg.notes, "");
        assert!(plan.return_travel.is_none());
        assert_eq!(plan.plan_days.len(), 1);
        assert_eq!(plan.plan_days[0].day, 1);
        assert_eq!(plan.plan_days[0].morning, "");
        assert_eq!(plan.plan_days[0].estimated_day_budget, 2500.0);
        assert_eq!(plan.accommodation_suggestions[0].rating, Some(4.3));
        assert_eq!(plan.food_recommendations[0].must_try, vec!["Fish thali".to_string()]);
        assert_eq!(plan.budget_summary.total, 9000.0);
        assert_eq!(plan.budget_summary.travel, 0.0);
        assert!(plan.travel_tips.is_empty());
    }

    #[test]
    fn view_ignores_wrongly_shaped_sections() {
        let plan = TripPlan::view(&json!({
            "destination": 42,
            "plan_days": "three",
            "budget_summary": [1, 2],
            "to_destination_travel": "by bus"
        }))
        .unwrap();
        assert_eq!(plan.destination, "42");
        assert!(plan.plan_days.is_empty());
        assert_eq!(plan.budget_summary, BudgetSummary::default());
        assert!(plan.to_destination_travel.is_none());
    }

    #[test]
    fn view_of_non_object_fails() {
        assert!(TripPlan::view(&json!("Goa")).is_err());
        assert!(TripPlan::view(&json!([1, 2])).is_err());
    }

    #[test]
    fn success_envelope_carries_data_verbatim() {
        let data = json!({ "destination": "Hampi", "surprise_element": "Sunset at Matanga Hill" });
        let v = serde_json::to_value(ApiResponse::ok(data.clone())).unwrap();
        assert_eq!(v, json!({ "success": true, "data": data }));
    }

    #[test]
    fn failure_envelope_omits_data() {
        let v = serde_json::to_value(ApiResponse::fail("Missing required fields", None)).unwrap();
        assert_eq!(v, json!({ "success": false, "error": "Missing required fields" }));
    }

    #[test]
    fn diagnostics_use_camel_case() {
        let d = Diagnostics { has_api_key: true, api_key_length: 39, model: "not-set".into() };
        let v = serde_json::to_value(d).unwrap();
        assert_eq!(v, json!({ "hasApiKey": true, "apiKeyLength": 39, "model": "not-set" }));
    }
}
