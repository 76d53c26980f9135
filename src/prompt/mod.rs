use crate::wire::TripConstraints;

fn output_format() -> &'static str {
r#"Output format:
{
  "destination": "Destination Name",
  "to_destination_travel": {
    "mode": "Train/Flight/Bus/Drive",
    "cost": 1200,
    "duration_hours": 5,
    "notes": "Sleeper train from Chennai to Coorg"
  },
  "return_travel": {
    "mode": "Train/Flight/Bus/Drive",
    "cost": 1200,
    "duration_hours": 6,
    "notes": "Evening bus from Coorg to Chennai"
  },
  "plan_days": [
    {
      "day": 1,
      "title": "Day Title",
      "morning": "Morning activity description",
      "afternoon": "Afternoon activity description",
      "evening": "Evening activity description",
      "estimated_day_budget": 3000
    }
  ],
  "accommodation_suggestions": [
    {
      "name": "Hotel/Homestay Name",
      "type": "Hotel/Homestay/Resort",
      "price_range": "₹2000-3000 per night",
      "rating": 4.2
    }
  ],
  "food_recommendations": [
    {
      "name": "Restaurant Name",
      "cuisine": "Local/Continental/etc",
      "price_range": "₹300-500 per person",
      "must_try": ["Dish 1", "Dish 2"]
    }
  ],
  "budget_summary": {
    "total": 10000,
    "stay": 4000,
    "travel": 2400,
    "food": 2000,
    "activities": 1600
  },
  "travel_tips": [
    "Tip 1",
    "Tip 2",
    "Tip 3"
  ]
}"#
}

/// Builds the single prompt sent to the provider. User text is interpolated
/// verbatim.
pub fn trip_prompt(c: &TripConstraints) -> String {
    let length = match c.duration_days {
        Some(n) => format!("{n}-day"),
        None => "short".to_string(),
    };
    let kind = c.trip_type.map(|t| t.as_str()).unwrap_or("leisure");
    let budget = match c.budget_range.as_deref().map(str::trim) {
        Some(b) if !b.is_empty() => format!(", under ₹{b}"),
        _ => String::new(),
    };
    let style = match c.travel_style {
        Some(s) => format!(", travelling {} style ({})", s, s.description()),
        None => String::new(),
    };
    let day_count = match c.duration_days {
        Some(n) => format!("- Generate exactly {n} entries under \"plan_days\".\n"),
        None => String::new(),
    };

    format!(
"You are a creative and resourceful travel planner for urban Indians. Your goal is to generate a unique, memorable, and practical {length} {kind} trip from {origin} in {month}{budget}{style}.

Instructions:
- Choose a destination that is suitable for this trip type and budget.
- Based on the origin and destination, select a suitable mode of travel (e.g., flight, train, bus, self-drive) that fits within the budget.
- Calculate the **approximate round-trip travel cost** based on typical fares for that route and mode.
- Include **travel time and mode** in the plan (especially if it affects Day 1 or the last day).
- Deduct this cost from the overall budget and reflect it in both `budget_summary` and daily plans if applicable.
- For each day, create a detailed itinerary with morning, afternoon, and evening activities. Include at least one offbeat or local experience daily.
- Recommend at least two food places and two places to stay, one of which should be a hidden gem.
- Add a surprise element (quirky cafe, secret viewpoint, local event, etc.).
- Provide travel tips and avoid generic suggestions.
- Output only valid JSON in the format below. No explanations or sources.
{day_count}
{format}
",
        origin = c.origin,
        month = c.travel_month,
        format = output_format(),
    )
}
