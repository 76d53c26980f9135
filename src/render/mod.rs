use std::fmt::Write;

use crate::wire::{TravelLeg, TripPlan};

fn money(v: f64) -> String {
    format!("₹{v}")
}

fn leg_line(out: &mut String, label: &str, leg: &TravelLeg) {
    let _ = writeln!(out, "{label}: {} ({}h, {})", leg.mode, leg.duration_hours, money(leg.cost));
    if !leg.notes.is_empty() {
        let _ = writeln!(out, "  {}", leg.notes);
    }
}

/// Plain-text transcript of a plan. One-way: nothing parses this back.
pub fn text_report(plan: &TripPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Escaply Trip Plan");
    let _ = writeln!(out, "=================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Destination: {}", plan.destination);

    if plan.to_destination_travel.is_some() || plan.return_travel.is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "GETTING THERE");
        let _ = writeln!(out, "-------------");
        if let Some(leg) = &plan.to_destination_travel {
            leg_line(&mut out, "Outbound", leg);
        }
        if let Some(leg) = &plan.return_travel {
            leg_line(&mut out, "Return", leg);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "ITINERARY");
    let _ = writeln!(out, "---------");
    for day in &plan.plan_days {
        let _ = writeln!(out);
        let _ = writeln!(out, "Day {}: {}", day.day, day.title);
        let _ = writeln!(out, "Morning: {}", day.morning);
        let _ = writeln!(out, "Afternoon: {}", day.afternoon);
        let _ = writeln!(out, "Evening: {}", day.evening);
        let _ = writeln!(out, "Estimated Budget: {}", money(day.estimated_day_budget));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "ACCOMMODATION SUGGESTIONS");
    let _ = writeln!(out, "-------------------------");
    for acc in &plan.accommodation_suggestions {
        let _ = writeln!(out);
        let _ = writeln!(out, "• {} ({})", acc.name, acc.kind);
        let _ = writeln!(out, "  Price Range: {}", acc.price_range);
        if let Some(r) = acc.rating {
            let _ = writeln!(out, "  Rating: {r}/5");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "FOOD RECOMMENDATIONS");
    let _ = writeln!(out, "--------------------");
    for food in &plan.food_recommendations {
        let _ = writeln!(out);
        let _ = writeln!(out, "• {}", food.name);
        let _ = writeln!(out, "  Cuisine: {}", food.cuisine);
        let _ = writeln!(out, "  Price Range: {}", food.price_range);
        let _ = writeln!(out, "  Must Try: {}", food.must_try.join(", "));
    }

    let b = &plan.budget_summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "BUDGET SUMMARY");
    let _ = writeln!(out, "--------------");
    let _ = writeln!(out, "Total: {}", money(b.total));
    let _ = writeln!(out, "• Stay: {}", money(b.stay));
    let _ = writeln!(out, "• Travel: {}", money(b.travel));
    let _ = writeln!(out, "• Food: {}", money(b.food));
    let _ = writeln!(out, "• Activities: {}", money(b.activities));

    let _ = writeln!(out);
    let _ = writeln!(out, "TRAVEL TIPS");
    let _ = writeln!(out, "-----------");
    for tip in &plan.travel_tips {
        let _ = writeln!(out, "• {tip}");
    }
    out
}

/// Download name for the text report, safe to put in a header.
pub fn export_filename(destination: &str) -> String {
    let slug: String = destination
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "escaply-trip-plan.txt".to_string()
    } else {
        format!("escaply-trip-plan-{slug}.txt")
    }
}
