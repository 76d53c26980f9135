use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::wire::{Diagnostics, TripPlan};

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn show_itinerary(plan: &TripPlan) {
    println!("\n=== YOUR TRIP TO {} ===", plan.destination.to_uppercase().bold());

    for (label, leg) in [("Outbound", &plan.to_destination_travel), ("Return", &plan.return_travel)] {
        if let Some(l) = leg {
            println!("{}  {} · {}h · ₹{}", format!("[{label}]").cyan().bold(), l.mode, l.duration_hours, l.cost);
        }
    }

    for d in &plan.plan_days {
        println!("\n{}  {}  {}", format!("Day {}", d.day).green().bold(), d.title.bold(), format!("₹{}", d.estimated_day_budget).yellow());
        println!("  {} {}", "morning:".dimmed(), d.morning);
        println!("  {} {}", "afternoon:".dimmed(), d.afternoon);
        println!("  {} {}", "evening:".dimmed(), d.evening);
    }

    if !plan.accommodation_suggestions.is_empty() {
        println!("\n{}", "Where to stay".magenta().bold());
        for a in &plan.accommodation_suggestions {
            let rating = a.rating.map(|r| format!("  ★ {r}/5")).unwrap_or_default();
            println!("  • {} ({}) {}{}", a.name, a.kind, a.price_range, rating);
        }
    }

    if !plan.food_recommendations.is_empty() {
        println!("\n{}", "Food".magenta().bold());
        for f in &plan.food_recommendations {
            println!("  • {} [{}] {}  must try: {}", f.name, f.cuisine, f.price_range, f.must_try.join(", "));
        }
    }

    let b = &plan.budget_summary;
    println!(
        "\n{}  stay ₹{}  travel ₹{}  food ₹{}  activities ₹{}  {} ₹{}",
        "Budget".magenta().bold(), b.stay, b.travel, b.food, b.activities, "total".bold(), b.total
    );

    if !plan.travel_tips.is_empty() {
        println!("\n{}", "Tips".magenta().bold());
        for t in &plan.travel_tips {
            println!("  • {t}");
        }
    }
    println!();
}

pub fn show_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("{}", "Plan review warnings:".yellow().bold());
    for w in warnings {
        println!(" - {w}");
    }
}

pub fn show_artifacts(dir: &Path) {
    println!("{} {}", "artifacts:".dimmed(), dir.display());
}

pub fn show_diagnostics(d: &Diagnostics) {
    let key = if d.has_api_key { "set".green() } else { "missing".red() };
    println!("api key: {} (length {})", key.bold(), d.api_key_length);
    println!("model override: {}", d.model);
}
