use forecast_core::{ForecastView, StatusKind};

/// Print the heading and one block per card. Nothing when the section is hidden.
pub fn print_forecast(view: &ForecastView) {
    let Some(heading) = view.heading() else {
        return;
    };

    println!("{heading}");
    println!("{}", "-".repeat(heading.chars().count()));

    for card in view.cards() {
        if card.description.is_empty() {
            println!("{}", card.date);
        } else {
            println!("{}  {}", card.date, card.description);
        }
        println!("  {}", card.temperature);
        println!("  {}", card.extra);
    }
    println!();
}

/// Errors go to stderr, everything else to stdout.
pub fn print_status(view: &ForecastView) {
    let Some(status) = &view.status else {
        return;
    };

    match status.kind {
        StatusKind::Error => eprintln!("[{}] {}", status.kind.as_str(), status.text),
        _ => println!("[{}] {}", status.kind.as_str(), status.text),
    }
}
