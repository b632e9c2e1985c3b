//! Classify command - print the semantic category of dtype tags.

use colored::Colorize;
use inferview::classify;

pub fn run(tags: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let width = tags.iter().map(|t| t.chars().count()).max().unwrap_or(0);

    for tag in tags {
        let classification = classify(tag);
        println!(
            "{:width$}  {:16} {}",
            tag,
            classification.category.to_string(),
            classification.label.cyan(),
            width = width
        );
    }

    Ok(())
}
