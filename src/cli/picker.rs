//! Interactive location picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `epi trend` and choose a country" UX
//!
//! The picker lists locations from the loaded dataset and accepts either a
//! number, an exact name, or a unique prefix.

use std::io::{self, Write};

use crate::error::AppError;

/// How many locations to list before eliding the rest.
const LIST_LIMIT: usize = 30;

/// Prompt the user to select a location from the dataset.
pub fn prompt_for_location(locations: &[String]) -> Result<String, AppError> {
    if locations.is_empty() {
        return Err(AppError::empty_selection(
            "The dataset contains no locations.",
        ));
    }

    println!("Found {} location(s):", locations.len());
    for (idx, loc) in locations.iter().take(LIST_LIMIT).enumerate() {
        println!("{:>4}) {loc}", idx + 1);
    }
    if locations.len() > LIST_LIMIT {
        println!("     … and {} more (type a name).", locations.len() - LIST_LIMIT);
    }

    loop {
        print!(
            "Select a location by number (1-{}) or type a name (q to quit): ",
            locations.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::invalid_input(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::invalid_input(format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::invalid_input(
                "No input received. Provide a location with `-c <name>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::invalid_input("Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=locations.len()).contains(&choice) {
                return Ok(locations[choice - 1].clone());
            }
            println!(
                "Invalid choice: {choice}. Enter a number between 1 and {}.",
                locations.len()
            );
            continue;
        }

        match resolve_location(locations, input) {
            Ok(loc) => return Ok(loc),
            Err(err) => {
                println!("{err}");
                continue;
            }
        }
    }
}

/// Resolve a typed name: exact (case-insensitive) first, then unique prefix.
pub fn resolve_location(locations: &[String], input: &str) -> Result<String, AppError> {
    let needle = input.trim();

    if let Some(exact) = locations.iter().find(|l| l.eq_ignore_ascii_case(needle)) {
        return Ok(exact.clone());
    }

    let lower = needle.to_lowercase();
    let matches: Vec<&String> = locations
        .iter()
        .filter(|l| l.to_lowercase().starts_with(&lower))
        .collect();

    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => Err(AppError::empty_selection(format!(
            "No location matches '{needle}'."
        ))),
        many => Err(AppError::invalid_input(format!(
            "'{needle}' is ambiguous: {}",
            many.iter()
                .take(5)
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> Vec<String> {
        ["Brazil", "France", "Germany", "India", "Japan"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert_eq!(resolve_location(&locations(), "brazil").unwrap(), "Brazil");
    }

    #[test]
    fn unique_prefix_resolves() {
        assert_eq!(resolve_location(&locations(), "ger").unwrap(), "Germany");
    }

    #[test]
    fn ambiguous_and_unknown_inputs_fail() {
        let locs = vec!["India".to_string(), "Indonesia".to_string()];
        assert!(resolve_location(&locs, "ind").is_err());
        assert!(resolve_location(&locs, "xyz").is_err());
    }
}
