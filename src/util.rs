use log::LevelFilter;

/// Clap value parser for `--skill`.
pub fn parse_skill(input: &str) -> Result<f64, String> {
    let skill: f64 = input
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", input, e))?;

    if !(0.0..=1.0).contains(&skill) {
        return Err(format!("skill must be within 0.0..=1.0, got {}", skill));
    }

    Ok(skill)
}

/// Clap value parser for `--proximity`.
pub fn parse_proximity(input: &str) -> Result<u8, String> {
    let proximity: u8 = input
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a valid proximity: {}", input, e))?;

    if !(1..=127).contains(&proximity) {
        return Err(format!(
            "proximity must be within 1..=127 semitones, got {}",
            proximity
        ));
    }

    Ok(proximity)
}

/// Logging filter used when `RUST_LOG` isn't set.
pub fn default_log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
