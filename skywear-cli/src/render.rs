//! Plain-text cards for the terminal.

use std::fmt::{self, Write};

use skywear_core::{
    DaySummary, OutfitRecommendation, TemperatureUnit, classify_condition,
    units::{format_day, format_time, ms_to_kmh},
};

use crate::cli::Report;

pub fn report(report: &Report, unit: TemperatureUnit) -> Result<String, fmt::Error> {
    let mut out = String::new();

    if report.synthetic {
        out.push_str("(placeholder data: weather service unavailable or not configured)\n\n");
    }

    out.push_str(&current(report, unit)?);
    out.push('\n');
    out.push_str(&forecast(&report.forecast, unit)?);
    out.push('\n');
    out.push_str(&outfit(&report.outfit)?);

    if let Some(advice) = &report.advice {
        writeln!(out, "\n{advice}")?;
    }

    Ok(out)
}

fn current(report: &Report, unit: TemperatureUnit) -> Result<String, fmt::Error> {
    let current = &report.current;
    let sample = &current.sample;
    let mut out = String::new();

    let place = if current.country.is_empty() {
        current.location_name.clone()
    } else {
        format!("{}, {}", current.location_name, current.country)
    };
    writeln!(out, "{place}")?;

    if let Some(local) = current.local_time() {
        writeln!(out, "{}, {}", format_day(&local), format_time(&local))?;
    }

    writeln!(
        out,
        "{}  {}  {}",
        report.icon.glyph(),
        unit.format(sample.temperature_c, true),
        sample.condition.description,
    )?;
    writeln!(out, "Feels like {}", unit.format(sample.feels_like_c, true))?;
    writeln!(
        out,
        "Min/Max {} / {}   Humidity {}%   Wind {:.0} km/h",
        unit.format(sample.temp_min_c, true),
        unit.format(sample.temp_max_c, true),
        sample.humidity_pct,
        ms_to_kmh(sample.wind_speed_mps),
    )?;

    let g = report.gradient;
    writeln!(out, "Theme {} ({} > {} > {})", report.theme, g.from, g.via, g.to)?;

    Ok(out)
}

pub fn forecast(days: &[DaySummary], unit: TemperatureUnit) -> Result<String, fmt::Error> {
    let mut out = format!("{}-Day Forecast\n", days.len());

    for day in days {
        // Forecast cards always use the daytime icon.
        let icon = classify_condition(&day.condition, true);
        writeln!(
            out,
            "  {:<4}{}  {:>4}° / {:>4}°  {}",
            day.day,
            icon.glyph(),
            unit.format(day.max_temp, false),
            unit.format(day.min_temp, false),
            day.condition,
        )?;
    }

    Ok(out)
}

pub fn outfit(rec: &OutfitRecommendation) -> Result<String, fmt::Error> {
    let mut out = String::from("Outfit Recommendation\n");

    writeln!(out, "  Top:       {}", rec.top_wear)?;
    writeln!(out, "  Bottom:    {}", rec.bottom_wear)?;
    writeln!(out, "  Footwear:  {}", rec.footwear)?;

    if !rec.accessories.is_empty() {
        writeln!(out, "  Accessories:")?;
        for item in &rec.accessories {
            writeln!(out, "    - {item}")?;
        }
    }

    if !rec.advice.is_empty() {
        writeln!(out, "  {}", rec.advice)?;
    }

    Ok(out)
}
