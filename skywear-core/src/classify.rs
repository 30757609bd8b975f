//! Keyword classification of weather conditions into icon and theme categories.
//!
//! Both classifiers lowercase their input and walk an ordered rule table;
//! the first row with a keyword contained in the text decides the result.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Storm,
    Rain,
    Snow,
    Sun,
    Moon,
    PartlyCloudy,
    Cloudy,
    Cloud,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Storm => "storm",
            IconCategory::Rain => "rain",
            IconCategory::Snow => "snow",
            IconCategory::Sun => "sun",
            IconCategory::Moon => "moon",
            IconCategory::PartlyCloudy => "partly_cloudy",
            IconCategory::Cloudy => "cloudy",
            IconCategory::Cloud => "cloud",
        }
    }

    /// Single-glyph rendering for terminals.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconCategory::Storm => "⛈",
            IconCategory::Rain => "🌧",
            IconCategory::Snow => "🌨",
            IconCategory::Sun => "☀",
            IconCategory::Moon => "☾",
            IconCategory::PartlyCloudy => "⛅",
            IconCategory::Cloudy | IconCategory::Cloud => "☁",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Storm,
    Rain,
    Snow,
    ClearDay,
    ClearNight,
    CloudyDay,
    CloudyNight,
    NeutralDay,
    NeutralNight,
}

/// Top-to-bottom background colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub from: &'static str,
    pub via: &'static str,
    pub to: &'static str,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Storm => "storm",
            Theme::Rain => "rain",
            Theme::Snow => "snow",
            Theme::ClearDay => "clear_day",
            Theme::ClearNight => "clear_night",
            Theme::CloudyDay => "cloudy_day",
            Theme::CloudyNight => "cloudy_night",
            Theme::NeutralDay => "neutral_day",
            Theme::NeutralNight => "neutral_night",
        }
    }

    pub fn gradient(&self) -> Gradient {
        let (from, via, to) = match self {
            Theme::Storm => ("purple-800", "gray-800", "gray-900"),
            Theme::Rain => ("blue-800", "blue-700", "slate-900"),
            Theme::Snow => ("blue-300", "indigo-500", "indigo-800"),
            Theme::ClearDay => ("blue-700", "blue-500", "blue-300"),
            Theme::ClearNight => ("gray-900", "blue-900", "blue-700"),
            Theme::CloudyDay => ("gray-400", "gray-500", "blue-700"),
            Theme::CloudyNight => ("gray-800", "gray-700", "blue-900"),
            Theme::NeutralDay => ("gray-300", "blue-400", "blue-700"),
            Theme::NeutralNight => ("gray-900", "gray-800", "blue-900"),
        };
        Gradient { from, via, to }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct IconRule {
    keywords: &'static [&'static str],
    pick: fn(&str, bool) -> IconCategory,
}

const ICON_RULES: &[IconRule] = &[
    IconRule { keywords: &["thunderstorm"], pick: |_, _| IconCategory::Storm },
    IconRule { keywords: &["drizzle", "rain"], pick: |_, _| IconCategory::Rain },
    IconRule { keywords: &["snow"], pick: |_, _| IconCategory::Snow },
    IconRule { keywords: &["clear"], pick: |_, is_day| sun_or_moon(is_day) },
    IconRule {
        keywords: &["clouds"],
        pick: |text, is_day| {
            if text.contains("few") || text.contains("scattered") {
                if is_day { IconCategory::PartlyCloudy } else { IconCategory::Cloudy }
            } else {
                IconCategory::Cloud
            }
        },
    },
    IconRule { keywords: &["mist", "fog", "haze"], pick: |_, _| IconCategory::Cloud },
];

struct ThemeRule {
    keywords: &'static [&'static str],
    day: Theme,
    night: Theme,
}

const THEME_RULES: &[ThemeRule] = &[
    ThemeRule { keywords: &["thunderstorm"], day: Theme::Storm, night: Theme::Storm },
    ThemeRule { keywords: &["rain", "drizzle"], day: Theme::Rain, night: Theme::Rain },
    ThemeRule { keywords: &["snow"], day: Theme::Snow, night: Theme::Snow },
    ThemeRule { keywords: &["clear"], day: Theme::ClearDay, night: Theme::ClearNight },
    ThemeRule { keywords: &["clouds"], day: Theme::CloudyDay, night: Theme::CloudyNight },
];

fn sun_or_moon(is_day: bool) -> IconCategory {
    if is_day { IconCategory::Sun } else { IconCategory::Moon }
}

fn matches(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Icon for a free-text description such as "scattered clouds".
pub fn classify_condition(description: &str, is_day: bool) -> IconCategory {
    let text = description.to_lowercase();

    ICON_RULES
        .iter()
        .find(|rule| matches(&text, rule.keywords))
        .map(|rule| (rule.pick)(&text, is_day))
        .unwrap_or_else(|| sun_or_moon(is_day))
}

/// Background theme for a condition category such as "Clouds".
pub fn classify_background(main_condition: &str, is_day: bool) -> Theme {
    let text = main_condition.to_lowercase();

    match THEME_RULES.iter().find(|rule| matches(&text, rule.keywords)) {
        Some(rule) if is_day => rule.day,
        Some(rule) => rule.night,
        None if is_day => Theme::NeutralDay,
        None => Theme::NeutralNight,
    }
}

/// Day iff strictly between sunrise and sunset.
pub fn is_daytime(t: i64, sunrise: i64, sunset: i64) -> bool {
    t > sunrise && t < sunset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_wins_regardless_of_day_or_night() {
        for text in ["Rain", "light rain", "freezing RAIN", "shower rain and drizzle"] {
            assert_eq!(classify_condition(text, true), IconCategory::Rain);
            assert_eq!(classify_condition(text, false), IconCategory::Rain);
        }
    }

    #[test]
    fn thunderstorm_takes_precedence_over_rain() {
        assert_eq!(classify_condition("thunderstorm with heavy rain", true), IconCategory::Storm);
        assert_eq!(classify_background("Thunderstorm", false), Theme::Storm);
    }

    #[test]
    fn clear_depends_on_day_flag() {
        assert_eq!(classify_condition("clear sky", true), IconCategory::Sun);
        assert_eq!(classify_condition("clear sky", false), IconCategory::Moon);
        assert_ne!(classify_background("Clear", true), classify_background("Clear", false));
    }

    #[test]
    fn cloud_density_only_affects_icon() {
        assert_eq!(classify_condition("few clouds", true), IconCategory::PartlyCloudy);
        assert_eq!(classify_condition("scattered clouds", false), IconCategory::Cloudy);
        assert_eq!(classify_condition("overcast clouds", true), IconCategory::Cloud);

        assert_eq!(classify_background("Clouds", true), Theme::CloudyDay);
        assert_eq!(classify_background("Clouds", false), Theme::CloudyNight);
    }

    #[test]
    fn mist_uses_cloud_icon_but_neutral_theme() {
        for text in ["mist", "Fog", "haze"] {
            assert_eq!(classify_condition(text, true), IconCategory::Cloud);
        }
        assert_eq!(classify_background("Mist", true), Theme::NeutralDay);
        assert_eq!(classify_background("Haze", false), Theme::NeutralNight);
    }

    #[test]
    fn unknown_conditions_fall_back_to_defaults() {
        assert_eq!(classify_condition("volcanic ash", true), IconCategory::Sun);
        assert_eq!(classify_condition("", false), IconCategory::Moon);
        assert_eq!(classify_background("Tornado", true), Theme::NeutralDay);
    }

    #[test]
    fn daytime_bounds_are_exclusive() {
        assert!(is_daytime(150, 100, 200));
        assert!(!is_daytime(100, 100, 200));
        assert!(!is_daytime(200, 100, 200));
        assert!(!is_daytime(250, 100, 200));
    }

    #[test]
    fn theme_gradient_matches_category() {
        let g = Theme::Storm.gradient();
        assert_eq!(g.from, "purple-800");
        assert_eq!(Theme::ClearNight.to_string(), "clear_night");
    }
}
