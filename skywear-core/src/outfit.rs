//! Rule-based clothing suggestions.
//!
//! A temperature band picks the base outfit, then at most one condition rule
//! adjusts it. Both tables are evaluated top to bottom, first match wins.

use crate::model::OutfitRecommendation;

struct Band {
    /// Exclusive upper bound in °C.
    below: f64,
    top_wear: &'static str,
    bottom_wear: &'static str,
    footwear: &'static str,
    accessories: &'static [&'static str],
    advice: &'static str,
}

const BANDS: &[Band] = &[
    Band {
        below: 0.0,
        top_wear: "Heavy winter coat with sweater or thermal",
        bottom_wear: "Insulated pants or jeans with thermal underwear",
        footwear: "Insulated winter boots",
        accessories: &["Scarf", "Gloves", "Beanie or winter hat"],
        advice: "Layer up! Multiple thin layers trap heat better than one thick layer.",
    },
    Band {
        below: 10.0,
        top_wear: "Winter coat or jacket with long sleeve shirt",
        bottom_wear: "Warm pants or jeans",
        footwear: "Closed shoes or boots",
        accessories: &["Light scarf", "Gloves"],
        advice: "It's cold outside. Make sure to wear a proper jacket.",
    },
    Band {
        below: 20.0,
        top_wear: "Light jacket or sweater",
        bottom_wear: "Jeans or casual pants",
        footwear: "Sneakers or loafers",
        accessories: &["Light scarf (optional)"],
        advice: "Perfect weather for layering. Bring a light jacket that can be removed if it gets warm.",
    },
    Band {
        below: 30.0,
        top_wear: "T-shirt or short sleeve shirt",
        bottom_wear: "Light pants or shorts",
        footwear: "Sneakers or sandals",
        accessories: &[],
        advice: "Comfortable weather. Light, breathable fabrics are ideal.",
    },
];

// Anything not below 30 °C, including NaN.
const HOT: Band = Band {
    below: f64::INFINITY,
    top_wear: "Light, breathable shirt or tank top",
    bottom_wear: "Shorts or light skirt",
    footwear: "Sandals or light shoes",
    accessories: &["Hat"],
    advice: "It's hot! Wear light-colored, loose-fitting clothing to stay cool.",
};

struct Conditions<'a> {
    /// Lowercased.
    text: &'a str,
    temperature: f64,
    is_day: bool,
}

struct Override {
    applies: fn(&Conditions<'_>) -> bool,
    apply: fn(&mut OutfitRecommendation, &Conditions<'_>),
}

const OVERRIDES: &[Override] = &[
    Override {
        applies: |c| c.text.contains("rain") || c.text.contains("drizzle"),
        apply: |rec, c| {
            rec.top_wear = if c.temperature < 15.0 {
                "Waterproof jacket or raincoat with layers".to_string()
            } else {
                "Waterproof jacket or raincoat".to_string()
            };
            rec.footwear = "Waterproof boots or shoes".to_string();
            rec.accessories.push("Umbrella".to_string());
            rec.advice.push_str(" Don't forget your umbrella and waterproof footwear!");
        },
    },
    Override {
        applies: |c| c.text.contains("snow"),
        apply: |rec, _| {
            rec.top_wear = "Waterproof and insulated coat".to_string();
            rec.bottom_wear = "Waterproof pants".to_string();
            rec.footwear = "Waterproof winter boots with grip".to_string();
            rec.accessories.push("Waterproof gloves".to_string());
            rec.advice.push_str(" Wear waterproof clothing and footwear with good traction.");
        },
    },
    Override {
        applies: |c| c.text.contains("clear") && c.is_day && c.temperature > 15.0,
        apply: |rec, _| {
            rec.accessories.push("Sunglasses".to_string());
            rec.accessories.push("Sunscreen".to_string());
            rec.advice.push_str(" Don't forget sun protection!");
        },
    },
];

impl From<&Band> for OutfitRecommendation {
    fn from(band: &Band) -> Self {
        OutfitRecommendation {
            top_wear: band.top_wear.to_string(),
            bottom_wear: band.bottom_wear.to_string(),
            footwear: band.footwear.to_string(),
            accessories: band.accessories.iter().map(|a| a.to_string()).collect(),
            advice: band.advice.to_string(),
        }
    }
}

/// Suggest an outfit for `temperature_c` and a condition category such as "Rain".
pub fn recommend(temperature_c: f64, condition_main: &str, is_day: bool) -> OutfitRecommendation {
    let band = BANDS.iter().find(|b| temperature_c < b.below).unwrap_or(&HOT);
    let mut rec = OutfitRecommendation::from(band);

    let text = condition_main.to_lowercase();
    let conditions = Conditions { text: &text, temperature: temperature_c, is_day };

    if let Some(rule) = OVERRIDES.iter().find(|o| (o.applies)(&conditions)) {
        (rule.apply)(&mut rec, &conditions);
    }

    rec
}
