// Model request derived from the raw wizard answers
//
// The wizard hands over raw strings. Interpreting them is the rendering surface's business, so the
// lenient parsing lives here and never feeds back into the collected params.

use crate::models::state::CollectedParams;

pub const DEFAULT_WIDTH: f64 = 5.0;
pub const DEFAULT_LENGTH: f64 = 5.0;
pub const DEFAULT_HEIGHT: f64 = 3.0;
pub const DEFAULT_LOCATION_SIZE: f64 = 50.0;
pub const DEFAULT_BUDGET: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelQuery {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    /// Not asked by the wizard; always the viewer default.
    pub location_size: f64,
    pub budget: f64,
}

impl Default for ModelQuery {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
            height: DEFAULT_HEIGHT,
            location_size: DEFAULT_LOCATION_SIZE,
            budget: DEFAULT_BUDGET,
        }
    }
}

impl ModelQuery {
    /// Unreadable fields fall back to the defaults. Dimensions must be positive.
    pub fn from_params(params: &CollectedParams) -> Self {
        let positive = |raw: &str, fallback: f64| {
            leading_number(raw)
                .filter(|v| *v > 0.0)
                .unwrap_or(fallback)
        };
        Self {
            width: positive(&params.width, DEFAULT_WIDTH),
            length: positive(&params.length, DEFAULT_LENGTH),
            height: DEFAULT_HEIGHT,
            location_size: DEFAULT_LOCATION_SIZE,
            budget: leading_number(&params.budget).unwrap_or(DEFAULT_BUDGET),
        }
    }

    pub fn floor_area(&self) -> f64 {
        self.width * self.length
    }

    pub fn query_string(&self) -> String {
        format!(
            "width={}&length={}&height={}&location_size={}&budget={}",
            format_number(self.width),
            format_number(self.length),
            format_number(self.height),
            format_number(self.location_size),
            format_number(self.budget)
        )
    }

    pub fn project_summary(&self) -> String {
        format!(
            "Project - Budget: ${:.2}, Location: {} sqft",
            self.budget,
            format_number(self.floor_area())
        )
    }
}

/// Reads the number a free-form answer starts with: "$1,200.50" -> 1200.5, "5 square feet" -> 5.
pub fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim().trim_start_matches('$').trim_start();
    let digits: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
