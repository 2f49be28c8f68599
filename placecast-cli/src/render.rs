//! Terminal rendering of the view state.
//!
//! Every error kind collapses to the same "Location not found." line; the
//! distinction only lives in logs.

use placecast_core::model::{display_cells, round_temp};
use placecast_core::{Phase, ViewState, WeatherIcon};

const NOT_FOUND: &str = "Location not found.\n";

pub fn view(state: &ViewState) -> String {
    match state.phase {
        Phase::Idle | Phase::Resolving => String::new(),
        Phase::ResolvedError => NOT_FOUND.to_string(),
        Phase::ResolvedOk => {
            let Some(bundle) = &state.forecast else {
                return NOT_FOUND.to_string();
            };
            let mut out = String::new();

            if let Some(label) = state.geo.as_ref().and_then(|g| g.label.as_deref()) {
                out.push_str(label);
                out.push('\n');
            }

            out.push_str(&bundle.summary);
            out.push('\n');
            out.push_str(&format!(
                "{} {}°F\n",
                glyph(bundle.current.icon),
                round_temp(bundle.current.temperature)
            ));
            out.push_str(&format!(
                "H: {}°F  L: {}°F\n",
                round_temp(bundle.daily.high),
                round_temp(bundle.daily.low)
            ));

            let tz = bundle.timezone.unwrap_or(chrono_tz::UTC);
            let cells: Vec<String> = display_cells(&bundle.hourly, tz)
                .into_iter()
                .map(|cell| format!("{} {} {}°F", cell.label, glyph(cell.icon), cell.temperature))
                .collect();
            if !cells.is_empty() {
                out.push_str(&cells.join("   "));
                out.push('\n');
            }

            out
        }
    }
}

fn glyph(icon: WeatherIcon) -> &'static str {
    match icon {
        WeatherIcon::ClearDay => "☀",
        WeatherIcon::ClearNight => "☽",
        WeatherIcon::Rain => "☔",
        WeatherIcon::Snow | WeatherIcon::Sleet => "❄",
        WeatherIcon::Wind => "~",
        WeatherIcon::Fog => "≡",
        WeatherIcon::Cloudy | WeatherIcon::PartlyCloudyNight => "☁",
        WeatherIcon::PartlyCloudyDay => "⛅",
        WeatherIcon::Unknown => "•",
    }
}
