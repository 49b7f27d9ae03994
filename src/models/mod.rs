pub mod analytics;
pub mod task;
pub mod team_member;
pub mod user;
pub mod work_log;

use serde::{Deserialize, Deserializer};

/// Years of experience as sent by browser forms: a JSON number or the raw
/// input string. Text without leading digits counts as 0.
pub(crate) fn lenient_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    let years = match Option::<NumberOrString>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Number(value)) => Some(whole_years(value)),
        Some(NumberOrString::Text(text)) => {
            let digits: String = text.trim().chars().take_while(char::is_ascii_digit).collect();
            Some(digits.parse::<u64>().map_or(0, |value| value.min(u64::from(u32::MAX)) as u32))
        }
    };
    Ok(years)
}

fn whole_years(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
