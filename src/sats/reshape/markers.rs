use std::sync::LazyLock;

use regex::Regex;

static CITY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Destination 1/([^,]+)").expect("invalid city marker regex"));
static STATE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"State 1/([^,]+)").expect("invalid state marker regex"));

/// Destination labels recorded in a respondent's marker text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerLabels {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl MarkerLabels {
    /// Extracts `Destination 1/<city>` and `State 1/<state>`, each running up
    /// to the next comma. Absent or blank labels are `None`.
    pub fn parse(markers: &str) -> Self {
        Self {
            city: capture_label(&CITY_MARKER, markers),
            state: capture_label(&STATE_MARKER, markers),
        }
    }
}

fn capture_label(marker: &Regex, text: &str) -> Option<String> {
    let captures = marker.captures(text)?;
    let label = captures[1].trim();
    (!label.is_empty()).then(|| label.to_string())
}
