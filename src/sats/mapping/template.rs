use std::sync::LazyLock;

use regex::Regex;

use crate::sats::destinations::DestinationCode;
use crate::sats::model::ColumnKey;

/// Placeholder that marks an alias as destination-parameterised.
static TEMPLATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(LrNr|\{N\})").expect("invalid template token regex"));

/// Shape a usable template must start with: question, placeholder, optional
/// repetition suffix.
static TEMPLATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Q\d+)_Lr(?:Nr|\{N\})(r\d+)?").expect("invalid template shape regex")
});

/// Returns `true` when the alias carries a destination placeholder.
pub fn is_templated(alias: &str) -> bool {
    TEMPLATE_TOKEN.is_match(alias)
}

/// A parsed destination template such as `Q12_LrNrr1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasTemplate {
    /// Question prefix, e.g. `Q12`.
    pub question: String,
    /// Repetition suffix, e.g. `r1`.
    pub repetition: Option<String>,
}

impl AliasTemplate {
    /// Parses an alias. Returns `None` when it does not start with the
    /// expected `Q<digits>_Lr<Nr|{N}>` shape; anything after the shape is
    /// ignored.
    pub fn parse(pattern: &str) -> Option<Self> {
        let captures = TEMPLATE_SHAPE.captures(pattern)?;
        Some(Self {
            question: captures[1].to_string(),
            repetition: captures.get(2).map(|suffix| suffix.as_str().to_string()),
        })
    }

    /// Builds the concrete column this template names for `destination`.
    pub fn column_for(&self, destination: &DestinationCode) -> ColumnKey {
        let repetition = self.repetition.as_deref().unwrap_or_default();
        ColumnKey::new(&format!(
            "{}_{}{}",
            self.question,
            destination.as_str(),
            repetition
        ))
    }
}
