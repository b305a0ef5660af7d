use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three legal areas the system handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "RTI")]
    Rti,
    #[serde(rename = "Domestic Violence")]
    DomesticViolence,
    #[serde(rename = "Divorce")]
    Divorce,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Rti, Category::DomesticViolence, Category::Divorce];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Rti => "RTI",
            Category::DomesticViolence => "Domestic Violence",
            Category::Divorce => "Divorce",
        }
    }

    /// The statute a category's corpus chunks are drawn from.
    pub fn act(&self) -> &'static str {
        match self {
            Category::Rti => "Right to Information Act, 2005",
            Category::DomesticViolence => "Protection of Women from Domestic Violence Act, 2005",
            Category::Divorce => "Hindu Marriage Act, 1955",
        }
    }

    /// Parse a label as produced by `label()` or by a language model.
    /// Matching is case-insensitive and tolerates `_`/`-` separators.
    pub fn parse(label: &str) -> Option<Self> {
        let key: String = label
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "rti" | "righttoinformation" => Some(Category::Rti),
            "domesticviolence" | "dv" => Some(Category::DomesticViolence),
            "divorce" | "mutualconsentdivorce" => Some(Category::Divorce),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classified legal category of a user's complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "RTI")]
    Rti,
    #[serde(rename = "Domestic Violence")]
    DomesticViolence,
    #[serde(rename = "Divorce")]
    Divorce,
    #[serde(rename = "Unknown", alias = "OutOfScope", alias = "Out of Scope")]
    OutOfScope,
}

impl Intent {
    pub fn category(&self) -> Option<Category> {
        match self {
            Intent::Rti => Some(Category::Rti),
            Intent::DomesticViolence => Some(Category::DomesticViolence),
            Intent::Divorce => Some(Category::Divorce),
            Intent::OutOfScope => None,
        }
    }

    pub fn is_in_scope(&self) -> bool {
        self.category().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self.category() {
            Some(category) => category.label(),
            None => "Unknown",
        }
    }

    /// Parse a model-produced label. Anything that is not one of the three
    /// categories (including "Unknown") is out of scope.
    pub fn from_label(label: &str) -> Self {
        Category::parse(label).map(Intent::from).unwrap_or(Intent::OutOfScope)
    }
}

impl From<Category> for Intent {
    fn from(category: Category) -> Self {
        match category {
            Category::Rti => Intent::Rti,
            Category::DomesticViolence => Intent::DomesticViolence,
            Category::Divorce => Intent::Divorce,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_lenient() {
        assert_eq!(Category::parse("RTI"), Some(Category::Rti));
        assert_eq!(Category::parse("domestic_violence"), Some(Category::DomesticViolence));
        assert_eq!(Category::parse(" Domestic Violence "), Some(Category::DomesticViolence));
        assert_eq!(Category::parse("DIVORCE"), Some(Category::Divorce));
        assert_eq!(Category::parse("Income Tax"), None);
    }

    #[test]
    fn test_unknown_label_is_out_of_scope() {
        assert_eq!(Intent::from_label("Unknown"), Intent::OutOfScope);
        assert_eq!(Intent::from_label(""), Intent::OutOfScope);
        assert_eq!(Intent::from_label("Divorce"), Intent::Divorce);
        assert_eq!(Intent::OutOfScope.category(), None);
    }

    #[test]
    fn test_intent_serde_labels() {
        let json = serde_json::to_string(&Intent::DomesticViolence).unwrap();
        assert_eq!(json, "\"Domestic Violence\"");

        let intent: Intent = serde_json::from_str("\"OutOfScope\"").unwrap();
        assert_eq!(intent, Intent::OutOfScope);
    }
}
