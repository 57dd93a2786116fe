//! Record Validation - Rule/Policy Separation
//!
//! Rules produce structured violations; the driver applies the policy (skip
//! the record, warn, continue the batch). Serde already guarantees field
//! presence and types, so the rules here cover what the type system cannot:
//! palette membership and internally consistent shapes.

use serde::Serialize;

use crate::cards::{Card, CardKind};
use crate::palette::PropertyColor;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardReport {
    pub card_id: String,
    pub kind: CardKind,
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl CardReport {
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// One validation rule, producing violations for a single record.
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, card: &Card) -> Vec<Violation>;
}

fn error(rule: &str, message: String, expected: Option<String>, actual: Option<String>) -> Violation {
    Violation {
        rule: rule.to_string(),
        severity: ViolationSeverity::Error,
        message,
        expected,
        actual,
    }
}

// --- Concrete Rules ---

/// Every color name on a record must be one of the ten property-set colors.
pub struct PaletteRule;

impl ValidationRule for PaletteRule {
    fn name(&self) -> &'static str { "palette" }

    fn validate(&self, card: &Card) -> Vec<Violation> {
        let names: Vec<&str> = match card {
            Card::Property(c) => vec![c.color.as_str()],
            Card::Rent(c) => c.colors.iter().map(String::as_str).collect(),
            Card::Wildcard(c) => c.allowed_colors.iter().map(String::as_str).collect(),
            Card::Action(_) | Card::Money(_) => vec![],
        };

        names
            .into_iter()
            .filter(|name| PropertyColor::from_name(name).is_none())
            .map(|name| {
                error(
                    self.name(),
                    format!("Color '{name}' is not in the property-set palette"),
                    Some("one of the ten property-set color names".to_string()),
                    Some(name.to_string()),
                )
            })
            .collect()
    }
}

/// A rent card names zero colors (wild) or exactly two; one color is not a
/// fallback.
pub struct RentShapeRule;

impl ValidationRule for RentShapeRule {
    fn name(&self) -> &'static str { "rent_shape" }

    fn validate(&self, card: &Card) -> Vec<Violation> {
        let Card::Rent(c) = card else { return vec![] };
        if c.is_wild || c.colors.is_empty() || c.colors.len() == 2 {
            return vec![];
        }
        vec![error(
            self.name(),
            "Rent card must name zero or exactly two colors".to_string(),
            Some("0 or 2 colors".to_string()),
            Some(format!("{} colors", c.colors.len())),
        )]
    }
}

/// A non-multicolor wildcard allows exactly two colors.
pub struct WildcardShapeRule;

impl ValidationRule for WildcardShapeRule {
    fn name(&self) -> &'static str { "wildcard_shape" }

    fn validate(&self, card: &Card) -> Vec<Violation> {
        let Card::Wildcard(c) = card else { return vec![] };
        if c.is_multicolor || c.allowed_colors.len() == 2 {
            return vec![];
        }
        vec![error(
            self.name(),
            "Non-multicolor wildcard must allow exactly two colors".to_string(),
            Some("2 colors".to_string()),
            Some(format!("{} colors", c.allowed_colors.len())),
        )]
    }
}

/// Money cards need a positive denomination.
pub struct DenominationRule;

impl ValidationRule for DenominationRule {
    fn name(&self) -> &'static str { "denomination" }

    fn validate(&self, card: &Card) -> Vec<Violation> {
        let Card::Money(c) = card else { return vec![] };
        if c.denomination > 0 {
            return vec![];
        }
        vec![error(
            self.name(),
            "Money card requires a positive denomination".to_string(),
            Some(">= 1".to_string()),
            Some(c.denomination.to_string()),
        )]
    }
}

/// Validator orchestrates the rules over one record.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(PaletteRule),
                Box::new(RentShapeRule),
                Box::new(WildcardShapeRule),
                Box::new(DenominationRule),
            ],
        }
    }

    pub fn validate(&self, card: &Card) -> CardReport {
        let violations: Vec<Violation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(card))
            .collect();

        CardReport {
            card_id: card.id().to_string(),
            kind: card.kind(),
            valid: !violations
                .iter()
                .any(|v| v.severity == ViolationSeverity::Error),
            violations,
        }
    }

    /// Validate every definition of the requested kinds, one report per
    /// record. Quantity is irrelevant here so definitions are not expanded.
    pub fn validate_deck(
        &self,
        deck: &crate::cards::DeckFile,
        kinds: &std::collections::BTreeSet<CardKind>,
    ) -> Vec<CardReport> {
        let mut reports = Vec::new();
        let mut check = |card: Card| reports.push(self.validate(&card));

        if kinds.contains(&CardKind::Property) {
            deck.property_cards.iter().for_each(|c| check(Card::Property(c.clone())));
        }
        if kinds.contains(&CardKind::Action) {
            deck.action_cards.iter().for_each(|c| check(Card::Action(c.clone())));
        }
        if kinds.contains(&CardKind::Rent) {
            deck.rent_cards.iter().for_each(|c| check(Card::Rent(c.clone())));
        }
        if kinds.contains(&CardKind::Wildcard) {
            deck.wildcard_cards.iter().for_each(|c| check(Card::Wildcard(c.clone())));
        }
        if kinds.contains(&CardKind::Money) {
            deck.money_cards.iter().for_each(|c| check(Card::Money(c.clone())));
        }
        reports
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{MoneyCard, PropertyCard, RentCard, WildcardCard};

    fn property(color: &str) -> Card {
        Card::Property(PropertyCard {
            id: "p".into(),
            name: "Test".into(),
            color: color.into(),
            value: 1,
            set_size: 2,
            rent_values: vec![(1, 1)],
            quantity: 1,
        })
    }

    fn rent(colors: &[&str], is_wild: bool) -> Card {
        Card::Rent(RentCard {
            id: "r".into(),
            name: "Rent".into(),
            colors: colors.iter().map(|s| s.to_string()).collect(),
            value: 1,
            is_wild,
            description: String::new(),
            quantity: 1,
        })
    }

    #[test]
    fn valid_records_pass() {
        let validator = Validator::new();
        assert!(validator.validate(&property("brown")).valid);
        assert!(validator.validate(&rent(&["pink", "orange"], false)).valid);
        assert!(validator.validate(&rent(&[], true)).valid);
        // Empty colors reads as wild even without the flag
        assert!(validator.validate(&rent(&[], false)).valid);
    }

    #[test]
    fn color_outside_palette_is_an_error() {
        let validator = Validator::new();
        let report = validator.validate(&property("magenta"));
        assert!(!report.valid);
        assert_eq!(report.violations[0].rule, "palette");
        assert_eq!(report.violations[0].actual.as_deref(), Some("magenta"));
    }

    #[test]
    fn single_color_rent_is_an_error_not_a_fallback() {
        let validator = Validator::new();
        let report = validator.validate(&rent(&["brown"], false));
        assert!(!report.valid);
        assert_eq!(report.violations[0].rule, "rent_shape");
    }

    #[test]
    fn three_color_wildcard_is_an_error() {
        let validator = Validator::new();
        let card = Card::Wildcard(WildcardCard {
            id: "w".into(),
            name: "Property Wild Card".into(),
            allowed_colors: vec!["red".into(), "yellow".into(), "green".into()],
            is_multicolor: false,
            value: 2,
            description: String::new(),
            quantity: 1,
        });
        let report = validator.validate(&card);
        assert!(!report.valid);
        assert!(report.violations.iter().any(|v| v.rule == "wildcard_shape"));
    }

    #[test]
    fn zero_denomination_is_an_error() {
        let validator = Validator::new();
        let card = Card::Money(MoneyCard { id: "m".into(), denomination: 0, quantity: 1 });
        assert!(!validator.validate(&card).valid);
    }

    #[test]
    fn money_reports_use_the_derived_id() {
        let deck =
            crate::cards::DeckFile::from_json(r#"{"money_cards": [{"denomination": 0}]}"#)
                .unwrap();
        let kinds = CardKind::ALL.iter().copied().collect();
        let reports = Validator::new().validate_deck(&deck, &kinds);
        assert_eq!(reports[0].card_id, "money-0m");
        assert!(reports[0].has_errors());
    }

    #[test]
    fn report_carries_id_and_kind() {
        let validator = Validator::new();
        let report = validator.validate(&property("magenta"));
        assert_eq!(report.card_id, "p");
        assert_eq!(report.kind, CardKind::Property);
        assert!(report.has_errors());
    }
}
