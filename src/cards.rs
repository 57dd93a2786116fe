//! Card Records
//!
//! The deck file holds five lists of declarative card definitions. Parsing
//! happens once at startup; records are read-only afterwards. `quantity` is a
//! multiplicity: expansion emits one instance per unit, with `-1..-N` id
//! suffixes when a definition's quantity exceeds one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Failed to read card file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse card JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid card file structure: {0}")]
    Structure(String),
}

/// The five card variants, used for CLI filtering and dispatch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Property,
    Action,
    Rent,
    Wildcard,
    Money,
}

impl CardKind {
    pub const ALL: [CardKind; 5] = [
        CardKind::Property,
        CardKind::Action,
        CardKind::Rent,
        CardKind::Wildcard,
        CardKind::Money,
    ];
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardKind::Property => "property",
            CardKind::Action => "action",
            CardKind::Rent => "rent",
            CardKind::Wildcard => "wildcard",
            CardKind::Money => "money",
        };
        f.write_str(name)
    }
}

fn default_quantity() -> u32 { 1 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyCard {
    pub id: String,
    pub name: String,
    pub color: String,
    pub value: u32,
    pub set_size: u32,
    /// Ordered (properties-owned, rent-amount) pairs. The order here is
    /// authoritative; the rent table never re-sorts.
    pub rent_values: Vec<(u32, u32)>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCard {
    pub id: String,
    pub name: String,
    pub value: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentCard {
    pub id: String,
    pub name: String,
    /// Exactly two colors, or empty when `is_wild`.
    #[serde(default)]
    pub colors: Vec<String>,
    pub value: u32,
    #[serde(default)]
    pub is_wild: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WildcardCard {
    pub id: String,
    #[serde(default = "default_wildcard_name")]
    pub name: String,
    /// Exactly two colors, or all ten when `is_multicolor`.
    #[serde(default)]
    pub allowed_colors: Vec<String>,
    #[serde(default)]
    pub is_multicolor: bool,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_wildcard_name() -> String {
    "Property Wild Card".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyCard {
    /// Derived as `money-<denomination>m` when the file omits it.
    #[serde(default)]
    pub id: String,
    pub denomination: u32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// One card record, tagged by variant. Closed: adding a sixth variant forces
/// every match in the crate to be revisited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Card {
    Property(PropertyCard),
    Action(ActionCard),
    Rent(RentCard),
    Wildcard(WildcardCard),
    Money(MoneyCard),
}

impl Card {
    pub fn id(&self) -> &str {
        match self {
            Card::Property(c) => &c.id,
            Card::Action(c) => &c.id,
            Card::Rent(c) => &c.id,
            Card::Wildcard(c) => &c.id,
            Card::Money(c) => &c.id,
        }
    }

    pub fn kind(&self) -> CardKind {
        match self {
            Card::Property(_) => CardKind::Property,
            Card::Action(_) => CardKind::Action,
            Card::Rent(_) => CardKind::Rent,
            Card::Wildcard(_) => CardKind::Wildcard,
            Card::Money(_) => CardKind::Money,
        }
    }
}

/// A record that failed to deserialize: reported and skipped, never fatal to
/// the rest of the file.
#[derive(Debug, Clone, Serialize)]
pub struct MalformedRecord {
    pub section: String,
    pub index: usize,
    pub error: String,
}

/// Parsed deck file: five known sections plus anything unrecognized.
///
/// Records are deserialized one by one so that a single malformed entry is
/// skipped (recorded in `malformed`) without aborting the batch.
#[derive(Debug, Clone, Default)]
pub struct DeckFile {
    pub property_cards: Vec<PropertyCard>,
    pub action_cards: Vec<ActionCard>,
    pub rent_cards: Vec<RentCard>,
    pub wildcard_cards: Vec<WildcardCard>,
    pub money_cards: Vec<MoneyCard>,
    /// Sections whose key matches no known card type. Surfaced as warnings by
    /// the driver, never silently dropped.
    pub unknown_sections: BTreeMap<String, serde_json::Value>,
    pub malformed: Vec<MalformedRecord>,
}

fn parse_section<T: serde::de::DeserializeOwned>(
    key: &str,
    value: serde_json::Value,
    out: &mut Vec<T>,
    malformed: &mut Vec<MalformedRecord>,
) -> Result<(), DeckError> {
    let serde_json::Value::Array(items) = value else {
        return Err(DeckError::Structure(format!("section '{key}' is not a list")));
    };
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => out.push(record),
            Err(e) => malformed.push(MalformedRecord {
                section: key.to_string(),
                index,
                error: e.to_string(),
            }),
        }
    }
    Ok(())
}

impl DeckFile {
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, DeckError> {
        let root: serde_json::Value = serde_json::from_str(content)?;
        let serde_json::Value::Object(sections) = root else {
            return Err(DeckError::Structure("top level is not an object".to_string()));
        };

        let mut deck = DeckFile::default();
        for (key, value) in sections {
            let malformed = &mut deck.malformed;
            match key.as_str() {
                "property_cards" => parse_section(&key, value, &mut deck.property_cards, malformed)?,
                "action_cards" => parse_section(&key, value, &mut deck.action_cards, malformed)?,
                "rent_cards" => parse_section(&key, value, &mut deck.rent_cards, malformed)?,
                "wildcard_cards" => parse_section(&key, value, &mut deck.wildcard_cards, malformed)?,
                "money_cards" => parse_section(&key, value, &mut deck.money_cards, malformed)?,
                _ => {
                    deck.unknown_sections.insert(key, value);
                }
            }
        }
        // Money records may omit their id; derive it here so every report
        // and filename downstream has one.
        for money in &mut deck.money_cards {
            if money.id.is_empty() {
                money.id = format!("money-{}m", money.denomination);
            }
        }
        Ok(deck)
    }

    /// Number of definitions (distinct ids) for a kind.
    pub fn definition_count(&self, kind: CardKind) -> usize {
        match kind {
            CardKind::Property => self.property_cards.len(),
            CardKind::Action => self.action_cards.len(),
            CardKind::Rent => self.rent_cards.len(),
            CardKind::Wildcard => self.wildcard_cards.len(),
            CardKind::Money => self.money_cards.len(),
        }
    }

    /// Number of instances (quantity-expanded) for a kind.
    pub fn instance_count(&self, kind: CardKind) -> usize {
        let sum = |quantities: &mut dyn Iterator<Item = u32>| {
            quantities.map(|q| q as usize).sum()
        };
        match kind {
            CardKind::Property => sum(&mut self.property_cards.iter().map(|c| c.quantity)),
            CardKind::Action => sum(&mut self.action_cards.iter().map(|c| c.quantity)),
            CardKind::Rent => sum(&mut self.rent_cards.iter().map(|c| c.quantity)),
            CardKind::Wildcard => sum(&mut self.wildcard_cards.iter().map(|c| c.quantity)),
            CardKind::Money => sum(&mut self.money_cards.iter().map(|c| c.quantity)),
        }
    }

    /// Expand definitions into per-unit instances for the requested kinds, in
    /// section order. Each instance has quantity 1 and a unique id.
    pub fn expand(&self, kinds: &BTreeSet<CardKind>) -> Vec<Card> {
        let mut cards = Vec::new();

        if kinds.contains(&CardKind::Property) {
            for def in &self.property_cards {
                expand_one(&mut cards, def.quantity, &def.id, |id| {
                    Card::Property(PropertyCard { id, quantity: 1, ..def.clone() })
                });
            }
        }
        if kinds.contains(&CardKind::Action) {
            for def in &self.action_cards {
                expand_one(&mut cards, def.quantity, &def.id, |id| {
                    Card::Action(ActionCard { id, quantity: 1, ..def.clone() })
                });
            }
        }
        if kinds.contains(&CardKind::Rent) {
            for def in &self.rent_cards {
                expand_one(&mut cards, def.quantity, &def.id, |id| {
                    Card::Rent(RentCard { id, quantity: 1, ..def.clone() })
                });
            }
        }
        if kinds.contains(&CardKind::Wildcard) {
            for def in &self.wildcard_cards {
                expand_one(&mut cards, def.quantity, &def.id, |id| {
                    Card::Wildcard(WildcardCard { id, quantity: 1, ..def.clone() })
                });
            }
        }
        if kinds.contains(&CardKind::Money) {
            for def in &self.money_cards {
                expand_one(&mut cards, def.quantity, &def.id, |id| {
                    Card::Money(MoneyCard { id, quantity: 1, ..def.clone() })
                });
            }
        }

        cards
    }
}

fn expand_one(out: &mut Vec<Card>, quantity: u32, base_id: &str, make: impl Fn(String) -> Card) {
    if quantity == 1 {
        out.push(make(base_id.to_string()));
        return;
    }
    for i in 0..quantity {
        out.push(make(format!("{}-{}", base_id, i + 1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_kinds() -> BTreeSet<CardKind> {
        CardKind::ALL.iter().copied().collect()
    }

    const SMALL_DECK: &str = r#"{
        "property_cards": [
            {"id": "brown-01", "name": "Mediterranean Avenue", "color": "brown",
             "value": 1, "set_size": 2, "rent_values": [[1, 1], [2, 2]]}
        ],
        "action_cards": [
            {"id": "pass-go", "name": "Pass Go", "value": 1,
             "description": "Draw two cards.", "quantity": 3}
        ],
        "money_cards": [
            {"denomination": 5, "quantity": 2}
        ]
    }"#;

    #[test]
    fn quantity_expansion_and_id_suffixes() {
        let deck = DeckFile::from_json(SMALL_DECK).unwrap();
        let cards = deck.expand(&all_kinds());
        let ids: Vec<&str> = cards.iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                "brown-01",
                "pass-go-1",
                "pass-go-2",
                "pass-go-3",
                "money-5m-1",
                "money-5m-2",
            ]
        );
    }

    #[test]
    fn expansion_filters_by_kind() {
        let deck = DeckFile::from_json(SMALL_DECK).unwrap();
        let only_money: BTreeSet<CardKind> = [CardKind::Money].into_iter().collect();
        let cards = deck.expand(&only_money);
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.kind() == CardKind::Money));
    }

    #[test]
    fn counts_distinguish_definitions_from_instances() {
        let deck = DeckFile::from_json(SMALL_DECK).unwrap();
        assert_eq!(deck.definition_count(CardKind::Action), 1);
        assert_eq!(deck.instance_count(CardKind::Action), 3);
        assert_eq!(deck.instance_count(CardKind::Rent), 0);
    }

    #[test]
    fn money_id_is_derived_at_parse_time() {
        let deck = DeckFile::from_json(r#"{"money_cards": [{"denomination": 5}]}"#).unwrap();
        assert_eq!(deck.money_cards[0].id, "money-5m");

        // An explicit id is kept as-is.
        let deck = DeckFile::from_json(
            r#"{"money_cards": [{"id": "gold-bar", "denomination": 5}]}"#,
        )
        .unwrap();
        assert_eq!(deck.money_cards[0].id, "gold-bar");
    }

    #[test]
    fn unknown_sections_are_captured() {
        let deck = DeckFile::from_json(
            r#"{"money_cards": [{"denomination": 1}], "treasure_cards": []}"#,
        )
        .unwrap();
        assert!(deck.unknown_sections.contains_key("treasure_cards"));
    }

    #[test]
    fn missing_required_field_skips_only_that_record() {
        // First property lacks a color; the second is intact.
        let deck = DeckFile::from_json(
            r#"{"property_cards": [
                {"id": "x", "name": "X", "value": 1, "set_size": 2, "rent_values": []},
                {"id": "brown-02", "name": "Baltic Avenue", "color": "brown",
                 "value": 1, "set_size": 2, "rent_values": [[1, 1], [2, 2]]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(deck.property_cards.len(), 1);
        assert_eq!(deck.property_cards[0].id, "brown-02");
        assert_eq!(deck.malformed.len(), 1);
        assert_eq!(deck.malformed[0].section, "property_cards");
        assert_eq!(deck.malformed[0].index, 0);
    }

    #[test]
    fn non_list_section_is_fatal() {
        let result = DeckFile::from_json(r#"{"money_cards": {"denomination": 1}}"#);
        assert!(matches!(result, Err(DeckError::Structure(_))));
    }
}
