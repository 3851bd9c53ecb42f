//! Shopping-list rows as they are stored in the table

use crate::error::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Column header of the table, in storage order.
pub const HEADER: [&str; 7] = [
    "Timestamp",
    "Item",
    "Brand",
    "Quantity",
    "UnitType",
    "Note",
    "Price",
];

/// Format of `Row::timestamp` (local time, minute precision).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Optional `R$` prefix, then digits with `.`/`,` separators.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:R\$\s*)?(-?[\d.,]*\d)$").expect("number pattern is valid")
});

/// How a quantity is counted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitType {
    Unit,
    Package,
    Kilogram,
    Liter,
    /// A label found in the sheet that is none of the above
    Other(String),
}

impl UnitType {
    /// Parse a unit label. Accepts the English names and the labels the
    /// sheet historically used (`Unidade`, `Pacote`, `Kg`, `Litro`).
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "unit" | "unidade" | "un" => UnitType::Unit,
            "package" | "pacote" | "pct" => UnitType::Package,
            "kilogram" | "kg" => UnitType::Kilogram,
            "liter" | "litre" | "litro" | "l" => UnitType::Liter,
            _ => UnitType::Other(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            UnitType::Unit => "Unit",
            UnitType::Package => "Package",
            UnitType::Kilogram => "Kilogram",
            UnitType::Liter => "Liter",
            UnitType::Other(label) => label,
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for UnitType {
    fn from(s: String) -> Self {
        UnitType::parse(&s)
    }
}

impl From<UnitType> for String {
    fn from(unit: UnitType) -> Self {
        unit.label().to_string()
    }
}

/// A numeric cell, kept as the text found in the table.
///
/// Rows read back from a shared sheet can hold anything; the value is parsed
/// on demand so a malformed cell never prevents the row from loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Number(String);

impl Number {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Shortest decimal form (`2`, `0.5`)
    pub fn from_quantity(value: f64) -> Self {
        Self(format!("{}", value))
    }

    /// Two decimals (`8.50`)
    pub fn from_price(value: f64) -> Self {
        Self(format!("{:.2}", value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed value, `None` when the cell is not a number.
    ///
    /// When both `.` and `,` appear the last one is the decimal separator;
    /// a lone `,` is a decimal comma.
    pub fn value(&self) -> Option<f64> {
        let caps = NUMBER_RE.captures(self.0.trim())?;
        let raw = caps.get(1)?.as_str();

        let normalized = match (raw.rfind(','), raw.rfind('.')) {
            (Some(comma), Some(dot)) if comma > dot => raw.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => raw.replace(',', ""),
            (Some(_), None) => raw.replace(',', "."),
            _ => raw.to_string(),
        };

        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parsed value, or 0 when the cell is not a number
    pub fn or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One shopping-list entry.
///
/// Rows are append-only: once stamped they are never edited, only cleared
/// together with the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub timestamp: String,
    pub item: String,
    pub brand: String,
    pub quantity: Number,
    pub unit_type: UnitType,
    pub note: String,
    pub price: Number,
}

impl Row {
    /// Build a row from a table record (header already removed).
    ///
    /// Short records are padded with empty cells; a record with no content
    /// at all yields `None`.
    pub fn from_record(record: &[String]) -> Option<Self> {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            return None;
        }

        let cell = |i: usize| record.get(i).map(|s| s.trim().to_string()).unwrap_or_default();

        Some(Self {
            timestamp: cell(0),
            item: cell(1),
            brand: cell(2),
            quantity: Number::from_text(cell(3)),
            unit_type: UnitType::parse(&cell(4)),
            note: cell(5),
            price: Number::from_text(cell(6)),
        })
    }

    /// Cells in `HEADER` order
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.item.clone(),
            self.brand.clone(),
            self.quantity.as_str().to_string(),
            self.unit_type.label().to_string(),
            self.note.clone(),
            self.price.as_str().to_string(),
        ]
    }

    /// Price times quantity, for per-row display. Unparseable cells count as 0.
    pub fn line_total(&self) -> f64 {
        self.price.or_zero() * self.quantity.or_zero()
    }
}

/// Validated input for a new row; the timestamp is added when it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRow {
    item: String,
    brand: String,
    quantity: f64,
    unit_type: UnitType,
    note: String,
    price: f64,
}

impl NewRow {
    pub fn new(
        item: impl Into<String>,
        quantity: f64,
        unit_type: UnitType,
        price: f64,
    ) -> Result<Self, ValidationError> {
        let item = item.into().trim().to_string();
        if item.is_empty() {
            return Err(ValidationError::EmptyItem);
        }
        // `!(x > 0)` also rejects NaN
        if !(quantity > 0.0) {
            return Err(ValidationError::NonPositiveQuantity(quantity));
        }
        if !(price > 0.0) {
            return Err(ValidationError::NonPositivePrice(price));
        }

        Ok(Self {
            item,
            brand: String::new(),
            quantity,
            unit_type,
            note: String::new(),
            price,
        })
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into().trim().to_string();
        self
    }

    /// Free-form weight/volume annotation (`1kg`, `500ml`)
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into().trim().to_string();
        self
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn stamp(self, timestamp: String) -> Row {
        Row {
            timestamp,
            item: self.item,
            brand: self.brand,
            quantity: Number::from_quantity(self.quantity),
            unit_type: self.unit_type,
            note: self.note,
            price: Number::from_price(self.price),
        }
    }
}
