use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// Number of configurable slots per field kind.
pub const SLOT_COUNT: u8 = 10;

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum FieldKind {
    Text,
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
        }
    }
}

/// A configurable metadata slot. Indices are fixed and never renumbered.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FieldSlot {
    pub kind: FieldKind,
    pub index: u8,
}

impl FieldSlot {
    pub fn new(kind: FieldKind, index: u8) -> Self {
        Self { kind, index }
    }

    pub fn text(index: u8) -> Self {
        Self::new(FieldKind::Text, index)
    }

    pub fn date(index: u8) -> Self {
        Self::new(FieldKind::Date, index)
    }

    pub fn is_valid(&self) -> bool {
        (1..=SLOT_COUNT).contains(&self.index)
    }

    /// Every slot in catalog order: text 1..=10 then date 1..=10.
    pub fn all() -> impl Iterator<Item = FieldSlot> {
        [FieldKind::Text, FieldKind::Date]
            .into_iter()
            .flat_map(|kind| (1..=SLOT_COUNT).map(move |index| FieldSlot::new(kind, index)))
    }

    pub fn default_label(&self) -> String {
        match self.kind {
            FieldKind::Text => format!("Text {}", self.index),
            FieldKind::Date => format!("Date {}", self.index),
        }
    }
}

/// Fields every document carries regardless of catalog configuration.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SystemField {
    Title,
    DocumentDate,
    Department,
    SubDepartment,
}

impl SystemField {
    pub const ALL: [SystemField; 4] = [
        SystemField::Title,
        SystemField::DocumentDate,
        SystemField::Department,
        SystemField::SubDepartment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemField::Title => "title",
            SystemField::DocumentDate => "document_date",
            SystemField::Department => "department",
            SystemField::SubDepartment => "sub_department",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemField::Title => "Title",
            SystemField::DocumentDate => "Document Date",
            SystemField::Department => "Department",
            SystemField::SubDepartment => "Sub Department",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            SystemField::DocumentDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

/// Reference to a catalog field. Textual form: `system:title`, `text:3`, `date:10`.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde-full",
    serde(try_from = "String", into = "String")
)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum FieldKey {
    System(SystemField),
    Slot(FieldSlot),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::System(field) => write!(f, "system:{}", field.as_str()),
            FieldKey::Slot(slot) => write!(f, "{}:{}", slot.kind.as_str(), slot.index),
        }
    }
}

impl FromStr for FieldKey {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::FieldKey(raw.to_string());
        let (prefix, rest) = raw.trim().split_once(':').ok_or_else(invalid)?;
        let prefix = prefix.trim().to_ascii_lowercase();
        let rest = rest.trim();
        match prefix.as_str() {
            "system" => SystemField::ALL
                .into_iter()
                .find(|field| field.as_str().eq_ignore_ascii_case(rest))
                .map(FieldKey::System)
                .ok_or_else(invalid),
            "text" | "date" => {
                let kind = if prefix == "text" {
                    FieldKind::Text
                } else {
                    FieldKind::Date
                };
                let index: u8 = rest.parse().map_err(|_| invalid())?;
                let slot = FieldSlot::new(kind, index);
                if slot.is_valid() {
                    Ok(FieldKey::Slot(slot))
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for FieldKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldKey> for String {
    fn from(value: FieldKey) -> Self {
        value.to_string()
    }
}

impl From<FieldSlot> for FieldKey {
    fn from(value: FieldSlot) -> Self {
        FieldKey::Slot(value)
    }
}

impl From<SystemField> for FieldKey {
    fn from(value: SystemField) -> Self {
        FieldKey::System(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_order_is_text_then_date() {
        let slots: Vec<_> = FieldSlot::all().collect();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0], FieldSlot::text(1));
        assert_eq!(slots[9], FieldSlot::text(10));
        assert_eq!(slots[10], FieldSlot::date(1));
    }

    #[test]
    fn field_key_text_form() {
        assert_eq!(
            "text:3".parse::<FieldKey>().unwrap(),
            FieldKey::Slot(FieldSlot::text(3))
        );
        assert_eq!(
            "System:Document_Date".parse::<FieldKey>().unwrap(),
            FieldKey::System(SystemField::DocumentDate)
        );
        assert_eq!(FieldKey::Slot(FieldSlot::date(10)).to_string(), "date:10");
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        assert!("text:0".parse::<FieldKey>().is_err());
        assert!("date:11".parse::<FieldKey>().is_err());
        assert!("number:1".parse::<FieldKey>().is_err());
        assert!("title".parse::<FieldKey>().is_err());
    }
}
