use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Layering score assigned when a catalog row does not carry one
pub const DEFAULT_LAYERING_SCORE: u8 = 3;

/// Outfit slot a garment fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Outer,
    Top,
    Bottom,
    Dress,
}

impl Role {
    /// Whether a garment worn at `position` may fill this slot
    ///
    /// Bottoms accept `not-applicable` while tops do not; dresses are not
    /// filtered by layer position at all.
    pub fn accepts(&self, position: LayerPosition) -> bool {
        match self {
            Role::Outer => position == LayerPosition::Outer,
            Role::Top => position == LayerPosition::Inner,
            Role::Bottom => matches!(
                position,
                LayerPosition::Inner | LayerPosition::NotApplicable
            ),
            Role::Dress => true,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Outer => "Outer",
            Role::Top => "Top",
            Role::Bottom => "Bottom",
            Role::Dress => "Dress",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "outer" => Ok(Role::Outer),
            "top" => Ok(Role::Top),
            "bottom" => Ok(Role::Bottom),
            "dress" => Ok(Role::Dress),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Closed set of garment categories known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Jacket,
    Coat,
    Hoodie,
    #[serde(rename = "t-shirt")]
    TShirt,
    #[serde(rename = "button-up shirt")]
    ButtonUpShirt,
    Sweater,
    Polo,
    Blouse,
    TankTop,
    Jeans,
    Trousers,
    Shorts,
    Skirt,
    Leggings,
    Dress,
}

impl Category {
    /// Static category → role map
    pub fn role(&self) -> Role {
        match self {
            Category::Jacket | Category::Coat | Category::Hoodie => Role::Outer,
            Category::TShirt
            | Category::ButtonUpShirt
            | Category::Sweater
            | Category::Polo
            | Category::Blouse
            | Category::TankTop => Role::Top,
            Category::Jeans
            | Category::Trousers
            | Category::Shorts
            | Category::Skirt
            | Category::Leggings => Role::Bottom,
            Category::Dress => Role::Dress,
        }
    }

    /// Parses a catalog category label, returning `None` for unmapped labels
    pub fn parse(label: &str) -> Option<Self> {
        let category = match label.trim().to_lowercase().as_str() {
            "jacket" => Category::Jacket,
            "coat" => Category::Coat,
            "hoodie" => Category::Hoodie,
            "t-shirt" => Category::TShirt,
            "button-up shirt" => Category::ButtonUpShirt,
            "sweater" => Category::Sweater,
            "polo" => Category::Polo,
            "blouse" => Category::Blouse,
            "tank top" | "tank-top" => Category::TankTop,
            "jeans" => Category::Jeans,
            "trousers" => Category::Trousers,
            "shorts" => Category::Shorts,
            "skirt" => Category::Skirt,
            "leggings" => Category::Leggings,
            "dress" => Category::Dress,
            _ => return None,
        };
        Some(category)
    }
}

/// Where a garment sits in a layered outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerPosition {
    Outer,
    Inner,
    NotApplicable,
}

impl LayerPosition {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "outer" => Some(LayerPosition::Outer),
            "inner" => Some(LayerPosition::Inner),
            "not-applicable" | "not applicable" => Some(LayerPosition::NotApplicable),
            _ => None,
        }
    }
}

/// A validated catalog row
///
/// Every field is populated; defaults are applied when the row is ingested,
/// never inside scoring.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Garment {
    /// Identity key, also used as the wear history key
    pub image_link: String,
    pub name: Option<String>,
    pub category: Category,
    pub role: Role,
    pub layer_position: LayerPosition,
    /// 1 (very light) to 5 (very warm)
    pub warmth_score: u8,
    /// 1 (none) to 3 (high rain protection)
    pub impermeability_score: u8,
    pub layering_score: u8,
    pub color: String,
    pub pattern: Option<String>,
}

/// Raw catalog row as found in external datasets or request bodies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GarmentRecord {
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "outer_inner")]
    pub layer_position: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub warmth_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub impermeability_score: Option<i64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub layering_score: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `3`, `3.0` and `"3"`; anything that is not a whole number fails the row.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    fn whole(value: f64) -> Option<i64> {
        (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
    }

    let raw = match Option::<RawScore>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let score = match raw {
        RawScore::Int(value) => Some(value),
        RawScore::Float(value) => whole(value),
        RawScore::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole))
        }
    };
    score
        .map(Some)
        .ok_or_else(|| de::Error::custom("score is not a whole number"))
}

/// Why a catalog row was quarantined at ingestion
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecordRejection {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unmapped category '{0}'")]
    UnmappedCategory(String),

    #[error("unknown layer position '{0}'")]
    UnknownLayerPosition(String),

    #[error("malformed row: {0}")]
    Malformed(String),

    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u8,
        max: u8,
    },
}

fn score_in_range(
    field: &'static str,
    value: Option<i64>,
    min: u8,
    max: u8,
) -> Result<u8, RecordRejection> {
    let value = value.ok_or(RecordRejection::MissingField(field))?;
    if value < min as i64 || value > max as i64 {
        return Err(RecordRejection::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value as u8)
}

impl TryFrom<GarmentRecord> for Garment {
    type Error = RecordRejection;

    fn try_from(record: GarmentRecord) -> Result<Self, Self::Error> {
        let image_link = record
            .image_link
            .filter(|link| !link.trim().is_empty())
            .ok_or(RecordRejection::MissingField("image_link"))?;

        let label = record
            .category
            .ok_or(RecordRejection::MissingField("category"))?;
        let category =
            Category::parse(&label).ok_or_else(|| RecordRejection::UnmappedCategory(label))?;

        let position_label = record
            .layer_position
            .ok_or(RecordRejection::MissingField("layer_position"))?;
        let layer_position = LayerPosition::parse(&position_label)
            .ok_or_else(|| RecordRejection::UnknownLayerPosition(position_label))?;

        let warmth_score = score_in_range("warmth_score", record.warmth_score, 1, 5)?;
        let impermeability_score =
            score_in_range("impermeability_score", record.impermeability_score, 1, 3)?;
        let layering_score = match record.layering_score {
            Some(_) => score_in_range("layering_score", record.layering_score, 0, u8::MAX)?,
            None => DEFAULT_LAYERING_SCORE,
        };

        Ok(Garment {
            image_link,
            name: record.name,
            category,
            role: category.role(),
            layer_position,
            warmth_score,
            impermeability_score,
            layering_score,
            color: record.color.unwrap_or_default(),
            pattern: record.pattern.filter(|p| !p.trim().is_empty()),
        })
    }
}
