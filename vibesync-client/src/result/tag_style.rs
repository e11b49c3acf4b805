//! Tag chip styling
//!
//! Keyword rules are checked in order against the lowercased tag; the first
//! rule with a matching substring wins.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagIcon {
    Coffee,
    CloudRain,
    Sun,
    Monitor,
    Briefcase,
    Feather,
    Sparkles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipColor {
    Purple,
    Blue,
    Amber,
    Slate,
    Emerald,
    Orange,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagStyle {
    pub icon: TagIcon,
    pub color: ChipColor,
}

const RULES: &[(&[&str], TagStyle)] = &[
    (&["coffee", "cafe"], TagStyle { icon: TagIcon::Coffee, color: ChipColor::Purple }),
    (&["rain", "storm"], TagStyle { icon: TagIcon::CloudRain, color: ChipColor::Blue }),
    (&["sun", "sunny", "bright"], TagStyle { icon: TagIcon::Sun, color: ChipColor::Amber }),
    (&["window", "glass"], TagStyle { icon: TagIcon::Monitor, color: ChipColor::Slate }),
    (&["work", "office"], TagStyle { icon: TagIcon::Briefcase, color: ChipColor::Emerald }),
    (&["cozy", "warm"], TagStyle { icon: TagIcon::Feather, color: ChipColor::Orange }),
];

const DEFAULT_STYLE: TagStyle = TagStyle {
    icon: TagIcon::Sparkles,
    color: ChipColor::Neutral,
};

pub fn style_for(tag: &str) -> TagStyle {
    let lower = tag.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, style)| *style)
        .unwrap_or(DEFAULT_STYLE)
}

/// A rendered tag label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub label: String,
    pub style: TagStyle,
}

impl TagChip {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            style: style_for(label),
        }
    }
}
