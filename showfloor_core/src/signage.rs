//! Text signage and the scene colour palette.

use serde::{Deserialize, Serialize};

/// RGBA colour in linear [0, 1] components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Brand palette.
pub mod palette {
    use super::Color4;

    pub const CYAN: Color4 = Color4::rgb(0.0, 0.9, 0.9);
    pub const GREEN: Color4 = Color4::rgb(0.0, 1.0, 0.5);
    pub const GREEN_GLOW: Color4 = Color4::rgb(0.0, 0.5, 0.25);
    pub const RED: Color4 = Color4::rgb(1.0, 0.2, 0.2);
    pub const RED_GLOW: Color4 = Color4::rgb(0.5, 0.1, 0.1);
    pub const YELLOW: Color4 = Color4::rgb(1.0, 0.85, 0.0);
    pub const WHITE: Color4 = Color4::rgb(1.0, 1.0, 1.0);
}

/// A text shape: content plus colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub text: String,
    pub color: Color4,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, color: Color4) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

pub const FREE_SUBTITLE: &str = "Visitor Tracking Active";
pub const FREE_INFO_TITLE: &str = "KNOW YOUR AUDIENCE";
pub const FREE_INFO_BODY: &str = "See who visits your scene LIVE\nTrack new vs returning visitors\nMeasure engagement & dwell time\nAll data in your dashboard";

pub const PAID_SUBTITLE: &str = "STANDARD - Guide & Chat Available";
pub const PAID_INFO_TITLE: &str = "STANDARD FEATURES";
pub const PAID_INFO_BODY: &str = "Channel Guide UI - Browse streams\nReal-time Chat - Talk to viewers\nWatch Metrics - Track engagement\nClick GUIDE or CHAT to try!";

/// Tier-dependent signage: the sign subtitle and the info panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signage {
    pub subtitle: TextLabel,
    pub info_title: TextLabel,
    pub info_body: TextLabel,
}

impl Default for Signage {
    fn default() -> Self {
        Self {
            subtitle: TextLabel::new(FREE_SUBTITLE, palette::WHITE),
            info_title: TextLabel::new(FREE_INFO_TITLE, palette::CYAN),
            info_body: TextLabel::new(FREE_INFO_BODY, palette::WHITE),
        }
    }
}

impl Signage {
    /// Switches the copy to the paid-tier wording. Colours are unchanged.
    pub fn apply_paid_tier(&mut self) {
        self.subtitle.text = PAID_SUBTITLE.to_string();
        self.info_title.text = PAID_INFO_TITLE.to_string();
        self.info_body.text = PAID_INFO_BODY.to_string();
    }

    pub fn is_paid_tier(&self) -> bool {
        self.subtitle.text == PAID_SUBTITLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signage_defaults_to_free_tier() {
        let signage = Signage::default();
        assert_eq!(signage.subtitle.text, FREE_SUBTITLE);
        assert!(!signage.is_paid_tier());
    }

    #[test]
    fn test_paid_relabel_keeps_colours() {
        let mut signage = Signage::default();
        signage.apply_paid_tier();
        assert!(signage.is_paid_tier());
        assert_eq!(signage.info_title.text, PAID_INFO_TITLE);
        assert_eq!(signage.info_title.color, palette::CYAN);
        assert!(signage.info_body.text.ends_with("Click GUIDE or CHAT to try!"));
    }
}
