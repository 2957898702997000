//! Photographic pre-enhancement
//!
//! Boosts saturation and pushes lightness away from mid-gray before
//! dominant-color voting, compensating for the muted casts typical of
//! phone photos. Each channel is nudged up if it is the brightest channel
//! and down otherwise, by `saturation * min(lightness, 1 - lightness) * 255`
//! computed on the boosted values.

use image::{Rgb, RgbImage};

use super::Color;
use crate::{config::EnhancementConfig, deadline::Deadline, Result};

/// Enhance a single color
pub fn enhance_color(color: Color, config: &EnhancementConfig) -> Color {
    let max = color.max_channel();
    if max == color.min_channel() {
        return color;
    }

    let lightness = color.lightness();
    let saturation = (color.hsl_saturation() * config.saturation_gain).min(1.0);
    let lightness = if lightness < 0.5 {
        lightness * config.shadow_factor
    } else {
        lightness * config.highlight_factor
    };
    let shift = saturation * lightness.min(1.0 - lightness) * 255.0;

    let nudge = |channel: u8| -> u8 {
        let direction = if channel == max { 1.0 } else { -1.0 };
        (channel as f64 + direction * shift)
            .clamp(0.0, 255.0)
            .round_ties_even() as u8
    };

    Color::new(nudge(color.r), nudge(color.g), nudge(color.b))
}

/// Enhance every pixel of `image`, checking `deadline` once per row
pub fn enhance_image(
    image: &RgbImage,
    config: &EnhancementConfig,
    deadline: &Deadline,
) -> Result<RgbImage> {
    let mut enhanced = image.clone();

    for (index, row) in enhanced.rows_mut().enumerate() {
        if index % 16 == 0 {
            deadline.check("enhancement")?;
        }
        for pixel in row {
            let color = enhance_color(Color::from(*pixel), config);
            *pixel = Rgb::from(color);
        }
    }

    Ok(enhanced)
}
