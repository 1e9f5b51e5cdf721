use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Stable colour per league, shared by the scatter plot, histograms and the
/// league checkboxes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Every league of the file gets its own hue, spread over the wheel in
    /// sorted order, so unticking a league never recolours the others.
    pub fn new(leagues: &BTreeSet<String>) -> Self {
        let step = 360.0 / leagues.len().max(1) as f32;
        let mapping = leagues
            .iter()
            .enumerate()
            .map(|(i, league)| (league.clone(), league_color(i as f32 * step)))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, league: &str) -> Color32 {
        self.mapping.get(league).copied().unwrap_or(Color32::GRAY)
    }
}

fn league_color(hue: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, 0.65, 0.6).into_color();
    let rgb = rgb.into_format::<u8>();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}
