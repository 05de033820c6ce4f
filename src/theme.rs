//! Static styling table for the itinerary document.
//!
//! Colors, font sizes and page geometry are grouped in a [`Theme`] value that is
//! handed to the rendering routines.  [`Theme::CLASSIC`] reproduces the stock
//! purple layout.

use genpdf::style::{Color, Style};

/// An RGB color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

/// Fixed colors and geometry shared by all sections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    /// Banner background, headings and day titles.
    pub primary: Rgb,
    /// Day-part labels and transfer lines.
    pub accent: Rgb,
    /// Flight lines.
    pub highlight: Rgb,
    /// Body text.
    pub text: Rgb,
    /// Table header fill.
    pub table_fill: Rgb,
    /// Day block background.
    pub section_fill: Rgb,

    /// Page width and height in millimetres.
    pub page_size_mm: (f64, f64),
    /// Horizontal page margin applied below the banner.
    pub side_margin_mm: f64,
    /// Gap between the banner and the first section.
    pub top_gap_mm: f64,
    /// Space kept free at the bottom of every page.
    pub bottom_margin_mm: f64,

    pub banner_height_mm: f64,
    pub day_block_height_mm: f64,
    pub day_block_gap_mm: f64,
    pub section_gap_mm: f64,
}

impl Theme {
    pub const CLASSIC: Theme = Theme {
        primary: Rgb(108, 63, 197),
        accent: Rgb(41, 128, 185),
        highlight: Rgb(39, 174, 96),
        text: Rgb(52, 73, 94),
        table_fill: Rgb(233, 244, 255),
        section_fill: Rgb(247, 245, 251),

        page_size_mm: (210.0, 297.0),
        side_margin_mm: 15.0,
        top_gap_mm: 4.0,
        bottom_margin_mm: 4.0,

        banner_height_mm: 36.0,
        day_block_height_mm: 54.0,
        day_block_gap_mm: 8.0,
        section_gap_mm: 4.0,
    };

    /// Style of a text run in `color` with the given size.
    pub fn text_style(&self, color: Rgb, font_size: u8) -> Style {
        Style::new().with_color(color.color()).with_font_size(font_size)
    }

    /// Bold variant of [`Theme::text_style`].
    pub fn bold_style(&self, color: Rgb, font_size: u8) -> Style {
        self.text_style(color, font_size).bold()
    }

    /// Italic variant of [`Theme::text_style`].
    pub fn italic_style(&self, color: Rgb, font_size: u8) -> Style {
        self.text_style(color, font_size).italic()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::CLASSIC
    }
}

/// Fixed texts printed in the page banner and footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branding {
    pub icons: String,
    pub tagline: String,
    pub generator: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            icons: "FLIGHTS \u{b7} HOTELS \u{b7} TRANSFERS \u{b7} TOURS".to_owned(),
            tagline: "PLAN.PACK.GO.".to_owned(),
            generator: "Generated by Vigovia".to_owned(),
        }
    }
}
