//! Fixed-layout element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` lays elements out as a flowing column of text.  The itinerary
//! layout needs a few things the upstream crate does not ship with: filled
//! rectangles, table cells with a fixed width and height, day blocks that
//! always occupy the same vertical extent, and blocks anchored to the bottom of
//! the page.  The elements in this module provide those on top of
//! [`render::Area`] drawing calls.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::Image;
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Rotation, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const CELL_PADDING_MM: f64 = 1.0;

/// Converts a millimetre value into the `genpdf` unit type.
pub fn mm(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm(width_mm), mm(height_mm))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

fn rgb_components(color: Color) -> [u8; 3] {
    match color {
        Color::Rgb(r, g, b) => [r, g, b],
        Color::Greyscale(value) => [value, value, value],
        Color::Cmyk(c, m, y, k) => {
            let channel = |value: u8| {
                let ink = 1.0 - f64::from(value) / 255.0;
                let key = 1.0 - f64::from(k) / 255.0;
                (255.0 * ink * key).round() as u8
            };
            [channel(c), channel(m), channel(y)]
        }
    }
}

/// Scale that stretches a single pixel at the default image resolution over `size`.
fn pixel_scale(size: Size) -> Scale {
    let pixels_per_mm = DEFAULT_IMAGE_DPI / MM_PER_INCH;
    Scale::new(
        mm_to_f64(size.width) * pixels_per_mm,
        mm_to_f64(size.height) * pixels_per_mm,
    )
}

/// Fills the rectangle at `origin` with `color`.
///
/// `Area` can only stroke outlines, so the rectangle is painted as a single
/// solid pixel image stretched over `size`.
pub fn fill_rect(area: &render::Area<'_>, origin: Position, size: Size, color: Color) {
    let pixel = image::RgbImage::from_pixel(1, 1, image::Rgb(rgb_components(color)));
    // Images are anchored at their lower left corner.
    let anchor = Position::new(origin.x, origin.y + size.height);
    area.add_image(
        &image::DynamicImage::ImageRgb8(pixel),
        anchor,
        pixel_scale(size),
        Rotation::default(),
        Some(DEFAULT_IMAGE_DPI),
    );
}

/// Strokes the outline of the rectangle at `origin`.
pub fn stroke_rect(area: &render::Area<'_>, origin: Position, size: Size, color: Color) {
    let right = origin.x + size.width;
    let bottom = origin.y + size.height;
    area.draw_line(
        vec![
            origin,
            Position::new(right, origin.y),
            Position::new(right, bottom),
            Position::new(origin.x, bottom),
            origin,
        ],
        Style::new().with_color(color),
    );
}

/// One box of a [`CellRow`], equivalent to a bordered, optionally filled text cell.
#[derive(Clone, Debug)]
pub struct Cell {
    text: String,
    width: Option<Mm>,
    alignment: Alignment,
    style: Style,
    fill: Option<Color>,
    border: Option<Color>,
}

impl Cell {
    /// Creates a left aligned cell without fill or border.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            width: None,
            alignment: Alignment::Left,
            style,
            fill: None,
            border: None,
        }
    }

    /// Fixes the width of the cell.  Cells without a width stretch to the right edge.
    pub fn with_width(mut self, width: Mm) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_fill(mut self, fill: impl Into<Option<Color>>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn with_border(mut self, border: impl Into<Option<Color>>) -> Self {
        self.border = border.into();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Draws the cell at `x` and returns its width.
    fn draw(
        &self,
        context: &genpdf::Context,
        area: &render::Area<'_>,
        x: Mm,
        height: Mm,
    ) -> Result<Mm, Error> {
        let width = self
            .width
            .unwrap_or_else(|| area.size().width - x)
            .max(Mm::default());
        let origin = Position::new(x, 0);
        let size = Size::new(width, height);

        if let Some(fill) = self.fill {
            fill_rect(area, origin, size, fill);
        }
        if let Some(border) = self.border {
            stroke_rect(area, origin, size, border);
        }

        if !self.text.is_empty() {
            let padding = mm(CELL_PADDING_MM);
            let text_width =
                StyledString::new(self.text.clone(), self.style).width(&context.font_cache);
            let text_x = match self.alignment {
                Alignment::Left => x + padding,
                Alignment::Center => x + (width - text_width) / 2.0,
                Alignment::Right => x + width - padding - text_width,
            };
            let line_height = self.style.line_height(&context.font_cache);
            let text_y = ((height - line_height) / 2.0).max(Mm::default());
            area.print_str(
                &context.font_cache,
                Position::new(text_x, text_y),
                self.style,
                &self.text,
            )?;
        }

        Ok(width)
    }
}

/// A horizontal run of cells sharing one fixed height.
///
/// The row is rendered as a whole: when the remaining page area is shorter than
/// the row, nothing is drawn and the row moves to the next page.
#[derive(Clone, Debug)]
pub struct CellRow {
    cells: Vec<Cell>,
    height: Mm,
}

impl CellRow {
    pub fn new(height: Mm) -> Self {
        Self {
            cells: Vec::new(),
            height,
        }
    }

    /// Builds a row from any iterator over cells.
    pub fn from_cells<I>(height: Mm, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        Self {
            cells: cells.into_iter().collect(),
            height,
        }
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.push(cell);
        self
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn height(&self) -> Mm {
        self.height
    }

    fn draw(&self, context: &genpdf::Context, area: &render::Area<'_>) -> Result<Mm, Error> {
        let mut x = Mm::default();
        for cell in &self.cells {
            x += cell.draw(context, area, x, self.height)?;
        }
        Ok(x)
    }
}

impl Element for CellRow {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if self.height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let width = self.draw(context, &area)?;
        result.size = Size::new(width, self.height);
        Ok(result)
    }
}

/// A line of text inside a [`FixedBlock`].
#[derive(Clone, Debug)]
pub struct BlockLine {
    pub text: String,
    pub style: Style,
    pub indent: Mm,
    pub height: Mm,
}

impl BlockLine {
    pub fn new(text: impl Into<String>, style: Style, indent: Mm, height: Mm) -> Self {
        Self {
            text: text.into(),
            style,
            indent,
            height,
        }
    }
}

/// A block with a filled background that always occupies the same height.
///
/// Lines are printed top to bottom starting at `padding_top`.  The content is
/// not measured against the block height: lines past the background keep
/// printing below it and overlap whatever follows.
#[derive(Clone, Debug)]
pub struct FixedBlock {
    lines: Vec<BlockLine>,
    height: Mm,
    padding_top: Mm,
    fill: Option<Color>,
}

impl FixedBlock {
    pub fn new(height: Mm, padding_top: Mm, fill: impl Into<Option<Color>>) -> Self {
        Self {
            lines: Vec::new(),
            height,
            padding_top,
            fill: fill.into(),
        }
    }

    pub fn push(&mut self, line: BlockLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[BlockLine] {
        &self.lines
    }
}

impl Element for FixedBlock {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available = area.size();
        if self.height > available.height {
            result.has_more = true;
            return Ok(result);
        }

        if let Some(fill) = self.fill {
            fill_rect(
                &area,
                Position::default(),
                Size::new(available.width, self.height),
                fill,
            );
        }

        let mut cursor = self.padding_top;
        for line in &self.lines {
            let printed = area.print_str(
                &context.font_cache,
                Position::new(line.indent, cursor),
                line.style,
                &line.text,
            )?;
            if !printed {
                break;
            }
            cursor += line.height;
        }

        result.size = Size::new(available.width, self.height);
        Ok(result)
    }
}

/// Vertical whitespace of a fixed height.
///
/// At the bottom of a page the gap is truncated to the remaining space instead
/// of forcing a page break.
#[derive(Clone, Copy, Debug)]
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    pub fn new(height: Mm) -> Self {
        Self { height }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// A stack of cell rows sharing one background, used for the page banner and footer.
pub struct Panel {
    rows: Vec<(Position, CellRow)>,
    height: Mm,
    fill: Option<Color>,
    logo: Option<Logo>,
}

impl Panel {
    pub fn new(height: Mm, fill: impl Into<Option<Color>>) -> Self {
        Self {
            rows: Vec::new(),
            height,
            fill: fill.into(),
            logo: None,
        }
    }

    /// Places `row` at `offset` relative to the top left corner of the panel.
    pub fn with_row(mut self, offset: Position, row: CellRow) -> Self {
        self.rows.push((offset, row));
        self
    }

    pub fn with_logo(mut self, logo: impl Into<Option<Logo>>) -> Self {
        self.logo = logo.into();
        self
    }

    pub fn height(&self) -> Mm {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &CellRow> {
        self.rows.iter().map(|(_, row)| row)
    }
}

impl Element for Panel {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available = area.size();
        if self.height > available.height {
            result.has_more = true;
            return Ok(result);
        }

        if let Some(fill) = self.fill {
            fill_rect(
                &area,
                Position::default(),
                Size::new(available.width, self.height),
                fill,
            );
        }

        if let Some(logo) = &self.logo {
            logo.render(context, area.clone(), style)?;
        }

        for (offset, row) in &self.rows {
            let mut row_area = area.clone();
            row_area.add_offset(*offset);
            row.draw(context, &row_area)?;
        }

        result.size = Size::new(available.width, self.height);
        Ok(result)
    }
}

/// An image scaled into a fixed bounding box at a fixed offset.
#[derive(Clone)]
pub struct Logo {
    image: image::DynamicImage,
    offset: Position,
    bounds: Size,
}

impl Logo {
    pub fn new(image: image::DynamicImage, offset: Position, bounds: Size) -> Self {
        Self {
            image,
            offset,
            bounds,
        }
    }

    /// Loads the logo from `path`.
    pub fn from_path(
        path: impl AsRef<Path>,
        offset: Position,
        bounds: Size,
    ) -> Result<Self, Error> {
        let image = decode_image_from_path(path)?;
        Ok(Self::new(image, offset, bounds))
    }

    fn scale(&self) -> f64 {
        let natural = estimated_image_size(&self.image, DEFAULT_IMAGE_DPI);
        let natural_width = mm_to_f64(natural.width);
        let natural_height = mm_to_f64(natural.height);
        if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
            return 1.0;
        }
        let horizontal = mm_to_f64(self.bounds.width) / natural_width;
        let vertical = mm_to_f64(self.bounds.height) / natural_height;
        horizontal.min(vertical)
    }

    fn render(
        &self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut image = Image::from_dynamic_image(self.image.clone())?;
        let scale = self.scale();
        image.set_scale(Scale::new(scale, scale));
        image.set_alignment(Alignment::Left);
        area.add_offset(self.offset);
        image.render(context, area, style)
    }
}

/// Renders an element of known height flush with the bottom of the remaining area.
pub struct BottomAnchored<E: Element> {
    element: E,
    height: Mm,
}

impl<E: Element> BottomAnchored<E> {
    pub fn new(element: E, height: Mm) -> Self {
        Self { element, height }
    }
}

impl<E: Element> Element for BottomAnchored<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        if self.height > available {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        area.add_offset(Position::new(0, available - self.height));
        let mut result = self.element.render(context, area, style)?;
        result.size = Size::new(result.size.width, available);
        Ok(result)
    }
}
