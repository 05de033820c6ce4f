//! Assembly of the itinerary document.
//!
//! [`create_pdf`] is the entry point used by the HTTP service: it lays out all
//! sections in a fixed order, creates the output directory and writes the file.
//! The banner is repeated on every page by the page decorator; the footer is
//! drawn once at the bottom of the last page unless [`FooterMode::EveryPage`]
//! is selected.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use genpdf::elements::PageBreak;
use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Margins, Position, RenderResult, Size};
use log::{debug, info};

use crate::builder::{DocumentBuilder, PageCounter};
use crate::elements::{
    mm, BlockLine, BottomAnchored, Cell, CellRow, FixedBlock, Logo, Panel, Spacer,
};
use crate::error::RenderError;
use crate::model::ItineraryRequest;
use crate::schedule::{assemble_schedule, DaySchedule};
use crate::sections::{self, BannerText, DayLineKind, FooterText, Table, TableSection};
use crate::theme::{Branding, Rgb, Theme};

/// Default directory generated documents are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "./pdfs";
/// Default location of the optional banner logo.
pub const DEFAULT_LOGO_PATH: &str = "public/logo.png";

const FOOTER_HEIGHT_MM: f64 = 16.0;
const SECTION_TITLE_HEIGHT_MM: f64 = 10.0;
const TABLE_ROW_HEIGHT_MM: f64 = 8.0;
const SUMMARY_TITLE_HEIGHT_MM: f64 = 12.0;
const SUMMARY_ROW_HEIGHT_MM: f64 = 10.0;

/// Where the footer is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FooterMode {
    /// Once, at the bottom of the last page.
    #[default]
    LastPage,
    /// At the bottom of every page.
    EveryPage,
}

/// Settings for [`create_pdf`].
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub output_dir: PathBuf,
    /// Drawn in the banner when the file exists.
    pub logo_path: PathBuf,
    /// Directory searched for fonts before the default locations.
    pub font_dir: Option<PathBuf>,
    pub footer: FooterMode,
    pub theme: Theme,
    pub branding: Branding,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            font_dir: None,
            footer: FooterMode::default(),
            theme: Theme::default(),
            branding: Branding::default(),
        }
    }
}

/// Page bookkeeping gathered while a document is laid out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    /// Number of pages in the document.
    pub pages: usize,
    /// Pages the footer was drawn on, in order.
    pub footer_pages: Vec<usize>,
}

#[derive(Clone, Default)]
struct LayoutTracker {
    pages: PageCounter,
    footer_pages: Rc<RefCell<Vec<usize>>>,
}

impl LayoutTracker {
    fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            pages: self.pages.current(),
            footer_pages: self.footer_pages.borrow().clone(),
        }
    }
}

/// Renders `request` and writes it to the output directory.
///
/// Returns the path of the written file.  An existing file with the same name is
/// replaced whole: the document is staged in the output directory and renamed
/// over the target, so readers never see a partially written file.
pub fn create_pdf(
    request: &ItineraryRequest,
    options: &RenderOptions,
) -> Result<PathBuf, RenderError> {
    let (bytes, summary) = render_with_summary(request, options)?;

    fs::create_dir_all(&options.output_dir).map_err(|source| RenderError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let path = sections::output_path(&options.output_dir, request);
    replace_file(&options.output_dir, &path, &bytes).map_err(|source| RenderError::Write {
        path: path.clone(),
        source,
    })?;

    info!("wrote itinerary {} ({} pages)", path.display(), summary.pages);
    debug!("footer drawn on pages {:?}", summary.footer_pages);
    Ok(path)
}

fn replace_file(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut staged = tempfile::Builder::new()
        .prefix(".itinerary-")
        .suffix(".pdf.part")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    // Staged files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    staged.persist(path)?;
    Ok(())
}

/// Renders `request` into memory.
pub fn render_to_bytes(
    request: &ItineraryRequest,
    options: &RenderOptions,
) -> Result<Vec<u8>, RenderError> {
    render_with_summary(request, options).map(|(bytes, _)| bytes)
}

/// Renders `request` into memory and reports how it was paginated.
pub fn render_with_summary(
    request: &ItineraryRequest,
    options: &RenderOptions,
) -> Result<(Vec<u8>, LayoutSummary), RenderError> {
    let (document, tracker) = build_document(request, options)?;
    let mut bytes = Vec::new();
    document.render(&mut bytes).map_err(RenderError::Render)?;
    Ok((bytes, tracker.summary()))
}

fn load_logo(path: &Path) -> Result<Option<Logo>, RenderError> {
    if !path.is_file() {
        debug!("no logo at {}", path.display());
        return Ok(None);
    }

    Logo::from_path(
        path,
        Position::new(mm(15.0), mm(12.0)),
        Size::new(mm(30.0), mm(18.0)),
    )
    .map(Some)
    .map_err(|source| RenderError::Logo {
        path: path.to_path_buf(),
        source,
    })
}

fn build_document(
    request: &ItineraryRequest,
    options: &RenderOptions,
) -> Result<(genpdf::Document, LayoutTracker), RenderError> {
    let theme = options.theme;
    let logo = load_logo(&options.logo_path)?;
    let banner = sections::banner_text(request, &options.branding);
    let footer = sections::footer_text(&request.contact, &options.branding);
    let (page_width, page_height) = theme.page_size_mm;

    let mut builder = DocumentBuilder::new()
        .with_title(banner.title.clone())
        .with_paper_size(Size::new(mm(page_width), mm(page_height)))
        .with_margins(Margins::trbl(
            mm(theme.top_gap_mm),
            mm(theme.side_margin_mm),
            mm(theme.bottom_margin_mm),
            mm(theme.side_margin_mm),
        ))
        .with_font_dir(options.font_dir.clone())
        .with_header(move |_page| banner_panel(&theme, &banner, logo.clone()));

    let footer_pages = Rc::new(RefCell::new(Vec::new()));
    if options.footer == FooterMode::EveryPage {
        let footer = footer.clone();
        let drawn = Rc::clone(&footer_pages);
        builder = builder.with_footer(mm(FOOTER_HEIGHT_MM), move |page| {
            drawn.borrow_mut().push(page);
            footer_panel(&theme, &footer, page)
        });
    }

    let tracker = LayoutTracker {
        pages: builder.page_counter(),
        footer_pages,
    };
    let mut document = builder.build().map_err(RenderError::Fonts)?;

    push_trip_summary(&mut document, &theme, request);

    let days = assemble_schedule(request);
    debug!("laying out {} itinerary days", days.len());
    for day in &days {
        document.push(day_block(&theme, day));
        document.push(Spacer::new(mm(theme.day_block_gap_mm)));
    }

    document.push(PageBreak::new());
    for section in sections::summary_sections(request) {
        push_table_section(&mut document, &theme, &section);
    }

    if options.footer == FooterMode::LastPage {
        document.push(LastPageFooter {
            theme,
            text: footer,
            tracker: tracker.clone(),
        });
    }

    Ok((document, tracker))
}

fn banner_panel(theme: &Theme, text: &BannerText, logo: Option<Logo>) -> Panel {
    let line = |content: &str, style: Style, height: f64| {
        CellRow::new(mm(height)).with_cell(
            Cell::new(content, style)
                .with_width(mm(150.0))
                .with_alignment(Alignment::Right),
        )
    };

    Panel::new(mm(theme.banner_height_mm), theme.primary.color())
        .with_logo(logo)
        .with_row(
            Position::new(mm(50.0), mm(9.0)),
            line(&text.greeting, theme.bold_style(Rgb::WHITE, 22), 10.0),
        )
        .with_row(
            Position::new(mm(50.0), mm(18.0)),
            line(&text.title, theme.bold_style(Rgb::WHITE, 16), 8.0),
        )
        .with_row(
            Position::new(mm(50.0), mm(25.0)),
            line(&text.duration, theme.text_style(Rgb::WHITE, 13), 6.0),
        )
        .with_row(
            Position::new(mm(50.0), mm(30.0)),
            line(&text.icons, theme.text_style(Rgb::WHITE, 10), 5.0),
        )
}

fn footer_panel(theme: &Theme, text: &FooterText, page: usize) -> Panel {
    let centered = |content: String, style: Style, height: f64| {
        CellRow::new(mm(height))
            .with_cell(Cell::new(content, style).with_alignment(Alignment::Center))
    };

    Panel::new(mm(FOOTER_HEIGHT_MM), None::<Color>)
        .with_row(
            Position::default(),
            centered(text.tagline(page), theme.italic_style(theme.primary, 11), 10.0),
        )
        .with_row(
            Position::new(0, mm(10.0)),
            centered(text.contact.clone(), theme.text_style(theme.text, 9), 6.0),
        )
}

/// Footer anchored to the bottom of whichever page the end of the document lands on.
struct LastPageFooter {
    theme: Theme,
    text: FooterText,
    tracker: LayoutTracker,
}

impl Element for LastPageFooter {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let page = self.tracker.pages.current();
        let panel = footer_panel(&self.theme, &self.text, page);
        let result = BottomAnchored::new(panel, mm(FOOTER_HEIGHT_MM)).render(context, area, style)?;
        if !result.has_more {
            self.tracker.footer_pages.borrow_mut().push(page);
        }
        Ok(result)
    }
}

fn push_trip_summary(document: &mut genpdf::Document, theme: &Theme, request: &ItineraryRequest) {
    let table = sections::trip_summary(request);
    let body = theme.text_style(theme.text, 11);

    document.push(CellRow::new(mm(SUMMARY_TITLE_HEIGHT_MM)).with_cell(
        Cell::new("Trip Summary", theme.bold_style(theme.primary, 13))
            .with_width(mm(table.width_mm()))
            .with_alignment(Alignment::Center)
            .with_fill(theme.table_fill.color())
            .with_border(theme.text.color()),
    ));
    document.push(CellRow::from_cells(
        mm(SUMMARY_ROW_HEIGHT_MM),
        table.columns.iter().map(|column| {
            Cell::new(column.label, body)
                .with_width(mm(column.width_mm))
                .with_alignment(Alignment::Center)
                .with_border(theme.text.color())
        }),
    ));
    for row in body_rows(theme, &table, body, SUMMARY_ROW_HEIGHT_MM) {
        document.push(row);
    }
    document.push(Spacer::new(mm(theme.section_gap_mm)));
}

fn day_block(theme: &Theme, day: &DaySchedule) -> FixedBlock {
    let mut block = FixedBlock::new(
        mm(theme.day_block_height_mm),
        mm(6.0),
        theme.section_fill.color(),
    );
    block.push(BlockLine::new(
        day.title(),
        theme.bold_style(theme.primary, 14),
        mm(7.0),
        mm(8.0),
    ));

    for line in sections::day_lines(day) {
        let (style, indent, height) = match line.kind {
            DayLineKind::PartLabel => (theme.bold_style(theme.accent, 11), 13.0, 7.0),
            DayLineKind::Activity => (theme.text_style(theme.text, 10), 19.0, 6.0),
            DayLineKind::Flight => (theme.text_style(theme.highlight, 10), 19.0, 6.0),
            DayLineKind::Transfer => (theme.text_style(theme.accent, 10), 19.0, 6.0),
            DayLineKind::HotelName => (theme.text_style(theme.primary, 10), 19.0, 6.0),
            DayLineKind::HotelDetail => (theme.text_style(theme.text, 10), 19.0, 6.0),
        };
        block.push(BlockLine::new(line.text, style, mm(indent), mm(height)));
    }

    block
}

fn header_row(theme: &Theme, table: &Table) -> CellRow {
    let style = theme.bold_style(theme.text, 11);
    CellRow::from_cells(
        mm(TABLE_ROW_HEIGHT_MM),
        table.columns.iter().map(|column| {
            Cell::new(column.label, style)
                .with_width(mm(column.width_mm))
                .with_alignment(Alignment::Center)
                .with_fill(theme.table_fill.color())
                .with_border(theme.text.color())
        }),
    )
}

fn body_rows(theme: &Theme, table: &Table, style: Style, height: f64) -> Vec<CellRow> {
    table
        .rows
        .iter()
        .map(|values| {
            CellRow::from_cells(
                mm(height),
                table.columns.iter().zip(values).map(|(column, value)| {
                    Cell::new(value.as_str(), style)
                        .with_width(mm(column.width_mm))
                        .with_alignment(column.alignment)
                        .with_border(theme.text.color())
                }),
            )
        })
        .collect()
}

fn push_table_section(document: &mut genpdf::Document, theme: &Theme, section: &TableSection) {
    document.push(
        CellRow::new(mm(SECTION_TITLE_HEIGHT_MM))
            .with_cell(Cell::new(section.title, theme.bold_style(theme.primary, 15))),
    );

    let body = theme.text_style(theme.text, 11);
    for table in &section.tables {
        document.push(header_row(theme, table));
        for row in body_rows(theme, table, body, TABLE_ROW_HEIGHT_MM) {
            document.push(row);
        }
    }
    document.push(Spacer::new(mm(theme.section_gap_mm)));
}
