//! Document construction helpers for itinerary documents.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use genpdf::error::{Error, ErrorKind};
use genpdf::style;
use genpdf::{self, Element, Margins, Mm, PageDecorator, Position, Size};

use crate::fonts;

type PageElementFactory = dyn Fn(usize) -> Box<dyn Element>;

/// Shared, read-only view of the number of the page currently being laid out.
///
/// The page decorator advances the counter whenever a new page starts, so
/// elements in the document flow can print the page they land on.
#[derive(Clone, Debug, Default)]
pub struct PageCounter(Rc<Cell<usize>>);

impl PageCounter {
    pub fn current(&self) -> usize {
        self.0.get()
    }

    fn advance(&self) -> usize {
        let page = self.0.get() + 1;
        self.0.set(page);
        page
    }
}

/// Builder for `genpdf::Document` instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    paper_size: Option<Size>,
    margins: Option<Margins>,
    font_dir: Option<PathBuf>,
    header: Option<Box<PageElementFactory>>,
    footer: Option<FooterSpec>,
    page_counter: PageCounter,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied below the header.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Loads fonts from `font_dir` before falling back to the default search order.
    pub fn with_font_dir(mut self, font_dir: impl Into<Option<PathBuf>>) -> Self {
        self.font_dir = font_dir.into();
        self
    }

    /// Configures a header callback that is invoked for every page.
    ///
    /// The header is drawn edge to edge at the top of the page, before the
    /// margins are applied.
    pub fn with_header<F, E>(mut self, header: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.header = Some(Box::new(move |page| {
            Box::new(header(page)) as Box<dyn Element>
        }));
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Returns a handle on the page counter maintained by the built document.
    pub fn page_counter(&self) -> PageCounter {
        self.page_counter.clone()
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let font_family = fonts::font_family(self.font_dir.as_deref())?;
        let mut document = genpdf::Document::new(font_family);
        document.set_minimal_conformance();

        if let Some(title) = self.title {
            document.set_title(title);
        }

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }

        let decorator = ConfiguredPageDecorator {
            counter: self.page_counter,
            margins: self.margins,
            header: self.header,
            footer: self.footer,
        };
        document.set_page_decorator(decorator);

        Ok(document)
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<PageElementFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    counter: PageCounter,
    margins: Option<Margins>,
    header: Option<Box<PageElementFactory>>,
    footer: Option<FooterSpec>,
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.counter.advance();

        if let Some(header_cb) = &self.header {
            let mut element = header_cb(page);
            let result = element.render(context, area.clone(), style)?;
            area.add_offset(Position::new(0, result.size.height));
        }

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::PageCounter;

    #[test]
    fn page_counter_is_shared_between_clones() {
        let counter = PageCounter::default();
        let view = counter.clone();
        assert_eq!(view.current(), 0);
        assert_eq!(counter.advance(), 1);
        assert_eq!(counter.advance(), 2);
        assert_eq!(view.current(), 2);
    }
}
