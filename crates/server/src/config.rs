//! Command line and environment configuration for the itinerary server.

use std::path::PathBuf;

use clap::Parser;
use itinerary_pdf::render::{DEFAULT_LOGO_PATH, DEFAULT_OUTPUT_DIR};
use itinerary_pdf::{FooterMode, RenderOptions};

/// Serves `POST /generate-itinerary` and the generated files under `/pdfs`.
///
/// Fonts are looked up in `--fonts-dir`, then `ITINERARY_FONTS_DIR`, then
/// `assets/fonts` next to the binary; a system family is used when none of them
/// holds the Roboto files.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about = "Renders travel itineraries into PDF documents")]
pub struct Args {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "ITINERARY_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    /// Base of the download links returned to clients.
    #[arg(
        long,
        env = "ITINERARY_PUBLIC_BASE_URL",
        default_value = "http://localhost:8080"
    )]
    pub public_base_url: String,

    /// Directory generated documents are written to and served from.
    #[arg(long, env = "ITINERARY_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Logo drawn in the page banner when the file exists.
    #[arg(long, env = "ITINERARY_LOGO_PATH", default_value = DEFAULT_LOGO_PATH)]
    pub logo_path: PathBuf,

    /// Directory holding the Roboto font files.
    #[arg(long, env = "ITINERARY_FONTS_DIR")]
    pub fonts_dir: Option<PathBuf>,

    /// Repeat the footer on every page instead of only the last one.
    #[arg(long, env = "ITINERARY_FOOTER_ON_EVERY_PAGE")]
    pub footer_on_every_page: bool,
}

impl Args {
    /// Renderer settings derived from the command line.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            output_dir: self.output_dir.clone(),
            logo_path: self.logo_path.clone(),
            font_dir: self.fonts_dir.clone(),
            footer: if self.footer_on_every_page {
                FooterMode::EveryPage
            } else {
                FooterMode::LastPage
            },
            ..RenderOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_layout() {
        let args = Args::parse_from(["itinerary-server"]);
        assert_eq!(args.http_addr, "0.0.0.0:8080");
        assert_eq!(args.public_base_url, "http://localhost:8080");

        let options = args.render_options();
        assert_eq!(options.output_dir, PathBuf::from("./pdfs"));
        assert_eq!(options.logo_path, PathBuf::from("public/logo.png"));
        assert_eq!(options.footer, FooterMode::LastPage);
    }

    #[test]
    fn footer_flag_selects_every_page() {
        let args = Args::parse_from([
            "itinerary-server",
            "--footer-on-every-page",
            "--output-dir",
            "/srv/pdfs",
        ]);
        let options = args.render_options();
        assert_eq!(options.footer, FooterMode::EveryPage);
        assert_eq!(options.output_dir, PathBuf::from("/srv/pdfs"));
    }
}
