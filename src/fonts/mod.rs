//! Font loading utilities for itinerary documents.
//!
//! `genpdf` needs TrueType files for glyph metrics.  The default family is
//! Roboto, looked up in this order:
//!
//! 1. the directory passed by the caller,
//! 2. the `ITINERARY_FONTS_DIR` environment variable,
//! 3. `assets/fonts` next to the running executable,
//! 4. `assets/fonts` in the crate manifest directory.
//!
//! When none of them holds the Roboto files, a system family is tried instead
//! (Liberation Sans or DejaVu Sans on Linux, Arial on Windows and macOS).

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the bundled font directory.
pub const FONTS_DIR_ENV: &str = "ITINERARY_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

/// File names of a font family installed by the operating system.
struct SystemFontFamily {
    name: &'static str,
    directories: &'static [&'static str],
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const SYSTEM_FAMILIES: &[SystemFontFamily] = &[
    SystemFontFamily {
        name: "Liberation Sans",
        directories: &[
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/truetype/liberation2",
            "/usr/share/fonts/liberation-sans",
            "/usr/share/fonts/liberation",
        ],
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    SystemFontFamily {
        name: "DejaVu Sans",
        directories: &[
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/dejavu-sans-fonts",
            "/usr/share/fonts/dejavu",
            "/usr/share/fonts/TTF",
        ],
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
    SystemFontFamily {
        name: "Arial",
        directories: &["C:\\Windows\\Fonts"],
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
    SystemFontFamily {
        name: "Arial",
        directories: &["/System/Library/Fonts/Supplemental", "/Library/Fonts"],
        regular: "Arial.ttf",
        bold: "Arial Bold.ttf",
        italic: "Arial Italic.ttf",
        bold_italic: "Arial Bold Italic.ttf",
    },
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        push_unique(&mut candidates, path.to_path_buf());
    }

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push_unique(&mut candidates, path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(
        &mut candidates,
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"),
    );

    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(explicit) {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} font directory. Checked: {}. \
             Set {} to a directory holding {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV,
            FONT_FILES.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_bundled_font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(explicit)?;
    debug!("loading {} fonts from {}", DEFAULT_FONT_FAMILY_NAME, directory.display());

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn load_system_font(directory: &Path, file: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        Error::new(
            format!("Failed to load system font at {}: {}", path.display(), err),
            io::Error::new(io::ErrorKind::NotFound, err.to_string()),
        )
    })
}

impl SystemFontFamily {
    fn directory(&self) -> Option<&'static Path> {
        self.directories
            .iter()
            .map(Path::new)
            .find(|directory| directory.join(self.regular).is_file())
    }

    fn load(&self) -> Result<FontFamily<FontData>, Error> {
        let directory = self.directory().ok_or_else(|| {
            Error::new(
                format!("System font family '{}' not installed", self.name),
                io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
            )
        })?;

        Ok(FontFamily {
            regular: load_system_font(directory, self.regular)?,
            bold: load_system_font(directory, self.bold)?,
            italic: load_system_font(directory, self.italic)?,
            bold_italic: load_system_font(directory, self.bold_italic)?,
        })
    }
}

fn system_font_family() -> Result<FontFamily<FontData>, Error> {
    let mut failures = Vec::new();
    for family in SYSTEM_FAMILIES {
        match family.load() {
            Ok(loaded) => {
                warn!(
                    "{} fonts unavailable; using system '{}' family",
                    DEFAULT_FONT_FAMILY_NAME, family.name
                );
                return Ok(loaded);
            }
            Err(err) => failures.push(err.to_string()),
        }
    }

    Err(Error::new(
        format!("No system font family available: {}", failures.join("; ")),
        io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the Roboto family from the first matching directory, or a system family when
/// Roboto is not installed.
pub fn font_family(explicit: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family(explicit) {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => system_font_family().map_err(|fallback_err| {
            Error::new(
                format!("{}; {}", err, fallback_err),
                io::Error::new(io::ErrorKind::NotFound, "no usable font family"),
            )
        }),
        Err(err) => Err(err),
    }
}

/// Indicates whether any usable font family can be found without an explicit directory.
pub fn fonts_available() -> bool {
    resolve_font_directory(None).is_ok()
        || SYSTEM_FAMILIES
            .iter()
            .any(|family| family.directory().is_some())
}
