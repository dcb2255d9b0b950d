//! Shape resource sources
//!
//! A source hands out the raw bytes of one named SVG resource.
//! The embedded set ships inside the binary; a directory source lets
//! users swap in their own segment artwork.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::constants::SHAPE_EXTENSION;
use crate::error::LoadError;

/// Provider of named shape resources
pub trait ShapeSource {
    /// Fetch the raw bytes of resource `name` (without extension)
    fn fetch(&self, name: &str) -> Result<Cow<'_, [u8]>, LoadError>;

    /// Human-readable description for log lines
    fn describe(&self) -> String;
}

/// Shapes compiled into the binary
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedShapes;

macro_rules! embedded {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_bytes!(concat!("../../assets/alphanum/", $name, ".svg")) as &[u8])),*]
    };
}

static EMBEDDED: &[(&str, &[u8])] = embedded![
    "00-top",
    "01-top-right",
    "02-bottom-right",
    "03-bottom",
    "04-bottom-left",
    "05-top-left",
    "06-middle-left",
    "07-comma",
    "08-diag-top-left",
    "09-center-top",
    "10-diag-top-right",
    "11-middle-right",
    "12-diag-bottom-right",
    "13-center-bottom",
    "14-diag-bottom-left",
    "15-dot",
    "full",
];

impl ShapeSource for EmbeddedShapes {
    fn fetch(&self, name: &str) -> Result<Cow<'_, [u8]>, LoadError> {
        EMBEDDED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, data)| Cow::Borrowed(*data))
            .ok_or_else(|| LoadError::Missing(name.to_string()))
    }

    fn describe(&self) -> String {
        "embedded shapes".to_string()
    }
}

/// Shapes read from `<dir>/<name>.svg`
#[derive(Debug, Clone)]
pub struct DirectoryShapes {
    dir: PathBuf,
}

impl DirectoryShapes {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SHAPE_EXTENSION))
    }
}

impl ShapeSource for DirectoryShapes {
    fn fetch(&self, name: &str) -> Result<Cow<'_, [u8]>, LoadError> {
        let path = self.path_for(name);
        match std::fs::read(&path) {
            Ok(data) => Ok(Cow::Owned(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::Missing(path.display().to_string()))
            }
            Err(source) => Err(LoadError::Io {
                name: path.display().to_string(),
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        format!("shape directory {}", self.dir.display())
    }
}
