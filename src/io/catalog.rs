//! Discovery of tileset directories
//!
//! A tileset is a directory below the catalog root holding a
//! `data.txt` description and, optionally, a `tileset.png` sprite strip.

use std::path::{Path, PathBuf};

use crate::algorithm::selection::RandomSelector;
use crate::io::configuration::{TILESET_DATA_FILE, TILESET_IMAGE_FILE};
use crate::io::error::{ErrorContext, Result, WfcError, WithContext};

/// Files making up one tileset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetPaths {
    /// Name of the tileset directory
    pub name: String,
    /// The tileset description
    pub data: PathBuf,
    /// The sprite strip, if the directory has one
    pub image: Option<PathBuf>,
}

/// Directory of tileset directories
#[derive(Debug, Clone)]
pub struct TilesetCatalog {
    root: PathBuf,
}

impl TilesetCatalog {
    /// Catalog rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory searched for tilesets
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of every tileset, sorted
    ///
    /// Subdirectories without a description file are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be read
    pub fn names(&self) -> Result<Vec<String>> {
        let context = || ErrorContext {
            path: Some(self.root.clone()),
            operation: Some("list tilesets"),
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root).with_context(context())? {
            let path = entry.with_context(context())?.path();
            if !path.join(TILESET_DATA_FILE).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Locate the files of a named tileset
    ///
    /// # Errors
    ///
    /// Returns [`WfcError::UnknownTileset`] if there is no such directory
    /// or it has no description file
    pub fn resolve(&self, name: &str) -> Result<TilesetPaths> {
        let dir = self.root.join(name);
        let data = dir.join(TILESET_DATA_FILE);
        if name.is_empty() || !data.is_file() {
            return Err(WfcError::UnknownTileset {
                name: name.to_owned(),
                base_dir: self.root.clone(),
            });
        }
        let image = dir.join(TILESET_IMAGE_FILE);
        Ok(TilesetPaths {
            name: name.to_owned(),
            data,
            image: image.is_file().then_some(image),
        })
    }

    /// Locate a uniformly chosen tileset
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be read, or
    /// [`WfcError::UnknownTileset`] if it holds no tilesets
    pub fn pick(&self, selector: &mut RandomSelector) -> Result<TilesetPaths> {
        let names = self.names()?;
        let name = selector
            .pick(&names)
            .ok_or_else(|| WfcError::UnknownTileset {
                name: String::from("<any>"),
                base_dir: self.root.clone(),
            })?;
        self.resolve(name)
    }
}
