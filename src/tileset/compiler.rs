//! Tileset description parser and adjacency model compiler
//!
//! The description is line oriented:
//!
//! ```text
//! rotate
//!
//! {4,10}{2,3}{1,1}
//!
//! pipe - {0,0} {1,1}
//! wall - {0,2} {2,0}
//!
//! {0,0} {0,1} - pipe
//! {1,0} {2,0} - wall
//! ```
//!
//! The first line selects the rotation mode, the tile list gives
//! `{symmetry,weight}` per base tile, connection groups name sets of
//! `{tile,orientation}` variants and edge rules say which group may sit to
//! the right of each listed variant. Sections are separated by blank lines.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::algorithm::bitset::TileBitset;
use crate::io::error::{Result, WfcError};
use crate::tileset::model::{AdjacencyModel, TileVariant};
use crate::tileset::rotation::{RotationTable, Turn};

/// Symmetry counts a base tile may declare
pub const VALID_SYMMETRIES: [usize; 3] = [1, 2, 4];

/// Read and compile a tileset description file
///
/// # Errors
///
/// Returns [`WfcError::TilesetOpen`] if the file cannot be read, or any
/// configuration error reported by [`compile_str`]
pub fn compile_file(path: &Path) -> Result<AdjacencyModel> {
    let text = std::fs::read_to_string(path).map_err(|source| WfcError::TilesetOpen {
        path: path.to_path_buf(),
        source,
    })?;
    compile_str(&text, path)
}

/// Compile a tileset description held in memory
///
/// `origin` is only used to label errors.
///
/// # Errors
///
/// Returns a configuration error if a section is missing, the rotation mode
/// is unknown, a line is malformed, a symmetry or weight is out of range, a
/// pair names an undeclared variant, or an edge rule names an undefined
/// connection group
pub fn compile_str(text: &str, origin: &Path) -> Result<AdjacencyModel> {
    let mut lines = DescriptionLines::new(text);
    let path = origin.to_path_buf();

    let (_, mode) = lines.next_line().ok_or_else(|| WfcError::MissingSection {
        path: path.clone(),
        section: "rotation mode",
    })?;
    let rotatable = match mode.trim() {
        "rotate" => true,
        "no rotation" => false,
        other => {
            return Err(WfcError::InvalidRotationMode {
                path,
                found: other.to_string(),
            });
        }
    };

    lines.skip_blank();
    let (tile_line_number, tile_line) =
        lines.next_line().ok_or_else(|| WfcError::MissingSection {
            path: path.clone(),
            section: "tile list",
        })?;
    let tiles = parse_pairs(tile_line, tile_line_number, &path)?;
    if tiles.is_empty() {
        return Err(WfcError::MalformedLine {
            path,
            line: tile_line_number,
            reason: "tile list declares no {symmetry,weight} pairs".to_string(),
        });
    }

    let mut builder = ModelBuilder::new(rotatable, &tiles, &path)?;

    lines.skip_blank();
    let group_lines = lines.take_section();
    if group_lines.is_empty() {
        return Err(WfcError::MissingSection {
            path,
            section: "connection groups",
        });
    }
    for (number, line) in group_lines {
        let (name, pairs) = line
            .split_once('-')
            .ok_or_else(|| malformed(&path, number, "expected '<name> - {tile,orient} ...'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(malformed(&path, number, "connection group has no name"));
        }
        let members = parse_pairs(pairs, number, &path)?;
        if members.is_empty() {
            return Err(malformed(&path, number, "connection group lists no variants"));
        }
        builder.add_group(name, &members, number)?;
    }

    lines.skip_blank();
    let rule_lines = lines.take_section();
    if rule_lines.is_empty() {
        return Err(WfcError::MissingSection {
            path,
            section: "edge rules",
        });
    }
    for (number, line) in rule_lines {
        let (pairs, name) = line
            .split_once('-')
            .ok_or_else(|| malformed(&path, number, "expected '{tile,orient} ... - <name>'"))?;
        let variants = parse_pairs(pairs, number, &path)?;
        if variants.is_empty() {
            return Err(malformed(&path, number, "edge rule lists no variants"));
        }
        builder.add_rule(&variants, name.trim(), number)?;
    }

    let model = builder.finish();
    tracing::info!(
        tileset = %origin.display(),
        base_tiles = model.base_count(),
        variants = model.variant_count(),
        rotatable = model.is_rotatable(),
        "compiled tileset"
    );
    Ok(model)
}

/// Incremental construction of an [`AdjacencyModel`]
struct ModelBuilder {
    path: PathBuf,
    rotatable: bool,
    symmetry: Vec<usize>,
    weights: Vec<u32>,
    base_offset: Vec<usize>,
    variants: Vec<TileVariant>,
    rotation: RotationTable,
    connects_to: Vec<TileBitset>,
    groups: HashMap<String, TileBitset>,
}

impl ModelBuilder {
    /// Assign bit-identities and single-step rotations for every base tile
    fn new(rotatable: bool, tiles: &[(usize, usize)], path: &Path) -> Result<Self> {
        let mut symmetry = Vec::with_capacity(tiles.len());
        let mut weights = Vec::with_capacity(tiles.len());
        let mut base_offset = Vec::with_capacity(tiles.len());
        let mut variants = Vec::new();

        for (base, &(tile_symmetry, weight)) in tiles.iter().enumerate() {
            if !VALID_SYMMETRIES.contains(&tile_symmetry) {
                return Err(WfcError::InvalidSymmetry {
                    path: path.to_path_buf(),
                    base,
                    symmetry: tile_symmetry,
                });
            }
            let weight = u32::try_from(weight)
                .ok()
                .filter(|&w| w > 0)
                .ok_or_else(|| WfcError::InvalidWeight {
                    path: path.to_path_buf(),
                    base,
                    weight: weight as u64,
                })?;

            base_offset.push(variants.len());
            symmetry.push(tile_symmetry);
            weights.push(weight);
            variants.extend((0..tile_symmetry).map(|orientation| TileVariant::new(base, orientation)));
        }

        let width = variants.len();
        let mut rotation = RotationTable::identity(width);
        for (base, &tile_symmetry) in symmetry.iter().enumerate() {
            let offset = base_offset.get(base).copied().unwrap_or_default();
            for orientation in 0..tile_symmetry {
                rotation.link_bits(
                    offset + orientation,
                    offset + (orientation + 1) % tile_symmetry,
                );
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            rotatable,
            symmetry,
            weights,
            base_offset,
            variants,
            rotation,
            connects_to: vec![TileBitset::new(width); width],
            groups: HashMap::new(),
        })
    }

    fn width(&self) -> usize {
        self.variants.len()
    }

    fn bit_of(&self, base: usize, orientation: usize, line: usize) -> Result<usize> {
        match (self.symmetry.get(base), self.base_offset.get(base)) {
            (Some(&symmetry), Some(&offset)) if orientation < symmetry => Ok(offset + orientation),
            _ => Err(WfcError::UnknownVariant {
                path: self.path.clone(),
                line,
                base,
                orientation,
            }),
        }
    }

    /// Register a connection group and every distinct rotation of its mask
    fn add_group(&mut self, name: &str, members: &[(usize, usize)], line: usize) -> Result<()> {
        let mut bits = members
            .iter()
            .map(|&(base, orientation)| self.bit_of(base, orientation, line))
            .collect::<Result<Vec<_>>>()?;

        let width = self.width();
        let mask = mask_from_bits(width, &bits);

        // Groups with fewer than four distinct rotations stop early
        for _ in 0..4 {
            let before = mask_from_bits(width, &bits);
            for bit in &mut bits {
                *bit = self.rotation.step_bit(*bit, Turn::Clockwise);
            }
            let after = mask_from_bits(width, &bits);
            let closed = after == mask;
            self.rotation.link_masks(before, after);
            if closed {
                break;
            }
        }

        if self.groups.insert(name.to_string(), mask).is_some() {
            tracing::warn!(
                tileset = %self.path.display(),
                line,
                group = name,
                "connection group redefined, later definition wins"
            );
        }
        Ok(())
    }

    /// Point every listed variant's right edge at a named group
    fn add_rule(&mut self, variants: &[(usize, usize)], name: &str, line: usize) -> Result<()> {
        let group = self
            .groups
            .get(name)
            .cloned()
            .ok_or_else(|| WfcError::UnknownConnection {
                path: self.path.clone(),
                line,
                name: name.to_string(),
            })?;
        for &(base, orientation) in variants {
            let bit = self.bit_of(base, orientation, line)?;
            if let Some(slot) = self.connects_to.get_mut(bit) {
                slot.clone_from(&group);
            }
        }
        Ok(())
    }

    fn finish(self) -> AdjacencyModel {
        AdjacencyModel {
            rotatable: self.rotatable,
            symmetry: self.symmetry,
            weights: self.weights,
            base_offset: self.base_offset,
            variants: self.variants,
            rotation: self.rotation,
            connects_to: self.connects_to,
        }
    }
}

fn mask_from_bits(width: usize, bits: &[usize]) -> TileBitset {
    let mut mask = TileBitset::new(width);
    for &bit in bits {
        mask.insert(bit);
    }
    mask
}

fn malformed(path: &Path, line: usize, reason: &str) -> WfcError {
    WfcError::MalformedLine {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}

/// Extract every `{a,b}` pair from a line
///
/// # Errors
///
/// Returns [`WfcError::MalformedLine`] for an unclosed bracket or a pair
/// that is not two unsigned integers
pub fn parse_pairs(text: &str, line: usize, path: &Path) -> Result<Vec<(usize, usize)>> {
    let mut pairs = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let after_open = rest.get(open + 1..).unwrap_or_default();
        let close = after_open
            .find('}')
            .ok_or_else(|| malformed(path, line, "unclosed '{' in pair"))?;
        let inner = after_open.get(..close).unwrap_or_default();
        let pair = inner
            .split_once(',')
            .and_then(|(a, b)| Some((a.trim().parse().ok()?, b.trim().parse().ok()?)))
            .ok_or_else(|| {
                malformed(path, line, &format!("'{{{inner}}}' is not a pair of integers"))
            })?;
        pairs.push(pair);
        rest = after_open.get(close + 1..).unwrap_or_default();
    }
    Ok(pairs)
}

/// Numbered lines with trailing carriage returns removed
struct DescriptionLines<'a> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::str::Split<'a, char>>>,
}

impl<'a> DescriptionLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').enumerate().peekable(),
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines
            .next()
            .map(|(index, line)| (index + 1, line.strip_suffix('\r').unwrap_or(line)))
    }

    fn skip_blank(&mut self) {
        while self
            .lines
            .peek()
            .is_some_and(|(_, line)| line.trim().is_empty())
        {
            self.lines.next();
        }
    }

    /// Consume lines up to the next blank line or the end of input
    fn take_section(&mut self) -> Vec<(usize, &'a str)> {
        let mut section = Vec::new();
        while let Some((number, line)) = self.next_line() {
            if line.trim().is_empty() {
                break;
            }
            section.push((number, line));
        }
        section
    }
}

/// Path label used for descriptions compiled from memory
pub fn inline_origin() -> PathBuf {
    PathBuf::from("<inline>")
}
