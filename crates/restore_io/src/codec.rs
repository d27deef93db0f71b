//! Binary backup format.
//!
//! Little-endian throughout, no header. Grids are written row-major: Y
//! outer, X inner, layer innermost.
//!
//! ```text
//! AllTerrainsSnapshot := count:i32, SnapshotModel{count}
//! SnapshotModel := treeIds:StrArray, weightedIds:StrArray,
//!                  alphamapHeight:i32, alphamapWidth:i32, layerCount:i32,
//!                  weights[alphamapHeight][alphamapWidth][layerCount]:f32,
//!                  heightmapResolution:i32, heights[res][res]:f32,
//!                  detailHeight:i32, detailWidth:i32,
//!                  discreteLayerCount:i32, DiscreteLayer{discreteLayerCount},
//!                  instanceCount:i32, Instance{instanceCount}
//! StrArray := count:i32, Str{count}
//! DiscreteLayer := textureId:Str, objectId:Str, density[detailHeight][detailWidth]:i32
//! Instance := x,y,z,widthScale,heightScale,rotation:f32,
//!             color a,r,g,b:u8, lightmapColor a,r,g,b:u8, prototypeIndex:i32
//! ```
//!
//! `Str` is a byte length followed by UTF-8 bytes. The length is an `i32` by
//! default, or a 7-bit variable-length integer for files written by .NET
//! `BinaryWriter` (see [`StringPrefix`]).

use crate::error::{BackupError, Result};
use restore_core::StringPrefix;
use restore_data::{
    AllTerrainsSnapshot, Color32, DiscreteLayer, Grid2, Grid3, TerrainSnapshot, TreeInstance,
};

/// Bytes per encoded tree instance.
const INSTANCE_SIZE: usize = 6 * 4 + 8 + 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    pub string_prefix: StringPrefix,
}

impl CodecOptions {
    #[must_use]
    pub fn new(string_prefix: StringPrefix) -> Self {
        Self { string_prefix }
    }
}

/// Encodes with `i32` string prefixes.
pub fn encode(snapshot: &AllTerrainsSnapshot) -> Vec<u8> {
    encode_with(snapshot, CodecOptions::default())
}

pub fn encode_with(snapshot: &AllTerrainsSnapshot, options: CodecOptions) -> Vec<u8> {
    let mut writer = Writer::new(options);
    writer.len(snapshot.terrains.len());
    for terrain in &snapshot.terrains {
        writer.terrain(terrain);
    }
    writer.out
}

/// Decodes with `i32` string prefixes.
pub fn decode(bytes: &[u8]) -> Result<AllTerrainsSnapshot> {
    decode_with(bytes, CodecOptions::default())
}

/// Decodes a whole file.
///
/// Trailing bytes after the last terrain are a format error. Readers that
/// stop after the last terrain accept such files, this one does not.
pub fn decode_with(bytes: &[u8], options: CodecOptions) -> Result<AllTerrainsSnapshot> {
    let mut reader = Reader::new(bytes, options);
    let count = reader.len("terrain count")?;
    let mut terrains = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        terrains.push(reader.terrain()?);
    }
    if reader.remaining() != 0 {
        return Err(BackupError::format(format!(
            "{} trailing bytes after last terrain",
            reader.remaining()
        )));
    }
    Ok(AllTerrainsSnapshot::new(terrains))
}

struct Writer {
    out: Vec<u8>,
    options: CodecOptions,
}

impl Writer {
    fn new(options: CodecOptions) -> Self {
        Self {
            out: Vec::new(),
            options,
        }
    }

    fn i32(&mut self, value: i32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    fn f32(&mut self, value: f32) {
        self.out.extend_from_slice(&value.to_le_bytes());
    }

    // Dimensions beyond i32::MAX cannot be represented in the format.
    fn len(&mut self, value: usize) {
        self.i32(i32::try_from(value).unwrap_or(i32::MAX));
    }

    fn string(&mut self, value: &str) {
        match self.options.string_prefix {
            StringPrefix::I32 => self.len(value.len()),
            StringPrefix::Varint => {
                let mut n = value.len() as u32;
                while n >= 0x80 {
                    self.out.push((n as u8) | 0x80);
                    n >>= 7;
                }
                self.out.push(n as u8);
            }
        }
        self.out.extend_from_slice(value.as_bytes());
    }

    fn strings(&mut self, values: &[String]) {
        self.len(values.len());
        for value in values {
            self.string(value);
        }
    }

    fn color(&mut self, color: Color32) {
        self.out
            .extend_from_slice(&[color.a, color.r, color.g, color.b]);
    }

    fn terrain(&mut self, terrain: &TerrainSnapshot) {
        self.strings(&terrain.tree_prototype_ids);
        self.strings(&terrain.weighted_layer_ids);

        let weights = &terrain.weighted_layers;
        self.len(weights.height());
        self.len(weights.width());
        self.len(weights.depth());
        for weight in weights.as_slice() {
            self.f32(*weight);
        }

        self.len(terrain.heightmap_resolution());
        for height in terrain.heights.as_slice() {
            self.f32(*height);
        }

        let (width, height) = (terrain.detail_width, terrain.detail_height);
        self.len(height);
        self.len(width);
        self.len(terrain.discrete_layers.len());
        for layer in &terrain.discrete_layers {
            self.string(&layer.texture_id);
            self.string(&layer.object_id);
            // Always exactly detail_height x detail_width values.
            let density = layer.density.copy_region(0, 0, width, height);
            for value in density.as_slice() {
                self.i32(*value);
            }
        }

        self.len(terrain.instances.len());
        for tree in &terrain.instances {
            for value in tree.position {
                self.f32(value);
            }
            self.f32(tree.width_scale);
            self.f32(tree.height_scale);
            self.f32(tree.rotation);
            self.color(tree.color);
            self.color(tree.lightmap_color);
            self.i32(tree.prototype_index);
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    options: CodecOptions,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], options: CodecOptions) -> Self {
        Self {
            bytes,
            pos: 0,
            options,
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(BackupError::format(format!(
                "unexpected end of data at byte {} (needed {}, {} left)",
                self.pos,
                n,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.array()?))
    }

    /// A non-negative `i32` count or dimension.
    fn len(&mut self, what: &str) -> Result<usize> {
        let at = self.pos;
        let value = self.i32()?;
        usize::try_from(value)
            .map_err(|_| BackupError::format(format!("negative {what} {value} at byte {at}")))
    }

    /// Checks that `count` elements of `size` bytes fit in what is left.
    fn ensure_fits(&self, count: usize, size: usize, what: &str) -> Result<usize> {
        count
            .checked_mul(size)
            .filter(|&total| total <= self.remaining())
            .ok_or_else(|| {
                BackupError::format(format!(
                    "{what} of {count} elements exceeds remaining {} bytes",
                    self.remaining()
                ))
            })
    }

    /// .NET `Read7BitEncodedInt`: at most five bytes, the fifth carrying only
    /// the top four bits.
    fn varint(&mut self) -> Result<i32> {
        let at = self.pos;
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let [byte] = self.array::<1>()?;
            if shift == 28 && byte > 0x0F {
                break;
            }
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        Err(BackupError::format(format!("bad 7-bit length prefix at byte {at}")))
    }

    fn string(&mut self) -> Result<String> {
        let at = self.pos;
        let len = match self.options.string_prefix {
            StringPrefix::I32 => self.i32()?,
            StringPrefix::Varint => self.varint()?,
        };
        let len = usize::try_from(len).map_err(|_| {
            BackupError::format(format!("negative string length {len} at byte {at}"))
        })?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| BackupError::format(format!("invalid UTF-8 string at byte {at}: {e}")))
    }

    fn strings(&mut self) -> Result<Vec<String>> {
        let count = self.len("string count")?;
        // Every string needs at least one prefix byte.
        self.ensure_fits(count, 1, "string array")?;
        (0..count).map(|_| self.string()).collect()
    }

    fn f32s(&mut self, count: usize, what: &str) -> Result<Vec<f32>> {
        let total = self.ensure_fits(count, 4, what)?;
        let bytes = self.take(total)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn i32s(&mut self, count: usize, what: &str) -> Result<Vec<i32>> {
        let total = self.ensure_fits(count, 4, what)?;
        let bytes = self.take(total)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn color(&mut self) -> Result<Color32> {
        let [a, r, g, b] = self.array()?;
        Ok(Color32::new(r, g, b, a))
    }

    fn cells(&self, dims: &[usize], what: &str) -> Result<usize> {
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| BackupError::format(format!("{what} dimensions overflow")))
    }

    fn terrain(&mut self) -> Result<TerrainSnapshot> {
        let tree_prototype_ids = self.strings()?;
        let weighted_layer_ids = self.strings()?;

        let height = self.len("alphamap height")?;
        let width = self.len("alphamap width")?;
        let depth = self.len("layer count")?;
        let cells = self.cells(&[width, height, depth], "alphamap")?;
        let weights = self.f32s(cells, "alphamap")?;
        let weighted_layers = Grid3::from_vec(width, height, depth, weights)
            .ok_or_else(|| BackupError::format("alphamap size mismatch"))?;

        let resolution = self.len("heightmap resolution")?;
        let cells = self.cells(&[resolution, resolution], "heightmap")?;
        let heights = self.f32s(cells, "heightmap")?;
        let heights = Grid2::from_vec(resolution, resolution, heights)
            .ok_or_else(|| BackupError::format("heightmap size mismatch"))?;

        let detail_height = self.len("detail height")?;
        let detail_width = self.len("detail width")?;
        let layer_count = self.len("discrete layer count")?;
        let per_layer = self.cells(&[detail_width, detail_height], "detail layer")?;
        // Two string prefixes of at least one byte each.
        self.ensure_fits(layer_count, 2, "discrete layers")?;
        let mut discrete_layers = Vec::with_capacity(layer_count);
        for _ in 0..layer_count {
            let texture_id = self.string()?;
            let object_id = self.string()?;
            let values = self.i32s(per_layer, "detail layer")?;
            let density = Grid2::from_vec(detail_width, detail_height, values)
                .ok_or_else(|| BackupError::format("detail layer size mismatch"))?;
            discrete_layers.push(DiscreteLayer {
                texture_id,
                object_id,
                density,
            });
        }

        let instance_count = self.len("instance count")?;
        self.ensure_fits(instance_count, INSTANCE_SIZE, "instances")?;
        let mut instances = Vec::with_capacity(instance_count);
        for _ in 0..instance_count {
            let position = [self.f32()?, self.f32()?, self.f32()?];
            let width_scale = self.f32()?;
            let height_scale = self.f32()?;
            let rotation = self.f32()?;
            let color = self.color()?;
            let lightmap_color = self.color()?;
            let prototype_index = self.i32()?;
            instances.push(TreeInstance {
                position,
                width_scale,
                height_scale,
                rotation,
                color,
                lightmap_color,
                prototype_index,
            });
        }

        Ok(TerrainSnapshot {
            tree_prototype_ids,
            weighted_layer_ids,
            weighted_layers,
            heights,
            detail_width,
            detail_height,
            discrete_layers,
            instances,
        })
    }
}
