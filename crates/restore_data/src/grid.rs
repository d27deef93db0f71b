use serde::{Deserialize, Serialize};

/// A 2D grid stored as a flat row-major buffer.
///
/// Cell `(x, y)` lives at `y * width + x`, matching the `[row][column]`
/// layout of the backup format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid2<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid2<T> {
    /// Creates a grid filled with `T::default()`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_with(width, height, T::default())
    }

    /// Copies the `width` x `height` block starting at `(x, y)`.
    ///
    /// Cells of the block that fall outside this grid stay at their default.
    #[must_use]
    pub fn copy_region(&self, x: usize, y: usize, width: usize, height: usize) -> Self {
        let mut out = Self::new(width, height);
        for yy in 0..height {
            let sy = y + yy;
            if sy >= self.height {
                break;
            }
            for xx in 0..width {
                let sx = x + xx;
                if sx >= self.width {
                    break;
                }
                out.data[yy * width + xx] = self.data[sy * self.width + sx].clone();
            }
        }
        out
    }
}

impl<T: Clone> Grid2<T> {
    #[must_use]
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wraps an existing row-major buffer. Returns `None` when the buffer
    /// length does not equal `width * height`.
    #[must_use]
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Writes `src` with its top-left corner at `(x, y)`.
    ///
    /// Cells that would land outside this grid are skipped. Returns the number
    /// of cells written.
    pub fn paste(&mut self, x: usize, y: usize, src: &Grid2<T>) -> usize {
        let mut written = 0;
        for yy in 0..src.height {
            let dy = y + yy;
            if dy >= self.height {
                break;
            }
            for xx in 0..src.width {
                let dx = x + xx;
                if dx >= self.width {
                    break;
                }
                self.data[dy * self.width + dx] = src.data[yy * src.width + xx].clone();
                written += 1;
            }
        }
        written
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid2<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).map(|idx| &self.data[idx])
    }

    /// Sets a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(idx) = self.index(x, y) {
            self.data[idx] = value;
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// A 3D grid of `depth` values per `(x, y)` cell, flat and row-major with the
/// depth axis innermost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid3<T> {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid3<T> {
    #[must_use]
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            data: vec![T::default(); width * height * depth],
        }
    }
}

impl<T: Clone> Grid3<T> {
    #[must_use]
    pub fn from_vec(width: usize, height: usize, depth: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height * depth).then_some(Self {
            width,
            height,
            depth,
            data,
        })
    }

    /// Writes `src` with its top-left corner at `(x, y)`. Both grids must
    /// share the same depth; otherwise nothing is written.
    pub fn paste(&mut self, x: usize, y: usize, src: &Grid3<T>) -> usize {
        if src.depth != self.depth {
            return 0;
        }
        let mut written = 0;
        for yy in 0..src.height {
            let dy = y + yy;
            if dy >= self.height {
                break;
            }
            for xx in 0..src.width {
                let dx = x + xx;
                if dx >= self.width {
                    break;
                }
                let from = (yy * src.width + xx) * src.depth;
                let to = (dy * self.width + dx) * self.depth;
                self.data[to..to + self.depth].clone_from_slice(&src.data[from..from + src.depth]);
                written += 1;
            }
        }
        written
    }
}

impl<T> Grid3<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        (x < self.width && y < self.height && z < self.depth)
            .then(|| (y * self.width + x) * self.depth + z)
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        self.index(x, y, z).map(|idx| &self.data[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        if let Some(idx) = self.index(x, y, z) {
            self.data[idx] = value;
        }
    }

    /// The full depth vector of one cell.
    pub fn cell(&self, x: usize, y: usize) -> Option<&[T]> {
        if x < self.width && y < self.height {
            let start = (y * self.width + x) * self.depth;
            Some(&self.data[start..start + self.depth])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
