use rayon::prelude::*;

/// A bounded 2D grid stored row-major in a flat vector (`y * width + x`).
///
/// Unlike a planet map this grid does not wrap: every access outside
/// `[0, width) x [0, height)` is reported as `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Build a grid by evaluating `cell(x, y)` for every cell, rows in parallel.
    ///
    /// `cell` must be a pure function of its coordinate; rows are computed on
    /// the rayon pool and reassembled in row-major order, so the result does
    /// not depend on scheduling.
    pub fn generate_par<F>(width: usize, height: usize, cell: F) -> Self
    where
        T: Send,
        F: Fn(usize, usize) -> T + Sync,
    {
        let data: Vec<T> = (0..height)
            .into_par_iter()
            .flat_map_iter(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| cell(x, y))
            .collect();

        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Check signed coordinates against the grid bounds.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).map(|idx| &self.data[idx])
    }

    /// Bounds-checked access with signed coordinates.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        if self.contains(x, y) {
            self.get(x as usize, y as usize)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One row of the grid, left to right.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y < self.height {
            Some(&self.data[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate over all cells in row-major order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let map = Tilemap::generate_par(4, 3, |x, y| (x, y));
        assert_eq!(map.len(), 12);
        for (x, y, &value) in map.iter() {
            assert_eq!(value, (x, y));
        }
        assert_eq!(map.row(1).map(|r| r[2]), Some((2, 1)));
    }

    #[test]
    fn test_bounds_checks() {
        let map = Tilemap::new_with(5, 2, 0u8);
        assert!(map.get(4, 1).is_some());
        assert!(map.get(5, 0).is_none());
        assert!(map.get(0, 2).is_none());
        assert!(map.get_signed(-1, 0).is_none());
        assert!(!map.contains(0, -1));
        assert!(map.row(2).is_none());
    }

    #[test]
    fn test_parallel_generation_matches_sequential() {
        let par = Tilemap::generate_par(37, 23, |x, y| x * 1000 + y);
        let mut seq = Tilemap::new_with(37, 23, 0usize);
        seq.data = (0..23).flat_map(|y| (0..37).map(move |x| x * 1000 + y)).collect();
        assert_eq!(par, seq);
    }
}
