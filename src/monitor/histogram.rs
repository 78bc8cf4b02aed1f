use serde::{Deserialize, Serialize};

/// Fixed-width binning along one axis.
/// Bin 0 is underflow and bin `bins + 1` is overflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub bins: usize,
    pub low: f64,
    pub high: f64,
}

impl Axis {
    pub fn new(bins: usize, low: f64, high: f64) -> Self {
        Self { bins, low, high }
    }

    /// Number of storage cells including under/overflow.
    pub fn cells(&self) -> usize {
        self.bins + 2
    }

    pub fn find_bin(&self, x: f64) -> usize {
        if x.is_nan() || x < self.low {
            return 0;
        }
        if x >= self.high || self.bins == 0 {
            return self.bins + 1;
        }
        let width = (self.high - self.low) / self.bins as f64;
        let bin = ((x - self.low) / width) as usize + 1;
        bin.min(self.bins)
    }
}

fn zeros(n: usize) -> Vec<f64> {
    vec![0.0; n]
}

fn clear(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = 0.0);
}

fn add_into(into: &mut [f64], from: &[f64]) {
    into.iter_mut().zip(from).for_each(|(a, b)| *a += b);
}

/// Per-cell accumulators shared by the profile payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCells {
    pub sum_w: Vec<f64>,
    pub sum_wy: Vec<f64>,
    pub sum_wy2: Vec<f64>,
}

impl ProfileCells {
    fn new(cells: usize) -> Self {
        Self {
            sum_w: zeros(cells),
            sum_wy: zeros(cells),
            sum_wy2: zeros(cells),
        }
    }

    fn fill(&mut self, cell: usize, y: f64, w: f64) {
        self.sum_w[cell] += w;
        self.sum_wy[cell] += w * y;
        self.sum_wy2[cell] += w * y * y;
    }

    fn mean(&self, cell: usize) -> Option<f64> {
        let w = *self.sum_w.get(cell)?;
        if w == 0.0 {
            None
        } else {
            Some(self.sum_wy[cell] / w)
        }
    }

    fn reset(&mut self) {
        clear(&mut self.sum_w);
        clear(&mut self.sum_wy);
        clear(&mut self.sum_wy2);
    }

    fn add(&mut self, other: &ProfileCells) {
        add_into(&mut self.sum_w, &other.sum_w);
        add_into(&mut self.sum_wy, &other.sum_wy);
        add_into(&mut self.sum_wy2, &other.sum_wy2);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    pub title: String,
    pub x: Axis,
    pub contents: Vec<f64>,
    pub entries: u64,
}

impl Hist1D {
    pub fn new(title: &str, x: Axis) -> Self {
        let contents = zeros(x.cells());
        Self { title: title.to_string(), x, contents, entries: 0 }
    }

    pub fn fill(&mut self, x: f64, w: f64) {
        let bin = self.x.find_bin(x);
        self.contents[bin] += w;
        self.entries += 1;
    }

    pub fn bin_content(&self, bin: usize) -> f64 {
        self.contents.get(bin).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        clear(&mut self.contents);
        self.entries = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// True when `other` can be added cell by cell.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.x == other.x
    }

    pub fn add(&mut self, other: &Self) {
        add_into(&mut self.contents, &other.contents);
        self.entries += other.entries;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist2D {
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    pub contents: Vec<f64>,
    pub entries: u64,
}

impl Hist2D {
    pub fn new(title: &str, x: Axis, y: Axis) -> Self {
        let contents = zeros(x.cells() * y.cells());
        Self { title: title.to_string(), x, y, contents, entries: 0 }
    }

    fn cell(&self, bx: usize, by: usize) -> usize {
        by * self.x.cells() + bx
    }

    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        let cell = self.cell(self.x.find_bin(x), self.y.find_bin(y));
        self.contents[cell] += w;
        self.entries += 1;
    }

    pub fn bin_content(&self, bx: usize, by: usize) -> f64 {
        self.contents.get(self.cell(bx, by)).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        clear(&mut self.contents);
        self.entries = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// True when `other` can be added cell by cell.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn add(&mut self, other: &Self) {
        add_into(&mut self.contents, &other.contents);
        self.entries += other.entries;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist3D {
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
    pub contents: Vec<f64>,
    pub entries: u64,
}

impl Hist3D {
    pub fn new(title: &str, x: Axis, y: Axis, z: Axis) -> Self {
        let contents = zeros(x.cells() * y.cells() * z.cells());
        Self { title: title.to_string(), x, y, z, contents, entries: 0 }
    }

    fn cell(&self, bx: usize, by: usize, bz: usize) -> usize {
        (bz * self.y.cells() + by) * self.x.cells() + bx
    }

    pub fn fill(&mut self, x: f64, y: f64, z: f64, w: f64) {
        let cell = self.cell(self.x.find_bin(x), self.y.find_bin(y), self.z.find_bin(z));
        self.contents[cell] += w;
        self.entries += 1;
    }

    pub fn bin_content(&self, bx: usize, by: usize, bz: usize) -> f64 {
        self.contents.get(self.cell(bx, by, bz)).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        clear(&mut self.contents);
        self.entries = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// True when `other` can be added cell by cell.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }

    pub fn add(&mut self, other: &Self) {
        add_into(&mut self.contents, &other.contents);
        self.entries += other.entries;
    }
}

/// Mean of y in bins of x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile1D {
    pub title: String,
    pub x: Axis,
    pub cells: ProfileCells,
    pub entries: u64,
}

impl Profile1D {
    pub fn new(title: &str, x: Axis) -> Self {
        let cells = ProfileCells::new(x.cells());
        Self { title: title.to_string(), x, cells, entries: 0 }
    }

    pub fn fill(&mut self, x: f64, y: f64, w: f64) {
        let bin = self.x.find_bin(x);
        self.cells.fill(bin, y, w);
        self.entries += 1;
    }

    pub fn bin_mean(&self, bin: usize) -> Option<f64> {
        self.cells.mean(bin)
    }

    pub fn reset(&mut self) {
        self.cells.reset();
        self.entries = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// True when `other` can be added cell by cell.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.x == other.x
    }

    pub fn add(&mut self, other: &Self) {
        self.cells.add(&other.cells);
        self.entries += other.entries;
    }
}

/// Mean of z in bins of (x, y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile2D {
    pub title: String,
    pub x: Axis,
    pub y: Axis,
    pub cells: ProfileCells,
    pub entries: u64,
}

impl Profile2D {
    pub fn new(title: &str, x: Axis, y: Axis) -> Self {
        let cells = ProfileCells::new(x.cells() * y.cells());
        Self { title: title.to_string(), x, y, cells, entries: 0 }
    }

    fn cell(&self, bx: usize, by: usize) -> usize {
        by * self.x.cells() + bx
    }

    pub fn fill(&mut self, x: f64, y: f64, z: f64, w: f64) {
        let cell = self.cell(self.x.find_bin(x), self.y.find_bin(y));
        self.cells.fill(cell, z, w);
        self.entries += 1;
    }

    pub fn bin_mean(&self, bx: usize, by: usize) -> Option<f64> {
        self.cells.mean(self.cell(bx, by))
    }

    pub fn reset(&mut self) {
        self.cells.reset();
        self.entries = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// True when `other` can be added cell by cell.
    pub fn same_binning(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn add(&mut self, other: &Self) {
        self.cells.add(&other.cells);
        self.entries += other.entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_routes_out_of_range_to_flow_bins() {
        let axis = Axis::new(10, 0.0, 10.0);
        assert_eq!(axis.find_bin(-0.5), 0);
        assert_eq!(axis.find_bin(0.0), 1);
        assert_eq!(axis.find_bin(9.99), 10);
        assert_eq!(axis.find_bin(10.0), 11);
        assert_eq!(axis.find_bin(f64::NAN), 0);
    }

    #[test]
    fn hist2d_fill_lands_in_expected_cell() {
        let mut h = Hist2D::new("occupancy", Axis::new(4, 0.0, 4.0), Axis::new(2, 0.0, 2.0));
        h.fill(2.5, 1.5, 3.0);
        assert_eq!(h.bin_content(3, 2), 3.0);
        assert_eq!(h.contents.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn profile_mean_and_reset() {
        let mut p = Profile1D::new("charge vs eta", Axis::new(2, -1.0, 1.0));
        p.fill(-0.5, 2.0, 1.0);
        p.fill(-0.5, 4.0, 1.0);
        assert_eq!(p.bin_mean(1), Some(3.0));
        assert_eq!(p.bin_mean(2), None);

        p.reset();
        assert!(p.is_empty());
        assert_eq!(p.bin_mean(1), None);
    }

    #[test]
    fn add_sums_cells_and_entries() {
        let mut a = Hist1D::new("pt", Axis::new(4, 0.0, 4.0));
        let mut b = a.clone();
        a.fill(0.5, 1.0);
        b.fill(0.5, 2.0);
        b.fill(3.5, 1.0);

        assert!(a.same_binning(&b));
        a.add(&b);
        assert_eq!(a.bin_content(1), 3.0);
        assert_eq!(a.bin_content(4), 1.0);
        assert_eq!(a.entries, 3);

        let coarse = Hist1D::new("pt", Axis::new(2, 0.0, 4.0));
        assert!(!a.same_binning(&coarse));
    }

    #[test]
    fn hist3d_reset_keeps_binning() {
        let mut h = Hist3D::new(
            "vertex",
            Axis::new(2, 0.0, 1.0),
            Axis::new(2, 0.0, 1.0),
            Axis::new(2, 0.0, 1.0),
        );
        h.fill(0.1, 0.6, 0.9, 1.0);
        assert_eq!(h.bin_content(1, 2, 2), 1.0);
        h.reset();
        assert!(h.is_empty());
        assert_eq!(h.contents.len(), 64);
        assert!(h.contents.iter().all(|c| *c == 0.0));
    }
}
