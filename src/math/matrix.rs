use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::{AddAssign, SubAssign};

/// Dense row-major matrix of connection weights.
///
/// For a connectivity layer `n`, row `j` is the sending unit in layer `n`
/// and column `i` the receiving unit in layer `n + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Fills a `rows × cols` matrix with values drawn uniformly from `[min, max)`.
    pub fn random_uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        min: f64,
        max: f64,
        rng: &mut R,
    ) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = uniform(min, max, rng);
            }
        }

        res
    }

    /// Builds a matrix from nested rows. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn same_shape(&self, other: &Matrix) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Largest absolute element-wise difference between two same-shape matrices.
    pub fn max_abs_diff(&self, other: &Matrix) -> f64 {
        self.data.iter().zip(other.data.iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f64::max)
    }
}

/// Samples from `[min, max)`; a degenerate range yields `min`.
pub(crate) fn uniform<R: Rng + ?Sized>(min: f64, max: f64, rng: &mut R) -> f64 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        if !self.same_shape(rhs) {
            panic!("Matrices are of incorrect sizes")
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, d) in row.iter_mut().zip(rhs_row.iter()) {
                *x += d;
            }
        }
    }
}

impl SubAssign<&Matrix> for Matrix {
    fn sub_assign(&mut self, rhs: &Matrix) {
        if !self.same_shape(rhs) {
            panic!("Matrices are of incorrect sizes")
        }

        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, d) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= d;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_uniform_stays_in_half_open_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random_uniform(6, 5, -0.5, 0.25, &mut rng);
        assert_eq!((m.rows, m.cols), (6, 5));
        assert!(m.data.iter().flatten().all(|&w| (-0.5..0.25).contains(&w)));
    }

    #[test]
    fn degenerate_range_yields_its_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        let m = Matrix::random_uniform(2, 2, 1.5, 1.5, &mut rng);
        assert!(m.data.iter().flatten().all(|&w| w == 1.5));
    }

    #[test]
    fn add_then_sub_restores_values() {
        let mut w = Matrix::from_data(vec![vec![0.1, -2.0], vec![3.3, 0.7]]);
        let original = w.clone();
        let d = Matrix::from_data(vec![vec![1e-3, 0.25], vec![-7.5, 1e-9]]);
        w += &d;
        w -= &d;
        assert!(w.max_abs_diff(&original) < 1e-12);
    }

    #[test]
    #[should_panic(expected = "incorrect sizes")]
    fn shape_mismatch_panics() {
        let mut a = Matrix::zeros(2, 2);
        a += &Matrix::zeros(2, 3);
    }
}
