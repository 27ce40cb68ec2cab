//! Householder row compression.

use ndarray::{Array2, Axis};

/// Reusable Householder QR applied to selected columns of a wider matrix.
///
/// [`HouseholderQr::compress_rows`] factors the sub-matrix formed by a set
/// of columns as `Q R` and overwrites the whole matrix with `Q^T` times it.
/// Afterwards the chosen columns hold `R` in their leading rows and exact
/// zeros below, while every other column has been rotated consistently.
#[derive(Debug, Clone)]
pub struct HouseholderQr {
    v: Vec<f64>,
}

impl HouseholderQr {
    /// Allocates a reflector buffer for matrices with `n_rows` rows.
    pub fn new(n_rows: usize) -> Self {
        Self {
            v: vec![0.0; n_rows],
        }
    }

    /// Applies `Q^T` to every column of `a`, where `Q R` factors `a[:, columns]`.
    ///
    /// The k-th reflector is built from column `columns[k]` restricted to
    /// rows `k..`, so `columns` must not be longer than `a.nrows()`.
    pub fn compress_rows(&mut self, a: &mut Array2<f64>, columns: &[usize]) {
        let n_rows = a.nrows();
        if self.v.len() < n_rows {
            self.v.resize(n_rows, 0.0);
        }
        debug_assert!(columns.len() <= n_rows);

        for (k, &col) in columns.iter().enumerate().take(n_rows) {
            let len = n_rows - k;
            let mut norm_sq = 0.0;
            for i in 0..len {
                let x = a[[k + i, col]];
                self.v[i] = x;
                norm_sq += x * x;
            }
            let norm = norm_sq.sqrt();
            if norm == 0.0 {
                continue;
            }
            let alpha = if self.v[0] >= 0.0 { -norm } else { norm };
            self.v[0] -= alpha;
            let v_norm_sq: f64 = self.v[..len].iter().map(|x| x * x).sum();
            if v_norm_sq == 0.0 {
                continue;
            }
            let scale = 2.0 / v_norm_sq;

            for mut column in a.axis_iter_mut(Axis(1)) {
                let mut s = 0.0;
                for i in 0..len {
                    s += self.v[i] * column[k + i];
                }
                if s == 0.0 {
                    continue;
                }
                let s = s * scale;
                for i in 0..len {
                    column[k + i] -= s * self.v[i];
                }
            }

            a[[k, col]] = alpha;
            for i in k + 1..n_rows {
                a[[i, col]] = 0.0;
            }
        }
    }
}
