//! Complex Givens rotations.

use std::ops::Range;

use ndarray::Array2;
use num_complex::Complex64;

/// Plane rotation `G = [[c, s], [-conj(s), c]]` with real `c`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Givens {
    c: f64,
    s: Complex64,
}

impl Givens {
    /// Builds `G` with `G [f; g] = [r; 0]` and returns it with `r`.
    pub(crate) fn new(f: Complex64, g: Complex64) -> (Self, Complex64) {
        let zero = Complex64::new(0.0, 0.0);
        if g == zero {
            return (Self { c: 1.0, s: zero }, f);
        }
        let g_abs = g.norm();
        if f == zero {
            return (
                Self {
                    c: 0.0,
                    s: g.conj() / g_abs,
                },
                Complex64::new(g_abs, 0.0),
            );
        }
        let f_abs = f.norm();
        let norm = f_abs.hypot(g_abs);
        let phase = f / f_abs;
        (
            Self {
                c: f_abs / norm,
                s: phase * g.conj() / norm,
            },
            phase * norm,
        )
    }

    /// Builds the rotation directly from its parameters.
    pub(crate) fn from_parts(c: f64, s: Complex64) -> Self {
        Self { c, s }
    }

    /// Rotation with conjugated `s`; used to accumulate `Q` from row rotations.
    pub(crate) fn conj(self) -> Self {
        Self {
            c: self.c,
            s: self.s.conj(),
        }
    }

    /// Left-multiplies rows `i` and `j` of `m` by `G` over `cols`.
    pub(crate) fn rotate_rows(
        &self,
        m: &mut Array2<Complex64>,
        i: usize,
        j: usize,
        cols: Range<usize>,
    ) {
        for k in cols {
            let x = m[[i, k]];
            let y = m[[j, k]];
            m[[i, k]] = x * self.c + self.s * y;
            m[[j, k]] = y * self.c - self.s.conj() * x;
        }
    }

    /// Mixes columns `p` and `q` of `m` over `rows`.
    ///
    /// With `G` from `Givens::new(m[r, p], m[r, q])` this zeroes `m[r, q]`.
    pub(crate) fn rotate_cols(
        &self,
        m: &mut Array2<Complex64>,
        p: usize,
        q: usize,
        rows: Range<usize>,
    ) {
        for r in rows {
            let x = m[[r, p]];
            let y = m[[r, q]];
            m[[r, p]] = x * self.c + self.s * y;
            m[[r, q]] = y * self.c - self.s.conj() * x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn annihilates_second_component() {
        let cases = [
            (c(3.0, 0.0), c(4.0, 0.0)),
            (c(1.0, -2.0), c(0.5, 3.0)),
            (c(0.0, 0.0), c(-1.0, 1.0)),
            (c(2.0, 1.0), c(0.0, 0.0)),
        ];
        for (f, g) in cases {
            let (rot, r) = Givens::new(f, g);
            let mut m = array![[f], [g]];
            rot.rotate_rows(&mut m, 0, 1, 0..1);
            assert_abs_diff_eq!((m[[0, 0]] - r).norm(), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(m[[1, 0]].norm(), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(r.norm(), f.norm().hypot(g.norm()), epsilon = 1e-14);
        }
    }

    #[test]
    fn column_rotation_zeroes_target() {
        let mut m = array![[c(1.0, 1.0), c(2.0, -1.0)], [c(0.5, 0.0), c(1.0, 0.0)]];
        let (rot, _) = Givens::new(m[[0, 0]], m[[0, 1]]);
        rot.rotate_cols(&mut m, 0, 1, 0..2);
        assert_abs_diff_eq!(m[[0, 1]].norm(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn rotation_is_unitary() {
        let (rot, _) = Givens::new(c(0.3, -0.7), c(1.1, 0.4));
        let mut m = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        rot.rotate_rows(&mut m, 0, 1, 0..2);
        // Rows of a unitary matrix are orthonormal.
        let dot = m[[0, 0]] * m[[1, 0]].conj() + m[[0, 1]] * m[[1, 1]].conj();
        assert_abs_diff_eq!(dot.norm(), 0.0, epsilon = 1e-14);
        let n0 = m[[0, 0]].norm_sqr() + m[[0, 1]].norm_sqr();
        assert_abs_diff_eq!(n0, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn conjugate_rotation_undoes_row_rotation_on_columns() {
        // (A G^H) G = A for the accumulated Q.
        let (rot, _) = Givens::new(c(0.2, 0.9), c(-1.3, 0.1));
        let a = array![[c(1.0, 2.0), c(3.0, -1.0)], [c(0.0, 1.0), c(2.0, 2.0)]];
        let mut q = a.clone();
        rot.conj().rotate_cols(&mut q, 0, 1, 0..2);
        // Undo: multiply by G from the right, i.e. q G.
        let g = array![[c(rot.c, 0.0), rot.s], [-rot.s.conj(), c(rot.c, 0.0)]];
        let back = q.dot(&g);
        for (x, y) in back.iter().zip(a.iter()) {
            assert_abs_diff_eq!((x - y).norm(), 0.0, epsilon = 1e-14);
        }
    }
}
