#![allow(dead_code)]

use lre_linalg::Lu;
use lre_solver::{LreIndices, build_indices};
use ndarray::{Array2, s};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprs::{CsMat, TriMat};

/// Random model with a known decision rule.
///
/// The quadratic factors as `(A λ + W)(λ - X)` with `X` small and
/// supported on backward columns, `A` small and supported on forward
/// columns, and `W` close to `2 I`. The stable solvent is `X` and the
/// shock response is `-W⁻¹ F`.
pub struct Model {
    pub indices: LreIndices,
    pub a: Array2<f64>,
    pub b: Array2<f64>,
    pub c: Array2<f64>,
    pub f: Array2<f64>,
    pub jacobian: Array2<f64>,
    pub g1_1: Array2<f64>,
    pub g1_2: Array2<f64>,
}

pub fn random_model(
    seed: u64,
    n: usize,
    n_exogenous: usize,
    forward: &[usize],
    backward: &[usize],
    statics: &[usize],
) -> Model {
    let mut rng = StdRng::seed_from_u64(seed);
    let current: Vec<usize> = (0..n).collect();
    let indices = build_indices(n_exogenous, forward, &current, backward, statics).unwrap();
    let nb = indices.n_backward();
    let nf = indices.n_forward();

    let mut x = Array2::<f64>::zeros((n, n));
    for &v in indices.backward() {
        for i in 0..n {
            x[[i, v]] = rng.random_range(-0.25..0.25) / nb as f64;
        }
    }
    let mut a = Array2::<f64>::zeros((n, n));
    for &v in indices.forward() {
        for i in 0..n {
            a[[i, v]] = rng.random_range(-0.2..0.2) / nf as f64;
        }
    }
    let mut w = Array2::<f64>::eye(n) * 2.0;
    for v in w.iter_mut() {
        *v += rng.random_range(-0.1..0.1);
    }
    let mut f = Array2::<f64>::zeros((n, n_exogenous));
    for v in f.iter_mut() {
        *v = rng.random_range(-1.0..1.0);
    }

    let b = &w - &a.dot(&x);
    let c = -w.dot(&x);

    let mut jacobian = Array2::zeros((n, indices.n_jacobian_columns()));
    for (k, &v) in indices.backward().iter().enumerate() {
        jacobian.column_mut(k).assign(&c.column(v));
    }
    let cur = indices.current_columns();
    for (k, &v) in indices.current().iter().enumerate() {
        jacobian.column_mut(cur.start + k).assign(&b.column(v));
    }
    let fwd = indices.forward_columns();
    for (k, &v) in indices.forward().iter().enumerate() {
        jacobian.column_mut(fwd.start + k).assign(&a.column(v));
    }
    jacobian
        .slice_mut(s![.., indices.exogenous_columns()])
        .assign(&f);

    let mut g1_1 = Array2::zeros((n, nb));
    for (k, &v) in indices.backward().iter().enumerate() {
        g1_1.column_mut(k).assign(&x.column(v));
    }
    let mut g1_2 = -&f;
    let mut lu = Lu::new(n);
    lu.factor(w.view()).unwrap();
    lu.solve_in_place(g1_2.view_mut()).unwrap();

    Model {
        indices,
        a,
        b,
        c,
        f,
        jacobian,
        g1_1,
        g1_2,
    }
}

pub fn to_sparse(dense: &Array2<f64>) -> CsMat<f64> {
    let mut tri = TriMat::new(dense.dim());
    for ((r, c), &v) in dense.indexed_iter() {
        if v != 0.0 {
            tri.add_triplet(r, c, v);
        }
    }
    tri.to_csc()
}

pub fn max_abs_diff(a: ndarray::ArrayView2<'_, f64>, b: ndarray::ArrayView2<'_, f64>) -> f64 {
    assert_eq!(a.dim(), b.dim());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
