use approx::assert_abs_diff_eq;
use lre_qz::{GeneralizedSchur, GsSolver, QzError};
use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, n: usize) -> Array2<f64> {
    let mut m = Array2::zeros((n, n));
    for v in m.iter_mut() {
        *v = rng.random_range(-1.0..1.0);
    }
    m
}

fn to_complex(m: &Array2<f64>) -> Array2<Complex64> {
    m.mapv(|v| Complex64::new(v, 0.0))
}

fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

fn adjoint(m: ArrayView2<'_, Complex64>) -> Array2<Complex64> {
    m.t().mapv(|v| v.conj())
}

fn assert_factorisation(schur: &GeneralizedSchur, a: &Array2<f64>, b: &Array2<f64>) {
    let n = schur.dim();
    let q = schur.q();
    let z = schur.z();
    let a_rec = q.dot(&schur.s()).dot(&adjoint(z));
    let b_rec = q.dot(&schur.t()).dot(&adjoint(z));
    assert!(max_abs_diff(&a_rec, &to_complex(a)) < 1e-10);
    assert!(max_abs_diff(&b_rec, &to_complex(b)) < 1e-10);

    let id = Array2::<Complex64>::eye(n);
    assert!(max_abs_diff(&adjoint(q).dot(&q), &id) < 1e-10);
    assert!(max_abs_diff(&adjoint(z).dot(&z), &id) < 1e-10);

    for i in 0..n {
        for j in 0..i {
            assert_eq!(schur.s()[[i, j]].norm(), 0.0);
            assert_eq!(schur.t()[[i, j]].norm(), 0.0);
        }
    }
}

#[test]
fn random_pencils_factorise() {
    let mut rng = StdRng::seed_from_u64(2024);
    for n in [1, 2, 3, 5, 8, 12] {
        let a = random_matrix(&mut rng, n);
        let b = random_matrix(&mut rng, n);
        let mut schur = GeneralizedSchur::new(n);
        schur.decompose(a.view(), b.view()).unwrap();
        assert_factorisation(&schur, &a, &b);
    }
}

#[test]
fn reordering_keeps_factorisation() {
    let mut rng = StdRng::seed_from_u64(99);
    let n = 7;
    let a = random_matrix(&mut rng, n);
    let b = random_matrix(&mut rng, n);
    let mut schur = GeneralizedSchur::new(n);
    schur.decompose(a.view(), b.view()).unwrap();

    let mut before: Vec<f64> = (0..n).map(|i| schur.eigenvalue(i).norm()).collect();
    let n_sel = schur.reorder(|alpha, beta| alpha.norm() < beta.norm());
    let after: Vec<f64> = (0..n).map(|i| schur.eigenvalue(i).norm()).collect();

    assert_eq!(n_sel, before.iter().filter(|m| **m < 1.0).count());
    for (i, m) in after.iter().enumerate() {
        assert_eq!(*m < 1.0, i < n_sel, "eigenvalue {i} out of place");
    }
    let mut sorted_after = after.clone();
    before.sort_by(|x, y| x.total_cmp(y));
    sorted_after.sort_by(|x, y| x.total_cmp(y));
    for (x, y) in before.iter().zip(sorted_after.iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-8 * x.max(1.0));
    }
    assert_factorisation(&schur, &a, &b);
}

#[test]
fn singular_b_is_handled() {
    let mut rng = StdRng::seed_from_u64(5);
    let n = 5;
    let a = random_matrix(&mut rng, n);
    let mut b = random_matrix(&mut rng, n);
    for j in 0..n {
        b[[1, j]] = 0.0;
        b[[3, j]] = 0.0;
    }
    let mut schur = GeneralizedSchur::new(n);
    schur.decompose(a.view(), b.view()).unwrap();
    assert_factorisation(&schur, &a, &b);
    let n_infinite = (0..n).filter(|&i| schur.beta(i).norm() < 1e-10).count();
    assert_eq!(n_infinite, 2);
}

#[test]
fn pencil_residual_holds_for_stable_solution() {
    // Companion pencil of a stable VAR(1) in x1 with x2 = K x1.
    let g = ndarray::array![[0.5, 0.1], [-0.2, 0.3]];
    let k = ndarray::array![[1.0, -0.5]];
    // D x_{t+1} = E x_t with x = [x1; x2]:
    //   x1_{t+1} = g x1_t
    //   x2_t - k x1_t = 0
    let d = ndarray::array![
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
    ];
    let e = ndarray::array![
        [g[[0, 0]], g[[0, 1]], 0.0],
        [g[[1, 0]], g[[1, 1]], 0.0],
        [k[[0, 0]], k[[0, 1]], -1.0],
    ];
    let mut solver = GsSolver::new(3, 2);
    solver.solve(d.view(), e.view(), 1.0 + 1e-6).unwrap();
    for i in 0..2 {
        for j in 0..2 {
            assert_abs_diff_eq!(solver.g1()[[i, j]], g[[i, j]], epsilon = 1e-10);
        }
        assert_abs_diff_eq!(solver.g2()[[0, i]], k[[0, i]], epsilon = 1e-10);
    }

    let mut stacked = Array2::zeros((3, 2));
    stacked.slice_mut(ndarray::s![..2, ..]).assign(&Array2::<f64>::eye(2));
    stacked.slice_mut(ndarray::s![2.., ..]).assign(&solver.g2());
    let lhs = d.dot(&stacked).dot(&solver.g1());
    let rhs = e.dot(&stacked);
    for (x, y) in lhs.iter().zip(rhs.iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-10);
    }
}

#[test]
fn indeterminacy_is_reported() {
    let d = Array2::<f64>::eye(2);
    let e = ndarray::array![[0.5, 0.0], [0.0, 0.4]];
    let mut solver = GsSolver::new(2, 1);
    let err = solver.solve(d.view(), e.view(), 1.0 + 1e-6).unwrap_err();
    assert!(matches!(
        err,
        QzError::BlanchardKahn {
            n_stable: 2,
            n_states: 1
        }
    ));
    assert_eq!(solver.eigenvalues().len(), 2);
}
