use approx::assert_abs_diff_eq;
use lre_moments::{
    MomentsConfig, autocovariance, compute_variance, correlation, solve_discrete_lyapunov,
    variance_decomposition,
};
use lre_solver::{
    Algorithm, FirstOrderSolver, Jacobian, LreIndices, LreOptions, LreResults, LreWorkspace,
    build_indices,
};
use ndarray::{Array2, array};

fn solve(idx: &LreIndices, jac: &Array2<f64>, algorithm: Algorithm) -> LreResults {
    let mut results = LreResults::new(idx);
    LreWorkspace::new(idx.clone(), algorithm)
        .solve(&Jacobian::from(jac), &LreOptions::default(), &mut results)
        .unwrap();
    results
}

/// VAR(1) in two states with a coupled transition, one forward-looking
/// variable and one static.
///
/// ```text
/// s0_t = 0.6 s0_{t-1} + 0.2 s1_{t-1} + u0_t
/// s1_t = -0.3 s0_{t-1} + 0.5 s1_{t-1} + u1_t
/// f_t  = 0.5 f_{t+1} + s0_t
/// x_t  = f_t - s1_t
/// ```
fn coupled_model() -> (LreIndices, Array2<f64>) {
    // variables: 0 = s0, 1 = s1, 2 = f, 3 = x
    let idx = build_indices(2, &[2], &[0, 1, 2, 3], &[0, 1], &[3]).unwrap();
    // columns: [s0(-1) s1(-1) | s0 s1 f x | f(+1) | u0 u1]
    let jac = array![
        [-0.6, -0.2, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0],
        [0.3, -0.5, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0],
        [0.0, 0.0, -1.0, 0.0, 1.0, 0.0, -0.5, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, -1.0, 1.0, 0.0, 0.0, 0.0],
    ];
    (idx, jac)
}

#[test]
fn schur_variance_matches_direct_lyapunov() {
    let (idx, jac) = coupled_model();
    let omega = array![[1.0, 0.3], [0.3, 0.5]];
    for algorithm in [Algorithm::GeneralizedSchur, Algorithm::CyclicReduction] {
        let mut results = solve(&idx, &jac, algorithm);
        compute_variance(&mut results, &idx, omega.view(), &MomentsConfig::default()).unwrap();
        assert!(results.stationary_variables().iter().all(|&s| s));

        let hs1 = results.hs1();
        let q = hs1.dot(&omega).dot(&hs1.t());
        let sigma_s = solve_discrete_lyapunov(results.gs1(), q.view(), 1e-14, 64).unwrap();
        let g1_1 = results.g1_1();
        let g1_2 = results.g1_2();
        let expected = g1_1.dot(&sigma_s).dot(&g1_1.t()) + g1_2.dot(&omega).dot(&g1_2.t());

        let v = results.endogenous_variance();
        for (a, b) in v.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!(v[[i, j]], v[[j, i]], epsilon = 1e-10);
            }
        }
    }
}

#[test]
fn lag_one_autocovariance_matches_transition() {
    let (idx, jac) = coupled_model();
    let omega = Array2::eye(2);
    let mut results = solve(&idx, &jac, Algorithm::GeneralizedSchur);
    compute_variance(&mut results, &idx, omega.view(), &MomentsConfig::default()).unwrap();
    let gammas = autocovariance(&results, &idx, omega.view(), 3).unwrap();

    // states: Γ_1[s, s] = gs1 Σ_s
    let v = results.endogenous_variance();
    let sigma_s = array![[v[[0, 0]], v[[0, 1]]], [v[[1, 0]], v[[1, 1]]]];
    let expected = results.gs1().dot(&sigma_s);
    for i in 0..2 {
        for j in 0..2 {
            assert_abs_diff_eq!(gammas[1][[i, j]], expected[[i, j]], epsilon = 1e-10);
        }
    }
    let expected2 = results.gs1().dot(&expected);
    assert_abs_diff_eq!(gammas[2][[0, 1]], expected2[[0, 1]], epsilon = 1e-10);

    let corr = correlation(&results);
    for i in 0..4 {
        assert_abs_diff_eq!(corr[[i, i]], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn unit_root_detection_spares_unaffected_variables() {
    // 0: random walk, 1: AR(1), 2: static depending on 1 only, 3: static on 0
    let idx = build_indices(2, &[], &[0, 1, 2, 3], &[0, 1], &[2, 3]).unwrap();
    // columns: [y0(-1) y1(-1) | y0 y1 y2 y3 | u0 u1]
    let jac = array![
        [-1.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0, 0.0],
        [0.0, -0.9, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
        [0.0, 0.0, 0.0, -3.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    ];
    let mut results = solve(&idx, &jac, Algorithm::GeneralizedSchur);
    let omega = Array2::eye(2);
    compute_variance(&mut results, &idx, omega.view(), &MomentsConfig::default()).unwrap();

    assert_eq!(results.stationary_variables(), &[false, true, true, false]);
    let v = results.endogenous_variance();
    let v1 = 1.0 / (1.0 - 0.81);
    assert_abs_diff_eq!(v[[1, 1]], v1, epsilon = 1e-9);
    assert_abs_diff_eq!(v[[2, 2]], 9.0 * v1, epsilon = 1e-8);
    assert_abs_diff_eq!(v[[1, 2]], 3.0 * v1, epsilon = 1e-9);
    assert!(v[[0, 0]].is_nan());
    assert!(v[[3, 1]].is_nan());

    let shares =
        variance_decomposition(&results, &idx, omega.view(), &MomentsConfig::default()).unwrap();
    assert!(shares[[0, 0]].is_nan());
    assert_abs_diff_eq!(shares[[2, 1]], 1.0, epsilon = 1e-12);
}
