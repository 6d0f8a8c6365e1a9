use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use scivis_linalg::{
    jacobi::jacobi_n,
    matrix::{invert_matrix, multiply_matrix, solve_linear_system},
    matrix3::{invert3x3, lu_factor3x3, lu_solve3x3, multiply3x3_mat3, multiply3x3_vect3},
    quaternion::{matrix3x3_to_quaternion, quaternion_to_matrix3x3},
    svd::singular_value_decomposition3x3,
    vector::{angle_between_vectors, cross, normalize, signed_angle_between_vectors},
    LinalgError,
};

fn random_vec3(rng: &mut StdRng) -> [f64; 3] {
    [
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
        rng.random_range(-10.0..10.0),
    ]
}

fn random_mat3(rng: &mut StdRng) -> [[f64; 3]; 3] {
    [random_vec3(rng), random_vec3(rng), random_vec3(rng)]
}

#[test]
fn angles_are_symmetric() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..200 {
        let a = random_vec3(&mut rng);
        let b = random_vec3(&mut rng);
        let n = random_vec3(&mut rng);

        assert_eq!(angle_between_vectors(&a, &b), angle_between_vectors(&b, &a));
        assert_eq!(angle_between_vectors(&a, &a), 0.0);
        assert_eq!(
            signed_angle_between_vectors(&a, &b, &n),
            -signed_angle_between_vectors(&b, &a, &n)
        );

        // axes orthogonal to a x b still give antisymmetric angles
        let mut ab = [0.0; 3];
        cross(&a, &b, &mut ab);
        let mut side = [0.0; 3];
        cross(&ab, &n, &mut side);
        for axis in [a, b, side] {
            let forward = signed_angle_between_vectors(&a, &b, &axis);
            let backward = signed_angle_between_vectors(&b, &a, &axis);
            assert_eq!(forward, -backward);
            assert!(forward.abs() <= std::f64::consts::PI);
        }

        let scaled = [a[0] * 4.0, a[1] * 4.0, a[2] * 4.0];
        assert_eq!(angle_between_vectors(&a, &scaled), 0.0);
        let opposite = [-a[0], -a[1], -a[2]];
        assert_eq!(angle_between_vectors(&a, &opposite), std::f64::consts::PI);
    }
}

#[test]
fn invert3x3_round_trips() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut tested = 0;
    while tested < 100 {
        let m = random_mat3(&mut rng);
        if scivis_linalg::matrix3::determinant3x3(&m).abs() < 1.0 {
            continue;
        }
        tested += 1;

        let mut inv = [[0.0; 3]; 3];
        let mut inv_inv = [[0.0; 3]; 3];
        let mut prod = [[0.0; 3]; 3];
        invert3x3(&m, &mut inv);
        invert3x3(&inv, &mut inv_inv);
        multiply3x3_mat3(&m, &inv, &mut prod);

        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(inv_inv[i][j], m[i][j], epsilon = 1e-5);
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(prod[i][j], expected, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn lu_solve3x3_recovers_known_solution() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let mut a = random_mat3(&mut rng);
        for (i, row) in a.iter_mut().enumerate() {
            row[i] += 40.0;
        }
        let x_true = random_vec3(&mut rng);
        let mut x = [0.0; 3];
        multiply3x3_vect3(&a, &x_true, &mut x);

        let mut index = [0; 3];
        lu_factor3x3(&mut a, &mut index);
        lu_solve3x3(&a, &index, &mut x);
        for i in 0..3 {
            assert_relative_eq!(x[i], x_true[i], epsilon = 1e-9);
        }
    }
}

#[test]
fn solve_linear_system_reports_zero_matrices() {
    let mut a = [0.0];
    let mut x = [3.0];
    assert_eq!(
        solve_linear_system(&mut a, &mut x, 1),
        Err(LinalgError::SingularMatrix)
    );
    let mut a = [0.0; 4];
    let mut x = [3.0, 4.0];
    assert_eq!(
        solve_linear_system(&mut a, &mut x, 2),
        Err(LinalgError::SingularMatrix)
    );
}

#[test]
fn jacobi_reconstructs_random_symmetric_matrices() -> Result<(), LinalgError> {
    let mut rng = StdRng::seed_from_u64(4);
    for n in 2..=30 {
        let mut a = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let x = rng.random_range(-5.0..5.0);
                a[i * n + j] = x;
                a[j * n + i] = x;
            }
        }

        let mut work = a.clone();
        let mut w = vec![0.0; n];
        let mut v = vec![0.0; n * n];
        jacobi_n(&mut work, n, &mut w, &mut v)?;

        let mut v_inv = vec![0.0; n * n];
        invert_matrix(&v, &mut v_inv, n)?;
        let mut av = vec![0.0; n * n];
        multiply_matrix(&a, &v, n, n, n, n, &mut av)?;
        let mut diag = vec![0.0; n * n];
        multiply_matrix(&v_inv, &av, n, n, n, n, &mut diag)?;

        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { w[i] } else { 0.0 };
                assert_relative_eq!(diag[i * n + j], expected, epsilon = 1e-7);
            }
        }
    }
    Ok(())
}

#[test]
fn svd3x3_reconstructs_random_matrices() -> Result<(), LinalgError> {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let a = random_mat3(&mut rng);
        let mut u = [[0.0; 3]; 3];
        let mut w = [0.0; 3];
        let mut vt = [[0.0; 3]; 3];
        singular_value_decomposition3x3(&a, &mut u, &mut w, &mut vt)?;

        assert!(w.iter().all(|s| *s >= 0.0));

        let mut uw = u;
        for row in uw.iter_mut() {
            for (j, x) in row.iter_mut().enumerate() {
                *x *= w[j];
            }
        }
        let mut rec = [[0.0; 3]; 3];
        multiply3x3_mat3(&uw, &vt, &mut rec);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rec[i][j], a[i][j], epsilon = 1e-8);
            }
        }
    }
    Ok(())
}

#[test]
fn quaternions_round_trip_up_to_sign() -> Result<(), LinalgError> {
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..100 {
        let mut axis = random_vec3(&mut rng);
        normalize(&mut axis);
        let half = rng.random_range(0.0..std::f64::consts::PI) / 2.0;
        let q = [
            half.cos(),
            axis[0] * half.sin(),
            axis[1] * half.sin(),
            axis[2] * half.sin(),
        ];

        let mut m = [[0.0; 3]; 3];
        quaternion_to_matrix3x3(&q, &mut m);
        let mut back = [0.0; 4];
        matrix3x3_to_quaternion(&m, &mut back)?;

        let dot: f64 = q.iter().zip(back.iter()).map(|(a, b)| a * b).sum();
        assert_relative_eq!(dot.abs(), 1.0, epsilon = 1e-9);
    }
    Ok(())
}
