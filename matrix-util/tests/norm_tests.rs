use approx::assert_abs_diff_eq;
use matrix_util::traits::{MatOps, SampleOps};

#[test]
fn dmatrix_scale_test() {
    let mut xx = nalgebra::DMatrix::<f64>::runif(100, 10);
    xx.scale_columns_inplace();

    for j in 0..xx.ncols() {
        let x_j = xx.column(j);
        assert_abs_diff_eq!(x_j.mean(), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x_j.norm_squared() / 99.0, 1.0, epsilon = 1e-10);
    }
}

#[test]
fn dmatrix_centre_test() {
    let xx = nalgebra::DMatrix::<f64>::rnorm(20, 5);
    let yy = xx.centre_columns();
    for j in 0..yy.ncols() {
        assert_abs_diff_eq!(yy.column(j).mean(), 0.0, epsilon = 1e-10);
    }
}

#[test]
fn correlation_is_symmetric() {
    let xx = nalgebra::DMatrix::<f64>::rnorm(40, 6);
    let cc = xx.column_correlation();
    assert_abs_diff_eq!(cc.clone(), cc.transpose(), epsilon = 1e-12);
    assert!(cc.iter().all(|c| c.abs() <= 1.0 + 1e-12));
}
