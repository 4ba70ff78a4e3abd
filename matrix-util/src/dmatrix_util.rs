pub use nalgebra::{DMatrix, DVector};
pub use rand::Rng;
pub use rand_distr::StandardNormal;
pub use rayon::prelude::*;

use crate::traits::{MatOps, SampleOps};

impl MatOps for DMatrix<f64> {
    type Mat = Self;
    type Scalar = f64;

    fn scale_columns_inplace(&mut self) {
        let nn = self.nrows();
        for mut x_j in self.column_iter_mut() {
            let mu = x_j.mean();
            x_j.add_scalar_mut(-mu);
            if nn > 1 {
                let sig = (x_j.norm_squared() / (nn - 1) as f64).sqrt();
                if sig > 0.0 {
                    x_j /= sig;
                }
            }
        }
    }

    fn scale_columns(&self) -> Self::Mat {
        let mut ret = self.clone();
        ret.scale_columns_inplace();
        ret
    }

    fn centre_columns_inplace(&mut self) {
        for mut x_j in self.column_iter_mut() {
            let mu = x_j.mean();
            x_j.add_scalar_mut(-mu);
        }
    }

    fn centre_columns(&self) -> Self::Mat {
        let mut ret = self.clone();
        ret.centre_columns_inplace();
        ret
    }

    /// Constant columns have zero correlation with everything,
    /// including themselves.
    fn column_correlation(&self) -> Self::Mat {
        let nn = self.nrows();
        if nn < 2 {
            return DMatrix::zeros(self.ncols(), self.ncols());
        }
        let zz = self.scale_columns();
        (zz.transpose() * &zz) / (nn - 1) as f64
    }
}

impl SampleOps for DMatrix<f64> {
    type Mat = Self;
    type Scalar = f64;

    fn runif(dd: usize, nn: usize) -> Self::Mat {
        let rvec = (0..(dd * nn))
            .into_par_iter()
            .map_init(rand::rng, |rng, _| rng.random::<f64>())
            .collect();
        DMatrix::<f64>::from_vec(dd, nn, rvec)
    }

    fn rnorm(dd: usize, nn: usize) -> Self::Mat {
        let rvec = (0..(dd * nn))
            .into_par_iter()
            .map_init(rand::rng, |rng, _| rng.sample(StandardNormal))
            .collect();
        DMatrix::<f64>::from_vec(dd, nn, rvec)
    }
}

/// Sample a d x n matrix from N(0,1) with a caller-supplied generator,
/// for reproducible simulations
pub fn rnorm_with<R: Rng>(dd: usize, nn: usize, rng: &mut R) -> DMatrix<f64> {
    DMatrix::<f64>::from_fn(dd, nn, |_, _| rng.sample(StandardNormal))
}

/// Pearson correlation between two equally long slices; NaN when
/// either one has no spread
pub fn pearson(xx: &[f64], yy: &[f64]) -> f64 {
    let nn = xx.len().min(yy.len());
    if nn < 2 {
        return f64::NAN;
    }
    let mx = xx[..nn].iter().sum::<f64>() / nn as f64;
    let my = yy[..nn].iter().sum::<f64>() / nn as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xx[..nn].iter().zip(yy[..nn].iter()) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx > 0.0 && syy > 0.0 {
        sxy / (sxx * syy).sqrt()
    } else {
        f64::NAN
    }
}
