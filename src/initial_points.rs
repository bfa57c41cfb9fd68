//! Sampling of quantum amplitude vectors and the binary points they collapse to.
//!
//! An amplitude y_j in [0, 1) is the probability that item j is left out: the point takes
//! x_j = 1 exactly when y_j is below a fresh uniform draw.

use ndarray::Array1;
use smolprng::{Algorithm, PRNG};

/// Draws a random amplitude vector and the point it collapses to. The draws alternate per item,
/// amplitude first, then the collapse value.
pub fn generate_random_particle<T: Algorithm>(
    num_x: usize,
    prng: &mut PRNG<T>,
) -> (Array1<f64>, Array1<usize>) {
    let mut y = Array1::<f64>::zeros(num_x);
    let mut x = Array1::<usize>::zeros(num_x);

    for j in 0..num_x {
        y[j] = prng.gen_f64();
        x[j] = usize::from(y[j] < prng.gen_f64());
    }

    (y, x)
}

/// Collapses an amplitude vector into a binary point, one draw per item.
pub fn collapse<T: Algorithm>(y: &Array1<f64>, prng: &mut PRNG<T>) -> Array1<usize> {
    y.mapv(|y_j| usize::from(y_j < prng.gen_f64()))
}

/// Amplitudes pulled towards a binary point: alpha where the point selects the item, 1 - alpha
/// where it does not.
pub fn attractor(point: &Array1<usize>, alpha: f64) -> Array1<f64> {
    let beta = 1.0 - alpha;
    point.mapv(|x_j| {
        let x_j = x_j as f64;
        alpha * x_j + beta * (1.0 - x_j)
    })
}
