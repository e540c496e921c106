// https://github.com/AtsushiSakai/PythonRobotics/tree/master/PathPlanning/CubicSpline
// https://github.com/onlytailei/CppRobotics/blob/master/include/cubic_spline.h
// Cubic spline planner
//
// Author: Atsushi Sakai(@Atsushi_twi)
//         TAI Lei
//         Ryohei Sasaki(@rsasaki0109)

extern crate nalgebra as na;

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::common::{Point2D, SimError, SimResult};

/// End conditions of the cubic spline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    /// Second derivative is zero at both ends
    Natural,
    /// Third derivative is continuous across the second and the second-to-last knots
    NotAKnot,
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        BoundaryCondition::Natural
    }
}

/// One-dimensional cubic spline `y(x)` over strictly increasing knots.
///
/// Segment `i` is `a[i] + b[i]*dx + c[i]*dx^2 + d[i]*dx^3` with `dx = t - x[i]`.
#[derive(Debug, Clone)]
struct Spline {
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    x: Vec<f64>,
}

impl Spline {
    fn new(x: &[f64], y: &[f64], bc: BoundaryCondition) -> SimResult<Spline> {
        let nx = x.len();
        let h: Vec<f64> = x.iter().tuple_windows().map(|(x0, x1)| x1 - x0).collect();
        let a = y.to_vec();

        let a_mat = Spline::calc_a(&h, bc);
        let b_mat = Spline::calc_b(&h, &a);
        let c_na = a_mat.lu().solve(&b_mat).ok_or_else(|| {
            SimError::NumericalError("cubic spline system is singular".to_string())
        })?;
        let c: Vec<f64> = c_na.iter().copied().collect();

        let mut b: Vec<f64> = Vec::with_capacity(nx - 1);
        let mut d: Vec<f64> = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
        }

        Ok(Spline { a, b, c, d, x: x.to_vec() })
    }

    fn calc(&self, t: f64) -> SimResult<f64> {
        let i = self.search_index(t)?;
        let dx = t - self.x[i];
        Ok(self.a[i] + self.b[i] * dx + self.c[i] * dx.powi(2) + self.d[i] * dx.powi(3))
    }

    fn calcd(&self, t: f64) -> SimResult<f64> {
        let i = self.search_index(t)?;
        let dx = t - self.x[i];
        Ok(self.b[i] + 2.0 * self.c[i] * dx + 3.0 * self.d[i] * dx.powi(2))
    }

    fn calcdd(&self, t: f64) -> SimResult<f64> {
        let i = self.search_index(t)?;
        let dx = t - self.x[i];
        Ok(2.0 * self.c[i] + 6.0 * self.d[i] * dx)
    }

    /// Segment containing `t`; the last knot belongs to the last segment.
    fn search_index(&self, t: f64) -> SimResult<usize> {
        let nx = self.x.len();
        let (min, max) = (self.x[0], self.x[nx - 1]);
        if !(t >= min && t <= max) {
            return Err(SimError::OutOfRange { s: t, min, max });
        }
        let i = self.x.partition_point(|&xi| xi <= t).saturating_sub(1);
        Ok(i.min(nx - 2))
    }

    fn calc_a(h: &[f64], bc: BoundaryCondition) -> na::DMatrix<f64> {
        let nx = h.len() + 1;
        let mut a = na::DMatrix::zeros(nx, nx);
        for i in 1..nx - 1 {
            a[(i, i - 1)] = h[i - 1];
            a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            a[(i, i + 1)] = h[i];
        }

        match bc {
            BoundaryCondition::NotAKnot if nx == 3 => {
                // A single parabola through the three knots.
                a[(0, 0)] = 1.0;
                a[(0, 1)] = -1.0;
                a[(2, 1)] = 1.0;
                a[(2, 2)] = -1.0;
            }
            BoundaryCondition::NotAKnot if nx > 3 => {
                let n = nx - 1;
                a[(0, 0)] = -h[1];
                a[(0, 1)] = h[0] + h[1];
                a[(0, 2)] = -h[0];
                a[(n, n - 2)] = -h[n - 1];
                a[(n, n - 1)] = h[n - 2] + h[n - 1];
                a[(n, n)] = -h[n - 2];
            }
            // Two knots always give a straight segment.
            _ => {
                a[(0, 0)] = 1.0;
                a[(nx - 1, nx - 1)] = 1.0;
            }
        }
        a
    }

    fn calc_b(h: &[f64], a: &[f64]) -> na::DVector<f64> {
        let nx = h.len() + 1;
        let mut b = na::DVector::zeros(nx);
        for i in 0..nx - 2 {
            b[i + 1] = 3.0 * (a[i + 2] - a[i + 1]) / h[i + 1] - 3.0 * (a[i + 1] - a[i]) / h[i];
        }
        b
    }
}

/// Planar cubic spline parametrised by cumulative chordal arc length
#[derive(Debug, Clone)]
pub struct Spline2D {
    pub s: Vec<f64>,
    sx: Spline,
    sy: Spline,
}

impl Spline2D {
    pub fn new(x: &[f64], y: &[f64], bc: BoundaryCondition) -> SimResult<Spline2D> {
        Spline2D::validate_waypoints(x, y)?;
        let s = Spline2D::calc_s(x, y);
        let sx = Spline::new(&s, x, bc)?;
        let sy = Spline::new(&s, y, bc)?;

        Ok(Spline2D { s, sx, sy })
    }

    fn validate_waypoints(x: &[f64], y: &[f64]) -> SimResult<()> {
        if x.len() != y.len() {
            return Err(SimError::InvalidPath(format!(
                "x and y must have the same length ({} != {})",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(SimError::InvalidPath(format!(
                "need at least 2 waypoints, got {}",
                x.len()
            )));
        }
        if let Some(i) = x.iter().zip(y).position(|(px, py)| !px.is_finite() || !py.is_finite()) {
            return Err(SimError::InvalidPath(format!("waypoint {} is not finite", i)));
        }
        let coincident = x
            .iter()
            .zip(y)
            .tuple_windows()
            .position(|((x0, y0), (x1, y1))| (x1 - x0).hypot(y1 - y0) <= 0.0);
        if let Some(i) = coincident {
            return Err(SimError::InvalidPath(format!(
                "waypoints {} and {} coincide",
                i,
                i + 1
            )));
        }
        Ok(())
    }

    fn calc_s(x: &[f64], y: &[f64]) -> Vec<f64> {
        let mut s: Vec<f64> = Vec::with_capacity(x.len());
        s.push(0.0);
        let steps = x
            .iter()
            .zip(y)
            .tuple_windows()
            .map(|((x0, y0), (x1, y1))| (x1 - x0).hypot(y1 - y0));
        s.extend(steps.scan(0.0, |acc, ds| {
            *acc += ds;
            Some(*acc)
        }));
        s
    }

    /// Arc length of the last knot
    pub fn total_length(&self) -> f64 {
        self.s[self.s.len() - 1]
    }

    pub fn calc_position(&self, is: f64) -> SimResult<(f64, f64)> {
        Ok((self.sx.calc(is)?, self.sy.calc(is)?))
    }

    pub fn calc_curvature(&self, is: f64) -> SimResult<f64> {
        let dx = self.sx.calcd(is)?;
        let ddx = self.sx.calcdd(is)?;
        let dy = self.sy.calcd(is)?;
        let ddy = self.sy.calcdd(is)?;
        Ok((ddy * dx - ddx * dy) / (dx.powi(2) + dy.powi(2)).powf(1.5))
    }

    pub fn calc_yaw(&self, is: f64) -> SimResult<f64> {
        let dx = self.sx.calcd(is)?;
        let dy = self.sy.calcd(is)?;
        Ok(dy.atan2(dx))
    }
}

/// Densely sampled reference path; all vectors are index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePath {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub yaw: Vec<f64>,
    pub curvature: Vec<f64>,
    /// Arc length of each sample along the fitted spline
    pub s: Vec<f64>,
}

impl ReferencePath {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn position(&self, index: usize) -> Point2D {
        Point2D::new(self.x[index], self.y[index])
    }

    pub fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }
}

/// Upper bound on the number of samples of one reference path
pub const MAX_SAMPLES: usize = 10_000_000;

/// Fit a spline through the waypoints and resample it every `ds` metres of arc
/// length, starting at 0 and stopping before the end of the spline.
pub fn calc_spline_course(
    x: &[f64],
    y: &[f64],
    ds: f64,
    bc: BoundaryCondition,
) -> SimResult<ReferencePath> {
    if !(ds > 0.0 && ds.is_finite()) {
        return Err(SimError::InvalidPath(format!(
            "sampling interval must be positive, got {}",
            ds
        )));
    }

    let sp = Spline2D::new(x, y, bc)?;
    let s_end = sp.total_length();
    let count = (s_end / ds).ceil();
    if !(count <= MAX_SAMPLES as f64) {
        return Err(SimError::InvalidPath(format!(
            "sampling interval {} gives more than {} samples over {:.3} m",
            ds, MAX_SAMPLES, s_end
        )));
    }
    let n = count as usize;

    let mut path = ReferencePath {
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
        yaw: Vec::with_capacity(n),
        curvature: Vec::with_capacity(n),
        s: Vec::with_capacity(n),
    };
    for is in (0..n).map(|k| k as f64 * ds).take_while(|&is| is < s_end) {
        let (ix, iy) = sp.calc_position(is)?;
        path.x.push(ix);
        path.y.push(iy);
        path.yaw.push(sp.calc_yaw(is)?);
        path.curvature.push(sp.calc_curvature(is)?);
        path.s.push(is);
    }
    if path.len() < 2 {
        return Err(SimError::InvalidPath(format!(
            "path of {:.3} m is shorter than one sampling interval {}",
            s_end, ds
        )));
    }

    debug!(
        "Cubic spline path generated with {} points over {:.2} m",
        path.len(),
        s_end
    );
    Ok(path)
}
