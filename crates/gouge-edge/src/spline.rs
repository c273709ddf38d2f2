//! Natural cubic spline interpolation over a strictly increasing knot vector.

/// A 1D natural cubic spline (zero second derivative at both ends).
#[derive(Debug, Clone)]
pub(crate) struct NaturalSpline {
    ts: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
}

impl NaturalSpline {
    /// Fit a spline through `(ts[i], ys[i])`.
    ///
    /// `ts` must be strictly increasing with at least two knots; the caller
    /// (the edge-curve builder) guarantees this.
    pub fn fit(ts: &[f64], ys: &[f64]) -> Self {
        debug_assert_eq!(ts.len(), ys.len());
        debug_assert!(ts.len() >= 2);
        let n = ts.len();
        let mut m = vec![0.0; n];
        if n > 2 {
            // Tridiagonal system for interior second derivatives (Thomas
            // algorithm); natural boundary: m[0] = m[n-1] = 0.
            let k = n - 2;
            let mut diag = vec![0.0; k];
            let mut upper = vec![0.0; k];
            let mut rhs = vec![0.0; k];
            for i in 0..k {
                let h0 = ts[i + 1] - ts[i];
                let h1 = ts[i + 2] - ts[i + 1];
                diag[i] = 2.0 * (h0 + h1);
                upper[i] = h1;
                rhs[i] = 6.0 * ((ys[i + 2] - ys[i + 1]) / h1 - (ys[i + 1] - ys[i]) / h0);
            }
            for i in 1..k {
                let lower = ts[i + 1] - ts[i];
                let w = lower / diag[i - 1];
                diag[i] -= w * upper[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }
            m[k] = rhs[k - 1] / diag[k - 1];
            for i in (0..k - 1).rev() {
                m[i + 1] = (rhs[i] - upper[i] * m[i + 2]) / diag[i];
            }
        }
        Self {
            ts: ts.to_vec(),
            ys: ys.to_vec(),
            m,
        }
    }

    /// Index of the segment containing `t` (clamped to the knot range).
    fn segment(&self, t: f64) -> usize {
        let n = self.ts.len();
        let idx = self.ts.partition_point(|&k| k < t);
        idx.clamp(1, n - 1) - 1
    }

    /// Evaluate the spline at `t` (clamped to the knot range).
    pub fn eval(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let t = t.clamp(self.ts[0], *self.ts.last().unwrap());
        let h = self.ts[i + 1] - self.ts[i];
        let a = (self.ts[i + 1] - t) / h;
        let b = (t - self.ts[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0
    }

    /// First derivative at `t` (clamped to the knot range).
    pub fn deriv(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let t = t.clamp(self.ts[0], *self.ts.last().unwrap());
        let h = self.ts[i + 1] - self.ts[i];
        let a = (self.ts[i + 1] - t) / h;
        let b = (t - self.ts[i]) / h;
        (self.ys[i + 1] - self.ys[i]) / h
            + h / 6.0 * ((3.0 * b * b - 1.0) * self.m[i + 1] - (3.0 * a * a - 1.0) * self.m[i])
    }
}
