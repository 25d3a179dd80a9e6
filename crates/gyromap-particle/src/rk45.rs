//! Embedded Dormand–Prince 5(4) stepper with dense output.
//!
//! The classic 7-stage FSAL pair with PI step-size control and the
//! 5th-order continuous extension. Each accepted step hands back its dense
//! interpolant so the event engine can evaluate the trajectory anywhere
//! inside the step without re-integration.

use crate::Result;
use crate::config::StepperConfig;
use crate::error::IntegrationError;

const N: usize = 4;

// Nodes.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// Stage coefficients.
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights.
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Embedded error weights (5th minus 4th order).
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// Continuous-extension weights.
const D1: f64 = -12715105075.0 / 11282082432.0;
const D3: f64 = 87487479700.0 / 32700410799.0;
const D4: f64 = -10690763975.0 / 1880347072.0;
const D5: f64 = 701980252875.0 / 199316789632.0;
const D6: f64 = -1453857185.0 / 822651844.0;
const D7: f64 = 69997945.0 / 29380423.0;

// PI controller (Hairer's dopri5 settings).
const SAFETY: f64 = 0.9;
const BETA: f64 = 0.04;
const EXPO1: f64 = 0.2 - BETA * 0.75;
const FAC_MIN_INV: f64 = 5.0; // largest step shrink per attempt
const FAC_MAX_INV: f64 = 0.1; // largest step growth per attempt

/// The dense interpolant of one accepted step, valid on `[t0, t0 + h]`.
#[derive(Clone, Debug)]
pub(crate) struct DenseOutput {
    pub(crate) t0: f64,
    pub(crate) h: f64,
    rcont: [[f64; N]; 5],
}

impl DenseOutput {
    /// Evaluates the interpolant at `t` inside the step.
    pub(crate) fn eval(&self, t: f64) -> [f64; N] {
        let s = (t - self.t0) / self.h;
        let s1 = 1.0 - s;
        let mut out = [0.0; N];
        for k in 0..N {
            out[k] = self.rcont[0][k]
                + s * (self.rcont[1][k]
                    + s1 * (self.rcont[2][k]
                        + s * (self.rcont[3][k] + s1 * self.rcont[4][k])));
        }
        out
    }

    /// The end time of the step.
    pub(crate) fn t_end(&self) -> f64 {
        self.t0 + self.h
    }
}

// ===============================================================================================

/// The stepper's live state: current point, FSAL derivative and the PI
/// controller memory. One per particle; allocation-free while stepping.
pub(crate) struct Stepper {
    /// Current time.
    pub(crate) t: f64,
    /// Current state.
    pub(crate) y: [f64; N],
    /// Derivative at `(t, y)` (FSAL).
    f: [f64; N],
    /// Next step size to attempt.
    h: f64,
    /// PI controller memory.
    facold: f64,
    rtol: f64,
    atol: f64,
    max_step: f64,
}

impl Stepper {
    /// Prepares a stepper at `(t0, y0)`, estimating the first step unless
    /// the configuration pins it.
    pub(crate) fn start<F>(
        t0: f64,
        y0: [f64; N],
        config: &impl StepperConfig,
        rhs: &mut F,
    ) -> Result<Self>
    where
        F: FnMut(f64, &[f64; N]) -> Result<[f64; N]>,
    {
        let f0 = checked(rhs(t0, &y0), t0)?;
        let h = match config.first_step() {
            Some(h) => h,
            None => initial_step(t0, &y0, &f0, config.rtol(), config.atol(), rhs)?,
        }
        .min(config.max_step());

        Ok(Self {
            t: t0,
            y: y0,
            f: f0,
            h,
            facold: 1e-4,
            rtol: config.rtol(),
            atol: config.atol(),
            max_step: config.max_step(),
        })
    }

    /// The step size the next attempt will use.
    pub(crate) fn next_step_size(&self) -> f64 {
        self.h
    }

    /// Caps the next attempt, used to land exactly on the end of the
    /// integration span.
    pub(crate) fn limit_step(&mut self, h: f64) {
        self.h = self.h.min(h);
    }

    /// Advances by one accepted step, retrying with smaller steps until the
    /// embedded error estimate passes, and returns the step's dense
    /// interpolant.
    pub(crate) fn step<F>(&mut self, rhs: &mut F) -> Result<DenseOutput>
    where
        F: FnMut(f64, &[f64; N]) -> Result<[f64; N]>,
    {
        loop {
            if 0.1 * self.h.abs() <= self.t.abs() * f64::EPSILON {
                return Err(IntegrationError::StepSizeUnderflow { t: self.t }.into());
            }
            let h = self.h;
            let t = self.t;
            let y = &self.y;
            let k1 = self.f;

            let y2 = combine(y, h, &[(A21, &k1)]);
            let k2 = checked(rhs(t + C2 * h, &y2), t)?;
            let y3 = combine(y, h, &[(A31, &k1), (A32, &k2)]);
            let k3 = checked(rhs(t + C3 * h, &y3), t)?;
            let y4 = combine(y, h, &[(A41, &k1), (A42, &k2), (A43, &k3)]);
            let k4 = checked(rhs(t + C4 * h, &y4), t)?;
            let y5 = combine(y, h, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]);
            let k5 = checked(rhs(t + C5 * h, &y5), t)?;
            let y6 = combine(
                y,
                h,
                &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
            );
            let k6 = checked(rhs(t + h, &y6), t)?;
            let y_new = combine(y, h, &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)]);
            let k7 = checked(rhs(t + h, &y_new), t)?;

            // Scaled RMS error norm of the embedded difference.
            let mut err = 0.0;
            for k in 0..N {
                let e = h
                    * (E1 * k1[k]
                        + E3 * k3[k]
                        + E4 * k4[k]
                        + E5 * k5[k]
                        + E6 * k6[k]
                        + E7 * k7[k]);
                let scale = self.atol + self.rtol * self.y[k].abs().max(y_new[k].abs());
                err += (e / scale) * (e / scale);
            }
            err = (err / N as f64).sqrt();
            if !err.is_finite() {
                return Err(IntegrationError::NonFiniteDerivative { t }.into());
            }

            let fac11 = err.powf(EXPO1);
            if err <= 1.0 {
                // Accepted: build the continuous extension, advance, and
                // let the PI controller pick the next size.
                let mut rcont = [[0.0; N]; 5];
                for k in 0..N {
                    let dy = y_new[k] - self.y[k];
                    rcont[0][k] = self.y[k];
                    rcont[1][k] = dy;
                    rcont[2][k] = h * k1[k] - dy;
                    rcont[3][k] = dy - h * k7[k] - rcont[2][k];
                    rcont[4][k] = h
                        * (D1 * k1[k]
                            + D3 * k3[k]
                            + D4 * k4[k]
                            + D5 * k5[k]
                            + D6 * k6[k]
                            + D7 * k7[k]);
                }
                let dense = DenseOutput { t0: t, h, rcont };

                self.facold = err.max(1e-4);
                let fac = (fac11 / self.facold.powf(BETA) / SAFETY)
                    .clamp(FAC_MAX_INV, FAC_MIN_INV);
                self.t = t + h;
                self.y = y_new;
                self.f = k7;
                self.h = (h / fac).min(self.max_step);
                return Ok(dense);
            }
            // Rejected: shrink and retry.
            self.h = h / (fac11 / SAFETY).min(FAC_MIN_INV);
        }
    }
}

/// `y + h·Σ cᵢ·kᵢ`.
fn combine(y: &[f64; N], h: f64, terms: &[(f64, &[f64; N])]) -> [f64; N] {
    let mut out = *y;
    for (coeff, k) in terms {
        for idx in 0..N {
            out[idx] += h * coeff * k[idx];
        }
    }
    out
}

/// Surfaces non-finite derivatives as the dedicated integration error.
fn checked(result: Result<[f64; N]>, t: f64) -> Result<[f64; N]> {
    let f = result?;
    if f.iter().all(|v| v.is_finite()) {
        Ok(f)
    } else {
        Err(IntegrationError::NonFiniteDerivative { t }.into())
    }
}

/// Automatic starting-step estimate (Hairer, Nørsett & Wanner, II.4).
fn initial_step<F>(
    t0: f64,
    y0: &[f64; N],
    f0: &[f64; N],
    rtol: f64,
    atol: f64,
    rhs: &mut F,
) -> Result<f64>
where
    F: FnMut(f64, &[f64; N]) -> Result<[f64; N]>,
{
    let scale = |k: usize| atol + rtol * y0[k].abs();
    let rms = |v: &[f64; N], per_scale: bool| -> f64 {
        let mut total = 0.0;
        for k in 0..N {
            let term = if per_scale { v[k] / scale(k) } else { v[k] };
            total += term * term;
        }
        (total / N as f64).sqrt()
    };

    let d0 = rms(y0, true);
    let d1 = rms(f0, true);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let y1 = combine(y0, h0, &[(1.0, f0)]);
    let f1 = checked(rhs(t0 + h0, &y1), t0)?;
    let mut diff = [0.0; N];
    for k in 0..N {
        diff[k] = (f1[k] - f0[k]) / scale(k);
    }
    let d2 = rms(&diff, false) / h0;

    let dmax = d1.max(d2);
    let h1 = if dmax <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / dmax).powf(0.2)
    };
    Ok((100.0 * h0).min(h1))
}
