use std::f64::consts::TAU;

use crate::spline::validate_axis;
use crate::{Accelerator, Interp2dKind, InterpError, Result};

/// Tensor-product bicubic interpolant over an `(x, y)` grid.
///
/// The x axis behaves like the 1D splines: finite queries are clamped to the
/// knot range. The y axis is **periodic with period 2π**: queries are
/// reduced into the grid's period, the derivative stencils wrap around, and
/// a wrap cell closes the gap between the last and the first knot.
///
/// Node derivatives are estimated with centred finite differences
/// (one-sided at the x edges); cross partials with centred differences of
/// the single partials. All cell coefficients are precomputed at
/// construction, so evaluation is read-only.
pub struct Spline2d {
    /// The x knots, strictly increasing.
    pub xa: Vec<f64>,
    /// The y knots, strictly increasing, spanning less than one period.
    pub ya: Vec<f64>,
    /// The values, flattened in row-major order: `za[i * ny + j]`.
    pub za: Vec<f64>,
    /// The interpolation kind the coefficients were built with.
    kind: Interp2dKind,
    /// 16 polynomial coefficients per cell, indexed `i * ny + j`; the cells
    /// `j == ny - 1` wrap around to the first y knot.
    cells: Vec<[f64; 16]>,
}

/// Creates a [`Spline2d`] of the given kind over the grid.
///
/// `za` is the row-major flattening of the value grid: the value at
/// `(xa[i], ya[j])` sits at `za[i * ya.len() + j]`.
pub fn make_spline2d(typ: &str, xa: &[f64], ya: &[f64], za: &[f64]) -> Result<Spline2d> {
    Spline2d::new(typ.parse()?, xa, ya, za)
}

/// Creation
impl Spline2d {
    /// Creates a [`Spline2d`] of `kind` over the grid.
    pub fn new(kind: Interp2dKind, xa: &[f64], ya: &[f64], za: &[f64]) -> Result<Self> {
        validate_axis(xa, kind.min_size(), kind.name())?;
        validate_axis(ya, kind.min_size(), kind.name())?;
        let (nx, ny) = (xa.len(), ya.len());
        if za.len() != nx * ny {
            return Err(InterpError::GridShapeMismatch {
                xlen: nx,
                ylen: ny,
                zlen: za.len(),
            });
        }
        if !za.iter().all(|z| z.is_finite()) {
            return Err(InterpError::NonFiniteValues);
        }
        if ya[ny - 1] - ya[0] >= TAU {
            return Err(InterpError::PeriodicSpanTooLarge);
        }

        let cells = build_cells(xa, ya, za);

        Ok(Self {
            xa: xa.to_vec(),
            ya: ya.to_vec(),
            za: za.to_vec(),
            kind,
            cells,
        })
    }
}

/// Evaluation
impl Spline2d {
    /// Evaluates the interpolant at `(x, y)`.
    pub fn eval(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        let cell = self.locate(x, y, xacc, yacc)?;
        Ok(cell.sum(0, 0))
    }

    /// Evaluates `𝜕/𝜕x` at `(x, y)`.
    pub fn eval_deriv_x(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        let cell = self.locate(x, y, xacc, yacc)?;
        Ok(cell.sum(1, 0) / cell.dx)
    }

    /// Evaluates `𝜕/𝜕y` at `(x, y)`.
    pub fn eval_deriv_y(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        let cell = self.locate(x, y, xacc, yacc)?;
        Ok(cell.sum(0, 1) / cell.dy)
    }

    /// Evaluates `𝜕²/𝜕x²` at `(x, y)`.
    pub fn eval_deriv_xx(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        let cell = self.locate(x, y, xacc, yacc)?;
        Ok(cell.sum(2, 0) / (cell.dx * cell.dx))
    }

    /// Evaluates `𝜕²/𝜕y²` at `(x, y)`.
    pub fn eval_deriv_yy(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        let cell = self.locate(x, y, xacc, yacc)?;
        Ok(cell.sum(0, 2) / (cell.dy * cell.dy))
    }

    /// Evaluates `𝜕²/𝜕x𝜕y` at `(x, y)`.
    pub fn eval_deriv_xy(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<f64> {
        let cell = self.locate(x, y, xacc, yacc)?;
        Ok(cell.sum(1, 1) / (cell.dx * cell.dy))
    }

    /// Clamps/reduces the query and resolves its cell.
    fn locate(&self, x: f64, y: f64, xacc: &mut Accelerator, yacc: &mut Accelerator) -> Result<CellQuery<'_>> {
        if !x.is_finite() {
            return Err(InterpError::QueryOutOfRange { x });
        }
        if !y.is_finite() {
            return Err(InterpError::QueryOutOfRange { x: y });
        }
        let (nx, ny) = self.shape();

        let x = x.clamp(self.xa[0], self.xa[nx - 1]);
        let i = xacc.find(&self.xa, x);
        let dx = self.xa[i + 1] - self.xa[i];

        // Reduce y into [ya[0], ya[0] + 2π); the tail of that window past
        // the last knot belongs to the wrap cell.
        let yr = self.ya[0] + (y - self.ya[0]).rem_euclid(TAU);
        let (j, dy) = if yr >= self.ya[ny - 1] {
            (ny - 1, TAU - (self.ya[ny - 1] - self.ya[0]))
        } else {
            let j = yacc.find(&self.ya, yr);
            (j, self.ya[j + 1] - self.ya[j])
        };

        Ok(CellQuery {
            coeffs: &self.cells[i * ny + j],
            t: (x - self.xa[i]) / dx,
            u: (yr - self.ya[j]) / dy,
            dx,
            dy,
        })
    }
}

/// Getters
impl Spline2d {
    /// Returns the interpolation kind.
    pub fn kind(&self) -> Interp2dKind {
        self.kind
    }

    /// Returns the grid shape `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.xa.len(), self.ya.len())
    }
}

impl std::fmt::Debug for Spline2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spline2d")
            .field("kind", &self.kind.name())
            .field("shape", &self.shape())
            .finish()
    }
}

// ===============================================================================================

/// A resolved query: the cell's coefficients and the scaled offsets.
struct CellQuery<'c> {
    coeffs: &'c [f64; 16],
    t: f64,
    u: f64,
    dx: f64,
    dy: f64,
}

impl CellQuery<'_> {
    /// Sums `Σ a[p][q] · 𝜕ᵖ(tᵖ) · 𝜕ᵠ(uᵠ)` for the requested derivative
    /// orders, by Horner in u then in t.
    fn sum(&self, order_t: usize, order_u: usize) -> f64 {
        let mut total = 0.0;
        for p in (order_t..4).rev() {
            let mut row = 0.0;
            for q in (order_u..4).rev() {
                row = row * self.u + factor(q, order_u) * self.coeffs[4 * p + q];
            }
            total = total * self.t + factor(p, order_t) * row;
        }
        total
    }
}

/// The power-rule factor left in front of `t^(p - order)`.
fn factor(p: usize, order: usize) -> f64 {
    match order {
        0 => 1.0,
        1 => p as f64,
        _ => (p * (p - 1)) as f64,
    }
}

// ===============================================================================================

/// Builds the 16 bicubic coefficients of every cell.
fn build_cells(xa: &[f64], ya: &[f64], za: &[f64]) -> Vec<[f64; 16]> {
    let (nx, ny) = (xa.len(), ya.len());
    let at = |i: usize, j: usize| za[i * ny + j];
    let wrap_dy = TAU - (ya[ny - 1] - ya[0]);

    // y spacing to the previous/next knot, wrap-aware.
    let dy_minus = |j: usize| if j == 0 { wrap_dy } else { ya[j] - ya[j - 1] };
    let dy_plus = |j: usize| if j == ny - 1 { wrap_dy } else { ya[j + 1] - ya[j] };
    let jm = |j: usize| (j + ny - 1) % ny;
    let jp = |j: usize| (j + 1) % ny;

    // Node derivative estimates.
    let mut zx = vec![0.0; nx * ny];
    let mut zy = vec![0.0; nx * ny];
    let mut zxy = vec![0.0; nx * ny];

    for j in 0..ny {
        for i in 0..nx {
            zx[i * ny + j] = match i {
                0 => (at(1, j) - at(0, j)) / (xa[1] - xa[0]),
                _ if i == nx - 1 => (at(i, j) - at(i - 1, j)) / (xa[i] - xa[i - 1]),
                _ => (at(i + 1, j) - at(i - 1, j)) / (xa[i + 1] - xa[i - 1]),
            };
            zy[i * ny + j] = (at(i, jp(j)) - at(i, jm(j))) / (dy_plus(j) + dy_minus(j));
        }
    }
    for j in 0..ny {
        for i in 0..nx {
            zxy[i * ny + j] =
                (zx[i * ny + jp(j)] - zx[i * ny + jm(j)]) / (dy_plus(j) + dy_minus(j));
        }
    }

    // Hermite basis matrix.
    const M: [[f64; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-3.0, 3.0, -2.0, -1.0],
        [2.0, -2.0, 1.0, 1.0],
    ];

    let mut cells = vec![[0.0; 16]; (nx - 1) * ny];
    for i in 0..nx - 1 {
        let dx = xa[i + 1] - xa[i];
        for j in 0..ny {
            let dy = dy_plus(j);
            let (j0, j1) = (j, jp(j));

            // Corner data, derivatives scaled to the unit cell. Rows cycle
            // through (f, f, fx, fx) at (x0, x1), columns through
            // (y0, y1, fy·dy at y0, y1).
            let corner = |ii: usize, jj: usize| -> [f64; 4] {
                let idx = ii * ny + jj;
                [za[idx], zx[idx] * dx, zy[idx] * dy, zxy[idx] * dx * dy]
            };
            let c00 = corner(i, j0);
            let c10 = corner(i + 1, j0);
            let c01 = corner(i, j1);
            let c11 = corner(i + 1, j1);
            let f = [
                [c00[0], c01[0], c00[2], c01[2]],
                [c10[0], c11[0], c10[2], c11[2]],
                [c00[1], c01[1], c00[3], c01[3]],
                [c10[1], c11[1], c10[3], c11[3]],
            ];

            // a = M · f · Mᵀ
            let mut mf = [[0.0; 4]; 4];
            for r in 0..4 {
                for c in 0..4 {
                    mf[r][c] = (0..4).map(|k| M[r][k] * f[k][c]).sum();
                }
            }
            let cell = &mut cells[i * ny + j];
            for r in 0..4 {
                for c in 0..4 {
                    cell[4 * r + c] = (0..4).map(|k| mf[r][k] * M[c][k]).sum();
                }
            }
        }
    }
    cells
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn grid() -> (Vec<f64>, Vec<f64>) {
        let xa: Vec<f64> = (0..9).map(|i| 0.25 * f64::from(i)).collect();
        let ya: Vec<f64> = (0..16).map(|j| TAU * f64::from(j) / 16.0).collect();
        (xa, ya)
    }

    fn tabulate(xa: &[f64], ya: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let mut za = Vec::with_capacity(xa.len() * ya.len());
        for x in xa {
            for y in ya {
                za.push(f(*x, *y));
            }
        }
        za
    }

    #[test]
    fn test_knot_exactness() {
        let (xa, ya) = grid();
        let za = tabulate(&xa, &ya, |x, y| (x + 0.3) * y.cos());
        let spline = Spline2d::new(Interp2dKind::Bicubic, &xa, &ya, &za).unwrap();
        let mut xacc = Accelerator::new();
        let mut yacc = Accelerator::new();

        for (i, x) in xa.iter().enumerate() {
            for (j, y) in ya.iter().enumerate() {
                assert_relative_eq!(
                    spline.eval(*x, *y, &mut xacc, &mut yacc).unwrap(),
                    za[i * ya.len() + j],
                    epsilon = 1e-12
                );
            }
        }
    }

    /// Functions linear in each variable are reproduced exactly: all
    /// finite-difference derivative estimates are exact for them.
    #[test]
    fn test_exact_on_bilinear() {
        let (xa, ya) = grid();
        let f = |x: f64, y: f64| 1.0 + 2.0 * x + 0.5 * y + 0.25 * x * y;
        let za = tabulate(&xa, &ya, f);
        let spline = Spline2d::new(Interp2dKind::Bicubic, &xa, &ya, &za).unwrap();
        let mut xacc = Accelerator::new();
        let mut yacc = Accelerator::new();

        // Stay away from the seam cells: their wrap-around stencils assume
        // a periodic field, which a bilinear test function is not.
        for i in 0..20 {
            let x = 2.0 * f64::from(i) / 20.0 + 0.01;
            let y = 0.5 + 4.5 * f64::from(i) / 20.0;
            assert_relative_eq!(
                spline.eval(x, y, &mut xacc, &mut yacc).unwrap(),
                f(x, y),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                spline.eval_deriv_x(x, y, &mut xacc, &mut yacc).unwrap(),
                2.0 + 0.25 * y,
                epsilon = 1e-10
            );
            assert_relative_eq!(
                spline.eval_deriv_xy(x, y, &mut xacc, &mut yacc).unwrap(),
                0.25,
                epsilon = 1e-10
            );
        }
    }

    /// Periodicity: y = 0 and y = 2π are the same point, for the value and
    /// every derivative.
    #[test]
    fn test_periodic_seam() {
        let (xa, ya) = grid();
        let za = tabulate(&xa, &ya, |x, y| (1.0 + x) * y.cos() + 0.2 * (2.0 * y).sin());
        let spline = Spline2d::new(Interp2dKind::Bicubic, &xa, &ya, &za).unwrap();
        let mut xacc = Accelerator::new();
        let mut yacc = Accelerator::new();

        for i in 0..8 {
            let x = 2.0 * f64::from(i) / 8.0;
            let at0 = spline.eval(x, 0.0, &mut xacc, &mut yacc).unwrap();
            let at_tau = spline.eval(x, TAU, &mut xacc, &mut yacc).unwrap();
            assert_eq!(at0, at_tau);

            let d0 = spline.eval_deriv_y(x, 0.0, &mut xacc, &mut yacc).unwrap();
            let d_tau = spline.eval_deriv_y(x, TAU, &mut xacc, &mut yacc).unwrap();
            assert_eq!(d0, d_tau);

            // Negative angles reduce into the same period.
            let minus = spline.eval(x, -TAU, &mut xacc, &mut yacc).unwrap();
            assert_eq!(at0, minus);
        }
    }

    /// The interpolant approximates a smooth periodic field through the
    /// wrap cell as well.
    #[test]
    fn test_accuracy_through_wrap_cell() {
        let (xa, ya) = grid();
        let f = |x: f64, y: f64| (1.0 + 0.5 * x) * y.cos();
        let za = tabulate(&xa, &ya, f);
        let spline = Spline2d::new(Interp2dKind::Bicubic, &xa, &ya, &za).unwrap();
        let mut xacc = Accelerator::new();
        let mut yacc = Accelerator::new();

        let last = *ya.last().unwrap();
        for i in 0..=20 {
            let y = last + (TAU - last) * f64::from(i) / 20.0;
            let value = spline.eval(1.0, y, &mut xacc, &mut yacc).unwrap();
            assert_abs_diff_eq!(value, f(1.0, y), epsilon = 1e-2);
        }
    }

    #[test]
    fn test_x_clamping() {
        let (xa, ya) = grid();
        let za = tabulate(&xa, &ya, |x, y| x + y.sin());
        let spline = Spline2d::new(Interp2dKind::Bicubic, &xa, &ya, &za).unwrap();
        let mut xacc = Accelerator::new();
        let mut yacc = Accelerator::new();

        let inside = spline.eval(2.0, 1.0, &mut xacc, &mut yacc).unwrap();
        let outside = spline.eval(50.0, 1.0, &mut xacc, &mut yacc).unwrap();
        assert_eq!(inside, outside);
    }

    #[test]
    fn test_shape_mismatch() {
        let (xa, ya) = grid();
        assert!(matches!(
            Spline2d::new(Interp2dKind::Bicubic, &xa, &ya, &[0.0; 10]),
            Err(InterpError::GridShapeMismatch { .. })
        ));
    }
}
