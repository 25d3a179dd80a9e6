//! Helper struct for caching harmonic terms to avoid recalculations.

use gyromap_interp::Accelerator;

use crate::Result;
use crate::harmonics::NcHarmonic;

/// Holds a harmonic's terms evaluated at a specific point.
///
/// The dynamics calls all of a harmonic's methods consecutively over the
/// same coordinates, so the interpolated amplitude and the trigonometric
/// factor do not need to be recalculated every time.
///
/// Like the `Accelerator`, it is an independent object owned by the
/// querying worker; it only holds values calculated by the harmonic's
/// methods and never affects the harmonic itself. Each worker needs one
/// cache per harmonic.
#[derive(Clone)]
pub struct HarmonicCache {
    hits: usize,
    misses: usize,

    psip: f64,
    theta: f64,
    zeta: f64,

    pub(crate) alpha: f64,
    pub(crate) da_dpsip: f64,
    pub(crate) sin: f64,
    pub(crate) cos: f64,
}

impl HarmonicCache {
    /// Creates a new [`HarmonicCache`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the cache's fields are valid for the query point.
    ///
    /// Comparing floats is OK here since they are simply copied between
    /// every call, and we **want** the check to fail with the slightest
    /// difference.
    pub(crate) fn is_updated(&mut self, psip: f64, theta: f64, zeta: f64) -> bool {
        if (self.psip == psip) && (self.theta == theta) && (self.zeta == zeta) {
            self.hits += 1;
            true
        } else {
            self.misses += 1;
            false
        }
    }

    /// Updates the cache's fields from the harmonic's own definitions.
    pub(crate) fn update(
        &mut self,
        harmonic: &NcHarmonic,
        psip: f64,
        theta: f64,
        zeta: f64,
        acc: &mut Accelerator,
    ) -> Result<()> {
        use crate::Harmonic;

        self.psip = psip;
        self.theta = theta;
        self.zeta = zeta;
        self.alpha = harmonic.a(psip, acc)?;
        self.da_dpsip = harmonic.da_dpsip(psip, acc)?;
        let angle = harmonic.mod_arg(theta, zeta);
        // On some platforms this is faster than calculating them separately.
        (self.sin, self.cos) = angle.sin_cos();
        Ok(())
    }

    /// Returns the cache's hit count.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the cache's miss count.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl std::fmt::Debug for HarmonicCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicCache")
            .field("hits  ", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

/// Just in case an initial condition of exactly `ψp = 0, θ = 0, ζ = 0`
/// actually makes sense, the stored point starts out unmatchable.
impl Default for HarmonicCache {
    fn default() -> Self {
        Self {
            hits: 0,
            misses: 0,
            psip: f64::NAN,
            theta: f64::NAN,
            zeta: f64::NAN,
            alpha: f64::NAN,
            da_dpsip: f64::NAN,
            sin: f64::NAN,
            cos: f64::NAN,
        }
    }
}
