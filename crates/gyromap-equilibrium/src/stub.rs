//! Deterministic stub datasets for the test suites.
//!
//! Two generators are provided. [`write_stub_netcdf`] produces a small
//! synthetic dataset with linear profiles, pseudo-random grids and sentinel
//! values planted in the perturbation tables, for exercising the loaders.
//! [`write_lar_netcdf`] produces a smooth large-aspect-ratio equilibrium
//! (`B = 1 − √(2ψ)·cosθ`, flat currents, ψ consistent with q) suitable for
//! conservation and mapping tests.
//!
//! Both are bit-reproducible: the "random" entries come from a fixed-seed
//! linear congruential generator.

use std::f64::consts::{PI, TAU};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::{LoadError, Result};

/// Fixed-seed linear congruential generator (Knuth's MMIX parameters).
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    (0..num)
        .map(|i| start + (end - start) * (i as f64) / ((num - 1) as f64))
        .collect()
}

fn create(path: &Path) -> Result<netcdf::FileMut> {
    netcdf::create(path).map_err(|source| {
        LoadError::NetCdf {
            source,
            reason: format!("could not create dataset at {path:?}"),
        }
        .into()
    })
}

fn nc_error(source: netcdf::Error) -> crate::EqError {
    LoadError::NetCdf {
        source,
        reason: "could not write stub variable".into(),
    }
    .into()
}

/// Writes a scalar, 1D float, 1D int or multi-dimensional float variable.
struct Writer<'f> {
    file: &'f mut netcdf::FileMut,
}

impl Writer<'_> {
    fn scalar(&mut self, name: &str, value: f64) -> Result<()> {
        let mut var = self
            .file
            .add_variable::<f64>(name, &[])
            .map_err(nc_error)?;
        var.put_value(value, ..).map_err(nc_error)?;
        Ok(())
    }

    fn floats(&mut self, name: &str, dims: &[&str], values: &[f64]) -> Result<()> {
        let mut var = self
            .file
            .add_variable::<f64>(name, dims)
            .map_err(nc_error)?;
        var.put_values(values, ..).map_err(nc_error)?;
        Ok(())
    }

    fn ints(&mut self, name: &str, dims: &[&str], values: &[i64]) -> Result<()> {
        let mut var = self
            .file
            .add_variable::<i64>(name, dims)
            .map_err(nc_error)?;
        var.put_values(values, ..).map_err(nc_error)?;
        Ok(())
    }
}

// ===============================================================================================

/// Writes the loader-exercise stub dataset to `path`.
///
/// Layout: `ψp = linspace(0, 3, 100)`, `ψ = linspace(0, 1, 100)`,
/// `q = linspace(1, 2, 100)`, `g = linspace(2, 0, 100)`,
/// `I = linspace(0, 2, 100)`, `θ = linspace(0, π, 200)`, pseudo-random
/// positive `B`, `R`, `Z` grids, modes `m ∈ [-1, 3]`, `n ∈ [-2, 7]` with
/// pseudo-random `alphas`/`phases` profiles.
///
/// Planted markers:
/// - the `(m, n) = (2, 3)` profiles carry the sentinels
///   `α[0] = 1111`, `α[last] = 11111`, `φ[0] = 9999`, `φ[last] = 99999`;
/// - the `(m, n) = (-1, -2)` profiles carry a NaN (`α[5]`) and an infinity
///   (`φ[7]`), which the loader must replace with 0.
pub fn write_stub_netcdf(path: &Path) -> Result<()> {
    const NPSIP: usize = 100;
    const NTHETA: usize = 200;

    let mut rng = Lcg(0x9e3779b97f4a7c15);
    let psip = linspace(0.0, 3.0, NPSIP);
    let psi = linspace(0.0, 1.0, NPSIP);
    let q = linspace(1.0, 2.0, NPSIP);
    let g = linspace(2.0, 0.0, NPSIP);
    let i_current = linspace(0.0, 2.0, NPSIP);
    let theta = linspace(0.0, PI, NTHETA);

    let mut random_grid = |offset: f64| -> Vec<f64> {
        (0..NPSIP * NTHETA).map(|_| offset + rng.next_f64()).collect()
    };
    // Kept away from zero so interpolation overshoot cannot make B change
    // sign.
    let b = random_grid(1.0);
    let rlab = random_grid(1.0);
    let zlab = random_grid(1.0);

    let m: Vec<i64> = (-1..4).collect();
    let n: Vec<i64> = (-2..8).collect();
    let mut alphas: Vec<f64> = (0..m.len() * n.len() * NPSIP)
        .map(|_| rng.next_f64())
        .collect();
    let mut phases: Vec<f64> = (0..m.len() * n.len() * NPSIP)
        .map(|_| rng.next_f64())
        .collect();

    let profile = |mi: usize, ni: usize| (mi * n.len() + ni) * NPSIP;
    // Sentinels on the (m, n) = (2, 3) mode, i.e. table positions (3, 5).
    let sentinel = profile(3, 5);
    alphas[sentinel] = 1111.0;
    alphas[sentinel + NPSIP - 1] = 11111.0;
    phases[sentinel] = 9999.0;
    phases[sentinel + NPSIP - 1] = 99999.0;
    // Non-finite entries on the (m, n) = (-1, -2) mode, positions (0, 0).
    alphas[profile(0, 0) + 5] = f64::NAN;
    phases[profile(0, 0) + 7] = f64::INFINITY;

    let mut file = create(path)?;
    file.add_dimension("psip", NPSIP).map_err(nc_error)?;
    file.add_dimension("theta", NTHETA).map_err(nc_error)?;
    file.add_dimension("m", m.len()).map_err(nc_error)?;
    file.add_dimension("n", n.len()).map_err(nc_error)?;

    let mut writer = Writer { file: &mut file };
    writer.scalar("baxis", 1.5)?;
    writer.scalar("raxis", 2.0)?;
    writer.floats("psip", &["psip"], &psip)?;
    writer.floats("psi", &["psip"], &psi)?;
    writer.floats("q", &["psip"], &q)?;
    writer.floats("g", &["psip"], &g)?;
    writer.floats("i", &["psip"], &i_current)?;
    writer.floats("theta", &["theta"], &theta)?;
    writer.floats("b", &["psip", "theta"], &b)?;
    writer.floats("R", &["psip", "theta"], &rlab)?;
    writer.floats("Z", &["psip", "theta"], &zlab)?;
    writer.ints("m", &["m"], &m)?;
    writer.ints("n", &["n"], &n)?;
    writer.floats("alphas", &["m", "n", "psip"], &alphas)?;
    writer.floats("phases", &["m", "n", "psip"], &phases)?;

    Ok(())
}

/// Writes a smooth large-aspect-ratio equilibrium to `path`.
///
/// `q = 1 + 2ψp` with the consistent `ψ = ψp + ψp²`, flat currents
/// (`g = 1`, `I = 0`), and `B = 1 − √(2ψ)·cosθ` on a θ grid covering one
/// full period. A single weak `(2, 1)` mode with a bell-shaped amplitude
/// profile is tabulated (all other mode slots are zero).
pub fn write_lar_netcdf(path: &Path) -> Result<()> {
    const NPSIP: usize = 100;
    const NTHETA: usize = 200;

    let psip = linspace(0.0, 0.3, NPSIP);
    let psi: Vec<f64> = psip.iter().map(|p| p + p * p).collect();
    let q: Vec<f64> = psip.iter().map(|p| 1.0 + 2.0 * p).collect();
    let g = vec![1.0; NPSIP];
    let i_current = vec![0.0; NPSIP];
    // One full period, excluding the 2π endpoint.
    let theta: Vec<f64> = (0..NTHETA)
        .map(|j| TAU * (j as f64) / (NTHETA as f64))
        .collect();

    let radius = |psi: f64| (2.0 * psi).sqrt();
    let mut b = Vec::with_capacity(NPSIP * NTHETA);
    let mut rlab = Vec::with_capacity(NPSIP * NTHETA);
    let mut zlab = Vec::with_capacity(NPSIP * NTHETA);
    for p in &psi {
        for t in &theta {
            let r = radius(*p);
            b.push(1.0 - r * t.cos());
            rlab.push(2.0 + r * t.cos());
            zlab.push(r * t.sin());
        }
    }

    let m: Vec<i64> = vec![1, 2];
    let n: Vec<i64> = vec![1, 2];
    let mut alphas = vec![0.0; m.len() * n.len() * NPSIP];
    let phases = vec![0.0; m.len() * n.len() * NPSIP];
    // Bell-shaped α(ψp) on the (2, 1) mode: table positions (1, 0).
    let center = 0.15;
    let width = 0.05;
    let start = n.len() * NPSIP;
    for (k, p) in psip.iter().enumerate() {
        let x = (p - center) / width;
        alphas[start + k] = 1e-4 * (-x * x).exp();
    }

    let mut file = create(path)?;
    file.add_dimension("psip", NPSIP).map_err(nc_error)?;
    file.add_dimension("theta", NTHETA).map_err(nc_error)?;
    file.add_dimension("m", m.len()).map_err(nc_error)?;
    file.add_dimension("n", n.len()).map_err(nc_error)?;

    let mut writer = Writer { file: &mut file };
    writer.scalar("baxis", 1.0)?;
    writer.scalar("raxis", 2.0)?;
    writer.floats("psip", &["psip"], &psip)?;
    writer.floats("psi", &["psip"], &psi)?;
    writer.floats("q", &["psip"], &q)?;
    writer.floats("g", &["psip"], &g)?;
    writer.floats("i", &["psip"], &i_current)?;
    writer.floats("theta", &["theta"], &theta)?;
    writer.floats("b", &["psip", "theta"], &b)?;
    writer.floats("R", &["psip", "theta"], &rlab)?;
    writer.floats("Z", &["psip", "theta"], &zlab)?;
    writer.ints("m", &["m"], &m)?;
    writer.ints("n", &["n"], &n)?;
    writer.floats("alphas", &["m", "n", "psip"], &alphas)?;
    writer.floats("phases", &["m", "n", "psip"], &phases)?;

    Ok(())
}

// ===============================================================================================

/// Returns the path of this process's loader-exercise stub dataset,
/// creating it on first use.
pub fn stub_path() -> PathBuf {
    static STUB: OnceLock<PathBuf> = OnceLock::new();
    STUB.get_or_init(|| {
        let path = std::env::temp_dir().join(format!("gyromap-stub-{}.nc", std::process::id()));
        write_stub_netcdf(&path).expect("could not create the stub dataset");
        path
    })
    .clone()
}

/// Returns the path of this process's large-aspect-ratio dataset, creating
/// it on first use.
pub fn lar_path() -> PathBuf {
    static LAR: OnceLock<PathBuf> = OnceLock::new();
    LAR.get_or_init(|| {
        let path = std::env::temp_dir().join(format!("gyromap-lar-{}.nc", std::process::id()));
        write_lar_netcdf(&path).expect("could not create the LAR dataset");
        path
    })
    .clone()
}
