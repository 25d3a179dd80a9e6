//! Runs a Poincaré map over a fan of flux surfaces and prints the
//! statistics.
//!
//! ```text
//! cargo run --example poincare -- ./data.nc
//! ```

use std::f64::consts::PI;
use std::path::PathBuf;

use gyromap_equilibrium::{
    NcBfieldBuilder, NcCurrentBuilder, NcPerturbation, NcQfactorBuilder, Qfactor,
};
use gyromap_particle::{MappingConfig, MappingParameters, PoincareSection};
use gyromap_poincare::{Poincare, PoincareInit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = PathBuf::from(
        std::env::args()
            .nth(1)
            .ok_or("usage: poincare <dataset.nc>")?,
    );

    let qfactor = NcQfactorBuilder::new(&path, "cubic").build()?;
    let current = NcCurrentBuilder::new(&path, "cubic").build()?;
    let bfield = NcBfieldBuilder::new(&path, "bicubic").build()?;
    let perturbation = NcPerturbation::from_harmonics(&[]);

    let points = 40;
    let wall = qfactor.psip_wall();
    let psips: Vec<f64> = (0..points)
        .map(|i| wall * (0.05 + 0.85 * (i as f64) / (points as f64)))
        .collect();
    let init = PoincareInit::build(
        &vec![0.0; points],
        &psips,
        &vec![0.01; points],
        &vec![0.0; points],
        &vec![0.0; points],
    )?;

    let params = MappingParameters::new(PoincareSection::ConstTheta, PI, 200)?;
    let mut poincare = Poincare::new(init, params);
    poincare.run(
        &qfactor,
        &current,
        &bfield,
        &perturbation,
        &MappingConfig::default(),
    )?;

    println!("{poincare:#?}");
    Ok(())
}
