//! The guiding-centre equations of motion in Boozer coordinates.
//!
//! The Hamiltonian is `H = ½ρ²B² + μB + Φ` with the canonical momenta
//! `Pθ = ψ + ρI`, `Pζ = ρg − ψp`. The variational derivation over the
//! non-canonical variables `(θ, ψp, ρ, ζ)` gives the Jacobian
//!
//! ```text
//! D = gq + I + ρ(g·I′ − I·g′)
//! ```
//!
//! and the equations of motion
//!
//! ```text
//! θ̇  = [ g·H_ψp + (1 − ρg′)·ρB² ] / D
//! ψ̇p = [ −g·H_θ + I·H_ζ ] / D
//! ρ̇  = [ (ρg′ − 1)·H_θ − (q + ρI′)·H_ζ ] / D
//! ζ̇  = [ (q + ρI′)·ρB² − I·H_ψp ] / D
//! ```
//!
//! With an axisymmetric field and no perturbation `H_ζ ≡ 0`, so `Pζ` is a
//! constant of the motion and its numerical drift measures the stepper's
//! accuracy.

use gyromap_equilibrium::{Bfield, Current, Perturbation, Qfactor};

use crate::{Result, State, Workspace};

/// All equilibrium and perturbation terms entering the equations of
/// motion, evaluated at one point.
pub(crate) struct Fields {
    pub b: f64,
    pub db_dpsip: f64,
    pub db_dtheta: f64,
    pub q: f64,
    pub psi: f64,
    pub g: f64,
    pub i: f64,
    pub dg_dpsip: f64,
    pub di_dpsip: f64,
    pub phi: f64,
    pub dphi_dpsip: f64,
    pub dphi_dtheta: f64,
    pub dphi_dzeta: f64,
}

/// The dynamical system: read-only collaborators plus the per-particle
/// mutable evaluation workspace.
///
/// The right-hand side is a pure function of `(t, X)`; the only mutation
/// is inside the owned workspace, so independent systems can run on
/// independent threads against the same shared equilibrium.
pub(crate) struct GuidingCentre<'a, Q, C, B, P>
where
    Q: Qfactor,
    C: Current,
    B: Bfield,
    P: Perturbation,
{
    qfactor: &'a Q,
    current: &'a C,
    bfield: &'a B,
    perturbation: &'a P,
    mu: f64,
    ws: Workspace,
}

impl<'a, Q, C, B, P> GuidingCentre<'a, Q, C, B, P>
where
    Q: Qfactor,
    C: Current,
    B: Bfield,
    P: Perturbation,
{
    pub(crate) fn new(
        qfactor: &'a Q,
        current: &'a C,
        bfield: &'a B,
        perturbation: &'a P,
        mu: f64,
    ) -> Self {
        Self {
            qfactor,
            current,
            bfield,
            perturbation,
            mu,
            ws: Workspace::new(perturbation),
        }
    }

    /// Evaluates every field term at `(ψp, θ, ζ)`.
    fn fields(&mut self, psip: f64, theta: f64, zeta: f64) -> Result<Fields> {
        let ws = &mut self.ws;
        Ok(Fields {
            b: self.bfield.b(psip, theta, &mut ws.xacc, &mut ws.yacc)?,
            db_dpsip: self
                .bfield
                .db_dpsip(psip, theta, &mut ws.xacc, &mut ws.yacc)?,
            db_dtheta: self
                .bfield
                .db_dtheta(psip, theta, &mut ws.xacc, &mut ws.yacc)?,
            q: self.qfactor.q(psip, &mut ws.xacc)?,
            psi: self.qfactor.psi(psip, &mut ws.xacc)?,
            g: self.current.g(psip, &mut ws.xacc)?,
            i: self.current.i(psip, &mut ws.xacc)?,
            dg_dpsip: self.current.dg_dpsip(psip, &mut ws.xacc)?,
            di_dpsip: self.current.di_dpsip(psip, &mut ws.xacc)?,
            phi: self
                .perturbation
                .p(psip, theta, zeta, &mut ws.hcaches, &mut ws.xacc)?,
            dphi_dpsip: self
                .perturbation
                .dp_dpsip(psip, theta, zeta, &mut ws.hcaches, &mut ws.xacc)?,
            dphi_dtheta: self
                .perturbation
                .dp_dtheta(psip, theta, zeta, &mut ws.hcaches, &mut ws.xacc)?,
            dphi_dzeta: self
                .perturbation
                .dp_dzeta(psip, theta, zeta, &mut ws.hcaches, &mut ws.xacc)?,
        })
    }

    /// The time derivative of the phase-space coordinates
    /// `X = (θ, ψp, ρ, ζ)`.
    #[allow(unused_variables)]
    pub(crate) fn rhs(&mut self, t: f64, coords: &[f64; 4]) -> Result<[f64; 4]> {
        let [theta, psip, rho, zeta] = *coords;
        let f = self.fields(psip, theta, zeta)?;
        Ok(equations_of_motion(rho, self.mu, &f))
    }

    /// Fills a state's derived quantities and time derivatives.
    pub(crate) fn evaluate_state(&mut self, state: &mut State) -> Result<()> {
        let f = self.fields(state.psip, state.theta, state.zeta)?;
        let dots = equations_of_motion(state.rho, self.mu, &f);

        state.psi = f.psi;
        state.ptheta = f.psi + state.rho * f.i;
        state.pzeta = state.rho * f.g - state.psip;
        state.b = f.b;
        state.phi = f.phi;
        [
            state.theta_dot,
            state.psip_dot,
            state.rho_dot,
            state.zeta_dot,
        ] = dots;
        Ok(())
    }
}

/// The equations of motion proper, given the field terms.
fn equations_of_motion(rho: f64, mu: f64, f: &Fields) -> [f64; 4] {
    // Hamiltonian partials.
    let par = rho * rho * f.b + mu;
    let h_psip = par * f.db_dpsip + f.dphi_dpsip;
    let h_theta = par * f.db_dtheta + f.dphi_dtheta;
    let h_zeta = f.dphi_dzeta;
    let h_rho = rho * f.b * f.b;

    let jacobian =
        f.g * f.q + f.i + rho * (f.g * f.di_dpsip - f.i * f.dg_dpsip);

    let theta_dot = (f.g * h_psip + (1.0 - rho * f.dg_dpsip) * h_rho) / jacobian;
    let psip_dot = (-f.g * h_theta + f.i * h_zeta) / jacobian;
    let rho_dot = ((rho * f.dg_dpsip - 1.0) * h_theta - (f.q + rho * f.di_dpsip) * h_zeta)
        / jacobian;
    let zeta_dot = ((f.q + rho * f.di_dpsip) * h_rho - f.i * h_psip) / jacobian;

    [theta_dot, psip_dot, rho_dot, zeta_dot]
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_fields() -> Fields {
        Fields {
            b: 1.0,
            db_dpsip: 0.0,
            db_dtheta: 0.0,
            q: 2.0,
            psi: 0.1,
            g: 1.0,
            i: 0.0,
            dg_dpsip: 0.0,
            di_dpsip: 0.0,
            phi: 0.0,
            dphi_dpsip: 0.0,
            dphi_dtheta: 0.0,
            dphi_dzeta: 0.0,
        }
    }

    /// In a uniform unperturbed field the motion follows the field lines:
    /// `dζ/dθ = q`, and the fluxes are frozen.
    #[test]
    fn test_field_line_winding() {
        let rho = 0.01;
        let fields = flat_fields();
        let [theta_dot, psip_dot, rho_dot, zeta_dot] = equations_of_motion(rho, 0.0, &fields);

        assert_relative_eq!(zeta_dot / theta_dot, fields.q);
        assert_relative_eq!(theta_dot, rho / fields.q);
        assert_eq!(psip_dot, 0.0);
        assert_eq!(rho_dot, 0.0);
    }

    /// A θ-dependent field drives `ψ̇p`, but axisymmetry keeps `H_ζ = 0`
    /// and with it `Ṗζ = ρ̇g + ρg′ψ̇p − ψ̇p = 0`.
    #[test]
    fn test_pzeta_invariance() {
        let mut fields = flat_fields();
        fields.db_dtheta = 0.3;
        fields.db_dpsip = -0.1;
        let rho = 0.05;
        let mu = 0.02;
        let [_, psip_dot, rho_dot, _] = equations_of_motion(rho, mu, &fields);

        // With flat currents: Ṗζ = ρ̇·g − ψ̇p.
        let pzeta_dot = rho_dot * fields.g - psip_dot;
        assert_relative_eq!(pzeta_dot, 0.0, epsilon = 1e-15);
    }
}
