use nalgebra::Vector2;

use crate::datatypes::ParticleSet;

/// An explicit time-integration scheme
///
/// Consumes the net nodal forces produced by the solver and advances
/// particle velocities and displacements by one step. Nodes with a
/// prescribed boundary velocity follow it exactly and ignore their net
/// force.
pub trait Integrator {
    fn step(&self, particles: &mut ParticleSet, node_force: &[Vector2<f64>], density: f64);
}

/// Semi-implicit Euler: velocity is updated from acceleration first, then
/// displacement from the new velocity
#[derive(Debug)]
pub struct EulerCromer {
    pub dt: f64,
    /// Artificial damping factor in [0, 1) applied to velocity each step;
    /// 0 disables damping
    pub damping: f64,
}

impl Integrator for EulerCromer {
    fn step(&self, particles: &mut ParticleSet, node_force: &[Vector2<f64>], density: f64) {
        for node in 0..particles.n_nodes() {
            match particles.bc_velocity[node] {
                Some(bc) => {
                    particles.v[node] = bc;
                }
                None => {
                    let acceleration = node_force[node] / density;
                    particles.v[node] =
                        (particles.v[node] + acceleration * self.dt) * (1.0 - self.damping);
                }
            }

            particles.u[node] += particles.v[node] * self.dt;
        }
    }
}
