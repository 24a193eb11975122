use nalgebra::Vector2;

use crate::datatypes::ParticleSet;

/// A rigid circular indenter driven at constant velocity
///
/// Contact is enforced kinematically: any particle whose deformed position
/// falls inside the disc is projected back to the surface and loses its
/// velocity component along the contact normal. The displaced material
/// pushes back; the accumulated correction, scaled to a force, is recorded
/// as the reaction on the indenter.
#[derive(Debug)]
pub struct Penetrator {
    centre: Vector2<f64>,
    radius: f64,
    velocity: Vector2<f64>,
}

impl Penetrator {
    pub fn new(centre: Vector2<f64>, radius: f64, velocity: Vector2<f64>) -> Penetrator {
        Penetrator {
            centre,
            radius,
            velocity,
        }
    }

    /// Position of the indenter centre at the given time
    fn centre_at(&self, time: f64) -> Vector2<f64> {
        self.centre + self.velocity * time
    }

    /// Resolves contact for one time step
    ///
    /// # Arguments
    /// * `particles` - The particle set; displacements and velocities of
    ///   contacted particles are corrected in place
    /// * `density` - Material density, used to scale the reaction
    /// * `dt` - Time step size
    /// * `i_time_step` - The current step index
    ///
    /// # Returns
    /// The net reaction force on the indenter
    pub fn calculate_penetrator_force(
        &self,
        particles: &mut ParticleSet,
        density: f64,
        dt: f64,
        i_time_step: usize,
    ) -> Vector2<f64> {
        let centre = self.centre_at(i_time_step as f64 * dt);
        let mut reaction = Vector2::zeros();

        for node in 0..particles.n_nodes() {
            let position = particles.x[node] + particles.u[node];
            let offset = position - centre;
            let distance = offset.norm();

            if distance >= self.radius || distance == 0.0 {
                continue;
            }

            let normal = offset / distance;
            let surface = centre + normal * self.radius;
            let correction = surface - position;

            particles.u[node] += correction;

            // Remove the velocity component driving into the indenter
            let v_normal = particles.v[node].dot(&normal);
            if v_normal < 0.0 {
                particles.v[node] -= normal * v_normal;
            }

            reaction -= correction * density / (dt * dt);
        }

        reaction
    }
}
