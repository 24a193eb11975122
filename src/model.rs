use indicatif::ProgressBar;
use nalgebra::Vector2;

use crate::{
    datatypes::{BondSet, ParticleSet, SimulationMetadata},
    error::PeridotError,
    integrator::Integrator,
    material::MaterialLaw,
    penetrator::Penetrator,
    solver,
};

/// The simulation model: particles, bonds, and the collaborators that act
/// on them each step
pub struct Model {
    pub particles: ParticleSet,
    pub bonds: BondSet,
    pub metadata: SimulationMetadata,
    pub material_law: Box<dyn MaterialLaw>,
    pub integrator: Box<dyn Integrator>,
    pub penetrators: Vec<Penetrator>,
}

impl Model {
    pub fn new(
        particles: ParticleSet,
        bonds: BondSet,
        metadata: SimulationMetadata,
        material_law: Box<dyn MaterialLaw>,
        integrator: Box<dyn Integrator>,
        penetrators: Vec<Penetrator>,
    ) -> Model {
        Model {
            particles,
            bonds,
            metadata,
            material_law,
            integrator,
            penetrators,
        }
    }

    /// Advances the simulation by a single time step
    ///
    /// Solver -> integrator -> contact, in that order. Solver errors are
    /// re-raised with the step index attached.
    fn single_time_step(&mut self, i_time_step: usize) -> Result<(), PeridotError> {
        let node_force = solver::calculate_nodal_forces(
            &self.particles.x,
            &self.particles.u,
            self.bonds.cell_volume,
            &self.bonds.bondlist,
            &mut self.bonds.d,
            self.bonds.c,
            &mut self.bonds.bond_force,
            self.material_law.as_ref(),
        )
        .map_err(|err| {
            PeridotError::Solver(format!("Aborted at time step {}: {}", i_time_step, err))
        })?;

        self.integrator
            .step(&mut self.particles, &node_force, self.metadata.density);

        for penetrator in &self.penetrators {
            penetrator.calculate_penetrator_force(
                &mut self.particles,
                self.metadata.density,
                self.metadata.dt,
                i_time_step,
            );
        }

        Ok(())
    }

    /// Runs the full simulation
    pub fn run_simulation(&mut self) -> Result<(), PeridotError> {
        println!(
            "info: running {} time steps over {} bonds...",
            self.metadata.n_time_steps,
            self.bonds.n_bonds()
        );

        let bar = ProgressBar::new(self.metadata.n_time_steps as u64);
        for i_time_step in 0..self.metadata.n_time_steps {
            bar.inc(1);
            self.single_time_step(i_time_step)?;
        }
        bar.finish_with_message("info: simulation complete\n".to_string());

        Ok(())
    }

    /// Aggregates bond damage into a per-node damage fraction
    pub fn calculate_particle_damage(&self) -> Vec<f64> {
        solver::calculate_node_damage(
            &self.bonds.bondlist,
            &self.bonds.d,
            &self.particles.n_family_members,
        )
    }

    /// Deformed position of every particle
    pub fn deformed_positions(&self) -> Vec<Vector2<f64>> {
        self.particles
            .x
            .iter()
            .zip(&self.particles.u)
            .map(|(x, u)| x + u)
            .collect()
    }
}
