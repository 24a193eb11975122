use nalgebra::Vector2;

use crate::error::PeridotError;

/// A cloud of material points stored as parallel arrays, indexed by node id
#[derive(Debug)]
pub struct ParticleSet {
    /// Reference coordinates
    pub x: Vec<Vector2<f64>>,
    /// Displacement from the reference configuration
    pub u: Vec<Vector2<f64>>,
    /// Velocity
    pub v: Vec<Vector2<f64>>,
    /// Number of bonds incident on each node. Fixed after bond-list
    /// construction; used as the damage-normalization divisor.
    pub n_family_members: Vec<usize>,
    /// Prescribed velocity for displacement-driven boundary nodes. `None`
    /// means the node is free.
    pub bc_velocity: Vec<Option<Vector2<f64>>>,
}

impl ParticleSet {
    pub fn n_nodes(&self) -> usize {
        self.x.len()
    }
}

/// The fixed set of pairwise interactions between nodes
#[derive(Debug)]
pub struct BondSet {
    /// Node index pairs `[i, j]` with `i != j`
    pub bondlist: Vec<[usize; 2]>,
    /// Bond damage in `[0, 1]`. The only state that persists across time
    /// steps; read at step start and written once at step end.
    pub d: Vec<f64>,
    /// Bond stiffness (micromodulus), uniform across bonds
    pub c: f64,
    /// Cell volume used to scale bond force
    pub cell_volume: f64,
    /// Per-bond force scratch, filled by the compute phase each step
    pub bond_force: Vec<Vector2<f64>>,
}

impl BondSet {
    pub fn n_bonds(&self) -> usize {
        self.bondlist.len()
    }

    /// Checks bond-list integrity once, after construction. The solver hot
    /// loop does not re-validate per step.
    ///
    /// # Arguments
    /// * `n_nodes` - The number of nodes the bond list indexes into
    /// * `n_family_members` - Per-node bond counts to cross-check
    pub fn validate(
        &self,
        n_nodes: usize,
        n_family_members: &[usize],
    ) -> Result<(), PeridotError> {
        if self.d.len() != self.bondlist.len() || self.bond_force.len() != self.bondlist.len() {
            return Err(PeridotError::Geometry(format!(
                "Bond arrays are misaligned: {} bonds, {} damage entries, {} force slots",
                self.bondlist.len(),
                self.d.len(),
                self.bond_force.len()
            )));
        }

        let mut counts = vec![0usize; n_nodes];

        for (k, bond) in self.bondlist.iter().enumerate() {
            let [node_i, node_j] = *bond;

            if node_i == node_j {
                return Err(PeridotError::Geometry(format!(
                    "Bond {} is a self-bond on node {}",
                    k, node_i
                )));
            }
            if node_i >= n_nodes || node_j >= n_nodes {
                return Err(PeridotError::Geometry(format!(
                    "Bond {} references node out of range: ({}, {}) with {} nodes",
                    k, node_i, node_j, n_nodes
                )));
            }

            counts[node_i] += 1;
            counts[node_j] += 1;
        }

        for (k, d) in self.d.iter().enumerate() {
            if !d.is_finite() || !(0.0..=1.0).contains(d) {
                return Err(PeridotError::Geometry(format!(
                    "Bond {} has damage {} outside [0, 1]",
                    k, d
                )));
            }
        }

        if counts != n_family_members {
            return Err(PeridotError::Geometry(
                "Family-member counts do not match the bond list".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Model-wide physical and run parameters
#[derive(Debug)]
pub struct SimulationMetadata {
    pub youngs_modulus: f64,
    pub density: f64,
    pub thickness: f64,
    pub dx: f64,
    pub horizon: f64,
    pub n_time_steps: usize,
    pub dt: f64,
    pub damping: f64,
}
