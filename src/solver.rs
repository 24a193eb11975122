use nalgebra::Vector2;
use rayon::prelude::*;

use crate::{error::PeridotError, material::MaterialLaw};

/// Calculates net nodal forces from the bond list
///
/// Runs in two phases. The compute phase is parallel over bonds: each bond
/// reads only node geometry and its own damage slot, and writes only its own
/// damage and force-scratch slots, so bonds can be partitioned arbitrarily
/// across workers. The reduction phase then scatters bond forces into the
/// shared per-node array and runs sequentially, because two bonds sharing a
/// node would otherwise race on its accumulator.
///
/// Each bond contributes equal and opposite force to its two endpoints, so
/// the sum of `node_force` over all nodes is zero up to floating-point
/// rounding.
///
/// Preconditions (validated once at construction, not per step): every bond
/// joins two distinct in-range nodes, and no bond has zero reference or
/// deformed length.
///
/// # Arguments
/// * `x` - Material point coordinates in the reference configuration
/// * `u` - Nodal displacement
/// * `cell_volume` - Cell volume used to scale bond force
/// * `bondlist` - Array of pairwise interactions (bond list)
/// * `d` - Bond damage in [0, 1]; read at step start, written once per bond
/// * `c` - Bond stiffness
/// * `bond_force` - Per-bond force scratch, one slot per bond
/// * `material_law` - Constitutive law updating bond damage from stretch
///
/// # Returns
/// The net force on every node, freshly allocated each call
pub fn calculate_nodal_forces(
    x: &[Vector2<f64>],
    u: &[Vector2<f64>],
    cell_volume: f64,
    bondlist: &[[usize; 2]],
    d: &mut [f64],
    c: f64,
    bond_force: &mut [Vector2<f64>],
    material_law: &dyn MaterialLaw,
) -> Result<Vec<Vector2<f64>>, PeridotError> {
    let n_nodes = x.len();

    // Compute phase: stretch, damage, and bond force, one slot per bond
    bond_force
        .par_iter_mut()
        .zip(d.par_iter_mut())
        .enumerate()
        .try_for_each(|(k_bond, (force, damage))| -> Result<(), PeridotError> {
            let [node_i, node_j] = bondlist[k_bond];

            let xi = x[node_j] - x[node_i];
            let xi_eta = xi + (u[node_j] - u[node_i]);

            let xi_norm = xi.norm();
            let y = xi_eta.norm();

            debug_assert!(xi_norm > 0.0, "bond {} has zero reference length", k_bond);
            debug_assert!(y > 0.0, "bond {} has zero deformed length", k_bond);

            let stretch = (y - xi_norm) / xi_norm;

            let d_new = material_law.evaluate(stretch, *damage);
            if !d_new.is_finite() || !(0.0..=1.0).contains(&d_new) {
                return Err(PeridotError::MaterialLaw(format!(
                    "Material law returned damage {} for bond {} (stretch {}); expected a \
                     finite value in [0, 1]",
                    d_new, k_bond, stretch
                )));
            }
            *damage = d_new;

            let f = stretch * c * (1.0 - d_new) * cell_volume;
            *force = xi_eta * (f / y);

            Ok(())
        })?;

    // Reduction phase: scatter bond forces into node forces. Sequential on
    // purpose; bonds sharing a node write to the same accumulator.
    let mut node_force: Vec<Vector2<f64>> = vec![Vector2::zeros(); n_nodes];

    for (k_bond, bond) in bondlist.iter().enumerate() {
        let [node_i, node_j] = *bond;

        node_force[node_i] += bond_force[k_bond];
        node_force[node_j] -= bond_force[k_bond];
    }

    Ok(node_force)
}

/// Calculates the nodal damage
///
/// Every bond's damage is accumulated into both of its endpoint nodes, then
/// each node's sum is divided by its family size, giving a per-node fraction
/// in [0, 1]: 0 means every incident bond is still elastic, 1 means every
/// incident bond has failed.
///
/// A node with zero family members is an isolated material point; it has no
/// bonds to break and its damage is 0 by convention.
///
/// # Arguments
/// * `bondlist` - Array of pairwise interactions (bond list)
/// * `d` - Bond damage in [0, 1]
/// * `n_family_members` - Per-node bond counts
///
/// # Returns
/// The damage fraction for every node
pub fn calculate_node_damage(
    bondlist: &[[usize; 2]],
    d: &[f64],
    n_family_members: &[usize],
) -> Vec<f64> {
    let mut node_damage = vec![0.0; n_family_members.len()];

    for (k_bond, bond) in bondlist.iter().enumerate() {
        let [node_i, node_j] = *bond;

        node_damage[node_i] += d[k_bond];
        node_damage[node_j] += d[k_bond];
    }

    for (damage, n_family) in node_damage.iter_mut().zip(n_family_members) {
        if *n_family > 0 {
            *damage /= *n_family as f64;
        }
    }

    node_damage
}
