//! 2D bond-based peridynamic solver.
//!
//! A body is discretized into a cloud of material points joined by pairwise
//! bonds. Each time step, [`solver::calculate_nodal_forces`] computes bond
//! stretch, updates bond damage through a pluggable [`material::MaterialLaw`],
//! and reduces bond forces into net nodal forces; an explicit
//! [`integrator::Integrator`] then advances the particles. Bond damage is
//! aggregated per node by [`solver::calculate_node_damage`] for output.

pub mod datatypes;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod material;
pub mod model;
pub mod penetrator;
pub mod post_processor;
pub mod solver;
