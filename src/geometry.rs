use indicatif::ProgressBar;
use json::JsonValue;
use nalgebra::Vector2;

use crate::{
    datatypes::{BondSet, ParticleSet, SimulationMetadata},
    error::PeridotError,
    material::{Bilinear, Brittle, MaterialLaw},
    penetrator::Penetrator,
};

/// Parses the input json into a JsonValue object
///
/// # Arguments
/// * `input_file` - The path to the input file
///
/// # Returns
/// A JsonValue object
fn load_input_file(input_file: &str) -> Result<JsonValue, PeridotError> {
    let file_string = match std::fs::read_to_string(input_file) {
        Ok(f) => f,
        Err(_err) => {
            return Err(PeridotError::Input(format!(
                "Unable to open input file {}",
                input_file
            )))
        }
    };

    let input_file_json = match json::parse(&file_string) {
        Ok(f) => f,
        Err(err) => {
            return Err(PeridotError::Input(format!(
                "Error in input file json: {err}"
            )))
        }
    };

    for section in ["geometry", "material", "simulation"] {
        if !input_file_json.has_key(section) {
            return Err(PeridotError::Input(format!(
                "Input json missing {} section",
                section
            )));
        }
    }

    Ok(input_file_json)
}

/// Reads a required float field from a json section
fn require_f64(input_json: &JsonValue, section: &str, field: &str) -> Result<f64, PeridotError> {
    match input_json[section][field].as_f64() {
        Some(v) => Ok(v),
        None => Err(PeridotError::Input(format!(
            "Input json missing {} field in {} section",
            field, section
        ))),
    }
}

/// Parses simulation metadata from the input json
///
/// # Arguments
/// * `input_json` - The input file as a JsonValue object
///
/// # Returns
/// A SimulationMetadata instance
fn parse_input_metadata(input_json: &JsonValue) -> Result<SimulationMetadata, PeridotError> {
    let youngs_modulus = require_f64(input_json, "material", "youngs_modulus")?;
    let density = require_f64(input_json, "material", "density")?;
    let thickness = require_f64(input_json, "material", "thickness")?;

    let dx = require_f64(input_json, "geometry", "dx")?;
    let horizon_ratio = require_f64(input_json, "geometry", "horizon_ratio")?;

    let dt = require_f64(input_json, "simulation", "dt")?;
    let n_time_steps = match input_json["simulation"]["n_time_steps"].as_usize() {
        Some(n) => n,
        None => {
            return Err(PeridotError::Input(
                "Input json missing n_time_steps field in simulation section".to_owned(),
            ))
        }
    };

    if dx <= 0.0 {
        return Err(PeridotError::Input(format!(
            "Particle spacing dx must be positive, got {}",
            dx
        )));
    }

    Ok(SimulationMetadata {
        youngs_modulus,
        density,
        thickness,
        dx,
        horizon: horizon_ratio * dx,
        n_time_steps,
        dt,
        damping: input_json["simulation"]["damping"].as_f64().unwrap_or(0.0),
    })
}

/// Builds the constitutive law named in the material section
///
/// # Arguments
/// * `input_json` - The input file as a JsonValue object
///
/// # Returns
/// A boxed material law
fn parse_material_law(input_json: &JsonValue) -> Result<Box<dyn MaterialLaw>, PeridotError> {
    let critical_stretch = require_f64(input_json, "material", "critical_stretch")?;

    match input_json["material"]["law"].as_str().unwrap_or("brittle") {
        "brittle" => Ok(Box::new(Brittle { critical_stretch })),
        "bilinear" => {
            let linear_stretch = require_f64(input_json, "material", "linear_stretch")?;
            Ok(Box::new(Bilinear {
                linear_stretch,
                critical_stretch,
            }))
        }
        other => Err(PeridotError::Input(format!(
            "Unknown material law \"{}\"; expected brittle or bilinear",
            other
        ))),
    }
}

/// Generates a rectangular grid of material points
///
/// # Arguments
/// * `length` - Extent of the bar in x
/// * `depth` - Extent of the bar in y
/// * `dx` - Particle spacing
///
/// # Returns
/// Reference coordinates for every particle
fn build_particle_grid(length: f64, depth: f64, dx: f64) -> Vec<Vector2<f64>> {
    let n_x = (length / dx).round() as usize;
    let n_y = (depth / dx).round() as usize;

    let mut x = Vec::with_capacity(n_x * n_y);
    for row in 0..n_y {
        for col in 0..n_x {
            x.push(Vector2::new(col as f64 * dx, row as f64 * dx));
        }
    }

    x
}

/// Builds the bond list by pairing every particle with its neighbors inside
/// the horizon
///
/// Each pair appears once, with i < j.
///
/// # Arguments
/// * `x` - Particle reference coordinates
/// * `horizon` - Neighborhood radius
///
/// # Returns
/// The bond list
fn build_bondlist(x: &[Vector2<f64>], horizon: f64) -> Vec<[usize; 2]> {
    let mut bondlist: Vec<[usize; 2]> = Vec::new();

    let bar = ProgressBar::new(x.len() as u64);
    for node_i in 0..x.len() {
        bar.inc(1);

        for node_j in (node_i + 1)..x.len() {
            let distance = (x[node_j] - x[node_i]).norm();

            if distance > 0.0 && distance <= horizon {
                bondlist.push([node_i, node_j]);
            }
        }
    }
    bar.finish();

    bondlist
}

/// Counts the bonds incident on each node
fn count_family_members(n_nodes: usize, bondlist: &[[usize; 2]]) -> Vec<usize> {
    let mut n_family_members = vec![0usize; n_nodes];

    for bond in bondlist {
        n_family_members[bond[0]] += 1;
        n_family_members[bond[1]] += 1;
    }

    n_family_members
}

/// Applies displacement-driven boundary conditions from the input json
///
/// Particles within `n_bc_columns * dx` of the left edge are pulled in -x,
/// and within the same distance of the right edge in +x, both at the
/// applied velocity. Everything else is free.
fn apply_boundary_conditions(
    input_json: &JsonValue,
    x: &[Vector2<f64>],
    length: f64,
    dx: f64,
) -> Result<Vec<Option<Vector2<f64>>>, PeridotError> {
    if !input_json.has_key("boundary") {
        return Ok(vec![None; x.len()]);
    }

    let applied_velocity = require_f64(input_json, "boundary", "applied_velocity")?;
    let n_bc_columns = input_json["boundary"]["n_bc_columns"].as_usize().unwrap_or(1);

    let margin = n_bc_columns as f64 * dx;
    let bc_velocity = x
        .iter()
        .map(|xi| {
            if xi.x < margin {
                Some(Vector2::new(-applied_velocity, 0.0))
            } else if xi.x > length - dx - margin {
                Some(Vector2::new(applied_velocity, 0.0))
            } else {
                None
            }
        })
        .collect();

    Ok(bc_velocity)
}

/// Parses an optional penetrator definition from the input json
fn parse_penetrator(input_json: &JsonValue) -> Result<Option<Penetrator>, PeridotError> {
    if !input_json.has_key("penetrator") {
        return Ok(None);
    }

    let centre_x = require_f64(input_json, "penetrator", "centre_x")?;
    let centre_y = require_f64(input_json, "penetrator", "centre_y")?;
    let radius = require_f64(input_json, "penetrator", "radius")?;
    let velocity_y = require_f64(input_json, "penetrator", "velocity_y")?;

    Ok(Some(Penetrator::new(
        Vector2::new(centre_x, centre_y),
        radius,
        Vector2::new(0.0, velocity_y),
    )))
}

/// Bond stiffness (micromodulus) for 2D plane-stress bond-based
/// peridynamics: c = 9E / (pi t delta^3)
fn bond_stiffness(youngs_modulus: f64, thickness: f64, horizon: f64) -> f64 {
    9.0 * youngs_modulus / (std::f64::consts::PI * thickness * horizon.powi(3))
}

/// Builds the discretization from an input json file
///
/// Generates the particle grid, the bond list, and the family counts, then
/// validates bond-list integrity once so the solver never has to.
///
/// # Arguments
/// * `input_file` - The path to the input json
///
/// # Returns
/// The particle set, bond set, simulation metadata, material law, and
/// optional penetrator
pub fn run(
    input_file: &str,
) -> Result<
    (
        ParticleSet,
        BondSet,
        SimulationMetadata,
        Box<dyn MaterialLaw>,
        Option<Penetrator>,
    ),
    PeridotError,
> {
    let input_json = load_input_file(input_file)?;
    let metadata = parse_input_metadata(&input_json)?;
    let material_law = parse_material_law(&input_json)?;

    let length = require_f64(&input_json, "geometry", "length")?;
    let depth = require_f64(&input_json, "geometry", "depth")?;

    println!("info: generating particle grid...");
    let x = build_particle_grid(length, depth, metadata.dx);
    if x.is_empty() {
        return Err(PeridotError::Geometry(format!(
            "Geometry {}x{} with dx={} produced no particles",
            length, depth, metadata.dx
        )));
    }

    println!("info: building bond list...");
    let bondlist = build_bondlist(&x, metadata.horizon);
    let n_family_members = count_family_members(x.len(), &bondlist);

    if let Some(node) = n_family_members.iter().position(|&n| n == 0) {
        println!(
            "warning [geometry]: node {} has no family members; check the horizon",
            node
        );
    }

    let n_nodes = x.len();
    let n_bonds = bondlist.len();

    let bc_velocity = apply_boundary_conditions(&input_json, &x, length, metadata.dx)?;
    let penetrator = parse_penetrator(&input_json)?;

    let particles = ParticleSet {
        x,
        u: vec![Vector2::zeros(); n_nodes],
        v: vec![Vector2::zeros(); n_nodes],
        n_family_members,
        bc_velocity,
    };

    let bonds = BondSet {
        bondlist,
        d: vec![0.0; n_bonds],
        c: bond_stiffness(metadata.youngs_modulus, metadata.thickness, metadata.horizon),
        cell_volume: metadata.dx * metadata.dx * metadata.thickness,
        bond_force: vec![Vector2::zeros(); n_bonds],
    };

    bonds.validate(particles.n_nodes(), &particles.n_family_members)?;

    println!(
        "info: successfully built {} particles and {} bonds",
        n_nodes, n_bonds
    );

    Ok((particles, bonds, metadata, material_law, penetrator))
}
