use std::io::Write;

use crate::{datatypes::ParticleSet, error::PeridotError};

/// Writes simulation results to a CSV file
///
/// One row per particle: reference position, displacement, and damage
/// fraction. The deformed position is `x + ux, y + uy`.
///
/// # Arguments
/// * `particles` - A reference to the post-solve particle set
/// * `node_damage` - Per-node damage fraction, one entry per particle
/// * `output` - The filename of the output csv
pub fn csv_output(
    particles: &ParticleSet,
    node_damage: &[f64],
    output: &str,
) -> Result<(), PeridotError> {
    let mut output_file = match std::fs::File::create(output) {
        Ok(f) => f,
        Err(err) => {
            return Err(PeridotError::Solver(format!(
                "Failed to create {}: {}",
                output, err
            )));
        }
    };

    let mut contents = String::from("x,y,ux,uy,damage\n");
    for node in 0..particles.n_nodes() {
        contents.push_str(&format!(
            "{x},{y},{ux},{uy},{damage}\n",
            x = particles.x[node].x,
            y = particles.x[node].y,
            ux = particles.u[node].x,
            uy = particles.u[node].y,
            damage = node_damage[node],
        ));
    }

    if let Err(err) = output_file.write_all(contents.as_bytes()) {
        return Err(PeridotError::Solver(format!(
            "Failed to write {}: {}",
            output, err
        )));
    }

    println!("info: wrote output to {}", output);

    Ok(())
}
