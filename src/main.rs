use clap::Parser;

use peridot::error::PeridotError;
use peridot::integrator::EulerCromer;
use peridot::model::Model;
use peridot::{geometry, post_processor};

/// 2D bond-based peridynamic solver
#[derive(Parser)]
#[command(name = "peridot", version)]
struct Cli {
    /// Path to the input json
    input: String,

    /// Output csv for particle displacements and damage
    #[arg(short, long, default_value = "particles.csv")]
    output: String,
}

fn run(cli: &Cli) -> Result<(), PeridotError> {
    let (particles, bonds, metadata, material_law, penetrator) = geometry::run(&cli.input)?;

    let integrator = EulerCromer {
        dt: metadata.dt,
        damping: metadata.damping,
    };

    let mut model = Model::new(
        particles,
        bonds,
        metadata,
        material_law,
        Box::new(integrator),
        penetrator.into_iter().collect(),
    );

    model.run_simulation()?;

    let node_damage = model.calculate_particle_damage();
    post_processor::csv_output(&model.particles, &node_damage, &cli.output)?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        println!("error: {}", err);
        std::process::exit(1);
    }
}
