//! Integration tests for the peridot solver core.

use nalgebra::Vector2;

use peridot::material::{Bilinear, Brittle, MaterialLaw};
use peridot::solver::{calculate_nodal_forces, calculate_node_damage};

/// Material law that never changes damage
struct Identity;

impl MaterialLaw for Identity {
    fn evaluate(&self, _stretch: f64, damage: f64) -> f64 {
        damage
    }
}

/// Builds a regular nx-by-ny particle grid with unit-ish spacing and bonds
/// between all pairs within the horizon
fn grid(
    nx: usize,
    ny: usize,
    dx: f64,
    horizon: f64,
) -> (Vec<Vector2<f64>>, Vec<[usize; 2]>, Vec<usize>) {
    let mut x = Vec::new();
    for row in 0..ny {
        for col in 0..nx {
            x.push(Vector2::new(col as f64 * dx, row as f64 * dx));
        }
    }

    let mut bondlist = Vec::new();
    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            if (x[j] - x[i]).norm() <= horizon {
                bondlist.push([i, j]);
            }
        }
    }

    let mut n_family_members = vec![0usize; x.len()];
    for bond in &bondlist {
        n_family_members[bond[0]] += 1;
        n_family_members[bond[1]] += 1;
    }

    (x, bondlist, n_family_members)
}

/// A smooth, non-uniform displacement field for exercising the kernel
fn bent_displacements(x: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
    x.iter()
        .map(|xi| Vector2::new(0.01 * xi.x * xi.x, -0.005 * xi.x * xi.y))
        .collect()
}

// ─── Bond Force Kernel Tests ──────────────────────────────────

#[test]
fn forces_sum_to_zero_over_the_whole_grid() {
    let (x, bondlist, _) = grid(10, 6, 0.5, 1.6);
    let u = bent_displacements(&x);
    let mut d = vec![0.0; bondlist.len()];
    let mut bond_force = vec![Vector2::zeros(); bondlist.len()];

    let node_force =
        calculate_nodal_forces(&x, &u, 0.25, &bondlist, &mut d, 1000.0, &mut bond_force, &Identity)
            .unwrap();

    let total: Vector2<f64> = node_force.iter().sum();
    let scale: f64 = node_force.iter().map(|f| f.norm()).sum();
    assert!(
        total.norm() <= 1e-10 * scale.max(1.0),
        "net force {:?} does not cancel",
        total
    );
}

#[test]
fn rigid_translation_produces_no_force() {
    let (x, bondlist, _) = grid(6, 6, 1.0, 2.2);
    let u = vec![Vector2::new(3.7, -1.2); x.len()];
    // A damaged state must not change the answer: stretch is still zero
    let mut d: Vec<f64> = (0..bondlist.len()).map(|k| (k % 10) as f64 / 10.0).collect();
    let d_before = d.clone();
    let mut bond_force = vec![Vector2::zeros(); bondlist.len()];

    let node_force =
        calculate_nodal_forces(&x, &u, 1.0, &bondlist, &mut d, 500.0, &mut bond_force, &Identity)
            .unwrap();

    for (node, force) in node_force.iter().enumerate() {
        assert_eq!(*force, Vector2::zeros(), "node {} felt a spurious force", node);
    }
    assert_eq!(d, d_before);
}

#[test]
fn force_magnitude_is_non_increasing_in_damage() {
    let x = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)];
    let u = vec![Vector2::zeros(), Vector2::new(0.08, 0.0)];
    let bondlist = vec![[0, 1]];

    let mut last_magnitude = f64::INFINITY;
    for i in 0..=10 {
        let damage = i as f64 / 10.0;
        let mut d = vec![damage];
        let mut bond_force = vec![Vector2::zeros(); 1];

        let node_force = calculate_nodal_forces(
            &x,
            &u,
            1.0,
            &bondlist,
            &mut d,
            100.0,
            &mut bond_force,
            &Identity,
        )
        .unwrap();

        let magnitude = node_force[0].norm();
        assert!(
            magnitude <= last_magnitude,
            "force grew when damage rose to {}",
            damage
        );
        last_magnitude = magnitude;
    }

    // Fully broken bond carries exactly nothing
    assert_eq!(last_magnitude, 0.0);
}

#[test]
fn results_are_identical_across_worker_counts() {
    let (x, bondlist, _) = grid(8, 8, 0.25, 0.8);
    let u = bent_displacements(&x);
    let law = Bilinear {
        linear_stretch: 0.001,
        critical_stretch: 0.01,
    };

    let mut runs = Vec::new();
    for n_threads in [1, 4] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .unwrap();

        let mut d = vec![0.0; bondlist.len()];
        let mut bond_force = vec![Vector2::zeros(); bondlist.len()];
        let node_force = pool
            .install(|| {
                calculate_nodal_forces(&x, &u, 1.0, &bondlist, &mut d, 2000.0, &mut bond_force, &law)
            })
            .unwrap();

        runs.push((node_force, d));
    }

    // Bitwise equality: partitioning must not change the result
    assert_eq!(runs[0].0, runs[1].0);
    assert_eq!(runs[0].1, runs[1].1);
}

#[test]
fn repeated_invocations_do_not_accumulate_stale_forces() {
    let (x, bondlist, _) = grid(4, 4, 1.0, 1.5);
    let u = bent_displacements(&x);
    let mut d = vec![0.0; bondlist.len()];
    let mut bond_force = vec![Vector2::zeros(); bondlist.len()];

    let first =
        calculate_nodal_forces(&x, &u, 1.0, &bondlist, &mut d, 100.0, &mut bond_force, &Identity)
            .unwrap();
    let second =
        calculate_nodal_forces(&x, &u, 1.0, &bondlist, &mut d, 100.0, &mut bond_force, &Identity)
            .unwrap();

    assert_eq!(first, second);
}

#[test]
fn brittle_law_breaks_overstretched_bonds_during_the_step() {
    let x = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)];
    let u = vec![Vector2::zeros(), Vector2::new(0.2, 0.0)];
    let bondlist = vec![[0, 1]];
    let mut d = vec![0.0];
    let mut bond_force = vec![Vector2::zeros(); 1];

    let node_force = calculate_nodal_forces(
        &x,
        &u,
        1.0,
        &bondlist,
        &mut d,
        100.0,
        &mut bond_force,
        &Brittle {
            critical_stretch: 0.1,
        },
    )
    .unwrap();

    // The bond fails this step, so the softened force is already zero
    assert_eq!(d, vec![1.0]);
    assert_eq!(node_force[0], Vector2::zeros());
    assert_eq!(node_force[1], Vector2::zeros());
}

// ─── Node Damage Aggregator Tests ─────────────────────────────

#[test]
fn node_damage_stays_in_unit_interval() {
    let (_, bondlist, n_family_members) = grid(7, 5, 1.0, 1.8);
    let d: Vec<f64> = (0..bondlist.len())
        .map(|k| ((k * 37) % 100) as f64 / 100.0)
        .collect();

    let node_damage = calculate_node_damage(&bondlist, &d, &n_family_members);

    for (node, damage) in node_damage.iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(damage),
            "node {} damage {} escaped [0, 1]",
            node,
            damage
        );
    }
}

#[test]
fn uniform_bond_damage_aggregates_to_itself() {
    let (_, bondlist, n_family_members) = grid(5, 5, 1.0, 1.5);
    let d = vec![0.42; bondlist.len()];

    let node_damage = calculate_node_damage(&bondlist, &d, &n_family_members);

    for damage in &node_damage {
        assert!((damage - 0.42).abs() < 1e-12);
    }
}
