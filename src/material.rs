//! Constitutive damage laws for bonds.
//!
//! The solver knows nothing about any particular model; it only calls
//! [`MaterialLaw::evaluate`] once per bond per step. Implementations must be
//! pure and must never decrease damage.

/// A constitutive/damage law mapping bond stretch and prior damage to
/// updated damage
///
/// The contract: the return value must be finite and in `[0, 1]`, and must
/// be monotonically non-decreasing with respect to the `damage` argument.
/// The solver checks the first two and aborts the step on violation.
pub trait MaterialLaw: Sync {
    fn evaluate(&self, stretch: f64, damage: f64) -> f64;
}

/// Brittle elastic-fracture law: a bond carries full load until its stretch
/// exceeds the critical value, then fails instantly and permanently
#[derive(Debug)]
pub struct Brittle {
    pub critical_stretch: f64,
}

impl MaterialLaw for Brittle {
    fn evaluate(&self, stretch: f64, damage: f64) -> f64 {
        if stretch > self.critical_stretch {
            1.0
        } else {
            damage
        }
    }
}

/// Bilinear softening law: elastic up to `linear_stretch`, then damage grows
/// so that bond force decays linearly to zero at `critical_stretch`
#[derive(Debug)]
pub struct Bilinear {
    pub linear_stretch: f64,
    pub critical_stretch: f64,
}

impl MaterialLaw for Bilinear {
    fn evaluate(&self, stretch: f64, damage: f64) -> f64 {
        let s0 = self.linear_stretch;
        let sc = self.critical_stretch;

        let d_new = if stretch <= s0 {
            0.0
        } else if stretch < sc {
            1.0 - (s0 / stretch) * ((sc - stretch) / (sc - s0))
        } else {
            1.0
        };

        // Damage never heals
        f64::max(damage, d_new)
    }
}
