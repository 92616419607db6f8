//! Signal modelling: raw activation to threshold-comparable weight.

use crate::module::Module;

/// Converts a raw cell activation into the weight that is compared against
/// the module threshold and used in the centroid statistics.
///
/// Implementations must be pure; the aggregation kernel may call them from
/// many threads at once.
pub trait SignalModel: Send + Sync {
    /// Model name.
    fn name(&self) -> &'static str;

    /// Weight of a cell with the given activation on `module`.
    fn weight(&self, activation: f64, module: &Module) -> f64;
}

/// Uses the activation directly as the weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySignal;

impl SignalModel for IdentitySignal {
    fn name(&self) -> &'static str {
        "Identity"
    }

    #[inline]
    fn weight(&self, activation: f64, _module: &Module) -> f64 {
        activation
    }
}

/// Every cell weighs the same, so the centroid is the unweighted mean of
/// the passing cells; useful for binary readout.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSignal(pub f64);

impl Default for ConstantSignal {
    fn default() -> Self {
        Self(1.0)
    }
}

impl SignalModel for ConstantSignal {
    fn name(&self) -> &'static str {
        "Constant"
    }

    #[inline]
    fn weight(&self, _activation: f64, _module: &Module) -> f64 {
        self.0
    }
}

impl<S: SignalModel + ?Sized> SignalModel for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn weight(&self, activation: f64, module: &Module) -> f64 {
        (**self).weight(activation, module)
    }
}
