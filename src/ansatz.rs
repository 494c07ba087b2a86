//! Parameterized ansatz circuits
//!
//! An ansatz maps a flat parameter vector to an explicit gate list for
//! the simulator. Two forms are provided:
//!
//! - `RotationChain`: per layer, an RY and RZ rotation on every qubit
//!   followed by a linear CNOT chain. 2·n parameters per layer.
//! - `StronglyEntangling`: per layer, a general single-qubit rotation
//!   (RZ·RY·RZ) on every qubit followed by ring CNOTs whose range
//!   cycles with the layer index. 3·n parameters per layer.
//!
//! Parameter vectors are validated against the expected shape before
//! any gate is emitted; a mismatch is an error, never an implicit
//! truncation or zero-fill.

use crate::circuit::GateOp;
use crate::error::{MolVqeError, Result};

/// Circuit template family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsatzForm {
    /// RY + RZ on each qubit, then a linear CNOT chain
    RotationChain,
    /// RZ·RY·RZ on each qubit, then ring CNOTs with layer-cycled range
    StronglyEntangling,
}

/// An ansatz form together with its layer count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ansatz {
    form: AnsatzForm,
    layer_count: usize,
}

impl Ansatz {
    pub fn new(form: AnsatzForm, layer_count: usize) -> Self {
        Self { form, layer_count }
    }

    pub fn form(&self) -> AnsatzForm {
        self.form
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    /// Length of the parameter vector this ansatz consumes on a
    /// register of `qubit_count` qubits
    pub fn parameter_count(&self, qubit_count: usize) -> usize {
        let per_layer = match self.form {
            AnsatzForm::RotationChain => 2 * qubit_count,
            AnsatzForm::StronglyEntangling => 3 * qubit_count,
        };
        self.layer_count * per_layer
    }

    /// Expand `params` into the explicit gate list.
    ///
    /// Single-qubit registers get no entangling gates; the rotation
    /// layers are emitted unchanged.
    pub fn build_ops(&self, params: &[f64], qubit_count: usize) -> Result<Vec<GateOp>> {
        let expected = self.parameter_count(qubit_count);
        if params.len() != expected {
            return Err(MolVqeError::ParameterShape {
                got: params.len(),
                expected,
            });
        }

        let mut ops = Vec::new();
        match self.form {
            AnsatzForm::RotationChain => {
                for layer in 0..self.layer_count {
                    let base = layer * 2 * qubit_count;
                    for q in 0..qubit_count {
                        ops.push(GateOp::Ry {
                            qubit: q,
                            theta: params[base + q],
                        });
                    }
                    for q in 0..qubit_count {
                        ops.push(GateOp::Rz {
                            qubit: q,
                            theta: params[base + qubit_count + q],
                        });
                    }
                    for q in 0..qubit_count.saturating_sub(1) {
                        ops.push(GateOp::Cnot {
                            control: q,
                            target: q + 1,
                        });
                    }
                }
            }
            AnsatzForm::StronglyEntangling => {
                for layer in 0..self.layer_count {
                    let base = layer * 3 * qubit_count;
                    for q in 0..qubit_count {
                        let i = base + 3 * q;
                        ops.push(GateOp::Rz {
                            qubit: q,
                            theta: params[i],
                        });
                        ops.push(GateOp::Ry {
                            qubit: q,
                            theta: params[i + 1],
                        });
                        ops.push(GateOp::Rz {
                            qubit: q,
                            theta: params[i + 2],
                        });
                    }
                    if qubit_count > 1 {
                        // Range cycles through 1..qubit_count so
                        // successive layers entangle different pairs.
                        let range = (layer % (qubit_count - 1)) + 1;
                        for q in 0..qubit_count {
                            ops.push(GateOp::Cnot {
                                control: q,
                                target: (q + range) % qubit_count,
                            });
                        }
                    }
                }
            }
        }
        Ok(ops)
    }
}
