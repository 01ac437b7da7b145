// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

//! The instruction fusibility engine of a lazy array-computation
//! runtime: a pure predicate deciding which adjacent or
//! partially-ordered pairs of array instructions may share a compute
//! kernel.
//!
//! Legality is a data-flow question, answered by the view algebra in
//! [`view`] (`disjoint`/`aligned`). Policy is a question of which
//! opcode shapes are allowed to participate at all, answered by the
//! [`FuseModel`] selected via the `BH_FUSE_MODEL` environment
//! variable (see [`model`]). [`check_fusible`] is the sole entry point
//! most callers need; [`FuseEngine`] is available for callers that
//! want an explicit, non-global oracle instead.
//!
//! This crate builds the fused kernel for nobody -- it answers one
//! question: may these two instructions share a kernel under the
//! active policy?

mod engine;
mod error;
mod instruction;
mod model;
mod opcode;
mod predicate;
mod view;

pub use engine::{check_fusible, FuseEngine};
pub use error::FuseError;
pub use instruction::{Instruction, Operand};
pub use model::{fuse_model_text, FuseModel};
pub use opcode::Opcode;
pub use view::{aligned, disjoint, ArrayView, BaseId, MAX_DIM};
