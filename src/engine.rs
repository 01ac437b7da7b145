// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

//! The dispatcher. [`FuseEngine`] is an explicit, owned value holding
//! one resolved [`FuseModel`]; the process-global [`check_fusible`]
//! free function is a thin compatibility shim over a lazily
//! constructed static instance, kept only so existing call sites don't
//! need to thread an engine value through.

use anyhow::Result;
use once_cell::sync::Lazy;

use crate::error::FuseError;
use crate::instruction::Instruction;
use crate::model::{resolve_from_env, FuseModel};
use crate::predicate::{
    fuse_broadest, fuse_same_shape, fuse_same_shape_generate_1dreduce, fuse_same_shape_random,
    fuse_same_shape_range, fuse_same_shape_range_random,
};

/// An owned fusibility oracle bound to one resolved model. Construct
/// via [`FuseEngine::from_env`] to pick up `BH_FUSE_MODEL`, or
/// [`FuseEngine::with_model`] to pin a specific model regardless of
/// environment (handy in tests, where process-global env state would
/// otherwise leak between cases).
#[derive(Clone, Copy, Debug)]
pub struct FuseEngine {
    model: FuseModel,
}

impl FuseEngine {
    pub fn from_env() -> Self {
        FuseEngine {
            model: resolve_from_env(),
        }
    }

    pub fn with_model(model: FuseModel) -> Self {
        FuseEngine { model }
    }

    /// Fallible constructor: the only caller-visible way to reach
    /// [`FuseError::NoModelSelected`], by deliberately building an
    /// engine with no model at all.
    pub fn try_with_model(model: FuseModel) -> Result<Self> {
        if model == FuseModel::Unset {
            return Err(FuseError::NoModelSelected.into());
        }
        Ok(FuseEngine { model })
    }

    pub fn model(&self) -> FuseModel {
        self.model
    }

    /// May `a` and `b` share a kernel under this engine's model?
    ///
    /// # Panics
    ///
    /// Panics if the engine was constructed with [`FuseModel::Unset`]
    /// (only reachable by bypassing [`FuseEngine::try_with_model`]).
    /// This mirrors the dispatcher's `ConfigError`: an unresolved
    /// model inside the dispatcher is a programming mistake, not a
    /// recoverable condition, so it does not masquerade as a `bool`.
    pub fn check_fusible(&self, a: &Instruction, b: &Instruction) -> bool {
        match self.model {
            FuseModel::Unset => panic!("{}", FuseError::NoModelSelected),
            FuseModel::Broadest => fuse_broadest(a, b),
            FuseModel::SameShape => fuse_same_shape(a, b),
            FuseModel::SameShapeRange => fuse_same_shape_range(a, b),
            FuseModel::SameShapeRandom => fuse_same_shape_random(a, b),
            FuseModel::SameShapeRangeRandom => fuse_same_shape_range_random(a, b),
            FuseModel::SameShapeGenerate1dReduce => fuse_same_shape_generate_1dreduce(a, b),
        }
    }
}

static GLOBAL_ENGINE: Lazy<FuseEngine> = Lazy::new(FuseEngine::from_env);

/// Determines whether it is legal to fuse `a` and `b` into one kernel
/// under the process-wide `BH_FUSE_MODEL`. Resolves and memoizes the
/// model on first call; reentrant and allocation-free thereafter.
pub fn check_fusible(a: &Instruction, b: &Instruction) -> bool {
    GLOBAL_ENGINE.check_fusible(a, b)
}
