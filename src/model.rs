// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

//! The fuse model enumeration and its one external configuration
//! knob, `BH_FUSE_MODEL`.

use log::warn;
use std::env;

/// Ordered from most permissive (data-flow only) to most restrictive,
/// plus the `Unset` sentinel used before the first resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FuseModel {
    Unset,
    Broadest,
    SameShape,
    SameShapeRange,
    SameShapeRandom,
    SameShapeRangeRandom,
    SameShapeGenerate1dReduce,
}

pub const DEFAULT_FUSE_MODEL: FuseModel = FuseModel::Broadest;

const ENV_VAR: &str = "BH_FUSE_MODEL";

/// All models a name can resolve to, in enumeration order. `Unset` is
/// deliberately excluded -- it is never a valid environment value.
const NAMED_MODELS: &[FuseModel] = &[
    FuseModel::Broadest,
    FuseModel::SameShape,
    FuseModel::SameShapeRange,
    FuseModel::SameShapeRandom,
    FuseModel::SameShapeRangeRandom,
    FuseModel::SameShapeGenerate1dReduce,
];

/// Maps a fuse model to its canonical lower-snake-case name. Unknown
/// values (in practice, only `Unset`) map to `"unknown"`.
pub fn fuse_model_text(model: FuseModel) -> &'static str {
    match model {
        FuseModel::Broadest => "broadest",
        FuseModel::SameShape => "same_shape",
        FuseModel::SameShapeRange => "same_shape_range",
        FuseModel::SameShapeRandom => "same_shape_random",
        FuseModel::SameShapeRangeRandom => "same_shape_range_random",
        FuseModel::SameShapeGenerate1dReduce => "same_shape_generate_1dreduce",
        FuseModel::Unset => "unknown",
    }
}

fn model_named(name: &str) -> Option<FuseModel> {
    NAMED_MODELS
        .iter()
        .copied()
        .find(|&m| fuse_model_text(m).eq_ignore_ascii_case(name))
}

/// Resolves the active fuse model from `BH_FUSE_MODEL`. If the
/// variable is unset, returns the default. If it names an
/// unrecognized model, warns on the diagnostic stream, falls back to
/// the default, and re-exports the effective value so child processes
/// observe it.
pub fn resolve_from_env() -> FuseModel {
    let Ok(value) = env::var(ENV_VAR) else {
        return DEFAULT_FUSE_MODEL;
    };

    match model_named(&value) {
        Some(model) => model,
        None => {
            warn!(
                "unknown fuse model '{value}', using the default model '{}' instead",
                fuse_model_text(DEFAULT_FUSE_MODEL)
            );
            env::set_var(ENV_VAR, fuse_model_text(DEFAULT_FUSE_MODEL));
            DEFAULT_FUSE_MODEL
        }
    }
}
