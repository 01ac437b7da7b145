// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

use thiserror::Error;

/// The one fatal condition this crate can raise. Unrecognized
/// `BH_FUSE_MODEL` values are recovered from locally (warn, fall back
/// to the default) and never reach here -- this variant only fires if
/// a caller deliberately asks for a dispatcher with no model at all.
#[derive(Debug, Error)]
pub enum FuseError {
    #[error("no fuse model selected")]
    NoModelSelected,
}
