// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

//! The closed opcode set and the five classifiers the fuse predicates
//! consult. Adding an opcode means extending every `match` below --
//! there are deliberately no catch-all arms.

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Opcode {
    // Elementwise arithmetic / comparison / logic.
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Abs,
    Sqrt,
    Minimum,
    Maximum,
    Identity,
    Negate,
    LogicalNot,
    BitwiseNot,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LogicalAnd,
    LogicalOr,

    // Reductions: one input collapsed along some axes into a lower-rank output.
    ReduceAdd,
    ReduceMultiply,
    ReduceMin,
    ReduceMax,

    // Prefix-scan-like: output has the same rank as the input.
    AccumulateAdd,
    AccumulateMultiply,

    // Rank-preserving generators with no array input.
    Range,
    Random,

    // System / control-plane opcodes. These never touch array content
    // in the fusion sense and are always fusible.
    None,
    Free,
    Sync,
    Discard,
    Talloc,
    Extmethod,
}

impl Opcode {
    /// Control-plane opcodes that do not touch array content.
    pub fn is_system(self) -> bool {
        matches!(
            self,
            Opcode::None
                | Opcode::Free
                | Opcode::Sync
                | Opcode::Discard
                | Opcode::Talloc
                | Opcode::Extmethod
        )
    }

    /// A pure map over identically-shaped operands.
    pub fn is_elementwise(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Pow
                | Opcode::Mod
                | Opcode::Abs
                | Opcode::Sqrt
                | Opcode::Minimum
                | Opcode::Maximum
                | Opcode::Identity
                | Opcode::Negate
                | Opcode::LogicalNot
                | Opcode::BitwiseNot
                | Opcode::Equal
                | Opcode::NotEqual
                | Opcode::LessThan
                | Opcode::GreaterThan
                | Opcode::LogicalAnd
                | Opcode::LogicalOr
        )
    }

    /// Reduces one input along a set of axes into a lower-rank output.
    pub fn is_reduction(self) -> bool {
        matches!(
            self,
            Opcode::ReduceAdd | Opcode::ReduceMultiply | Opcode::ReduceMin | Opcode::ReduceMax
        )
    }

    /// Prefix-scan-like: output rank equals input rank.
    pub fn is_accumulate(self) -> bool {
        matches!(self, Opcode::AccumulateAdd | Opcode::AccumulateMultiply)
    }

    pub fn is_range(self) -> bool {
        matches!(self, Opcode::Range)
    }

    pub fn is_random(self) -> bool {
        matches!(self, Opcode::Random)
    }
}
