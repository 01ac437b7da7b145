// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

//! An instruction is an opcode plus an ordered tuple of operands.
//! Operand 0 is conventionally the output for non-system opcodes.

use crate::opcode::Opcode;
use crate::view::ArrayView;

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Constant(f64),
    View(ArrayView),
}

impl Operand {
    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Constant(_))
    }

    pub fn view(&self) -> Option<&ArrayView> {
        match self {
            Operand::View(v) => Some(v),
            Operand::Constant(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Instruction { opcode, operands }
    }

    /// Operand 0: the output for non-system opcodes.
    pub fn output(&self) -> &Operand {
        &self.operands[0]
    }

    pub fn nop(&self) -> usize {
        self.operands.len()
    }
}
