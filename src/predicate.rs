// Licensed under the GNU General Public License, version 3, or (at your
// option) any later version.
//
// This software is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
// General Public License for details.

//! One legality predicate per fuse model. All but `fuse_broadest`
//! itself end by consulting it; four of the six share an identical
//! same-shape scan, factored into [`same_shape_scan`] and
//! parameterized by the opcode-admission closure.

use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;
use crate::view::{aligned, disjoint, ArrayView};

/// A constant operand is trivially compatible with anything -- it
/// carries no view and is irrelevant to aliasing checks.
fn compatible(output: &Operand, operand: &Operand) -> bool {
    match (output.view(), operand.view()) {
        (Some(out_view), Some(operand_view)) => {
            disjoint(out_view, operand_view) || aligned(out_view, operand_view)
        }
        _ => true,
    }
}

/// The data-flow floor every other model builds on. For every operand
/// of `a`, `b`'s output must be disjoint from it or aligned with it,
/// and symmetrically for every operand of `b` against `a`'s output.
pub fn fuse_broadest(a: &Instruction, b: &Instruction) -> bool {
    if a.opcode.is_system() || b.opcode.is_system() {
        return true;
    }
    let b_out = b.output();
    if a.operands.iter().any(|x| !compatible(b_out, x)) {
        return false;
    }
    let a_out = a.output();
    if b.operands.iter().any(|x| !compatible(a_out, x)) {
        return false;
    }
    true
}

fn operands_match_shape(operands: &[Operand], reference: &ArrayView) -> bool {
    operands.iter().all(|operand| match operand.view() {
        None => true,
        Some(view) => view.ndim() == reference.ndim() && view.shape == reference.shape,
    })
}

/// Shared scan used by `SAME_SHAPE` and its `RANGE`/`RANDOM` variants:
/// both instructions must be admitted by `admit`, every non-constant
/// operand of both must match `a`'s output shape, and finally
/// `fuse_broadest` must hold.
fn same_shape_scan(a: &Instruction, b: &Instruction, admit: impl Fn(Opcode) -> bool) -> bool {
    if a.opcode.is_system() || b.opcode.is_system() {
        return true;
    }
    if !admit(a.opcode) || !admit(b.opcode) {
        return false;
    }

    let reference = a
        .output()
        .view()
        .expect("malformed instruction: output operand is not a view");

    if !operands_match_shape(&a.operands[1..], reference) {
        return false;
    }
    if !operands_match_shape(&b.operands, reference) {
        return false;
    }

    fuse_broadest(a, b)
}

pub fn fuse_same_shape(a: &Instruction, b: &Instruction) -> bool {
    same_shape_scan(a, b, Opcode::is_elementwise)
}

pub fn fuse_same_shape_range(a: &Instruction, b: &Instruction) -> bool {
    same_shape_scan(a, b, |op| op.is_range() || op.is_elementwise())
}

pub fn fuse_same_shape_random(a: &Instruction, b: &Instruction) -> bool {
    same_shape_scan(a, b, |op| op.is_random() || op.is_elementwise())
}

pub fn fuse_same_shape_range_random(a: &Instruction, b: &Instruction) -> bool {
    same_shape_scan(a, b, |op| {
        op.is_range() || op.is_random() || op.is_elementwise()
    })
}

/// The richest model: elementwise ops freely mix with 1-D reductions
/// and generators, so long as no accumulate opcode is involved.
pub fn fuse_same_shape_generate_1dreduce(a: &Instruction, b: &Instruction) -> bool {
    if a.opcode.is_system() || b.opcode.is_system() {
        return true;
    }
    if a.opcode.is_accumulate() || b.opcode.is_accumulate() {
        return false;
    }
    if a.opcode.is_reduction() && reduction_input_ndim(a) > 1 {
        return false;
    }
    if b.opcode.is_reduction() && reduction_input_ndim(b) > 1 {
        return false;
    }

    let a_elementwise = a.opcode.is_elementwise();
    let b_elementwise = b.opcode.is_elementwise();

    let shape_ok = match (a_elementwise, b_elementwise) {
        (true, true) => {
            let reference = a
                .output()
                .view()
                .expect("malformed instruction: output operand is not a view");
            operands_match_shape(&a.operands[1..], reference)
                && operands_match_shape(&b.operands, reference)
        }
        (true, false) if b.opcode.is_reduction() => {
            let reference = b.operands[1]
                .view()
                .expect("malformed instruction: reduction input is not a view");
            operands_match_shape(&a.operands, reference)
        }
        (false, true) if a.opcode.is_reduction() => {
            let reference = a.operands[1]
                .view()
                .expect("malformed instruction: reduction input is not a view");
            operands_match_shape(&b.operands, reference)
        }
        _ => false,
    };
    if !shape_ok {
        return false;
    }

    // Computed exactly once: the broadest check is not repeated.
    fuse_broadest(a, b)
}

fn reduction_input_ndim(instr: &Instruction) -> usize {
    instr.operands[1]
        .view()
        .expect("malformed instruction: reduction input is not a view")
        .ndim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ArrayView, BaseId};

    fn v(base: u64, start: isize, shape: &[usize]) -> ArrayView {
        let stride = {
            let mut s = vec![0isize; shape.len()];
            let mut acc = 1isize;
            for i in (0..shape.len()).rev() {
                s[i] = acc;
                acc *= shape[i] as isize;
            }
            s
        };
        ArrayView::new(BaseId(base), start, shape.to_vec(), stride)
    }

    fn view_operand(base: u64, start: isize, shape: &[usize]) -> Operand {
        Operand::View(v(base, start, shape))
    }

    fn elementwise(opcode: Opcode, operands: Vec<Operand>) -> Instruction {
        Instruction::new(opcode, operands)
    }

    // S1: simple elementwise fusion under BROADEST and SAME_SHAPE.
    #[test]
    fn s1_simple_elementwise_fusion() {
        let a = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        let b = elementwise(
            Opcode::Mul,
            vec![
                view_operand(4, 0, &[4]),
                view_operand(1, 0, &[4]),
                view_operand(5, 0, &[4]),
            ],
        );
        assert!(fuse_broadest(&a, &b));
        assert!(fuse_same_shape(&a, &b));
    }

    // S2: write-write conflict rejected under every model.
    #[test]
    fn s2_write_write_conflict() {
        let a = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        // b writes into base 2 at an overlapping-but-not-aligned offset.
        let b = elementwise(
            Opcode::Sub,
            vec![
                view_operand(2, 1, &[4]),
                view_operand(6, 0, &[4]),
                view_operand(7, 0, &[4]),
            ],
        );
        assert!(!fuse_broadest(&a, &b));
        assert!(!fuse_same_shape(&a, &b));
    }

    // S3: aligned write is fusible under BROADEST.
    #[test]
    fn s3_aligned_write() {
        let a = elementwise(
            Opcode::Identity,
            vec![view_operand(1, 0, &[4]), view_operand(2, 0, &[4])],
        );
        let b = elementwise(
            Opcode::Identity,
            vec![view_operand(3, 0, &[4]), view_operand(1, 0, &[4])],
        );
        assert!(fuse_broadest(&a, &b));
    }

    // S4: SAME_SHAPE rejects rank mismatch, BROADEST accepts.
    #[test]
    fn s4_same_shape_rejects_rank_mismatch() {
        let a = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        let b = elementwise(
            Opcode::Mul,
            vec![
                view_operand(4, 0, &[4]),
                view_operand(5, 0, &[4, 4]),
                view_operand(6, 0, &[4]),
            ],
        );
        assert!(!fuse_same_shape(&a, &b));
        assert!(fuse_broadest(&a, &b));
    }

    // S5: generator admission.
    #[test]
    fn s5_generator_admission() {
        let a = elementwise(Opcode::Range, vec![view_operand(1, 0, &[4])]);
        let b = elementwise(
            Opcode::Add,
            vec![
                view_operand(2, 0, &[4]),
                view_operand(1, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        assert!(!fuse_same_shape(&a, &b));
        assert!(fuse_same_shape_range(&a, &b));
        assert!(fuse_same_shape_range_random(&a, &b));
    }

    // S6: 1-D reduction mixing.
    #[test]
    fn s6_1d_reduction_mixing() {
        let a = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        let b_1d = elementwise(
            Opcode::ReduceAdd,
            vec![view_operand(4, 0, &[1]), view_operand(5, 0, &[4])],
        );
        assert!(!fuse_same_shape(&a, &b_1d));
        assert!(fuse_same_shape_generate_1dreduce(&a, &b_1d));

        let b_2d = elementwise(
            Opcode::ReduceAdd,
            vec![view_operand(4, 0, &[1]), view_operand(6, 0, &[4, 4])],
        );
        assert!(!fuse_same_shape_generate_1dreduce(&a, &b_2d));
    }

    #[test]
    fn system_opcode_passthrough_holds_for_every_model() {
        let sys = Instruction::new(Opcode::Sync, vec![]);
        let any = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4, 4]),
                view_operand(3, 1, &[4]),
            ],
        );
        assert!(fuse_broadest(&sys, &any));
        assert!(fuse_same_shape(&sys, &any));
        assert!(fuse_same_shape_range(&sys, &any));
        assert!(fuse_same_shape_random(&sys, &any));
        assert!(fuse_same_shape_range_random(&sys, &any));
        assert!(fuse_same_shape_generate_1dreduce(&sys, &any));
    }

    // A generator feeding an elementwise consumer is not a reduction,
    // so GENERATE_1DREDUCE must reject it without indexing into the
    // generator's (nonexistent) second operand.
    #[test]
    fn generator_under_generate_1dreduce_is_rejected_not_panicking() {
        let a = elementwise(Opcode::Range, vec![view_operand(1, 0, &[4])]);
        let b = elementwise(
            Opcode::Add,
            vec![
                view_operand(2, 0, &[4]),
                view_operand(1, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        assert!(!fuse_same_shape_generate_1dreduce(&a, &b));
        assert!(!fuse_same_shape_generate_1dreduce(&b, &a));
    }

    #[test]
    fn accumulate_is_rejected_by_generate_1dreduce() {
        let a = elementwise(
            Opcode::AccumulateAdd,
            vec![view_operand(1, 0, &[4]), view_operand(2, 0, &[4])],
        );
        let b = elementwise(
            Opcode::Add,
            vec![
                view_operand(3, 0, &[4]),
                view_operand(4, 0, &[4]),
                view_operand(5, 0, &[4]),
            ],
        );
        assert!(!fuse_same_shape_generate_1dreduce(&a, &b));
    }

    #[test]
    fn constant_operand_never_turns_accepted_into_rejected() {
        let a = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4]),
                Operand::Constant(2.0),
            ],
        );
        let b = elementwise(
            Opcode::Mul,
            vec![
                view_operand(3, 0, &[4]),
                view_operand(1, 0, &[4]),
                Operand::Constant(3.0),
            ],
        );
        assert!(fuse_same_shape(&a, &b));
    }

    #[test]
    fn model_monotonicity_in_relaxation_order() {
        let a = elementwise(Opcode::Range, vec![view_operand(1, 0, &[4])]);
        let b = elementwise(
            Opcode::Add,
            vec![
                view_operand(2, 0, &[4]),
                view_operand(1, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        if fuse_same_shape(&a, &b) {
            assert!(fuse_same_shape_range(&a, &b));
        }
        if fuse_same_shape_range(&a, &b) {
            assert!(fuse_same_shape_range_random(&a, &b));
        }
        assert!(fuse_broadest(&a, &b));
    }

    #[test]
    fn symmetry_holds_for_every_model() {
        let a = elementwise(
            Opcode::Add,
            vec![
                view_operand(1, 0, &[4]),
                view_operand(2, 0, &[4]),
                view_operand(3, 0, &[4]),
            ],
        );
        let b = elementwise(
            Opcode::Mul,
            vec![
                view_operand(4, 0, &[4]),
                view_operand(1, 0, &[4]),
                view_operand(5, 0, &[4]),
            ],
        );
        assert_eq!(fuse_broadest(&a, &b), fuse_broadest(&b, &a));
        assert_eq!(fuse_same_shape(&a, &b), fuse_same_shape(&b, &a));
        assert_eq!(
            fuse_same_shape_generate_1dreduce(&a, &b),
            fuse_same_shape_generate_1dreduce(&b, &a)
        );
    }
}
