//! The shared per-opcode table (spec.md §4.3 static gas costs, §9 Design
//! Notes: "the reused rule condition prefix"). Both the reference
//! interpreter (C9) and the specification catalogue (C8) read from this one
//! table, so gas costs and stack shapes can never silently diverge between
//! the two halves of the conformance checker.

use once_cell::sync::Lazy;

use crate::opcode::OpCode;

/// Static metadata for one opcode: its mnemonic, its constant gas charge,
/// and the stack shape it requires/produces. Dynamic costs (memory
/// expansion) are computed separately by the interpreter.
#[derive(Clone, Copy, Debug)]
pub struct InstructionSpec {
    pub name: &'static str,
    pub gas: u64,
    /// Minimum stack items the instruction reads.
    pub stack_required: usize,
    /// Net stack height change, applied after the required items are read.
    pub stack_change: i32,
}

impl InstructionSpec {
    const fn new(name: &'static str, gas: u64, stack_required: usize, stack_change: i32) -> Self {
        InstructionSpec {
            name,
            gas,
            stack_required,
            stack_change,
        }
    }
}

type Table = [Option<InstructionSpec>; 256];

static TABLE: Lazy<Table> = Lazy::new(|| {
    let mut t: Table = [None; 256];

    t[OpCode::STOP.to_usize()] = Some(InstructionSpec::new("STOP", 0, 0, 0));
    t[OpCode::ADD.to_usize()] = Some(InstructionSpec::new("ADD", 3, 2, -1));
    t[OpCode::MUL.to_usize()] = Some(InstructionSpec::new("MUL", 5, 2, -1));
    t[OpCode::SUB.to_usize()] = Some(InstructionSpec::new("SUB", 3, 2, -1));
    t[OpCode::DIV.to_usize()] = Some(InstructionSpec::new("DIV", 5, 2, -1));
    t[OpCode::SDIV.to_usize()] = Some(InstructionSpec::new("SDIV", 5, 2, -1));
    t[OpCode::MOD.to_usize()] = Some(InstructionSpec::new("MOD", 5, 2, -1));
    t[OpCode::SMOD.to_usize()] = Some(InstructionSpec::new("SMOD", 5, 2, -1));
    t[OpCode::ADDMOD.to_usize()] = Some(InstructionSpec::new("ADDMOD", 8, 3, -2));
    t[OpCode::MULMOD.to_usize()] = Some(InstructionSpec::new("MULMOD", 8, 3, -2));
    t[OpCode::EXP.to_usize()] = Some(InstructionSpec::new("EXP", 10, 2, -1));
    t[OpCode::SIGNEXTEND.to_usize()] = Some(InstructionSpec::new("SIGNEXTEND", 5, 2, -1));

    t[OpCode::LT.to_usize()] = Some(InstructionSpec::new("LT", 3, 2, -1));
    t[OpCode::GT.to_usize()] = Some(InstructionSpec::new("GT", 3, 2, -1));
    t[OpCode::SLT.to_usize()] = Some(InstructionSpec::new("SLT", 3, 2, -1));
    t[OpCode::SGT.to_usize()] = Some(InstructionSpec::new("SGT", 3, 2, -1));
    t[OpCode::EQ.to_usize()] = Some(InstructionSpec::new("EQ", 3, 2, -1));
    t[OpCode::ISZERO.to_usize()] = Some(InstructionSpec::new("ISZERO", 3, 1, 0));
    t[OpCode::AND.to_usize()] = Some(InstructionSpec::new("AND", 3, 2, -1));
    t[OpCode::OR.to_usize()] = Some(InstructionSpec::new("OR", 3, 2, -1));
    t[OpCode::XOR.to_usize()] = Some(InstructionSpec::new("XOR", 3, 2, -1));
    t[OpCode::NOT.to_usize()] = Some(InstructionSpec::new("NOT", 3, 1, 0));
    t[OpCode::BYTE.to_usize()] = Some(InstructionSpec::new("BYTE", 3, 2, -1));
    t[OpCode::SHL.to_usize()] = Some(InstructionSpec::new("SHL", 3, 2, -1));
    t[OpCode::SHR.to_usize()] = Some(InstructionSpec::new("SHR", 3, 2, -1));
    t[OpCode::SAR.to_usize()] = Some(InstructionSpec::new("SAR", 3, 2, -1));

    t[OpCode::POP.to_usize()] = Some(InstructionSpec::new("POP", 2, 1, -1));
    t[OpCode::MLOAD.to_usize()] = Some(InstructionSpec::new("MLOAD", 3, 1, 0));
    t[OpCode::MSTORE.to_usize()] = Some(InstructionSpec::new("MSTORE", 3, 2, -2));
    t[OpCode::MSTORE8.to_usize()] = Some(InstructionSpec::new("MSTORE8", 3, 2, -2));
    t[OpCode::SLOAD.to_usize()] = Some(InstructionSpec::new("SLOAD", 100, 1, 0));
    t[OpCode::SSTORE.to_usize()] = Some(InstructionSpec::new("SSTORE", 100, 2, -2));
    t[OpCode::JUMP.to_usize()] = Some(InstructionSpec::new("JUMP", 8, 1, -1));
    t[OpCode::JUMPI.to_usize()] = Some(InstructionSpec::new("JUMPI", 10, 2, -2));
    t[OpCode::PC.to_usize()] = Some(InstructionSpec::new("PC", 2, 0, 1));
    t[OpCode::MSIZE.to_usize()] = Some(InstructionSpec::new("MSIZE", 2, 0, 1));
    t[OpCode::GAS.to_usize()] = Some(InstructionSpec::new("GAS", 2, 0, 1));
    t[OpCode::JUMPDEST.to_usize()] = Some(InstructionSpec::new("JUMPDEST", 1, 0, 0));

    for n in 1..=32u8 {
        let op = OpCode(OpCode::PUSH1.0 + (n - 1));
        t[op.to_usize()] = Some(InstructionSpec::new(push_name(n), 3, 0, 1));
    }
    for h in 1..=16u8 {
        let op = OpCode(OpCode::DUP1.0 + (h - 1));
        t[op.to_usize()] = Some(InstructionSpec::new(dup_name(h), 3, h as usize, 1));
    }
    for h in 1..=16u8 {
        let op = OpCode(OpCode::SWAP1.0 + (h - 1));
        t[op.to_usize()] = Some(InstructionSpec::new(
            swap_name(h),
            3,
            h as usize + 1,
            0,
        ));
    }

    t[OpCode::CALL.to_usize()] = Some(InstructionSpec::new("CALL", 100, 7, -6));
    t[OpCode::INVALID.to_usize()] = Some(InstructionSpec::new("INVALID", 0, 0, 0));

    t
});

fn push_name(n: u8) -> &'static str {
    const NAMES: [&str; 32] = [
        "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8", "PUSH9", "PUSH10",
        "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16", "PUSH17", "PUSH18", "PUSH19",
        "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24", "PUSH25", "PUSH26", "PUSH27", "PUSH28",
        "PUSH29", "PUSH30", "PUSH31", "PUSH32",
    ];
    NAMES[n as usize - 1]
}

fn dup_name(h: u8) -> &'static str {
    const NAMES: [&str; 16] = [
        "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8", "DUP9", "DUP10", "DUP11",
        "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
    ];
    NAMES[h as usize - 1]
}

fn swap_name(h: u8) -> &'static str {
    const NAMES: [&str; 16] = [
        "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8", "SWAP9", "SWAP10",
        "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
    ];
    NAMES[h as usize - 1]
}

pub fn spec_for(op: OpCode) -> Option<&'static InstructionSpec> {
    TABLE[op.to_usize()].as_ref()
}

/// All opcodes the table models, in ascending byte order (spec.md §9
/// "treat any divergence between interpreter-modelled and spec-modelled
/// opcodes as an error").
pub fn modelled_opcodes() -> impl Iterator<Item = OpCode> {
    (0u16..256).filter_map(|b| {
        let op = OpCode(b as u8);
        spec_for(op).map(|_| op)
    })
}
