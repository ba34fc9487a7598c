//! Lazily-computed code/data classification (spec.md §3 "Code map", §4.2).
//!
//! Every position in a code buffer is either a real opcode or a data byte
//! belonging to a preceding PUSHn's immediate. The map is computed by a
//! single left-to-right scan and cached; it must be invalidated whenever the
//! owning code buffer is mutated (spec.md §9 open question), and cloning a
//! [`State`](crate::state::State) must not let two states share one mask.

use crate::opcode::OpCode;

#[derive(Clone, Debug, Default)]
pub struct CodeMap {
    /// `is_code[i]` is `true` when `code[i]` is an opcode, `false` when it
    /// falls inside a PUSH immediate.
    is_code: Vec<bool>,
}

impl CodeMap {
    pub fn compute(code: &[u8]) -> Self {
        let mut is_code = vec![false; code.len()];
        let mut i = 0;
        while i < code.len() {
            is_code[i] = true;
            let op = OpCode(code[i]);
            i += op.push_len().map(|n| n + 1).unwrap_or(1);
        }
        CodeMap { is_code }
    }

    pub fn is_code(&self, pos: usize) -> bool {
        pos < self.is_code.len() && self.is_code[pos]
    }

    pub fn is_data(&self, pos: usize) -> bool {
        pos < self.is_code.len() && !self.is_code[pos]
    }

    pub fn len(&self) -> usize {
        self.is_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_code.is_empty()
    }

    /// Smallest `i >= start` classified as code, wrapping to zero past the
    /// end of the buffer (spec.md §4.2 `next_code_position`).
    pub fn next_code_position(&self, start: usize) -> usize {
        self.next_matching(start, true)
    }

    /// Smallest `i >= start` classified as data, wrapping to zero past the
    /// end of the buffer (spec.md §4.2 `next_data_position`).
    pub fn next_data_position(&self, start: usize) -> usize {
        self.next_matching(start, false)
    }

    fn next_matching(&self, start: usize, want_code: bool) -> usize {
        let len = self.is_code.len();
        if len == 0 {
            return 0;
        }
        for offset in 0..len {
            let pos = (start + offset) % len;
            if self.is_code[pos] == want_code {
                return pos;
            }
        }
        0
    }

    pub fn positions_matching(&self, want_code: bool) -> impl Iterator<Item = usize> + '_ {
        self.is_code
            .iter()
            .enumerate()
            .filter(move |(_, &c)| c == want_code)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_immediates_are_data() {
        // PUSH2 0xAA 0xBB, STOP
        let code = [OpCode::PUSH1.0 + 1, 0xaa, 0xbb, OpCode::STOP.0];
        let map = CodeMap::compute(&code);
        assert!(map.is_code(0));
        assert!(map.is_data(1));
        assert!(map.is_data(2));
        assert!(map.is_code(3));
    }

    #[test]
    fn next_code_position_wraps() {
        let code = [OpCode::PUSH1.0, 0xaa, OpCode::STOP.0];
        let map = CodeMap::compute(&code);
        assert_eq!(map.next_code_position(1), 2);
        assert_eq!(map.next_code_position(3), 0);
    }
}
