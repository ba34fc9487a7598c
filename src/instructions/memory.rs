//! MLOAD/MSTORE/MSTORE8/MSIZE, and the memory-expansion cost helper shared
//! by the memory opcodes and by CALL (spec.md §4.3, grounded on the
//! teacher's `num_words`/`verify_memory_region_u64` in this same module).

use crate::adapter::Frame;
use crate::instructions::Fail;
use crate::u256::U256;

const WORD_SIZE: usize = 32;

/// Largest offset/size this model admits before treating the access as an
/// unconditional out-of-gas failure (spec.md §4.3: "an offset or size at or
/// beyond 2^64 saturates to the out-of-gas outcome rather than panicking").
const MAX_BUFFER_SIZE: u64 = u32::MAX as u64;

fn num_words(size_in_bytes: usize) -> usize {
    (size_in_bytes + WORD_SIZE - 1) / WORD_SIZE
}

fn memory_cost(words: usize) -> i64 {
    let words = words as i64;
    3 * words + words * words / 512
}

/// Grows `frame.memory` to cover `[offset, offset + size)`, charging the gas
/// difference between the new and current expansion cost, and returns the
/// offset as a `usize`. Fails with `OutOfGas` if the region doesn't fit a
/// 32-bit byte count or if the charge exceeds the remaining gas.
pub(crate) fn verify_memory_region(frame: &mut Frame, offset: U256, size: usize) -> Result<usize, Fail> {
    if size == 0 {
        return Ok(0);
    }
    if offset.ge(&U256::from_u64(MAX_BUFFER_SIZE)) {
        return Err(Fail::OutOfGas);
    }
    let offset = offset.low_u64() as usize;
    let new_size = offset.checked_add(size).ok_or(Fail::OutOfGas)?;
    if new_size as u64 > MAX_BUFFER_SIZE {
        return Err(Fail::OutOfGas);
    }

    let current_size = frame.memory.len();
    if new_size > current_size {
        let new_words = num_words(new_size);
        let current_words = num_words(current_size);
        let cost = memory_cost(new_words) - memory_cost(current_words);
        frame.gas_left -= cost;
        if frame.gas_left < 0 {
            return Err(Fail::OutOfGas);
        }
        frame.memory.resize(new_words * WORD_SIZE, 0);
    }
    Ok(offset)
}

pub fn mload(frame: &mut Frame) -> Result<(), Fail> {
    let index = frame.pop().ok_or(Fail::StackUnderflow)?;
    let offset = verify_memory_region(frame, index, WORD_SIZE)?;
    let value = U256::from_big_endian(&frame.memory[offset..offset + WORD_SIZE]);
    frame.push(value);
    Ok(())
}

pub fn mstore(frame: &mut Frame) -> Result<(), Fail> {
    let index = frame.pop().ok_or(Fail::StackUnderflow)?;
    let value = frame.pop().ok_or(Fail::StackUnderflow)?;
    let offset = verify_memory_region(frame, index, WORD_SIZE)?;
    let bytes = value.to_big_endian();
    frame.memory[offset..offset + WORD_SIZE].copy_from_slice(&bytes);
    Ok(())
}

pub fn mstore8(frame: &mut Frame) -> Result<(), Fail> {
    let index = frame.pop().ok_or(Fail::StackUnderflow)?;
    let value = frame.pop().ok_or(Fail::StackUnderflow)?;
    let offset = verify_memory_region(frame, index, 1)?;
    frame.memory[offset] = (value.low_u64() & 0xff) as u8;
    Ok(())
}

pub fn msize(frame: &mut Frame) {
    frame.push(U256::from_u64(frame.memory.len() as u64));
}
