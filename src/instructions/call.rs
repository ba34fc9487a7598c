//! CALL (spec.md §4.3), grounded on the shape of the teacher's `do_call!`
//! macro (pop gas/address/value/args/ret, charge for the memory regions,
//! copy return data back) but collapsed to a single synchronous step: no
//! sub-execution happens here, the [`Host`] simply hands back the next
//! pre-programmed [`CallResult`] (spec.md §9 "Host capability").

use crate::adapter::Frame;
use crate::host::Host;
use crate::instructions::memory::verify_memory_region;
use crate::instructions::Fail;
use crate::state::CallRecord;
use crate::u256::U256;

pub fn call(frame: &mut Frame, host: &mut dyn Host) -> Result<(), Fail> {
    let gas = frame.pop().ok_or(Fail::StackUnderflow)?;
    let address = frame.pop().ok_or(Fail::StackUnderflow)?;
    let value = frame.pop().ok_or(Fail::StackUnderflow)?;
    let args_offset = frame.pop().ok_or(Fail::StackUnderflow)?;
    let args_size = frame.pop().ok_or(Fail::StackUnderflow)?;
    let ret_offset = frame.pop().ok_or(Fail::StackUnderflow)?;
    let ret_size = frame.pop().ok_or(Fail::StackUnderflow)?;

    if !value.is_zero() && frame.is_static {
        return Err(Fail::StaticModeViolation);
    }

    verify_memory_region(frame, args_offset, args_size.as_usize_saturating())?;
    let ret_region = verify_memory_region(frame, ret_offset, ret_size.as_usize_saturating())?;

    let record = CallRecord {
        gas,
        address,
        value,
        args_offset,
        args_size,
        ret_offset,
        ret_size,
    };

    match host.call(record.clone()) {
        Some(result) => {
            let copy_size = result.return_data.len().min(ret_size.as_usize_saturating());
            if copy_size > 0 {
                frame.memory[ret_region..ret_region + copy_size]
                    .copy_from_slice(&result.return_data[..copy_size]);
            }
            frame.past_calls.push(record);
            frame.push(if result.success { U256::ONE } else { U256::ZERO });
        }
        None => {
            frame.past_calls.push(record);
            frame.push(U256::ZERO);
        }
    }
    Ok(())
}
