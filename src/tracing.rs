//! Execution tracing (spec.md §3 "Evm", SPEC_FULL.md §3.2).
//!
//! Diagnostic instrumentation over a single [`step_n`](crate::interpreter::step_n)
//! call, not the system-level logging of an external driver: a [`Tracer`]
//! only ever sees the one call frame it's handed.

use crate::opcode::OpCode;
use crate::state::State;

/// Hooks a caller can observe a single interpreter run through. The
/// "dummy" instance ([`NoopTracer`]) costs nothing at the call sites —
/// `notify_*` are plain no-ops the optimizer erases, not behind a runtime
/// branch.
pub trait Tracer {
    /// Called once before the first step of a `step_n` run.
    fn notify_execution_start(&mut self, _state: &State) {}

    /// Called before each instruction is dispatched.
    fn notify_instruction_start(&mut self, _pc: u16, _op: OpCode, _state: &State) {}

    /// Called once after the run stops, whether it went terminal or just
    /// ran out of steps.
    fn notify_execution_end(&mut self, _state: &State) {}
}

/// The zero-cost tracer used when nobody asked to observe anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Prints every step to stdout as it happens, for interactive debugging of
/// a single run. Not meant for programmatic consumption — see
/// [`CallTrace`] for that.
#[derive(Debug, Default)]
pub struct StdoutTracer;

impl Tracer for StdoutTracer {
    fn notify_execution_start(&mut self, state: &State) {
        println!("=== execution start: gas={} pc={} ===", state.gas(), state.pc());
    }

    fn notify_instruction_start(&mut self, pc: u16, op: OpCode, state: &State) {
        println!(
            "pc={pc:>5} op={:<12} gas={:<12} stack={:?}",
            op.name(),
            state.gas(),
            state.stack()
        );
    }

    fn notify_execution_end(&mut self, state: &State) {
        println!("=== execution end: status={:?} gas={} ===", state.status(), state.gas());
    }
}

/// Records every step of a run into an in-memory log, for tests and
/// tooling that want to inspect a trace programmatically rather than read
/// it off stdout.
#[derive(Debug, Default, Clone)]
pub struct CallTrace {
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone)]
pub struct TraceStep {
    pub pc: u16,
    pub op: OpCode,
    pub gas_before: u64,
}

impl Tracer for CallTrace {
    fn notify_instruction_start(&mut self, pc: u16, op: OpCode, state: &State) {
        self.steps.push(TraceStep {
            pc,
            op,
            gas_before: *state.gas(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_trace_records_one_entry_per_instruction() {
        let mut trace = CallTrace::default();
        let state = State::new(vec![OpCode::STOP.0]);
        trace.notify_instruction_start(0, OpCode::STOP, &state);
        trace.notify_instruction_start(1, OpCode::ADD, &state);
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[0].op, OpCode::STOP);
    }

    #[test]
    fn noop_tracer_accepts_every_call_without_recording_anything() {
        let mut tracer = NoopTracer;
        let state = State::new(vec![]);
        tracer.notify_execution_start(&state);
        tracer.notify_instruction_start(0, OpCode::STOP, &state);
        tracer.notify_execution_end(&state);
    }
}
