use serde::{Deserialize, Serialize};

use super::RunNumber;

/// Lifecycle states of a converter instance.
/// `Uninitialized` has no representation: a converter only exists once
/// initialization succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConverterState {
    /// Products declared, no run seen yet.
    Initialized,
    /// Between begin-run and end-run of the given run.
    RunActive(RunNumber),
    /// Last run flushed, waiting for the next begin-run or job end.
    RunFinalized,
    /// Job ended. Terminal.
    Terminated,
}

/// Host callbacks that request a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleRequest {
    BeginRun(RunNumber),
    EndRun(RunNumber),
    EndJob,
}

pub struct Lifecycle;

impl Lifecycle {
    /// Pure function: (current state, request) -> next state.
    /// Returns None if the host delivered a callback out of order.
    pub fn transition(current: ConverterState, request: LifecycleRequest) -> Option<ConverterState> {
        use ConverterState::*;
        use LifecycleRequest::*;

        match (current, request) {
            (Initialized | RunFinalized, BeginRun(run)) => Some(RunActive(run)),
            (RunActive(active), EndRun(run)) if active == run => Some(RunFinalized),
            (Initialized | RunFinalized, EndJob) => Some(Terminated),
            // Runs never overlap, and nothing leaves Terminated.
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConverterState::*;
    use LifecycleRequest::*;

    #[test]
    fn full_job_walks_the_graph() {
        let mut state = Initialized;
        for request in [BeginRun(1), EndRun(1), BeginRun(2), EndRun(2), EndJob] {
            state = Lifecycle::transition(state, request).unwrap();
        }
        assert_eq!(state, Terminated);
    }

    #[test]
    fn end_run_must_match_active_run() {
        assert_eq!(Lifecycle::transition(RunActive(5), EndRun(6)), None);
        assert_eq!(Lifecycle::transition(Initialized, EndRun(5)), None);
    }

    #[test]
    fn runs_do_not_nest() {
        assert_eq!(Lifecycle::transition(RunActive(5), BeginRun(6)), None);
        assert_eq!(Lifecycle::transition(RunActive(5), EndJob), None);
    }

    #[test]
    fn terminated_is_final() {
        for request in [BeginRun(1), EndRun(1), EndJob] {
            assert_eq!(Lifecycle::transition(Terminated, request), None);
        }
    }
}
