use std::collections::{HashSet, VecDeque};
use std::num::NonZeroUsize;

use log::{debug, trace};

use crate::error::{Error, ProcessFault, Result};
use crate::queue::ReadyQueue;
use crate::trace::{ExecutionTrace, Slice};
use crate::SchedulingDecision::{Done, Idle, Run};
use crate::{
    Config, Pid, Process, ProcessSpec, ProcessState, Scheduler, SchedulingDecision, Simulation,
    Stop, StopReason, TieBreak,
};

/// The process currently holding the CPU.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Dispatch {
    slot: usize,
    start: usize,
    timeslice: NonZeroUsize,
}

/// Preemptive Round-Robin over a fixed process set.
///
/// Processes are referred to by their slot in `processes`, which keeps the
/// input order for the whole run.
pub struct RoundRobin {
    processes: Vec<Process>,
    /// Slots not admitted yet, in admission order.
    arrivals: VecDeque<usize>,
    ready_queue: ReadyQueue<usize>,
    current_process: Option<Dispatch>,
    trace: ExecutionTrace,
    timeslice: NonZeroUsize,
    clock: usize,
}

impl RoundRobin {
    /// Validates the process set and the configuration.
    ///
    /// Nothing is simulated if this fails.
    pub fn new<I>(specs: I, config: Config) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<ProcessSpec>,
    {
        let timeslice =
            NonZeroUsize::new(config.quantum).ok_or(Error::InvalidQuantum(config.quantum))?;

        let mut pids = HashSet::new();
        let processes = specs
            .into_iter()
            .map(|spec| {
                let spec: ProcessSpec = spec.into();
                let process = Process::from_spec(spec)?;
                if !pids.insert(process.pid()) {
                    return Err(Error::InvalidProcess {
                        pid: spec.pid,
                        fault: ProcessFault::DuplicatePid,
                    });
                }
                Ok(process)
            })
            .collect::<Result<Vec<_>>>()?;

        if processes.is_empty() && config.require_processes {
            return Err(Error::EmptyInput);
        }

        // both sorts are stable, equal keys keep the input order
        let mut arrivals = (0..processes.len()).collect::<Vec<_>>();
        match config.tie_break {
            TieBreak::InputOrder => arrivals.sort_by_key(|&slot| processes[slot].arrival_time()),
            TieBreak::Pid => arrivals.sort_by_key(|&slot| {
                (processes[slot].arrival_time(), processes[slot].pid())
            }),
        }

        // work-conserving, so the run ends at this time whatever the quantum
        arrivals.iter().try_fold(0usize, |end, &slot| {
            let process = &processes[slot];
            end.max(process.arrival_time())
                .checked_add(process.burst_time())
                .ok_or(Error::InvalidProcess {
                    pid: process.pid().get() as i64,
                    fault: ProcessFault::TimeOverflow,
                })
        })?;

        let clock = arrivals
            .first()
            .map_or(0, |&slot| processes[slot].arrival_time());

        debug!(
            "round robin: {} processes, quantum {}, {:?} tie-break, starting at {}",
            processes.len(),
            timeslice,
            config.tie_break,
            clock
        );

        Ok(RoundRobin {
            processes,
            arrivals: arrivals.into(),
            ready_queue: ReadyQueue::new(),
            current_process: None,
            trace: ExecutionTrace::new(),
            timeslice,
            clock,
        })
    }

    /// Moves every process that has arrived by the current time into the
    /// ready queue.
    fn admit(&mut self) {
        let mut admitted = Vec::new();
        while let Some(&slot) = self.arrivals.front() {
            let process = &mut self.processes[slot];
            if process.arrival_time() > self.clock {
                break;
            }
            process.admit();
            trace!("t={}: admit {}", self.clock, process.pid());
            self.arrivals.pop_front();
            admitted.push(slot);
        }
        self.ready_queue.push_back_many(admitted);
    }

    fn decision(&self, dispatch: Dispatch) -> SchedulingDecision {
        Run {
            pid: self.processes[dispatch.slot].pid(),
            start: dispatch.start,
            timeslice: dispatch.timeslice,
        }
    }
}

impl Scheduler for RoundRobin {
    fn next(&mut self) -> SchedulingDecision {
        if let Some(dispatch) = self.current_process {
            return self.decision(dispatch);
        }

        self.admit();

        if let Ok(slot) = self.ready_queue.pop_front() {
            let process = &mut self.processes[slot];
            process.dispatch(self.clock);
            let timeslice = NonZeroUsize::new(process.remaining_time())
                .map_or(self.timeslice, |remaining| remaining.min(self.timeslice));
            debug!(
                "t={}: dispatch {} for {}",
                self.clock,
                process.pid(),
                timeslice
            );

            let dispatch = Dispatch {
                slot,
                start: self.clock,
                timeslice,
            };
            self.current_process = Some(dispatch);
            return self.decision(dispatch);
        }

        let Some(&slot) = self.arrivals.front() else {
            debug!("t={}: all processes completed", self.clock);
            return Done;
        };

        let arrival = self.processes[slot].arrival_time();
        match NonZeroUsize::new(arrival - self.clock) {
            Some(amount) => {
                debug!("t={}: idle until {}", self.clock, arrival);
                self.clock = arrival;
                Idle(amount)
            }
            None => unreachable!("process arriving at {} was not admitted", arrival),
        }
    }

    fn stop(&mut self) -> Option<Stop> {
        let dispatch = self.current_process.take()?;
        let amount = dispatch.timeslice.get();
        self.clock = dispatch.start + amount;

        let process = &mut self.processes[dispatch.slot];
        let slice = Slice {
            pid: process.pid(),
            start: dispatch.start,
            end: self.clock,
        };
        self.trace.push(slice);

        let reason = match process.execute(amount, self.clock) {
            ProcessState::Completed => {
                debug!("t={}: {} completed", self.clock, slice.pid);
                StopReason::Completed
            }
            _ => {
                // arrivals at this instant go ahead of the preempted process
                self.admit();
                self.ready_queue.push_back(dispatch.slot);
                debug!("t={}: {} preempted", self.clock, slice.pid);
                StopReason::Expired
            }
        };

        Some(Stop { slice, reason })
    }

    fn clock(&self) -> usize {
        self.clock
    }

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn ready(&self) -> Vec<Pid> {
        self.ready_queue
            .iter()
            .map(|&slot| self.processes[slot].pid())
            .collect()
    }

    fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    fn into_simulation(self) -> Simulation {
        Simulation {
            processes: self.processes,
            trace: self.trace,
            end_time: self.clock,
        }
    }
}
