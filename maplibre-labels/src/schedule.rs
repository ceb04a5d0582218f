//! Decides when the labeling worker rebuilds.
//!
//! [`RelabelSchedule`] is a plain state machine. It does not sleep or read clocks by itself: every
//! transition which depends on time takes the current [`Instant`] as an argument, and the worker
//! waits for as long as [`Step::Wait`] tells it to.

use std::time::Duration;

use instant::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Nothing to do, waiting for a relabel request.
    Idle,
    /// A build is pending and starts at `deadline`.
    Debounce { deadline: Instant },
    /// A build is running.
    Building,
    /// The worker is shut down.
    Stopped,
}

/// What the worker should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Wait for a signal. With a timeout, the worker has to poll again once it elapsed.
    Wait(Option<Duration>),
    Build,
    Exit,
}

pub struct RelabelSchedule {
    state: WorkerState,
    /// Latched if a request arrived while a build was pending or running.
    rerun: bool,
    debounce: Duration,
}

impl RelabelSchedule {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: WorkerState::Idle,
            rerun: false,
            debounce,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn rerun_requested(&self) -> bool {
        self.rerun
    }

    /// Registers a relabel request. Returns whether the worker has to be woken up.
    ///
    /// A request never moves an already running debounce deadline.
    pub fn request(&mut self, now: Instant) -> bool {
        match self.state {
            WorkerState::Idle => {
                self.state = WorkerState::Debounce {
                    deadline: now + self.debounce,
                };
                true
            }
            WorkerState::Debounce { .. } | WorkerState::Building => {
                self.rerun = true;
                false
            }
            WorkerState::Stopped => false,
        }
    }

    /// Advances the schedule.
    pub fn poll(&mut self, now: Instant) -> Step {
        match self.state {
            WorkerState::Idle => Step::Wait(None),
            WorkerState::Debounce { deadline } if now < deadline => {
                Step::Wait(Some(deadline - now))
            }
            WorkerState::Debounce { .. } => {
                // The build which starts now covers every request up to this point.
                self.state = WorkerState::Building;
                self.rerun = false;
                Step::Build
            }
            WorkerState::Building => Step::Build,
            WorkerState::Stopped => Step::Exit,
        }
    }

    /// Called after a build, regardless of its outcome. Requests which arrived during the build
    /// start a new debounce interval.
    pub fn finish_build(&mut self, now: Instant) {
        if self.state != WorkerState::Building {
            return;
        }

        if self.rerun {
            self.rerun = false;
            self.state = WorkerState::Debounce {
                deadline: now + self.debounce,
            };
        } else {
            self.state = WorkerState::Idle;
        }
    }

    pub fn stop(&mut self) {
        self.state = WorkerState::Stopped;
        self.rerun = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.state == WorkerState::Stopped
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use instant::Instant;

    use crate::schedule::{RelabelSchedule, Step, WorkerState};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_idle_waits_without_timeout() {
        let mut schedule = RelabelSchedule::new(DEBOUNCE);
        assert_eq!(schedule.poll(Instant::now()), Step::Wait(None));
        assert_eq!(schedule.state(), WorkerState::Idle);
    }

    #[test]
    fn test_burst_coalesces_into_one_build() {
        let start = Instant::now();
        let mut schedule = RelabelSchedule::new(DEBOUNCE);

        assert!(schedule.request(start));
        for i in 1..10 {
            assert!(!schedule.request(start + ms(i * 20)));
        }

        assert_eq!(schedule.poll(start + ms(100)), Step::Wait(Some(ms(200))));
        assert_eq!(schedule.poll(start + ms(300)), Step::Build);
        assert!(!schedule.rerun_requested());

        schedule.finish_build(start + ms(350));
        assert_eq!(schedule.state(), WorkerState::Idle);
        assert_eq!(schedule.poll(start + ms(1000)), Step::Wait(None));
    }

    #[test]
    fn test_requests_do_not_move_deadline() {
        let start = Instant::now();
        let mut schedule = RelabelSchedule::new(DEBOUNCE);

        schedule.request(start);
        schedule.request(start + ms(250));

        assert_eq!(
            schedule.state(),
            WorkerState::Debounce {
                deadline: start + DEBOUNCE
            }
        );
    }

    #[test]
    fn test_request_during_build_reruns_once() {
        let start = Instant::now();
        let mut schedule = RelabelSchedule::new(DEBOUNCE);

        schedule.request(start);
        assert_eq!(schedule.poll(start + ms(300)), Step::Build);

        assert!(!schedule.request(start + ms(310)));
        assert!(!schedule.request(start + ms(320)));
        assert!(schedule.rerun_requested());

        schedule.finish_build(start + ms(400));
        assert_eq!(
            schedule.state(),
            WorkerState::Debounce {
                deadline: start + ms(700)
            }
        );
        assert_eq!(schedule.poll(start + ms(700)), Step::Build);

        schedule.finish_build(start + ms(750));
        assert_eq!(schedule.state(), WorkerState::Idle);
    }

    #[test]
    fn test_stop() {
        let start = Instant::now();
        let mut schedule = RelabelSchedule::new(DEBOUNCE);

        schedule.request(start);
        schedule.stop();

        assert_eq!(schedule.poll(start), Step::Exit);
        assert!(!schedule.request(start));
        schedule.finish_build(start);
        assert!(schedule.is_stopped());
    }
}
