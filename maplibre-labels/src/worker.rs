//! The background thread which rebuilds the text layer.

use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard},
    thread::{self, JoinHandle},
};

use instant::Instant;

use crate::{
    builder::{BuildOutcome, LabelLayerBuilder},
    environment::{LabelEnvironment, RedrawTrigger},
    error::Error,
    handoff::Handoff,
    kernel::Kernel,
    schedule::{RelabelSchedule, Step},
    settings::LabelSettings,
    text::TextLayer,
    tile::{TileSnapshot, TileSource},
    view_state::Viewport,
};

/// State shared between the worker thread and the signalling side.
struct Signal {
    schedule: Mutex<RelabelSchedule>,
    wake: Condvar,
}

impl Signal {
    fn lock(&self) -> Result<MutexGuard<'_, RelabelSchedule>, Error> {
        self.schedule.lock().map_err(Error::poisoned("relabel schedule"))
    }
}

/// Handle to the labeling thread.
///
/// The thread waits until a relabel is requested, waits for the debounce interval, builds the
/// next layer and publishes it to the [`Handoff`].
pub struct LabelWorker {
    signal: Arc<Signal>,
    thread: Option<JoinHandle<()>>,
}

impl LabelWorker {
    pub fn spawn<E: LabelEnvironment>(
        kernel: Kernel<E>,
        handoff: Arc<Handoff<E::Resources>>,
        settings: &LabelSettings,
    ) -> Result<Self, Error> {
        let signal = Arc::new(Signal {
            schedule: Mutex::new(RelabelSchedule::new(settings.debounce)),
            wake: Condvar::new(),
        });

        let mut worker_loop = WorkerLoop {
            kernel,
            handoff,
            builder: LabelLayerBuilder::new(settings),
            signal: signal.clone(),
            work_layer: None,
            snapshot: None,
        };

        let thread = thread::Builder::new()
            .name(settings.thread_name.clone())
            .spawn(move || {
                log::info!("labeling thread started");
                if let Err(e) = worker_loop.run() {
                    log::error!("labeling thread failed: {}", e);
                }
                log::info!("labeling thread stopped");
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            signal,
            thread: Some(thread),
        })
    }

    /// Requests a rebuild. Cheap to call as often as needed; requests coalesce while a rebuild is
    /// pending.
    pub fn request_relabel(&self) -> Result<(), Error> {
        let mut schedule = self.signal.lock()?;
        if schedule.request(Instant::now()) {
            log::debug!("relabel requested");
            self.signal.wake.notify_one();
        }
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.thread.is_none()
    }

    /// Stops the thread and waits for it to exit. A build which is running is finished first.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        {
            let mut schedule = self.signal.lock()?;
            schedule.stop();
            self.signal.wake.notify_all();
        }

        if thread.join().is_err() {
            log::error!("labeling thread panicked");
        }
        Ok(())
    }
}

impl Drop for LabelWorker {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("failed to shut down labeling thread: {}", e);
        }
    }
}

struct WorkerLoop<E: LabelEnvironment> {
    kernel: Kernel<E>,
    handoff: Arc<Handoff<E::Resources>>,
    builder: LabelLayerBuilder,
    signal: Arc<Signal>,
    /// Owned exclusively by this thread while it is not published.
    work_layer: Option<Box<TextLayer<E::Resources>>>,
    snapshot: Option<TileSnapshot>,
}

impl<E: LabelEnvironment> WorkerLoop<E> {
    fn run(&mut self) -> Result<(), Error> {
        while self.wait_for_work()? {
            self.relabel()?;

            let mut schedule = self.signal.lock()?;
            schedule.finish_build(Instant::now());
        }
        Ok(())
    }

    /// Blocks until the next build is due. Returns `false` once the worker is stopped.
    fn wait_for_work(&self) -> Result<bool, Error> {
        let mut schedule = self.signal.lock()?;
        loop {
            schedule = match schedule.poll(Instant::now()) {
                Step::Build => return Ok(true),
                Step::Exit => return Ok(false),
                Step::Wait(None) => self
                    .signal
                    .wake
                    .wait(schedule)
                    .map_err(Error::poisoned("relabel schedule"))?,
                Step::Wait(Some(timeout)) => {
                    self.signal
                        .wake
                        .wait_timeout(schedule, timeout)
                        .map_err(Error::poisoned("relabel schedule"))?
                        .0
                }
            };
        }
    }

    fn take_work_layer(&mut self) -> Result<Box<TextLayer<E::Resources>>, Error> {
        if let Some(layer) = self.work_layer.take() {
            return Ok(layer);
        }
        if let Some(layer) = self.handoff.take_recycled()? {
            return Ok(layer);
        }
        log::debug!("allocating text layer");
        Ok(Box::default())
    }

    #[tracing::instrument(skip_all)]
    fn relabel(&mut self) -> Result<(), Error> {
        let snapshot = self
            .kernel
            .tile_source_mut()
            .active_tiles(self.snapshot.as_ref());
        let pose = self.kernel.viewport().current_pose();

        let mut layer = self.take_work_layer()?;
        let outcome = self.builder.build(&snapshot, &pose, &mut layer);
        self.snapshot = Some(snapshot);

        match outcome {
            BuildOutcome::Built(layer_pose) => {
                log::info!(
                    "publishing {} labels at z={}",
                    layer.len(),
                    layer_pose.zoom_level
                );
                self.work_layer = self.handoff.publish(layer, layer_pose)?;
                self.kernel.redraw_trigger().request_redraw();
            }
            BuildOutcome::Unchanged => {
                self.work_layer = Some(layer);
            }
            BuildOutcome::Deferred { zoom_delta } => {
                log::debug!("keeping work layer, zoom delta {} out of range", zoom_delta);
                self.work_layer = Some(layer);
            }
        }

        Ok(())
    }
}
