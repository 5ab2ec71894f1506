use crate::data::collector::Collector;
use crate::data::snapshot::{GpuReport, MetricKind, RefreshTick};
use crate::data::source::{CommandRunner, FileReader};
use crate::error::CollectorError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub mod collector;
pub mod snapshot;
pub mod source;

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 3000;
pub const MIN_REFRESH_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Active,
}

/// Re-samples the GPU metrics on a fixed period and publishes each refresh
/// on a channel.
///
/// The scheduler starts once, when the GPU view is built, and then runs until
/// the receiving side is dropped.
pub struct RefreshScheduler {
    period: Duration,
    state: SchedulerState,
}

impl RefreshScheduler {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period: Duration::from_millis(period_ms.max(MIN_REFRESH_INTERVAL_MS)),
            state: SchedulerState::Idle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Spawn the refresh loop. Returns `None` if it is already running.
    pub fn start<R, F>(
        &mut self,
        collector: Arc<Collector<R, F>>,
        sender: mpsc::UnboundedSender<RefreshTick>,
    ) -> Option<JoinHandle<u64>>
    where
        R: CommandRunner + 'static,
        F: FileReader + 'static,
    {
        if self.state == SchedulerState::Active {
            warn!("refresh scheduler already running");
            return None;
        }
        self.state = SchedulerState::Active;
        info!(period_ms = self.period.as_millis() as u64, "starting GPU refresh");

        let period = self.period;
        Some(tokio::spawn(async move {
            run_refresh_loop(
                period,
                move || {
                    let collector = Arc::clone(&collector);
                    async move {
                        // Collectors block on subprocesses; keep them off the async workers.
                        tokio::task::spawn_blocking(move || collector.gpu_report())
                            .await
                            .unwrap_or_else(|err| {
                                warn!("GPU collection task failed: {}", err);
                                unavailable_report()
                            })
                    }
                },
                |tick| sender.send(tick).is_ok(),
            )
            .await
        }))
    }
}

/// Drive refreshes until `publish` reports the consumer is gone.
///
/// The first refresh fires one full period after the call. Late ticks are
/// delayed rather than skipped, so tick numbers run 1, 2, 3, ... without
/// gaps. Returns the number of the last tick produced.
pub async fn run_refresh_loop<C, Fut, P>(period: Duration, mut collect: C, mut publish: P) -> u64
where
    C: FnMut() -> Fut,
    Fut: Future<Output = GpuReport>,
    P: FnMut(RefreshTick) -> bool,
{
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick = 0u64;

    loop {
        interval.tick().await;
        tick += 1;
        let report = collect().await;

        if !publish(RefreshTick { tick, report }) {
            // Receiver dropped, exit the loop
            debug!(tick, "display went away, stopping refresh");
            break;
        }

        // Yield control back to the executor to allow other tasks to run
        tokio::task::yield_now().await;
    }

    tick
}

fn unavailable_report() -> GpuReport {
    let failed = |kind: MetricKind| crate::data::snapshot::CollectorResult {
        kind,
        outcome: Err(CollectorError::CommandFailed {
            program: "GPU collector".to_string(),
            status: "task aborted".to_string(),
        }),
    };
    GpuReport {
        name: failed(MetricKind::GpuName),
        temperature: failed(MetricKind::GpuTemperature),
        fan_speed: failed(MetricKind::GpuFanSpeed),
    }
}
