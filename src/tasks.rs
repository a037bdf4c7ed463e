//! Periodic background tasks.
//!
//! None of these subsystems has sensors wired yet; each task only ticks.

use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundTask {
    // TODO: report heap use and open connection count once those are exposed.
    SystemMonitor,
    // TODO: read the tank level sensor and switch the water pump; the
    // dashboard shows a fixed placeholder until then.
    LiquidLevelControl,
    // TODO: sample the LDR and drive the lamps from ambient light.
    LightSensor,
    // TODO: handle PIR motion events for automatic lamp shut-off.
    MotionSensor,
    // TODO: push sensor readings into the page renderer instead of
    // rendering placeholders.
    StatusPageUpdate,
}

impl BackgroundTask {
    pub const ALL: [BackgroundTask; 5] = [
        BackgroundTask::SystemMonitor,
        BackgroundTask::LiquidLevelControl,
        BackgroundTask::LightSensor,
        BackgroundTask::MotionSensor,
        BackgroundTask::StatusPageUpdate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BackgroundTask::SystemMonitor => "system-monitor",
            BackgroundTask::LiquidLevelControl => "liquid-level",
            BackgroundTask::LightSensor => "ldr",
            BackgroundTask::MotionSensor => "pir",
            BackgroundTask::StatusPageUpdate => "status-page",
        }
    }

    /// No-op body shared by every task until its driver exists.
    fn tick(self) {
        tracing::trace!(task = self.name(), "tick");
    }

    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                self.tick();
            }
        })
    }
}

pub fn spawn_all(period: Duration) -> Vec<JoinHandle<()>> {
    BackgroundTask::ALL
        .into_iter()
        .map(|task| task.spawn(period))
        .collect()
}
