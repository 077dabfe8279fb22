use std::time::Duration;

use anyhow::{bail, Context, Result};
use stagecast_core::config::{PresentationEventConfiguration, WindowMode};
use stagecast_output::output::{DeviceTable, NoticeKind, PresentationNotice, PresentationWindow};
use stagecast_output::surface::SimulatedSurface;
use stagecast_output::{Animator, ContentFrame, Event, EventId, Geometry, Phase};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::config::{Scenario, SimConfig};

/// Bounds of the simulated output device, right of a 1920 wide primary.
pub const DEVICE_BOUNDS: Geometry = Geometry::new(1920, 0, 1920, 1080);

const BURST_LEN: u32 = 5;

/// Outcome of one scenario run.
#[derive(Debug)]
pub struct SimReport {
    pub scenario: Scenario,
    pub notices: Vec<PresentationNotice>,
    pub final_phase: Phase,
    pub painted: Vec<String>,
}

impl SimReport {
    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices.iter().filter(|n| n.kind == kind).count()
    }
}

pub async fn run(config: &SimConfig) -> Result<SimReport> {
    let devices =
        DeviceTable::new().with_device(config.device.as_str(), DEVICE_BOUNDS, config.transitions);

    let device = config.device.as_str();
    let builder = match config.mode {
        WindowMode::FullScreen => PresentationEventConfiguration::fullscreen(device),
        WindowMode::Floating => PresentationEventConfiguration::floating(device),
    };
    let event_config = builder
        .wait_for_in_flight(config.wait_for_in_flight)
        .build()
        .context("build event configuration")?;

    let surface = SimulatedSurface::new().context("start simulated surface")?;
    let window = PresentationWindow::new(&event_config, surface.clone(), &devices, &devices)
        .with_context(|| format!("create presentation window for {}", config.device))?;

    let mut rx = window.subscribe_notices();
    let mut notices = Vec::new();
    let limit = config.hold + config.animate * 12 + Duration::from_secs(2);
    let fade = || (!config.animate.is_zero()).then(|| Animator::fade(config.animate));

    info!(
        scenario = config.scenario.label(),
        device = %config.device,
        mode = config.mode.label(),
        transitions = window.transitions_supported(),
        "scenario started"
    );

    match config.scenario {
        Scenario::Hold => {
            let ev = Event::send_wait_clear(
                event_config.clone(),
                fade(),
                ContentFrame::new("notice", 800, 600),
                fade(),
                config.hold,
            );
            window.execute(ev);
            wait_for(&mut rx, &mut notices, limit, |n| n.kind == NoticeKind::OutComplete).await?;
        }
        Scenario::Accelerate => {
            let slide = ContentFrame::new("slide", 800, 600);
            let base = Event::send(event_config.clone(), None, slide);
            let base_id = base.id();
            window.execute(base);
            wait_for(&mut rx, &mut notices, limit, is(base_id, NoticeKind::InComplete)).await?;

            let note = Event::send_wait_clear(
                event_config.clone(),
                fade(),
                ContentFrame::new("notice", 400, 300).at(100, 100),
                fade(),
                config.hold,
            );
            let note_id = note.id();
            window.execute(note);
            wait_for(&mut rx, &mut notices, limit, is(note_id, NoticeKind::InBegin)).await?;

            let next_slide = ContentFrame::new("next-slide", 800, 600);
            let next = Event::send(event_config.clone(), fade(), next_slide);
            let next_id = next.id();
            window.execute(next);
            wait_for(&mut rx, &mut notices, limit, is(next_id, NoticeKind::InComplete)).await?;
        }
        Scenario::Burst => {
            let mut last = None;
            for i in 0..BURST_LEN {
                let frame = ContentFrame::new(format!("burst-{i}"), 640 + i * 40, 480 + i * 30);
                let ev = Event::send(event_config.clone(), fade(), frame);
                last = Some(ev.id());
                window.execute(ev);
            }
            if let Some(last) = last {
                wait_for(&mut rx, &mut notices, limit, is(last, NoticeKind::InComplete)).await?;
            }
        }
    }

    let painted = surface
        .painted()
        .iter()
        .filter_map(|e| e.content().map(|c| c.label.clone()))
        .collect();

    Ok(SimReport {
        scenario: config.scenario,
        notices,
        final_phase: window.phase(),
        painted,
    })
}

fn is(event: EventId, kind: NoticeKind) -> impl Fn(&PresentationNotice) -> bool {
    move |n| n.event == event && n.kind == kind
}

async fn wait_for<F>(
    rx: &mut broadcast::Receiver<PresentationNotice>,
    seen: &mut Vec<PresentationNotice>,
    limit: Duration,
    done: F,
) -> Result<()>
where
    F: Fn(&PresentationNotice) -> bool,
{
    let waited = tokio::time::timeout(limit, async {
        loop {
            match rx.recv().await {
                Ok(notice) => {
                    info!(
                        event = %notice.event,
                        kind = ?notice.kind,
                        phase = notice.phase.label(),
                        "notice"
                    );
                    let finished = done(&notice);
                    seen.push(notice);
                    if finished {
                        return Ok::<(), anyhow::Error>(());
                    }
                }
                Err(RecvError::Lagged(n)) => warn!(skipped = n, "notice stream lagged"),
                Err(RecvError::Closed) => bail!("notice stream closed"),
            }
        }
    })
    .await;

    match waited {
        Ok(result) => result,
        Err(_) => bail!("scenario did not settle within {limit:?}"),
    }
}
