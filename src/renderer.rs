/// Frame composition and transfer to the OLED
///
/// Every render redraws the whole frame: clear, liveness tick, text, flush.
/// There is no partial invalidation, so a frame never mixes old and new state.

use std::convert::Infallible;

use chrono::{Local, NaiveDateTime};
use embedded_graphics::mono_font::MonoFont;
use tracing::trace;

use crate::core::{DisplayError, DisplayTransport, Stats};
use crate::screens::{dashboard, splash};
use crate::utils::{Aligner, TIMESTAMP_FORMAT};
use crate::widgets::{Frame, TickIndicator};

/// Where the renderer is within one render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Cleared,
    Composed,
    Flushed,
}

fn drawn(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

pub struct FrameRenderer<T: DisplayTransport> {
    transport: T,
    frame: Frame,
    font: &'static MonoFont<'static>,
    aligner: Aligner,
    tick: TickIndicator,
    phase: RenderPhase,
}

impl<T: DisplayTransport> FrameRenderer<T> {
    pub fn new(
        transport: T,
        width: u32,
        height: u32,
        font: &'static MonoFont<'static>,
        aligner: Aligner,
    ) -> Self {
        Self {
            transport,
            frame: Frame::new(width, height),
            font,
            aligner,
            tick: TickIndicator::new(),
            phase: RenderPhase::Idle,
        }
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Last composed frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Draw the metrics screen stamped with the current local time
    pub fn render(&mut self, stats: &Stats) -> Result<(), DisplayError> {
        self.render_at(stats, Local::now().naive_local())
    }

    pub fn render_at(&mut self, stats: &Stats, now: NaiveDateTime) -> Result<(), DisplayError> {
        self.clear_frame();

        let filled = self.tick.advance();
        drawn(TickIndicator::draw(filled, &mut self.frame));

        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        let lines = dashboard::metric_lines(stats, &self.aligner);
        drawn(dashboard::draw(&mut self.frame, self.font, &timestamp, &lines));
        self.enter(RenderPhase::Composed);

        self.flush()
    }

    /// Startup banner showing the hostname
    pub fn splash(&mut self, stats: &Stats) -> Result<(), DisplayError> {
        self.clear_frame();
        drawn(splash::draw(&mut self.frame, self.font, &stats.hostname));
        self.enter(RenderPhase::Composed);
        self.flush()
    }

    /// Push an empty frame
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.clear_frame();
        self.flush()
    }

    /// Leave the panel blank and switch it off
    pub fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.clear()?;
        self.transport.power_off()
    }

    fn clear_frame(&mut self) {
        self.frame.fill(false);
        self.enter(RenderPhase::Cleared);
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let result = self.transport.push_frame(&self.frame);
        if result.is_ok() {
            self.enter(RenderPhase::Flushed);
        }
        self.enter(RenderPhase::Idle);
        result
    }

    fn enter(&mut self, phase: RenderPhase) {
        trace!(from = ?self.phase, to = ?phase, "Render phase");
        self.phase = phase;
    }
}
