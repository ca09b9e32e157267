/// Main agent loop
///
/// Startup: blank the panel, take a blocking sample, show the splash.
/// Then sample → render until a shutdown is requested, and finally blank
/// the panel once more and power it off.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::core::{
    DisplayError, DisplayTransport, MetricSource, MetricsSampler, ShutdownToken, Ssd1306Transport,
    SysinfoSource,
};
use crate::renderer::FrameRenderer;
use crate::utils::{AppConfig, Aligner};
use crate::widgets::font_by_name;

/// Everything the agent needs to run, passed explicitly instead of globals
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub config: AppConfig,
    pub shutdown: ShutdownToken,
}

impl AgentContext {
    pub fn new(config: AppConfig, shutdown: ShutdownToken) -> Self {
        Self { config, shutdown }
    }
}

/// Drives sampling and rendering in lockstep on the calling thread
pub struct Scheduler<S: MetricSource, T: DisplayTransport> {
    sampler: MetricsSampler<S>,
    renderer: FrameRenderer<T>,
    shutdown: ShutdownToken,
}

impl<S: MetricSource, T: DisplayTransport> Scheduler<S, T> {
    pub fn new(
        sampler: MetricsSampler<S>,
        renderer: FrameRenderer<T>,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            sampler,
            renderer,
            shutdown,
        }
    }

    pub fn renderer(&self) -> &FrameRenderer<T> {
        &self.renderer
    }

    /// Show the splash, loop until shutdown, then blank the panel
    ///
    /// The blanking runs even when the loop ended on a transport error.
    pub fn run(&mut self) -> Result<()> {
        let outcome = self
            .renderer
            .splash(self.sampler.stats())
            .and_then(|()| self.run_loop());

        if let Err(e) = self.renderer.shutdown() {
            warn!("Failed to clear display on exit: {}", e);
        }

        outcome.context("Display transport failed")
    }

    fn run_loop(&mut self) -> Result<(), DisplayError> {
        let mut frames: u64 = 0;

        // The shutdown flag is only looked at here, between frames
        while !self.shutdown.is_requested() {
            self.sampler.refresh();
            self.renderer.render(self.sampler.stats())?;
            frames += 1;
        }

        info!(frames, "Render loop stopped");
        Ok(())
    }
}

pub struct App {
    context: AgentContext,
}

impl App {
    pub fn new(context: AgentContext) -> Self {
        Self { context }
    }

    /// Open the display and run until SIGINT/SIGTERM
    ///
    /// Fatal errors are returned unlogged; `main` reports them once.
    pub fn run(&self) -> Result<()> {
        let config = &self.context.config;
        let font = font_by_name(&config.font)
            .with_context(|| format!("Unknown font '{}'", config.font))?;

        let transport = Ssd1306Transport::init(
            Path::new(&config.i2c_bus),
            config.oled_width,
            config.oled_height,
            config.i2c_address,
        )
        .context("Failed to initialize OLED")?;

        let mut renderer = FrameRenderer::new(
            transport,
            config.oled_width,
            config.oled_height,
            font,
            Aligner::new(config.display_length),
        );
        renderer.clear().context("Failed to clear OLED")?;

        info!(
            "Sampling {} every {}s",
            config.network_interface, config.update_interval_secs
        );
        let sampler = MetricsSampler::new(
            SysinfoSource::new(&config.thermal_zone),
            config.update_interval(),
            config.network_interface.clone(),
        );

        let mut scheduler = Scheduler::new(sampler, renderer, self.context.shutdown.clone());
        scheduler.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::{MemoryInfo, MockMetricSource};
    use crate::core::CpuTicks;
    use crate::renderer::tests::RecordingTransport;
    use crate::widgets::Frame;
    use std::time::Duration;

    /// Records frames and requests shutdown once `limit` frames were pushed
    struct StopAfter {
        inner: RecordingTransport,
        shutdown: ShutdownToken,
        limit: usize,
    }

    impl DisplayTransport for StopAfter {
        fn push_frame(&mut self, frame: &Frame) -> Result<(), DisplayError> {
            self.inner.push_frame(frame)?;
            if self.inner.frames.len() >= self.limit {
                self.shutdown.request();
            }
            Ok(())
        }

        fn power_off(&mut self) -> Result<(), DisplayError> {
            self.inner.power_off()
        }
    }

    fn source() -> MockMetricSource {
        let mut source = MockMetricSource::new();
        let mut busy = 0;
        source.expect_cpu_ticks().returning(move || {
            busy += 10;
            Ok(CpuTicks { busy, idle: busy })
        });
        source
            .expect_interface_address()
            .returning(|_| Some("192.168.1.5/24".to_string()));
        source.expect_hostname().returning(|| Some("pi".to_string()));
        source.expect_memory().returning(MemoryInfo::default);
        source.expect_disk_partitions().returning(Vec::new);
        source.expect_thermal_millidegrees().returning(|| Ok(42000));
        source
    }

    fn scheduler<T: DisplayTransport>(
        transport: T,
        shutdown: &ShutdownToken,
    ) -> Scheduler<MockMetricSource, T> {
        let sampler = MetricsSampler::new(source(), Duration::ZERO, "wlan0");
        let font = font_by_name("6x10").unwrap();
        let renderer = FrameRenderer::new(transport, 128, 64, font, Aligner::new(16));
        Scheduler::new(sampler, renderer, shutdown.clone())
    }

    #[test]
    fn test_loop_stops_between_frames() {
        let shutdown = ShutdownToken::new();
        let transport = StopAfter {
            inner: RecordingTransport::default(),
            shutdown: shutdown.clone(),
            // splash + three metric frames
            limit: 4,
        };

        let mut scheduler = scheduler(transport, &shutdown);
        scheduler.run().unwrap();

        let transport = &scheduler.renderer().transport().inner;
        assert_eq!(transport.frames.len(), 5);
        assert!(!transport.frames[0].is_blank());
        assert!(transport.frames[4].is_blank());
        assert!(transport.powered_off);
    }

    #[test]
    fn test_shutdown_before_first_frame() {
        let shutdown = ShutdownToken::new();
        shutdown.request();

        let mut scheduler = scheduler(RecordingTransport::default(), &shutdown);
        scheduler.run().unwrap();

        let transport = scheduler.renderer().transport();
        // Splash, then the exit blank; no metric frames
        assert_eq!(transport.frames.len(), 2);
        assert!(transport.frames[1].is_blank());
        assert!(transport.powered_off);
    }

    #[test]
    fn test_transport_error_ends_loop() {
        let shutdown = ShutdownToken::new();
        let transport = RecordingTransport {
            fail_after: Some(3),
            ..RecordingTransport::default()
        };

        let mut scheduler = scheduler(transport, &shutdown);
        let err = scheduler.run().unwrap_err();

        assert!(format!("{:#}", err).contains("I2C write failed"));
        let transport = scheduler.renderer().transport();
        assert_eq!(transport.frames.len(), 3);
        assert!(!shutdown.is_requested());
    }
}
