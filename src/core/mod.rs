pub mod error;
pub mod source;
pub mod metrics;
pub mod display;
pub mod shutdown;

pub use error::{DisplayError, MetricsError};
pub use source::{CpuTicks, DiskPartition, MemoryInfo, MetricSource, SysinfoSource};
pub use metrics::{CpuMode, MetricsSampler, Stats};
pub use display::{blank_and_power_off, DisplayTransport, Ssd1306Transport};
pub use shutdown::{install_signal_handler, ShutdownToken};
