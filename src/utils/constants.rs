/// Defaults and fixed values for the OLED stats agent

/// Character columns shown on the panel
pub const DEFAULT_DISPLAY_LENGTH: usize = 16;

/// Seconds between two CPU counter readings (also the refresh cadence)
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 3;

/// Interface whose address is shown on the IP line
pub const DEFAULT_NETWORK_INTERFACE: &str = "wlan0";

/// Panel geometry in pixels
pub const OLED_WIDTH: u32 = 128;
pub const OLED_HEIGHT: u32 = 64;

/// I2C bus device and SSD1306 address
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;

pub const DEFAULT_FONT: &str = "6x10";

pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

pub const PROC_STAT: &str = "/proc/stat";

/// Marker in a line template that expands into padding
pub const PLACEHOLDER: char = '*';

pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// Splash banner greeting
pub const SPLASH_GREETING: &str = "Hello!!";

/// Vertical gap between text lines, in pixels
pub const LINE_SPACING: u32 = 2;

/// Side of the square liveness indicator in the top-right corner
pub const TICK_SIZE: u32 = 3;

/// Inset of the black inner rectangle on the splash frame
pub const SPLASH_BORDER: u32 = 3;

pub const TIMESTAMP_FORMAT: &str = "%m/%d %H:%M:%S";
