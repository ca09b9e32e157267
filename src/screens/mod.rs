pub mod dashboard;
pub mod splash;

// Screens drawn by the renderer:
// - dashboard: timestamp plus IP, CPU/temperature, memory and disk lines
// - splash: startup banner with the hostname
