//! Synthetic heart-rate and body-temperature sensors for live training.

mod simulator;

pub use simulator::BiometricSimulator;
