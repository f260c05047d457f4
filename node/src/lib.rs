#![cfg_attr(not(feature = "simulator"), no_std)]

pub mod gate_timer;
pub mod modules;
pub mod sensor;

pub use gate_timer::GateTimer;
pub use modules::humidity_temperature::HumidityTemperatureModule;
pub use modules::SensorModule;
pub use sensor::{DhtReading, DhtSensor, SensorError};

#[cfg(feature = "simulator")]
pub use sensor::{ScriptedDht, SimDht};
