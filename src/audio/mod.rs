pub mod device;
pub mod engine;
pub mod oscillator;
pub mod voice;
