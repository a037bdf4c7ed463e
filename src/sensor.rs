//! On-die temperature sensor.
//!
//! The sensor sits behind ADC input 4. A raw 12-bit sample is converted to
//! volts against a 3.3 V reference, then to degrees Celsius with the fixed
//! calibration line `T = 27 - (Vsense - 0.706) / 0.001721`.

use std::sync::Mutex;

/// ADC input wired to the temperature sensor.
pub const TEMP_SENSOR_CHANNEL: u8 = 4;

/// Full-scale count of the 12-bit converter.
pub const ADC_RANGE: f32 = 4096.0;

/// ADC reference voltage.
pub const ADC_VREF: f32 = 3.3;

/// Sensor voltage at 27 °C.
const VSENSE_AT_27C: f32 = 0.706;

/// Sensor slope in volts per degree.
const VOLTS_PER_DEGREE: f32 = 0.001721;

/// A source of raw analog samples.
pub trait Adc: Send {
    /// Takes one conversion on `channel`.
    fn read(&mut self, channel: u8) -> u16;
}

/// Anything that can report a temperature in degrees Celsius.
pub trait TemperatureSensor: Send + Sync {
    fn read_celsius(&self) -> f32;
}

/// Converts a raw sample to degrees Celsius. Out-of-range samples are not
/// clamped.
pub fn raw_to_celsius(raw: u16) -> f32 {
    let conversion_factor = ADC_VREF / ADC_RANGE;
    let vsense = raw as f32 * conversion_factor;
    27.0 - (vsense - VSENSE_AT_27C) / VOLTS_PER_DEGREE
}

/// The internal sensor read through a shared converter.
///
/// The converter is locked for the duration of one sample, so concurrent
/// connections never interleave conversions.
pub struct InternalThermometer<A> {
    adc: Mutex<A>,
}

impl<A: Adc> InternalThermometer<A> {
    pub fn new(adc: A) -> Self {
        Self { adc: Mutex::new(adc) }
    }

    pub fn read_raw(&self) -> u16 {
        // A poisoned lock only means another reader panicked mid-sample;
        // the converter itself holds no invariant to protect.
        let mut adc = self.adc.lock().unwrap_or_else(|e| e.into_inner());
        adc.read(TEMP_SENSOR_CHANNEL)
    }
}

impl<A: Adc> TemperatureSensor for InternalThermometer<A> {
    fn read_celsius(&self) -> f32 {
        let raw = self.read_raw();
        let celsius = raw_to_celsius(raw);
        tracing::trace!(raw, celsius, "Temperature sample");
        celsius
    }
}

/// Converter stand-in for hosts without the sensor: every conversion
/// returns the same raw count.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedAdc {
    raw: u16,
}

impl SimulatedAdc {
    pub fn new(raw: u16) -> Self {
        Self { raw }
    }
}

impl Adc for SimulatedAdc {
    fn read(&mut self, _channel: u8) -> u16 {
        self.raw
    }
}
