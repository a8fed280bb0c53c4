//! ICAO standard atmosphere, evaluated per altitude query.
//!
//! The integrator only ever asks for density and speed of sound at a given
//! geopotential altitude, so an [`Atmosphere`] is a cheap value constructed
//! on demand rather than a long-lived service.

use mission_core::constants::SEA_LEVEL_DENSITY;

/// Specific gas constant for dry air (J/(kg·K)).
const R_AIR: f64 = 287.053;
/// Heat capacity ratio for air.
const GAMMA: f64 = 1.4;
/// Standard gravity (m/s²).
const G0: f64 = mission_core::constants::G0;

/// Modeled altitude range (m); queries outside are clamped.
const MIN_ALTITUDE_M: f64 = -2_000.0;
const MAX_ALTITUDE_M: f64 = 47_000.0;

/// One ICAO standard-atmosphere layer.
struct Layer {
    base_altitude_m: f64,
    base_temperature_k: f64,
    base_pressure_pa: f64,
    /// Temperature lapse rate (K/m); zero for isothermal layers.
    lapse_rate: f64,
}

/// ICAO layers up to 47 km, covering the integrator's altitude bounds with
/// headroom. Base pressures follow the barometric formula between layers.
const LAYERS: &[Layer] = &[
    // Troposphere (up to 11 km); also extrapolated below sea level.
    Layer {
        base_altitude_m: 0.0,
        base_temperature_k: 288.15,
        base_pressure_pa: 101_325.0,
        lapse_rate: -0.0065,
    },
    // Tropopause (11 - 20 km), isothermal.
    Layer {
        base_altitude_m: 11_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 22_632.1,
        lapse_rate: 0.0,
    },
    // Lower stratosphere (20 - 32 km).
    Layer {
        base_altitude_m: 20_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 5_474.89,
        lapse_rate: 0.001,
    },
    // Upper stratosphere (32 - 47 km).
    Layer {
        base_altitude_m: 32_000.0,
        base_temperature_k: 228.65,
        base_pressure_pa: 868.02,
        lapse_rate: 0.0028,
    },
];

/// Static-air state at one altitude.
#[derive(Debug, Clone, Copy)]
pub struct Atmosphere {
    pub altitude_m: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
}

impl Atmosphere {
    /// Evaluate the standard atmosphere at `altitude_m` (sea-level
    /// referenced, clamped to the modeled −2 to 47 km range).
    pub fn new(altitude_m: f64) -> Self {
        let altitude = altitude_m.clamp(MIN_ALTITUDE_M, MAX_ALTITUDE_M);
        let layer = LAYERS
            .iter()
            .rev()
            .find(|layer| altitude >= layer.base_altitude_m)
            .unwrap_or(&LAYERS[0]);

        let height = altitude - layer.base_altitude_m;
        let temperature = layer.base_temperature_k + layer.lapse_rate * height;
        let pressure = if layer.lapse_rate == 0.0 {
            layer.base_pressure_pa * (-G0 * height / (R_AIR * layer.base_temperature_k)).exp()
        } else {
            layer.base_pressure_pa
                * (temperature / layer.base_temperature_k).powf(-G0 / (layer.lapse_rate * R_AIR))
        };

        Atmosphere {
            altitude_m: altitude,
            temperature_k: temperature,
            pressure_pa: pressure,
            density_kg_m3: pressure / (R_AIR * temperature),
        }
    }

    /// Local speed of sound (m/s).
    pub fn speed_of_sound_m_s(&self) -> f64 {
        (GAMMA * R_AIR * self.temperature_k).sqrt()
    }

    /// Dynamic viscosity of air via Sutherland's law (Pa·s).
    pub fn dynamic_viscosity(&self) -> f64 {
        let t = self.temperature_k;
        1.458e-6 * t.sqrt() * t / (t + 110.4)
    }
}

/// Convert equivalent airspeed to true airspeed at the given altitude.
pub fn eas_to_tas(eas_m_s: f64, altitude_m: f64) -> f64 {
    eas_m_s * (SEA_LEVEL_DENSITY / Atmosphere::new(altitude_m).density_kg_m3).sqrt()
}

/// Convert true airspeed to equivalent airspeed at the given altitude.
pub fn tas_to_eas(tas_m_s: f64, altitude_m: f64) -> f64 {
    tas_m_s * (Atmosphere::new(altitude_m).density_kg_m3 / SEA_LEVEL_DENSITY).sqrt()
}
