//! Core constants, the flight-point record, and shared scalar solvers for the
//! mission integrator workspace.

pub mod flight_point;
pub mod solvers;

pub use flight_point::{FlightPhase, FlightPoint};
pub use solvers::{SolverError, find_root, minimize};

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// ISA sea-level air density (kg/m³).
    pub const SEA_LEVEL_DENSITY: f64 = 1.225;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert metres to feet.
    #[inline]
    pub fn m_to_ft(v: f64) -> f64 {
        v / 0.3048
    }

    /// Convert feet to metres.
    #[inline]
    pub fn ft_to_m(v: f64) -> f64 {
        v * 0.3048
    }

    /// Convert metres per second to knots.
    #[inline]
    pub fn ms_to_kt(v: f64) -> f64 {
        v / 0.514_444
    }

    /// Convert knots to metres per second.
    #[inline]
    pub fn kt_to_ms(v: f64) -> f64 {
        v * 0.514_444
    }
}
