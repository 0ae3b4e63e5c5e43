//! Default values used when nothing better is known about a vehicle

use crate::units::{miles_per_gallon_to_kilometres_per_litre, miles_to_kilometres};
use rust_decimal::Decimal;

/// Share of distance driven on city streets (EPA 2009, Appendix A)
pub fn urbanity() -> Decimal {
    Decimal::new(43, 2)
}

pub fn hybridity_multiplier() -> Decimal {
    Decimal::ONE
}

/// 20.182 mpg, from US vehicle miles travelled and gasoline/diesel use (km/l)
pub fn fuel_efficiency() -> Decimal {
    miles_per_gallon_to_kilometres_per_litre(Decimal::new(20_182, 3))
}

/// 11,819 miles per year per US automobile (km)
pub fn annual_distance() -> Decimal {
    miles_to_kilometres(Decimal::from(11_819))
}

/// Average city driving speed, 19.9 mph (EPA 2006) in km/h
pub fn city_speed() -> Decimal {
    miles_to_kilometres(Decimal::new(199, 1))
}

/// Average highway driving speed, 57.1 mph (EPA 2006) in km/h
pub fn highway_speed() -> Decimal {
    miles_to_kilometres(Decimal::new(571, 1))
}
