//! Fixed conversion factors used by the rule tables

use rust_decimal::Decimal;

/// 1 mile = 1.609344 km
pub fn kilometres_per_mile() -> Decimal {
    Decimal::new(1_609_344, 6)
}

/// 1 US gallon = 3.785411784 l
pub fn litres_per_gallon() -> Decimal {
    Decimal::new(3_785_411_784, 9)
}

pub fn miles_to_kilometres(miles: Decimal) -> Decimal {
    miles * kilometres_per_mile()
}

/// Miles per US gallon to kilometres per litre
pub fn miles_per_gallon_to_kilometres_per_litre(mpg: Decimal) -> Decimal {
    mpg * kilometres_per_mile() / litres_per_gallon()
}
