//! Distance-weighted blending of rate-like values

use rust_decimal::Decimal;

/// Weighted harmonic mean of a city and a highway rate
///
/// `1 / (w / city + (1 - w) / highway)` where `w` is the share of distance
/// driven in cities. Rates measured per unit of distance combine this way,
/// never arithmetically.
///
/// Returns `None` when `w` lies outside `[0, 1]` or a rate is not positive.
/// The endpoints return the matching rate unchanged.
pub fn harmonic_mean(weight: Decimal, city: Decimal, highway: Decimal) -> Option<Decimal> {
    if weight < Decimal::ZERO || weight > Decimal::ONE {
        return None;
    }
    if city <= Decimal::ZERO || highway <= Decimal::ZERO {
        return None;
    }
    if weight == Decimal::ONE {
        return Some(city);
    }
    if weight.is_zero() {
        return Some(highway);
    }

    let city_share = weight.checked_div(city)?;
    let highway_share = (Decimal::ONE - weight).checked_div(highway)?;
    Decimal::ONE.checked_div(city_share.checked_add(highway_share)?)
}
