//! Compute functions of the automobile rule set
//!
//! Every function reads only its inputs and the ambient time range. Returning
//! `None` declines the method and lets the next one run.

use super::fallback;
use crate::blend::harmonic_mean;
use crate::catalog::{Drivetrain, FuelType};
use crate::method::Inputs;
use crate::{Entity, TimeRange, Value};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

fn number(n: Decimal) -> Option<Value> {
    Some(Value::Number(n))
}

fn january_first(year: i32) -> Option<Value> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(Value::Date)
}

/// Days in the calendar year the timeframe falls in
fn days_in_year(timeframe: &TimeRange) -> Option<Decimal> {
    let year = TimeRange::year(timeframe.calendar_year()).ok()?;
    Some(Decimal::from(year.days()))
}

/// A whole-number year such as 2010
fn whole_year(year: Decimal) -> Option<i32> {
    if year.fract().is_zero() {
        year.to_i32()
    } else {
        None
    }
}

// emission

pub fn emission_from_fuel(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    if inputs
        .fuel_type("fuel_type")
        .is_some_and(|fuel_type| fuel_type.is_electricity())
    {
        return number(Decimal::ZERO);
    }
    let fuel_consumed = inputs.number("fuel_consumed")?;
    let emission_factor = inputs.number("emission_factor")?;
    number(fuel_consumed.checked_mul(emission_factor)?)
}

// per-gas emissions

/// Fuel used times one factor of the automobile fuel
fn fuel_consumed_times(
    inputs: &Inputs<'_>,
    factor: impl Fn(&FuelType) -> Option<Decimal>,
) -> Option<Value> {
    let fuel_consumed = inputs.number("fuel_consumed")?;
    let automobile_fuel = inputs.fuel_type("automobile_fuel")?;
    number(fuel_consumed.checked_mul(factor(&**automobile_fuel)?)?)
}

pub fn co2_emission_from_fuel_and_automobile_fuel(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    fuel_consumed_times(inputs, |fuel| fuel.co2_emission_factor)
}

pub fn co2_biogenic_emission_from_fuel_and_automobile_fuel(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    fuel_consumed_times(inputs, |fuel| fuel.co2_biogenic_emission_factor)
}

pub fn ch4_emission_from_fuel_and_automobile_fuel(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    fuel_consumed_times(inputs, |fuel| fuel.ch4_emission_factor)
}

pub fn n2o_emission_from_fuel_and_automobile_fuel(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    fuel_consumed_times(inputs, |fuel| fuel.n2o_emission_factor)
}

pub fn hfc_emission_from_fuel_and_automobile_fuel(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    fuel_consumed_times(inputs, |fuel| fuel.hfc_emission_factor)
}

/// Biogenic CO2 is not part of the anthropogenic total
pub fn carbon_from_gas_emissions(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let mut total = Decimal::ZERO;
    for gas in ["co2_emission", "ch4_emission", "n2o_emission", "hfc_emission"] {
        total = total.checked_add(inputs.number(gas)?)?;
    }
    number(total)
}

// energy

pub fn energy_from_fuel_and_automobile_fuel(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    fuel_consumed_times(inputs, |fuel| fuel.energy_content)
}

// automobile_fuel

pub fn automobile_fuel_from_fuel_type(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let fuel_type = inputs.fuel_type("fuel_type")?;
    Some(Value::Entity(Entity::FuelType(fuel_type.clone())))
}

pub fn automobile_fuel_default(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let fuel_type = inputs.catalog().fallback_fuel_type()?;
    Some(Value::Entity(Entity::FuelType(fuel_type)))
}

// emission_factor

pub fn emission_factor_from_fuel_type(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(inputs.fuel_type("fuel_type")?.emission_factor?)
}

pub fn emission_factor_default(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(inputs.catalog().fallback_fuel_type()?.emission_factor?)
}

// fuel_consumed

pub fn fuel_consumed_from_fuel_efficiency_and_distance(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let distance = inputs.number("distance")?;
    let fuel_efficiency = inputs.number("fuel_efficiency")?;
    number(distance.checked_div(fuel_efficiency)?)
}

// distance

pub fn distance_from_annual_distance(inputs: &Inputs<'_>, timeframe: &TimeRange) -> Option<Value> {
    let annual_distance = inputs.number("annual_distance")?;
    let active = inputs.range("active_subtimeframe")?;
    let share = active.fractional_year_overlap(timeframe.calendar_year());
    number(annual_distance.checked_mul(share)?)
}

// annual_distance

pub fn annual_distance_from_weekly_distance(
    inputs: &Inputs<'_>,
    timeframe: &TimeRange,
) -> Option<Value> {
    let weekly = inputs.number("weekly_distance")?;
    let daily = weekly.checked_div(Decimal::from(7))?;
    number(daily.checked_mul(days_in_year(timeframe)?)?)
}

pub fn annual_distance_from_daily_distance(
    inputs: &Inputs<'_>,
    timeframe: &TimeRange,
) -> Option<Value> {
    let daily = inputs.number("daily_distance")?;
    number(daily.checked_mul(days_in_year(timeframe)?)?)
}

pub fn annual_distance_from_daily_duration_and_speed(
    inputs: &Inputs<'_>,
    timeframe: &TimeRange,
) -> Option<Value> {
    let hours = inputs.number("daily_duration")?;
    let speed = inputs.number("speed")?;
    number(
        hours
            .checked_mul(speed)?
            .checked_mul(days_in_year(timeframe)?)?,
    )
}

pub fn annual_distance_from_size_class(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(inputs.size_class("size_class")?.annual_distance?)
}

pub fn annual_distance_from_fuel_type(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(inputs.fuel_type("fuel_type")?.annual_distance?)
}

pub fn annual_distance_default(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(fallback::annual_distance())
}

// fuel_efficiency

pub fn fuel_efficiency_from_variant_and_urbanity(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let variant = inputs.variant("make_model_year_variant")?;
    number(harmonic_mean(
        inputs.number("urbanity")?,
        variant.fuel_efficiency_city?,
        variant.fuel_efficiency_highway?,
    )?)
}

pub fn fuel_efficiency_from_make_model_year_and_urbanity(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let make_model_year = inputs.make_model_year("make_model_year")?;
    number(harmonic_mean(
        inputs.number("urbanity")?,
        make_model_year.fuel_efficiency_city?,
        make_model_year.fuel_efficiency_highway?,
    )?)
}

pub fn fuel_efficiency_from_make_model_and_urbanity(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let make_model = inputs.make_model("make_model")?;
    number(harmonic_mean(
        inputs.number("urbanity")?,
        make_model.fuel_efficiency_city?,
        make_model.fuel_efficiency_highway?,
    )?)
}

pub fn fuel_efficiency_from_size_class_hybridity_multiplier_and_urbanity(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let size_class = inputs.size_class("size_class")?;
    let blended = harmonic_mean(
        inputs.number("urbanity")?,
        size_class.fuel_efficiency_city?,
        size_class.fuel_efficiency_highway?,
    )?;
    number(blended.checked_mul(inputs.number("hybridity_multiplier")?)?)
}

pub fn fuel_efficiency_from_make_year_and_hybridity_multiplier(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let combined = inputs.make_year("make_year")?.fuel_efficiency?;
    number(combined.checked_mul(inputs.number("hybridity_multiplier")?)?)
}

pub fn fuel_efficiency_from_make_and_hybridity_multiplier(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let combined = inputs.make("make")?.fuel_efficiency?;
    number(combined.checked_mul(inputs.number("hybridity_multiplier")?)?)
}

pub fn fuel_efficiency_from_hybridity_multiplier(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let multiplier = inputs.number("hybridity_multiplier")?;
    number(fallback::fuel_efficiency().checked_mul(multiplier)?)
}

// hybridity_multiplier

pub fn hybridity_multiplier_from_size_class_hybridity_and_urbanity(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let drivetrain = Drivetrain::from(inputs.boolean("hybridity")?);
    let multipliers = inputs.size_class("size_class")?.multipliers(drivetrain)?;
    number(harmonic_mean(
        inputs.number("urbanity")?,
        multipliers.city,
        multipliers.highway,
    )?)
}

pub fn hybridity_multiplier_from_hybridity_and_urbanity(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let drivetrain = Drivetrain::from(inputs.boolean("hybridity")?);
    let multipliers = inputs
        .catalog()
        .fallback_size_class()?
        .multipliers(drivetrain)?;
    number(harmonic_mean(
        inputs.number("urbanity")?,
        multipliers.city,
        multipliers.highway,
    )?)
}

pub fn hybridity_multiplier_default(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(fallback::hybridity_multiplier())
}

// speed

pub fn speed_from_urbanity(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let city = inputs
        .number("city_speed")
        .unwrap_or_else(fallback::city_speed);
    let highway = inputs
        .number("highway_speed")
        .unwrap_or_else(fallback::highway_speed);
    number(harmonic_mean(inputs.number("urbanity")?, city, highway)?)
}

// urbanity

pub fn urbanity_default(_: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    number(fallback::urbanity())
}

// fuel_type

pub fn fuel_type_from_variant(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let code = inputs
        .variant("make_model_year_variant")?
        .fuel_type
        .as_deref()?;
    let fuel_type = inputs.catalog().fuel_type(code)?;
    Some(Value::Entity(Entity::FuelType(fuel_type)))
}

// active_subtimeframe

pub fn active_subtimeframe_from_acquisition_and_retirement(
    inputs: &Inputs<'_>,
    timeframe: &TimeRange,
) -> Option<Value> {
    let acquisition = inputs.date("acquisition")?;
    let retirement = inputs.date("retirement")?;
    Some(Value::Range(TimeRange::constrained(
        acquisition,
        retirement,
        timeframe,
    )))
}

// acquisition

pub fn acquisition_from_variant(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    january_first(inputs.variant("make_model_year_variant")?.year)
}

pub fn acquisition_from_make_model_year(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    january_first(inputs.make_model_year("make_model_year")?.year)
}

pub fn acquisition_from_make_year(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    january_first(inputs.make_year("make_year")?.year)
}

/// The earlier of the timeframe start and the retirement, when known
pub fn acquisition_from_retirement(inputs: &Inputs<'_>, timeframe: &TimeRange) -> Option<Value> {
    let start = timeframe.start();
    let acquisition = match inputs.date("retirement") {
        Some(retirement) => start.min(retirement),
        None => start,
    };
    Some(Value::Date(acquisition))
}

// retirement

/// The later of the timeframe end and the acquisition, when known
pub fn retirement_from_acquisition(inputs: &Inputs<'_>, timeframe: &TimeRange) -> Option<Value> {
    let end = timeframe.end();
    let retirement = match inputs.date("acquisition") {
        Some(acquisition) => end.max(acquisition),
        None => end,
    };
    Some(Value::Date(retirement))
}

// reference lookups

pub fn make_model_from_make_and_model(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let make = inputs.make("make")?;
    let make_model = inputs
        .catalog()
        .make_model(&make.name, inputs.text("model")?)?;
    Some(Value::Entity(Entity::MakeModel(make_model)))
}

pub fn make_year_from_make_and_year(inputs: &Inputs<'_>, _: &TimeRange) -> Option<Value> {
    let make = inputs.make("make")?;
    let year = whole_year(inputs.number("year")?)?;
    let make_year = inputs.catalog().make_year(&make.name, year)?;
    Some(Value::Entity(Entity::MakeYear(make_year)))
}

pub fn make_model_year_from_make_model_and_year(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let make_model = inputs.make_model("make_model")?;
    let year = whole_year(inputs.number("year")?)?;
    let make_model_year =
        inputs
            .catalog()
            .make_model_year(&make_model.make, &make_model.model, year)?;
    Some(Value::Entity(Entity::MakeModelYear(make_model_year)))
}

pub fn make_model_year_from_make_model_name_and_year(
    inputs: &Inputs<'_>,
    _: &TimeRange,
) -> Option<Value> {
    let make = inputs.make("make")?;
    let year = whole_year(inputs.number("year")?)?;
    let make_model_year =
        inputs
            .catalog()
            .make_model_year(&make.name, inputs.text("model")?, year)?;
    Some(Value::Entity(Entity::MakeModelYear(make_model_year)))
}
