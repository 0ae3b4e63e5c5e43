//! Automobile emission rule set
//!
//! Estimates the greenhouse gas emission (kg CO2e) of a passenger vehicle over
//! a timeframe from whatever the caller knows about it. With no facts at all
//! every quantity falls back to a national average and `emission` still
//! resolves.
//!
//! `carbon` reaches the same total gas by gas (CO2, CH4, N2O and HFC) and
//! `energy` gives the energy content of the fuel used. Biogenic CO2 is
//! reported on its own and stays out of both totals.
//!
//! Methods that estimate activity (distance driven, typical efficiencies,
//! service dates) comply with GHG Protocol scope 3 and ISO 14064-1 only.
//! Scope 1 results need the fuel type from the caller, together with either
//! the fuel consumed or a vehicle identity plus the distance driven.
//!
//! Units: distances in km, fuel efficiency in km/l, fuel in litres, speeds in
//! km/h, emission factors in kg CO2e/l.

pub mod fallback;
pub mod methods;

use crate::method::{Compute, Method, Node, Standard};
use crate::registry::GraphRegistry;
use crate::{CarbonateResult, ValueKind};
use methods::*;

/// The top-level quantity of the rule set
pub const EMISSION: &str = "emission";

/// A method working from measured fuel or the vehicle's identity
fn method(name: &str, compute: Compute) -> Method {
    Method::new(name, compute).complies(Standard::ALL)
}

/// A method that estimates activity; excluded from GHG Protocol scope 1
fn scope_3(name: &str, compute: Compute) -> Method {
    Method::new(name, compute).complies([Standard::GhgProtocolScope3, Standard::Iso])
}

/// Quantities that only ever arrive as facts, plus nodes a caller may pin
const INPUTS: &[(&str, ValueKind)] = &[
    ("make", ValueKind::Make),
    ("model", ValueKind::Text),
    ("year", ValueKind::Number),
    ("make_year", ValueKind::MakeYear),
    ("make_model", ValueKind::MakeModel),
    ("make_model_year", ValueKind::MakeModelYear),
    ("make_model_year_variant", ValueKind::Variant),
    ("size_class", ValueKind::SizeClass),
    ("fuel_type", ValueKind::FuelType),
    ("urbanity", ValueKind::Number),
    ("hybridity", ValueKind::Boolean),
    ("hybridity_multiplier", ValueKind::Number),
    ("speed", ValueKind::Number),
    ("city_speed", ValueKind::Number),
    ("highway_speed", ValueKind::Number),
    ("fuel_efficiency", ValueKind::Number),
    ("fuel_consumed", ValueKind::Number),
    ("distance", ValueKind::Number),
    ("annual_distance", ValueKind::Number),
    ("weekly_distance", ValueKind::Number),
    ("daily_distance", ValueKind::Number),
    ("daily_duration", ValueKind::Number),
    ("acquisition", ValueKind::Date),
    ("retirement", ValueKind::Date),
];

/// Build and validate the automobile registry
pub fn registry() -> CarbonateResult<GraphRegistry> {
    let mut builder = GraphRegistry::builder();
    for (name, kind) in INPUTS {
        builder.input(*name, *kind);
    }
    for node in nodes() {
        builder.register(node)?;
    }
    builder.build()
}

fn nodes() -> Vec<Node> {
    vec![
        Node::new(EMISSION)
            .method(
                method("from fuel", emission_from_fuel)
                    .needs(["fuel_consumed", "emission_factor"])
                    .appreciates(["fuel_type"]),
            )
            .guaranteed(),
        Node::new("carbon").method(
            method("from gas emissions", carbon_from_gas_emissions).needs([
                "co2_emission",
                "ch4_emission",
                "n2o_emission",
                "hfc_emission",
            ]),
        ),
        Node::new("co2_emission").method(
            method(
                "from fuel and automobile fuel",
                co2_emission_from_fuel_and_automobile_fuel,
            )
            .needs(["fuel_consumed", "automobile_fuel"]),
        ),
        Node::new("co2_biogenic_emission").method(
            method(
                "from fuel and automobile fuel",
                co2_biogenic_emission_from_fuel_and_automobile_fuel,
            )
            .needs(["fuel_consumed", "automobile_fuel"]),
        ),
        Node::new("ch4_emission").method(
            method(
                "from fuel and automobile fuel",
                ch4_emission_from_fuel_and_automobile_fuel,
            )
            .needs(["fuel_consumed", "automobile_fuel"]),
        ),
        Node::new("n2o_emission").method(
            method(
                "from fuel and automobile fuel",
                n2o_emission_from_fuel_and_automobile_fuel,
            )
            .needs(["fuel_consumed", "automobile_fuel"]),
        ),
        Node::new("hfc_emission").method(
            method(
                "from fuel and automobile fuel",
                hfc_emission_from_fuel_and_automobile_fuel,
            )
            .needs(["fuel_consumed", "automobile_fuel"]),
        ),
        // Untagged: excluded whenever a compliance filter is set
        Node::new("energy").method(
            Method::new(
                "from fuel and automobile fuel",
                energy_from_fuel_and_automobile_fuel,
            )
            .needs(["fuel_consumed", "automobile_fuel"]),
        ),
        Node::new("automobile_fuel")
            .method(method("from fuel type", automobile_fuel_from_fuel_type).needs(["fuel_type"]))
            .method(scope_3("default", automobile_fuel_default)),
        Node::new("emission_factor")
            .method(
                method("from fuel type", emission_factor_from_fuel_type).needs(["fuel_type"]),
            )
            .method(scope_3("default", emission_factor_default)),
        Node::new("fuel_consumed").method(
            method(
                "from fuel efficiency and distance",
                fuel_consumed_from_fuel_efficiency_and_distance,
            )
            .needs(["fuel_efficiency", "distance"]),
        ),
        Node::new("distance").method(
            scope_3("from annual distance", distance_from_annual_distance)
                .needs(["annual_distance", "active_subtimeframe"]),
        ),
        Node::new("annual_distance")
            .method(
                scope_3(
                    "from weekly distance and timeframe",
                    annual_distance_from_weekly_distance,
                )
                .needs(["weekly_distance"]),
            )
            .method(
                scope_3(
                    "from daily distance and timeframe",
                    annual_distance_from_daily_distance,
                )
                .needs(["daily_distance"]),
            )
            .method(
                scope_3(
                    "from daily duration, speed and timeframe",
                    annual_distance_from_daily_duration_and_speed,
                )
                .needs(["daily_duration", "speed"]),
            )
            .method(scope_3("from size class", annual_distance_from_size_class).needs(["size_class"]))
            .method(scope_3("from fuel type", annual_distance_from_fuel_type).needs(["fuel_type"]))
            .method(scope_3("default", annual_distance_default)),
        Node::new("fuel_efficiency")
            .method(
                method(
                    "from make model year variant and urbanity",
                    fuel_efficiency_from_variant_and_urbanity,
                )
                .needs(["make_model_year_variant", "urbanity"]),
            )
            .method(
                method(
                    "from make model year and urbanity",
                    fuel_efficiency_from_make_model_year_and_urbanity,
                )
                .needs(["make_model_year", "urbanity"]),
            )
            .method(
                method(
                    "from make model and urbanity",
                    fuel_efficiency_from_make_model_and_urbanity,
                )
                .needs(["make_model", "urbanity"]),
            )
            .method(
                scope_3(
                    "from size class, hybridity multiplier and urbanity",
                    fuel_efficiency_from_size_class_hybridity_multiplier_and_urbanity,
                )
                .needs(["size_class", "hybridity_multiplier", "urbanity"]),
            )
            .method(
                scope_3(
                    "from make year and hybridity multiplier",
                    fuel_efficiency_from_make_year_and_hybridity_multiplier,
                )
                .needs(["make_year", "hybridity_multiplier"]),
            )
            .method(
                scope_3(
                    "from make and hybridity multiplier",
                    fuel_efficiency_from_make_and_hybridity_multiplier,
                )
                .needs(["make", "hybridity_multiplier"]),
            )
            .method(
                scope_3(
                    "from hybridity multiplier",
                    fuel_efficiency_from_hybridity_multiplier,
                )
                .needs(["hybridity_multiplier"]),
            ),
        Node::new("hybridity_multiplier")
            .method(
                method(
                    "from size class, hybridity and urbanity",
                    hybridity_multiplier_from_size_class_hybridity_and_urbanity,
                )
                .needs(["size_class", "hybridity", "urbanity"]),
            )
            .method(
                method(
                    "from hybridity and urbanity",
                    hybridity_multiplier_from_hybridity_and_urbanity,
                )
                .needs(["hybridity", "urbanity"]),
            )
            .method(method("default", hybridity_multiplier_default)),
        Node::new("speed").method(
            method("from urbanity", speed_from_urbanity)
                .needs(["urbanity"])
                .appreciates(["city_speed", "highway_speed"]),
        ),
        Node::new("urbanity").method(method("default", urbanity_default)),
        Node::new("fuel_type").method(
            method("from make model year variant", fuel_type_from_variant)
                .needs(["make_model_year_variant"]),
        ),
        Node::new("active_subtimeframe").method(
            method(
                "from acquisition and retirement",
                active_subtimeframe_from_acquisition_and_retirement,
            )
            .needs(["acquisition", "retirement"]),
        ),
        Node::new("acquisition")
            .method(
                scope_3("from make model year variant", acquisition_from_variant)
                    .needs(["make_model_year_variant"]),
            )
            .method(
                scope_3("from make model year", acquisition_from_make_model_year)
                    .needs(["make_model_year"]),
            )
            .method(scope_3("from make year", acquisition_from_make_year).needs(["make_year"]))
            .method(
                scope_3("from retirement", acquisition_from_retirement).appreciates(["retirement"]),
            ),
        Node::new("retirement").method(
            scope_3("from acquisition", retirement_from_acquisition).appreciates(["acquisition"]),
        ),
        Node::new("make_model").method(
            method("from make and model", make_model_from_make_and_model)
                .needs(["make", "model"]),
        ),
        Node::new("make_year").method(
            method("from make and year", make_year_from_make_and_year).needs(["make", "year"]),
        ),
        Node::new("make_model_year")
            .method(
                method(
                    "from make model and year",
                    make_model_year_from_make_model_and_year,
                )
                .needs(["make_model", "year"]),
            )
            .method(
                method(
                    "from make, model and year",
                    make_model_year_from_make_model_name_and_year,
                )
                .needs(["make", "model", "year"]),
            ),
    ]
}
