//! Reference data consumed by the automobile rule set
//!
//! The resolver never fetches or refreshes these tables. A caller supplies a
//! `ReferenceData` implementation; `Catalog` is the in-memory one, loaded from
//! JSON.

use crate::CarbonateResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const BUNDLED_REFERENCE_DATA: &str = include_str!("../data/reference.json");

/// A city/highway pair of rate-like values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityHighway {
    pub city: Decimal,
    pub highway: Decimal,
}

/// Whether a vehicle is a hybrid electric or a conventional one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drivetrain {
    Hybrid,
    Conventional,
}

impl From<bool> for Drivetrain {
    fn from(hybridity: bool) -> Self {
        if hybridity {
            Drivetrain::Hybrid
        } else {
            Drivetrain::Conventional
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Make {
    pub name: String,
    #[serde(default)]
    pub fuel_efficiency: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeYear {
    pub make: String,
    pub year: i32,
    #[serde(default)]
    pub fuel_efficiency: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeModel {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub fuel_efficiency_city: Option<Decimal>,
    #[serde(default)]
    pub fuel_efficiency_highway: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeModelYear {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub fuel_efficiency_city: Option<Decimal>,
    #[serde(default)]
    pub fuel_efficiency_highway: Option<Decimal>,
}

/// A specific trim of a make, model and year, keyed by row hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub row_hash: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub fuel_efficiency_city: Option<Decimal>,
    #[serde(default)]
    pub fuel_efficiency_highway: Option<Decimal>,
    /// Code of the fuel type this variant burns
    #[serde(default)]
    pub fuel_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelType {
    pub code: String,
    pub name: String,
    /// kg CO2e per litre, all gases
    #[serde(default)]
    pub emission_factor: Option<Decimal>,
    /// km per year
    #[serde(default)]
    pub annual_distance: Option<Decimal>,
    /// kg CO2 per litre from fossil carbon
    #[serde(default)]
    pub co2_emission_factor: Option<Decimal>,
    /// kg CO2 per litre from biogenic carbon, reported outside the total
    #[serde(default)]
    pub co2_biogenic_emission_factor: Option<Decimal>,
    /// kg CO2e per litre
    #[serde(default)]
    pub ch4_emission_factor: Option<Decimal>,
    /// kg CO2e per litre
    #[serde(default)]
    pub n2o_emission_factor: Option<Decimal>,
    /// kg CO2e per litre, from air conditioning leaks
    #[serde(default)]
    pub hfc_emission_factor: Option<Decimal>,
    /// MJ per litre
    #[serde(default)]
    pub energy_content: Option<Decimal>,
}

impl FuelType {
    pub const ELECTRICITY: &'static str = "El";

    pub fn is_electricity(&self) -> bool {
        self.code == Self::ELECTRICITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeClass {
    pub name: String,
    #[serde(default)]
    pub annual_distance: Option<Decimal>,
    #[serde(default)]
    pub fuel_efficiency_city: Option<Decimal>,
    #[serde(default)]
    pub fuel_efficiency_highway: Option<Decimal>,
    #[serde(default)]
    pub hybrid_multipliers: Option<CityHighway>,
    #[serde(default)]
    pub conventional_multipliers: Option<CityHighway>,
}

impl SizeClass {
    /// Fuel efficiency multipliers for a drivetrain
    pub fn multipliers(&self, drivetrain: Drivetrain) -> Option<CityHighway> {
        match drivetrain {
            Drivetrain::Hybrid => self.hybrid_multipliers,
            Drivetrain::Conventional => self.conventional_multipliers,
        }
    }
}

/// Lookup-table service
///
/// Implementations must be pure reads: the same key always yields the same
/// record for the lifetime of a resolution.
pub trait ReferenceData: Send + Sync {
    fn make(&self, name: &str) -> Option<Arc<Make>>;
    fn make_year(&self, make: &str, year: i32) -> Option<Arc<MakeYear>>;
    fn make_model(&self, make: &str, model: &str) -> Option<Arc<MakeModel>>;
    fn make_model_year(&self, make: &str, model: &str, year: i32) -> Option<Arc<MakeModelYear>>;
    fn variant(&self, row_hash: &str) -> Option<Arc<Variant>>;
    fn fuel_type(&self, code: &str) -> Option<Arc<FuelType>>;
    fn size_class(&self, name: &str) -> Option<Arc<SizeClass>>;

    /// Record used when no fuel type is known
    fn fallback_fuel_type(&self) -> Option<Arc<FuelType>>;

    /// Record used when no size class is known
    fn fallback_size_class(&self) -> Option<Arc<SizeClass>>;
}

/// On-disk layout of a reference data file; every table is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    makes: Vec<Make>,
    make_years: Vec<MakeYear>,
    make_models: Vec<MakeModel>,
    make_model_years: Vec<MakeModelYear>,
    variants: Vec<Variant>,
    fuel_types: Vec<FuelType>,
    size_classes: Vec<SizeClass>,
    fallbacks: FallbackRecords,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FallbackRecords {
    fuel_type: Option<FuelType>,
    size_class: Option<SizeClass>,
}

/// In-memory reference tables
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct Catalog {
    makes: HashMap<String, Arc<Make>>,
    make_years: HashMap<(String, i32), Arc<MakeYear>>,
    make_models: HashMap<(String, String), Arc<MakeModel>>,
    make_model_years: HashMap<(String, String, i32), Arc<MakeModelYear>>,
    variants: HashMap<String, Arc<Variant>>,
    fuel_types: HashMap<String, Arc<FuelType>>,
    size_classes: HashMap<String, Arc<SizeClass>>,
    fallback_fuel_type: Arc<FuelType>,
    fallback_size_class: Arc<SizeClass>,
}

impl Default for Catalog {
    /// Empty tables with the built-in fallback records
    fn default() -> Self {
        Self {
            makes: HashMap::new(),
            make_years: HashMap::new(),
            make_models: HashMap::new(),
            make_model_years: HashMap::new(),
            variants: HashMap::new(),
            fuel_types: HashMap::new(),
            size_classes: HashMap::new(),
            fallback_fuel_type: Arc::new(FuelType {
                code: "fallback".to_string(),
                name: "Average automobile fuel".to_string(),
                emission_factor: Some(Decimal::new(249, 2)),
                annual_distance: None,
                co2_emission_factor: Some(Decimal::new(233, 2)),
                co2_biogenic_emission_factor: Some(Decimal::new(12, 2)),
                ch4_emission_factor: Some(Decimal::new(3, 3)),
                n2o_emission_factor: Some(Decimal::new(17, 3)),
                hfc_emission_factor: Some(Decimal::new(14, 2)),
                energy_content: Some(Decimal::new(342, 1)),
            }),
            fallback_size_class: Arc::new(SizeClass {
                name: "fallback".to_string(),
                annual_distance: None,
                fuel_efficiency_city: None,
                fuel_efficiency_highway: None,
                hybrid_multipliers: Some(CityHighway {
                    city: Decimal::new(168, 2),
                    highway: Decimal::new(127, 2),
                }),
                conventional_multipliers: Some(CityHighway {
                    city: Decimal::ONE,
                    highway: Decimal::ONE,
                }),
            }),
        }
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog built from a single JSON document
    pub fn from_json(json: &str) -> CarbonateResult<Self> {
        let mut catalog = Self::default();
        catalog.load_json(json)?;
        Ok(catalog)
    }

    /// The sample tables shipped with the crate
    pub fn bundled() -> CarbonateResult<Self> {
        Self::from_json(BUNDLED_REFERENCE_DATA)
    }

    /// Merge the tables of a JSON document into this catalog
    ///
    /// Later records replace earlier ones with the same key.
    pub fn load_json(&mut self, json: &str) -> CarbonateResult<()> {
        let file: CatalogFile = serde_json::from_str(json)?;

        for make in file.makes {
            self.insert_make(make);
        }
        for make_year in file.make_years {
            self.insert_make_year(make_year);
        }
        for make_model in file.make_models {
            self.insert_make_model(make_model);
        }
        for make_model_year in file.make_model_years {
            self.insert_make_model_year(make_model_year);
        }
        for variant in file.variants {
            self.insert_variant(variant);
        }
        for fuel_type in file.fuel_types {
            self.insert_fuel_type(fuel_type);
        }
        for size_class in file.size_classes {
            self.insert_size_class(size_class);
        }
        if let Some(fuel_type) = file.fallbacks.fuel_type {
            self.fallback_fuel_type = Arc::new(fuel_type);
        }
        if let Some(size_class) = file.fallbacks.size_class {
            self.fallback_size_class = Arc::new(size_class);
        }

        Ok(())
    }

    pub fn insert_make(&mut self, make: Make) {
        self.makes.insert(key(&make.name), Arc::new(make));
    }

    pub fn insert_make_year(&mut self, make_year: MakeYear) {
        self.make_years
            .insert((key(&make_year.make), make_year.year), Arc::new(make_year));
    }

    pub fn insert_make_model(&mut self, make_model: MakeModel) {
        self.make_models.insert(
            (key(&make_model.make), key(&make_model.model)),
            Arc::new(make_model),
        );
    }

    pub fn insert_make_model_year(&mut self, make_model_year: MakeModelYear) {
        self.make_model_years.insert(
            (
                key(&make_model_year.make),
                key(&make_model_year.model),
                make_model_year.year,
            ),
            Arc::new(make_model_year),
        );
    }

    pub fn insert_variant(&mut self, variant: Variant) {
        self.variants.insert(key(&variant.row_hash), Arc::new(variant));
    }

    pub fn insert_fuel_type(&mut self, fuel_type: FuelType) {
        self.fuel_types.insert(key(&fuel_type.code), Arc::new(fuel_type));
    }

    pub fn insert_size_class(&mut self, size_class: SizeClass) {
        self.size_classes
            .insert(key(&size_class.name), Arc::new(size_class));
    }

    /// Number of records across all tables, fallbacks excluded
    pub fn len(&self) -> usize {
        self.makes.len()
            + self.make_years.len()
            + self.make_models.len()
            + self.make_model_years.len()
            + self.variants.len()
            + self.fuel_types.len()
            + self.size_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReferenceData for Catalog {
    fn make(&self, name: &str) -> Option<Arc<Make>> {
        self.makes.get(&key(name)).cloned()
    }

    fn make_year(&self, make: &str, year: i32) -> Option<Arc<MakeYear>> {
        self.make_years.get(&(key(make), year)).cloned()
    }

    fn make_model(&self, make: &str, model: &str) -> Option<Arc<MakeModel>> {
        self.make_models.get(&(key(make), key(model))).cloned()
    }

    fn make_model_year(&self, make: &str, model: &str, year: i32) -> Option<Arc<MakeModelYear>> {
        self.make_model_years
            .get(&(key(make), key(model), year))
            .cloned()
    }

    fn variant(&self, row_hash: &str) -> Option<Arc<Variant>> {
        self.variants.get(&key(row_hash)).cloned()
    }

    fn fuel_type(&self, code: &str) -> Option<Arc<FuelType>> {
        self.fuel_types.get(&key(code)).cloned()
    }

    fn size_class(&self, name: &str) -> Option<Arc<SizeClass>> {
        self.size_classes.get(&key(name)).cloned()
    }

    fn fallback_fuel_type(&self) -> Option<Arc<FuelType>> {
        Some(Arc::clone(&self.fallback_fuel_type))
    }

    fn fallback_size_class(&self) -> Option<Arc<SizeClass>> {
        Some(Arc::clone(&self.fallback_size_class))
    }
}
