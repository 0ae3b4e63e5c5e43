// Graph construction tests
mod registry;
mod topological_sort;

// Resolution tests
mod fact_overrides;
mod resolver;

mod timeframe;
