pub mod bankruptcy_estimate;
pub mod milestone;
pub mod month_record;
pub mod projection_result;
pub mod simulation_result;

pub use bankruptcy_estimate::BankruptcyEstimate;
pub use milestone::{END_OF_FORECAST_NOTE, Milestone};
pub use month_record::MonthRecord;
pub use projection_result::{GrowthBands, InstrumentPerformance, ProjectionResult};
pub use simulation_result::{MonteCarloResult, MonthTrace, PercentileCuts, SimulationIteration};
