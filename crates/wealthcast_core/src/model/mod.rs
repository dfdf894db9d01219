mod crisis;
mod goals;
mod ids;
mod results;
mod scenario;

pub use crisis::{
    AssetClassImpact, BehavioralBand, BehavioralConsiderations, CrisisProfile, GoalImpact,
    ImmediateImpact, RecoveryAnalysis, RecoveryPoint, StressRiskMetrics, StressTestResult,
};
pub use goals::{GoalDefinition, GoalOutcome, TimeToGoal};
pub use ids::{CrisisId, ScenarioId};
pub use results::{
    ReturnDistribution, RiskMetrics, RunSummary, SimulationResult, Trajectory, TrajectoryPoint,
    ValueDistribution, WealthMetrics,
};
pub use scenario::{RebalancingFrequency, RiskLevel, Scenario, ScenarioParameters};
