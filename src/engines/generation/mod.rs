pub mod champion;
pub mod evolution_engine;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod progress;

pub use champion::{Champion, ChampionTracker};
pub use evolution_engine::{generate, OptimizationResult, SequenceOptimizer};
pub use fitness::ProfileObjective;
pub use genome::{Genome, ProteinTemplate};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback, ProgressMessage,
    SilentProgress,
};
