pub mod traits;
pub mod evolution;
pub mod featurize;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, SelectionMethod};
pub use featurize::FeaturizeConfig;
pub use traits::ConfigSection;
