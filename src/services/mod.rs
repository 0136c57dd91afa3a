pub mod classifier;
pub mod feature_assembler;
pub mod player_strength;
pub mod predictor;
pub mod team_timeline;

pub use classifier::*;
pub use feature_assembler::*;
pub use player_strength::*;
pub use predictor::*;
pub use team_timeline::*;
