pub mod error;
pub mod settings;
pub mod tolerance;
pub mod traits;

pub use error::{GeometryError, InkError, Result};
pub use settings::{LightingWeights, Settings, StippleParameters, ThicknessWeights};
pub use tolerance::Tolerance;
