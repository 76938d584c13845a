pub mod emissivity;
pub mod radiation;

pub use emissivity::{EmissivityModel, LongwaveMethod};
pub use radiation::{LongwaveCloudMethod, LongwaveRadiation, back_radiation};
