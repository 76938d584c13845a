pub mod adjustment;
pub mod function;

pub use adjustment::{adjust_for_height, apply_shelter_factor};
pub use function::{WindConditions, WindFunction, WindFunctionMethod};
