pub mod dataset;
pub mod overrides;
pub mod po;
