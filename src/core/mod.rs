pub mod assemble;
pub mod etl;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;

pub use crate::domain::model::{Course, Harvest, Tables, University};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
