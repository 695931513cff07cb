pub mod gbdt;
pub mod traits;

pub use self::gbdt::GBDTModel;
pub use traits::{IntoDataVec, Regressor};
