pub mod error;
pub mod fence;
pub mod observation;
pub mod provider;
pub mod season;
pub mod seasonal;
pub mod sector;
pub mod transport;
