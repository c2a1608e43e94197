pub mod compare;
pub mod datasets;
pub mod params;
pub mod run;
