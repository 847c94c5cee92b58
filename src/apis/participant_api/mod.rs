pub mod participant;
pub mod schemas;
