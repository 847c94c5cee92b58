pub mod api_doc;
pub mod participant_api;
pub mod schemas;
