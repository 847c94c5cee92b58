pub mod credentials;
pub mod referral_models;
pub mod schemas;
