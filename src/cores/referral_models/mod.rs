pub mod growsurf;
pub mod referral_controller;
