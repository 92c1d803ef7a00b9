// Data models for the onboarding wizard

pub mod state;
