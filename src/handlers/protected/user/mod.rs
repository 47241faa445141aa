pub mod onboarding;

pub use onboarding::complete_post as onboarding_complete;
pub use onboarding::reset_post as onboarding_reset;
pub use onboarding::status_get as onboarding_status;
