pub mod fal;
pub mod membership;
pub mod provisioning;
pub mod quota;
