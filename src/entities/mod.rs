pub mod photo;
pub mod photo_edit;
pub mod project;
pub mod refresh_token;
pub mod user;
pub mod workspace;
pub mod workspace_member;
