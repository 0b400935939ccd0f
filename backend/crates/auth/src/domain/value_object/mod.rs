//! Value Object Module

pub mod display_name;
pub mod email;
pub mod reset_code;
pub mod user_filter;
pub mod user_password;
pub mod user_role;
