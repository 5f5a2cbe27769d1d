pub mod auth;
pub mod diary;
pub mod translation;
