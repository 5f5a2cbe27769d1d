pub mod auth_models;
pub mod diary_models;
pub mod user_models;

pub use auth_models::{
    AuthError, Claims, LoginError, LoginForm, RegisterError, RegisterForm, TokenResponse,
};
pub use diary_models::{
    DiaryEntry, DiaryEntryRequest, DiaryEntryRow, DiaryError, FavoriteExpression,
    MessageResponse, NewFavorite,
};
pub use user_models::{NewUser, User, UserResponse};
