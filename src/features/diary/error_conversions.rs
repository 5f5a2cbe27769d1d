use crate::data::models::DiaryError;
use crate::data::repositories::StoreError;

impl From<StoreError> for DiaryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => DiaryError::NotFound(what),
            StoreError::Forbidden => DiaryError::Forbidden,
            StoreError::EmptyContent => DiaryError::EmptyContent,
            other => DiaryError::DatabaseError(other),
        }
    }
}
