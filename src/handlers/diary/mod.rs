pub mod entries;
pub mod favorites;

pub use entries::{create_entry, delete_entry, get_entry, list_entries, update_entry};
pub use favorites::{add_favorite, list_favorites};
