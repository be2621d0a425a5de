pub mod cover;

pub use cover::{__path_handle_album_art, __path_handle_title_art};
pub use cover::{handle_album_art, handle_title_art, CoverQuery, QueryPairs};
