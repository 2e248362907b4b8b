pub mod convert;
pub mod inspect;
pub mod page;

pub use convert::{content_disposition, handle_convert, ConvertQuery, __path_handle_convert};
pub use inspect::{handle_formats, handle_inspect, __path_handle_formats, __path_handle_inspect};
pub use page::handle_index;
