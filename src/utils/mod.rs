pub mod html;
pub mod logging;

pub use html::decode_html;
pub use logging::truncate_text;
