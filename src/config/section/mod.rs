//! Configuration section definitions.
//!
//! Each module corresponds to a section in `markdown-pdf.toml`:
//!
//! | Module   | TOML Section | Purpose                               |
//! |----------|--------------|---------------------------------------|
//! | `page`   | `[page]`     | Paper size, margins, header/footer    |
//! | `render` | `[render]`   | Headless browser executable and flags |
//! | `serve`  | `[serve]`    | Content server interface              |
//! | `style`  | `[style]`    | User stylesheet, code highlighting    |

pub mod page;
mod render;
mod serve;
mod style;

// Re-export section configs
pub use page::PageConfig;
pub use render::RenderConfig;
pub use serve::ServeConfig;
pub use style::StyleConfig;
