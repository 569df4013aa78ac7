//! # modelgen
//!
//! Generates Go model structs from a MySQL schema.
//!
//! modelgen reads `information_schema.COLUMNS`, maps every column type to a Go
//! type, and writes one struct per table, either into a single `model.go` or
//! one file per table.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use modelgen::prelude::*;
//!
//! let generator = Generator::builder()
//!     .connection_string("root:root@tcp(localhost:3306)/shop")
//!     .schema("shop")?
//!     .package_name("model")?
//!     .output_path("./model")?
//!     .extra_tags(r#"gorm:"column:${columnName}""#)
//!     .build()?;
//!
//! let files = generator.generate().await?;
//! ```
//!
//! ## Output
//!
//! ```text
//! order_id    int       ->  OrderId    int        `json:"orderId"`
//! created_at  datetime  ->  CreatedAt  time.Time  `json:"createdAt"`
//! ```

pub mod config;
pub mod dsn;
pub mod error;
pub mod generator;
pub mod naming;
pub mod render;
pub mod schema;
pub mod types;
pub mod writer;

pub mod prelude {
    pub use crate::config::{FileConfig, GeneratorBuilder, GeneratorConfig};
    pub use crate::error::*;
    pub use crate::generator::Generator;
    pub use crate::render::{RenderOptions, RenderedFile, ToGo};
    pub use crate::schema::{ColumnMetadata, TableColumns, TableGroup};
    pub use crate::types::TypeMap;
    pub use crate::writer::{Formatter, WrittenFile};
}

pub use generator::Generator;
