//! The generation run: read the schema, render it, write it.

use tracing::info;

use crate::config::{GeneratorBuilder, GeneratorConfig};
use crate::error::GenResult;
use crate::render::{self, RenderedFile};
use crate::schema::{self, TableGroup};
use crate::types::TypeMap;
use crate::writer::{self, WrittenFile};

/// A validated, immutable generator. Create one with [`Generator::builder`].
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    types: TypeMap,
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    pub(crate) fn new(config: GeneratorConfig, types: TypeMap) -> Self {
        Self { config, types }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    /// Read the configured schema from the database.
    pub async fn read_schema(&self) -> GenResult<TableGroup> {
        schema::read_schema(
            &self.config.connection_string,
            &self.config.schema,
            &self.config.tables,
            &self.types,
        )
        .await
    }

    /// Render `group` into the files this generator would write.
    pub fn render(&self, group: &TableGroup) -> Vec<RenderedFile> {
        render::render(group, &self.config.render, self.config.single_file)
    }

    /// Render `group` and write it to the output directory.
    pub async fn write(&self, group: &TableGroup) -> GenResult<Vec<WrittenFile>> {
        let files = self.render(group);
        writer::write_files(
            &self.config.output_path,
            &files,
            self.config.formatter.as_ref(),
        )
        .await
    }

    /// Run the whole pipeline.
    pub async fn generate(&self) -> GenResult<Vec<WrittenFile>> {
        let group = self.read_schema().await?;
        if group.is_empty() {
            info!(schema = %self.config.schema, "no matching tables, nothing to generate");
            return Ok(Vec::new());
        }
        self.write(&group).await
    }
}
