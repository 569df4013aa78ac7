//! Generator configuration.
//!
//! [`GeneratorBuilder`] validates settings as they are given and
//! [`GeneratorBuilder::build`] checks that the required ones were given at all.
//! [`FileConfig`] is the TOML form of the same settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenError, GenResult};
use crate::generator::Generator;
use crate::render::RenderOptions;
use crate::types::TypeMap;
use crate::writer::Formatter;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "modelgen.toml";

/// Immutable settings of a [`Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Only these tables are read; empty reads all of them.
    pub tables: Vec<String>,
    pub schema: String,
    pub connection_string: String,
    /// Existing directory the files are written to.
    pub output_path: PathBuf,
    pub single_file: bool,
    /// `None` skips formatting.
    pub formatter: Option<Formatter>,
    pub render: RenderOptions,
}

/// Chained, validating builder for [`Generator`].
///
/// ```rust,ignore
/// let generator = Generator::builder()
///     .connection_string("root:root@tcp(localhost:3306)/shop")
///     .schema("shop")?
///     .package_name("model")?
///     .output_path("./model")?
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    tables: Vec<String>,
    schema: Option<String>,
    add_json_tag: bool,
    extra_tags: Option<String>,
    output_path: Option<PathBuf>,
    connection_string: Option<String>,
    single_file: bool,
    convert_case: bool,
    package_name: Option<String>,
    formatter: Option<Formatter>,
    emit_comments: bool,
    types: TypeMap,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            schema: None,
            add_json_tag: true,
            extra_tags: None,
            output_path: None,
            connection_string: None,
            single_file: true,
            convert_case: true,
            package_name: None,
            formatter: Some(Formatter::gofmt()),
            emit_comments: false,
            types: TypeMap::builtin(),
        }
    }
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict generation to these tables.
    pub fn tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> GenResult<Self> {
        let schema = schema.into();
        if schema.is_empty() {
            return Err(GenError::config("schema must not be empty"));
        }
        self.schema = Some(schema);
        Ok(self)
    }

    pub fn package_name(mut self, package_name: impl Into<String>) -> GenResult<Self> {
        let package_name = package_name.into();
        if package_name.is_empty() {
            return Err(GenError::config("package name must not be empty"));
        }
        self.package_name = Some(package_name);
        Ok(self)
    }

    pub fn add_json_tag(mut self, add_json_tag: bool) -> Self {
        self.add_json_tag = add_json_tag;
        self
    }

    /// Tag template appended after the json tag. An empty template is ignored.
    pub fn extra_tags(mut self, template: impl Into<String>) -> Self {
        let template = template.into();
        self.extra_tags = (!template.is_empty()).then_some(template);
        self
    }

    /// Directory for generated files. It must already exist.
    pub fn output_path(mut self, path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {
                self.output_path = Some(path.to_path_buf());
                Ok(self)
            }
            Ok(_) => Err(GenError::config(format!(
                "output path {} is not a directory",
                path.display()
            ))),
            Err(e) => Err(GenError::config(format!(
                "output path {} is not usable: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Convert table and column names to UpperCamelCase.
    pub fn convert_case(mut self, convert_case: bool) -> Self {
        self.convert_case = convert_case;
        self
    }

    pub fn single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    pub fn formatter(mut self, formatter: Option<Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn emit_comments(mut self, emit_comments: bool) -> Self {
        self.emit_comments = emit_comments;
        self
    }

    /// Extra type mappings, taking precedence over the built-in ones.
    pub fn type_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.types = self.types.with_overrides(overrides);
        self
    }

    pub fn build(self) -> GenResult<Generator> {
        let output_path = self
            .output_path
            .ok_or_else(|| GenError::config("output path is required"))?;
        let connection_string = self
            .connection_string
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GenError::config("connection string is required"))?;
        let schema = self
            .schema
            .ok_or_else(|| GenError::config("schema is required"))?;
        let package_name = self
            .package_name
            .ok_or_else(|| GenError::config("package name is required"))?;

        let config = GeneratorConfig {
            tables: self.tables,
            schema,
            connection_string,
            output_path,
            single_file: self.single_file,
            formatter: self.formatter,
            render: RenderOptions {
                package_name,
                add_json_tag: self.add_json_tag,
                extra_tags: self.extra_tags,
                convert_case: self.convert_case,
                emit_comments: self.emit_comments,
            },
        };
        Ok(Generator::new(config, self.types))
    }
}

/// Settings read from a TOML file. Every field is optional.
///
/// ```toml
/// database_url = "root:root@tcp(localhost:3306)/shop"
/// schema = "shop"
/// package = "model"
/// output = "./model"
/// tables = ["user", "order_item"]
/// tags = 'gorm:"column:${columnName}"'
///
/// [types]
/// json = "string"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub schema: Option<String>,
    pub package: Option<String>,
    pub output: Option<PathBuf>,
    pub tables: Option<Vec<String>>,
    pub json_tag: Option<bool>,
    pub tags: Option<String>,
    pub single_file: Option<bool>,
    pub convert_case: Option<bool>,
    pub comments: Option<bool>,
    /// `false` disables formatting.
    pub format: Option<bool>,
    pub formatter: Option<Formatter>,
    pub types: BTreeMap<String, String>,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> GenResult<Self> {
        toml::from_str(content).map_err(|e| GenError::config(format!("invalid config: {}", e)))
    }

    pub fn from_file(path: &Path) -> GenResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Load `explicit` if given, else the first config file found in the working
    /// directory or the user config directory, else empty settings.
    pub fn discover(explicit: Option<&Path>) -> GenResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        for candidate in Self::candidates() {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading config file");
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("modelgen").join("config.toml"));
        }
        paths
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(mut self, other: FileConfig) -> Self {
        self.database_url = other.database_url.or(self.database_url);
        self.schema = other.schema.or(self.schema);
        self.package = other.package.or(self.package);
        self.output = other.output.or(self.output);
        self.tables = other.tables.or(self.tables);
        self.json_tag = other.json_tag.or(self.json_tag);
        self.tags = other.tags.or(self.tags);
        self.single_file = other.single_file.or(self.single_file);
        self.convert_case = other.convert_case.or(self.convert_case);
        self.comments = other.comments.or(self.comments);
        self.format = other.format.or(self.format);
        self.formatter = other.formatter.or(self.formatter);
        self.types.extend(other.types);
        self
    }

    /// The effective type map: built-ins plus `[types]`.
    pub fn type_map(&self) -> TypeMap {
        TypeMap::builtin().with_overrides(self.types.clone())
    }

    /// Apply every set value to a fresh builder.
    pub fn builder(&self) -> GenResult<GeneratorBuilder> {
        let mut builder = GeneratorBuilder::new().type_overrides(self.types.clone());

        if let Some(url) = &self.database_url {
            builder = builder.connection_string(url.clone());
        }
        if let Some(schema) = &self.schema {
            builder = builder.schema(schema.clone())?;
        }
        if let Some(package) = &self.package {
            builder = builder.package_name(package.clone())?;
        }
        if let Some(output) = &self.output {
            builder = builder.output_path(output)?;
        }
        if let Some(tables) = &self.tables {
            builder = builder.tables(tables.clone());
        }
        if let Some(json_tag) = self.json_tag {
            builder = builder.add_json_tag(json_tag);
        }
        if let Some(tags) = &self.tags {
            builder = builder.extra_tags(tags.clone());
        }
        if let Some(single_file) = self.single_file {
            builder = builder.single_file(single_file);
        }
        if let Some(convert_case) = self.convert_case {
            builder = builder.convert_case(convert_case);
        }
        if let Some(comments) = self.comments {
            builder = builder.emit_comments(comments);
        }
        if self.format == Some(false) {
            builder = builder.formatter(None);
        } else if let Some(formatter) = &self.formatter {
            builder = builder.formatter(Some(formatter.clone()));
        }

        Ok(builder)
    }
}
