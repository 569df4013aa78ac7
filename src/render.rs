//! Go source renderer for grouped schema metadata.
//!
//! Each table becomes a struct with one field per column and a `TableName()`
//! accessor returning the source table name:
//!
//! ```text
//! type OrderItem struct {
//! 	Id	int	`json:"id"`
//! 	OrderId	int	`json:"orderId"`
//! }
//!
//! func (OrderItem) TableName() string {
//! 	return "order_item"
//! }
//! ```

use crate::naming::{ident_for, lower_first};
use crate::schema::{ColumnMetadata, TableColumns, TableGroup};

/// Placeholder in custom tag templates, replaced by the raw column name.
pub const COLUMN_PLACEHOLDER: &str = "${columnName}";

/// File name used when every model goes into one file.
pub const SINGLE_FILE_NAME: &str = "model.go";

/// Extension of generated files.
pub const FILE_EXTENSION: &str = "go";

const TAB: &str = "\t";
const NEWLINE: &str = "\n";

/// Options controlling the generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub package_name: String,
    /// Emit `json:"field"` tags.
    pub add_json_tag: bool,
    /// Appended to every tag, see [`COLUMN_PLACEHOLDER`].
    pub extra_tags: Option<String>,
    /// Convert table and column names to UpperCamelCase.
    pub convert_case: bool,
    /// Append column comments to field lines.
    pub emit_comments: bool,
}

impl RenderOptions {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            add_json_tag: true,
            extra_tags: None,
            convert_case: true,
            emit_comments: false,
        }
    }
}

/// A rendered output file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub contents: String,
}

/// Trait for converting schema nodes to Go source.
pub trait ToGo {
    /// Render this node as Go source.
    fn to_go(&self, opts: &RenderOptions) -> String;
}

impl ToGo for ColumnMetadata {
    fn to_go(&self, opts: &RenderOptions) -> String {
        let field = ident_for(&self.column_name, opts.convert_case);
        let tag = compose_tag(&self.column_name, &field, opts);

        let mut line = format!("{TAB}{field}{TAB}{}{TAB}`{tag}`", self.data_type);
        if opts.emit_comments && !self.comment.is_empty() {
            line.push_str(&format!("{TAB}// {}", self.comment.replace(['\r', '\n'], " ")));
        }
        line.push_str(NEWLINE);
        line
    }
}

impl ToGo for TableColumns {
    fn to_go(&self, opts: &RenderOptions) -> String {
        let type_name = type_name(&self.name, opts);

        let mut out = format!("type {type_name} struct {{{NEWLINE}");
        for column in &self.columns {
            out.push_str(&column.to_go(opts));
        }
        out.push_str(&format!("}}{NEWLINE}{NEWLINE}"));

        out.push_str(&format!("func ({type_name}) TableName() string {{{NEWLINE}"));
        out.push_str(&format!("{TAB}return {}{NEWLINE}", go_string(&self.name)));
        out.push_str(&format!("}}{NEWLINE}{NEWLINE}"));
        out
    }
}

/// Quote `value` as a Go interpreted string literal.
pub fn go_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// File name for a per-table file, confined to the output directory.
///
/// Path separators become `_`, and a leading `.` is replaced so the
/// name can't be hidden or climb out through `..`.
pub fn file_name_for(table: &str, opts: &RenderOptions) -> String {
    let stem: String = type_name(table, opts)
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            '/' | '\\' | '\0' => '_',
            '.' if i == 0 => '_',
            c => c,
        })
        .collect();
    format!("{stem}.{FILE_EXTENSION}")
}

/// The Go type name for a table.
pub fn type_name(table: &str, opts: &RenderOptions) -> String {
    ident_for(table, opts.convert_case)
}

/// Compose the struct tag body for one field.
///
/// The json tag comes first, then `,` and the custom template.
pub fn compose_tag(column_name: &str, field_name: &str, opts: &RenderOptions) -> String {
    let mut tag = String::new();
    if opts.add_json_tag {
        tag.push_str(&format!("json:\"{}\"", lower_first(field_name)));
    }
    if let Some(template) = opts.extra_tags.as_deref().filter(|t| !t.is_empty()) {
        tag.push(',');
        tag.push_str(&template.replace(COLUMN_PLACEHOLDER, column_name));
    }
    tag
}

/// The package header, with a `time` import when `needs_time` is set.
pub fn header(opts: &RenderOptions, needs_time: bool) -> String {
    let mut out = format!("package {}{NEWLINE}{NEWLINE}", opts.package_name);
    if needs_time {
        out.push_str(&format!("import \"time\"{NEWLINE}{NEWLINE}"));
    }
    out
}

fn uses_time<'a>(tables: impl IntoIterator<Item = &'a TableColumns>) -> bool {
    tables
        .into_iter()
        .flat_map(|t| &t.columns)
        .any(|c| c.data_type.starts_with("time."))
}

/// Render every table into one file named [`SINGLE_FILE_NAME`].
pub fn render_single(group: &TableGroup, opts: &RenderOptions) -> RenderedFile {
    let mut contents = header(opts, uses_time(group));
    for table in group {
        contents.push_str(&table.to_go(opts));
    }
    RenderedFile {
        file_name: SINGLE_FILE_NAME.to_string(),
        contents,
    }
}

/// Render one file per table, named after its Go type.
pub fn render_per_table(group: &TableGroup, opts: &RenderOptions) -> Vec<RenderedFile> {
    group
        .iter()
        .map(|table| {
            let mut contents = header(opts, uses_time([table]));
            contents.push_str(&table.to_go(opts));
            RenderedFile {
                file_name: file_name_for(&table.name, opts),
                contents,
            }
        })
        .collect()
}

/// Render `group` either as one file or one file per table.
///
/// An empty group renders no files, not a header-only `model.go`.
pub fn render(group: &TableGroup, opts: &RenderOptions, single_file: bool) -> Vec<RenderedFile> {
    if group.is_empty() {
        Vec::new()
    } else if single_file {
        vec![render_single(group, opts)]
    } else {
        render_per_table(group, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn opts() -> RenderOptions {
        RenderOptions::new("model")
    }

    #[test]
    fn test_json_tag_lower_first() {
        let tag = compose_tag("userName", "UserName", &opts());
        assert_eq!(tag, "json:\"userName\"");
    }

    #[test]
    fn test_json_tag_from_converted_field() {
        let tag = compose_tag("created_at", "CreatedAt", &opts());
        assert_eq!(tag, "json:\"createdAt\"");
    }

    #[test]
    fn test_template_uses_raw_column_name() {
        let mut o = opts();
        o.extra_tags = Some("gorm:\"column:${columnName}\" db:\"${columnName}\"".to_string());
        let tag = compose_tag("order_id", "OrderId", &o);
        assert_eq!(
            tag,
            "json:\"orderId\",gorm:\"column:order_id\" db:\"order_id\""
        );
    }

    #[test]
    fn test_template_without_json_tag() {
        let mut o = opts();
        o.add_json_tag = false;
        o.extra_tags = Some("validate:\"required\"".to_string());
        assert_eq!(compose_tag("id", "Id", &o), ",validate:\"required\"");
    }

    #[test]
    fn test_empty_tag_keeps_delimiters() {
        let mut o = opts();
        o.add_json_tag = false;
        let column = ColumnMetadata::new("user", "id", "int", "");
        assert_eq!(column.to_go(&o), "\tId\tint\t``\n");
    }

    #[test]
    fn test_field_line() {
        let column = ColumnMetadata::new("user", "user_name", "string", "login");
        assert_eq!(column.to_go(&opts()), "\tUserName\tstring\t`json:\"userName\"`\n");
    }

    #[test]
    fn test_field_line_with_comment() {
        let mut o = opts();
        o.emit_comments = true;
        let column = ColumnMetadata::new("user", "user_name", "string", "login\nname");
        assert_eq!(
            column.to_go(&o),
            "\tUserName\tstring\t`json:\"userName\"`\t// login name\n"
        );
    }

    #[test]
    fn test_table_block() {
        let group = TableGroup::new()
            .column("order_item", "id", "int")
            .column("order_item", "order_id", "int");
        let table = group.get("order_item").unwrap();
        assert_eq!(
            table.to_go(&opts()),
            "type OrderItem struct {\n\
             \tId\tint\t`json:\"id\"`\n\
             \tOrderId\tint\t`json:\"orderId\"`\n\
             }\n\
             \n\
             func (OrderItem) TableName() string {\n\
             \treturn \"order_item\"\n\
             }\n\
             \n"
        );
    }

    #[test]
    fn test_keep_raw_names() {
        let mut o = opts();
        o.convert_case = false;
        let group = TableGroup::new().column("order_item", "order_id", "int");
        let out = group.get("order_item").unwrap().to_go(&o);
        assert!(out.starts_with("type order_item struct {\n\torder_id\tint\t`json:\"order_id\"`\n"));
        assert!(out.contains("func (order_item) TableName() string {"));
    }

    #[test]
    fn test_header_with_time_import() {
        let group = TableGroup::new().column("user", "created_at", "time.Time");
        let file = render_single(&group, &opts());
        assert!(file.contents.starts_with("package model\n\nimport \"time\"\n\ntype User struct {\n"));
    }

    #[test]
    fn test_per_table_files() {
        let group = TableGroup::new()
            .column("order_item", "id", "int")
            .column("user", "created_at", "time.Time");
        let files = render(&group, &opts(), false);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name, "OrderItem.go");
        assert!(files[0].contents.starts_with("package model\n\ntype OrderItem struct {"));
        assert_eq!(files[1].file_name, "User.go");
        assert!(files[1].contents.starts_with("package model\n\nimport \"time\"\n\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let group = TableGroup::new()
            .column("zeta", "id", "int")
            .column("alpha", "id", "int")
            .column("zeta", "name", "string");
        let first = render(&group, &opts(), true);
        let second = render(&group, &opts(), true);
        assert_eq!(first, second);
        let zeta = first[0].contents.find("type Zeta").unwrap();
        let alpha = first[0].contents.find("type Alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_table_name_is_go_quoted() {
        let group = TableGroup::new().column("we\"ird\\name", "id", "int");
        let table = group.get("we\"ird\\name").unwrap();
        let go = table.to_go(&opts());
        assert!(go.contains("\treturn \"we\\\"ird\\\\name\"\n"), "{go}");
    }

    #[test]
    fn test_go_string_escapes() {
        assert_eq!(go_string("order_item"), "\"order_item\"");
        assert_eq!(go_string("a\tb\nc\u{1}"), "\"a\\tb\\nc\\x01\"");
        assert_eq!(go_string("użytkownik"), "\"użytkownik\"");
    }

    #[test]
    fn test_per_table_file_stays_in_output_dir() {
        let group = TableGroup::new()
            .column("../x", "id", "int")
            .column("a\\b", "id", "int")
            .column(".hidden", "id", "int");

        let files = render_per_table(&group, &opts());
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["_._x.go", "A_b.go", "_hidden.go"]);
        for name in names {
            let path = std::path::Path::new(name);
            assert_eq!(path.components().count(), 1, "{name}");
        }
        assert!(files[0].contents.contains("\treturn \"../x\"\n"));
    }

    #[test]
    fn test_empty_group_renders_nothing() {
        let group = TableGroup::new();
        assert!(render(&group, &opts(), true).is_empty());
        assert!(render(&group, &opts(), false).is_empty());
    }
}
