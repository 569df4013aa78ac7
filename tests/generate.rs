//! End-to-end generation from an in-memory schema.

use modelgen::prelude::*;
use pretty_assertions::assert_eq;

fn shop_schema() -> TableGroup {
    let rows = vec![
        ColumnMetadata::new("order_item", "id", "int", ""),
        ColumnMetadata::new("order_item", "order_id", "int", ""),
        ColumnMetadata::new("user", "id", "int", ""),
    ];
    TableGroup::from_columns(rows, &TypeMap::builtin())
}

fn builder(dir: &std::path::Path) -> GeneratorBuilder {
    Generator::builder()
        .connection_string("root:root@tcp(localhost:3306)/shop")
        .schema("shop")
        .unwrap()
        .package_name("model")
        .unwrap()
        .output_path(dir)
        .unwrap()
        .formatter(None)
}

#[tokio::test]
async fn test_single_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let generator = builder(dir.path()).build().unwrap();

    let written = generator.write(&shop_schema()).await.unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(written[0].path, dir.path().join("model.go"));

    let contents = std::fs::read_to_string(dir.path().join("model.go")).unwrap();
    assert_eq!(written[0].bytes, contents.len());
    assert_eq!(
        contents,
        "package model\n\
         \n\
         type OrderItem struct {\n\
         \tId\tint\t`json:\"id\"`\n\
         \tOrderId\tint\t`json:\"orderId\"`\n\
         }\n\
         \n\
         func (OrderItem) TableName() string {\n\
         \treturn \"order_item\"\n\
         }\n\
         \n\
         type User struct {\n\
         \tId\tint\t`json:\"id\"`\n\
         }\n\
         \n\
         func (User) TableName() string {\n\
         \treturn \"user\"\n\
         }\n\
         \n"
    );
}

#[tokio::test]
async fn test_multi_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let generator = builder(dir.path()).single_file(false).build().unwrap();

    let written = generator.write(&shop_schema()).await.unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["OrderItem.go", "User.go"]);
    assert!(!dir.path().join("model.go").exists());

    let user = std::fs::read_to_string(dir.path().join("User.go")).unwrap();
    assert!(user.starts_with("package model\n\ntype User struct {\n"));
    assert!(user.contains("\treturn \"user\"\n"));
    assert!(!user.contains("OrderItem"));
}

#[tokio::test]
async fn test_custom_tags_and_raw_names() {
    let dir = tempfile::tempdir().unwrap();
    let generator = builder(dir.path())
        .convert_case(false)
        .extra_tags("gorm:\"column:${columnName}\"")
        .build()
        .unwrap();

    generator.write(&shop_schema()).await.unwrap();

    let contents = std::fs::read_to_string(dir.path().join("model.go")).unwrap();
    assert!(contents.contains("type order_item struct {\n"));
    assert!(contents.contains("\torder_id\tint\t`json:\"order_id\",gorm:\"column:order_id\"`\n"));
    assert!(contents.contains("func (order_item) TableName() string {"));
}

#[tokio::test]
async fn test_type_overrides_apply_when_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let generator = builder(dir.path())
        .type_overrides([("json", "datatypes.JSON")])
        .build()
        .unwrap();

    let rows = vec![
        ColumnMetadata::new("event", "payload", "json", ""),
        ColumnMetadata::new("event", "created_at", "timestamp", ""),
    ];
    let group = TableGroup::from_columns(rows, generator.types());
    let files = generator.render(&group);

    assert_eq!(files.len(), 1);
    assert!(files[0].contents.starts_with("package model\n\nimport \"time\"\n\n"));
    assert!(files[0].contents.contains("\tPayload\tdatatypes.JSON\t`json:\"payload\"`\n"));
    assert!(files[0].contents.contains("\tCreatedAt\ttime.Time\t`json:\"createdAt\"`\n"));
}

#[tokio::test]
async fn test_render_twice_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let generator = builder(dir.path()).build().unwrap();
    let group = shop_schema();

    assert_eq!(generator.render(&group), generator.render(&group));
}

#[tokio::test]
async fn test_bad_dsn_fails_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let generator = builder(dir.path())
        .connection_string("root:root@tcp(localhost:3306)")
        .build()
        .unwrap();

    let err = generator.read_schema().await.unwrap_err();
    assert!(matches!(err, GenError::Dsn { .. }), "{err}");
}

#[tokio::test]
async fn test_empty_schema_renders_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let empty = TableGroup::new();

    for single_file in [true, false] {
        let generator = builder(dir.path()).single_file(single_file).build().unwrap();
        assert!(generator.render(&empty).is_empty());
        assert!(generator.write(&empty).await.unwrap().is_empty());
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
