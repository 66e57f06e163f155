use std::io::Write;

use storefront_catalog::types::*;
use storefront_catalog::{Normalizer, validate};
use storefront_db::*;
use storefront_import::*;

const HEADER: &str = "sku,name,slug,description,short description,category,brand,retail_price,wholesale_price,cost_price,stock_quantity,weight,tags,status,image_url";

fn run(conn: &Connection, csv: &str, mode: ExistingMode) -> ImportStats {
    let mut ctx = ImportContext::new(Normalizer::default());
    run_with(conn, &mut ctx, csv, mode)
}

fn run_with(conn: &Connection, ctx: &mut ImportContext, csv: &str, mode: ExistingMode) -> ImportStats {
    let options = ImportOptions { existing: mode };
    import_products_csv(conn, csv.as_bytes(), ctx, &options, None).unwrap()
}

fn product_by_sku(conn: &Connection, sku: &str) -> Product {
    let id = find_product_by_sku(conn, sku).unwrap().unwrap();
    get_product(conn, &id).unwrap().unwrap()
}

#[test]
fn imports_full_row() {
    let conn = open_memory().unwrap();
    let csv = format!(
        "{HEADER}\n\
         CET-1,Cetaphil Gentle Cleanser,,Mild cleanser,Gentle,Face Wash,Cetaphil,249.5,199,0,12.0,0.25,\"skincare, cleanser\",available,https://cdn.example/cet.jpg\n"
    );
    let stats = run(&conn, &csv, ExistingMode::Skip);

    assert_eq!(stats.total_rows, 1);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.categories_created, 1);
    assert_eq!(stats.brands_created, 1);
    assert!(stats.generated_skus.is_empty());

    let p = product_by_sku(&conn, "CET-1");
    assert_eq!(p.name, "Cetaphil Gentle Cleanser");
    assert_eq!(p.slug, "cetaphil-gentle-cleanser");
    assert_eq!(p.description.as_deref(), Some("Mild cleanser"));
    assert_eq!(p.short_description.as_deref(), Some("Gentle"));
    assert_eq!(p.retail_price, 249.5);
    assert_eq!(p.wholesale_price, 199.0);
    assert_eq!(p.cost_price, None);
    assert_eq!(p.stock_quantity, 12);
    assert_eq!(p.weight, Some(0.25));
    assert_eq!(p.min_wholesale_qty, DEFAULT_MIN_WHOLESALE_QTY);
    assert_eq!(p.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
    assert_eq!(p.tags, vec!["skincare", "cleanser"]);
    assert_eq!(p.status, ProductStatus::Published);
    assert_eq!(
        p.category_id,
        find_taxonomy_by_slug(&conn, Taxonomy::Category, "face-wash").unwrap()
    );
    assert_eq!(
        p.brand_id,
        find_taxonomy_by_slug(&conn, Taxonomy::Brand, "cetaphil").unwrap()
    );

    let images = images_for_product(&conn, &p.id).unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image_url, "https://cdn.example/cet.jpg");
    assert_eq!(images[0].alt_text.as_deref(), Some("Cetaphil Gentle Cleanser"));
}

#[test]
fn missing_columns_use_defaults() {
    let conn = open_memory().unwrap();
    let stats = run(&conn, "name\nPlain Soap\n", ExistingMode::Skip);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.generated_skus, vec!["PLAI-0001"]);

    let p = product_by_sku(&conn, "PLAI-0001");
    assert_eq!(p.status, ProductStatus::Draft);
    assert_eq!(p.retail_price, 0.0);
    assert_eq!(p.stock_quantity, 0);
    assert!(p.tags.is_empty());
    assert!(p.category_id.is_none());
}

#[test]
fn headers_are_trimmed() {
    let conn = open_memory().unwrap();
    let stats = run(&conn, " sku , name \nS1,Soap\n", ExistingMode::Skip);
    assert_eq!(stats.created, 1);
    assert_eq!(product_by_sku(&conn, "S1").name, "Soap");
}

#[test]
fn short_rows_read_missing_cells_as_empty() {
    let conn = open_memory().unwrap();
    let stats = run(
        &conn,
        "sku,name,brand,retail_price
S1,Soap
S2,Gel,Nivea,120
",
        ExistingMode::Skip,
    );
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.created, 2);

    let soap = product_by_sku(&conn, "S1");
    assert!(soap.brand_id.is_none());
    assert_eq!(soap.retail_price, 0.0);
    assert_eq!(product_by_sku(&conn, "S2").retail_price, 120.0);
}

#[test]
fn repeated_column_uses_last_value() {
    let conn = open_memory().unwrap();
    let stats = run(
        &conn,
        "sku,name,short description,short_description
S1,Soap,first,second
",
        ExistingMode::Skip,
    );
    assert_eq!(stats.errors, 0);
    assert_eq!(
        product_by_sku(&conn, "S1").short_description.as_deref(),
        Some("second")
    );
}

#[test]
fn row_without_name_is_an_error() {
    let conn = open_memory().unwrap();
    let stats = run(&conn, "sku,name\nS1,\nS2,Soap\n", ExistingMode::Skip);
    assert_eq!(stats.total_rows, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.failures[0].row, 1);
    assert_eq!(stats.failures[0].message, "Missing product name");
}

#[test]
fn placeholder_skus_are_distinct() {
    let conn = open_memory().unwrap();
    let stats = run(&conn, "name\nDove Soap\nDove Soap\n!!!\n", ExistingMode::Skip);
    assert_eq!(stats.created, 3);
    assert_eq!(stats.generated_skus, vec!["DOVE-0001", "DOVE-0002", "MOCK-0003"]);
}

#[test]
fn generated_slugs_are_unique() {
    let conn = open_memory().unwrap();
    let stats = run(&conn, "sku,name\nS1,Rose Water\nS2,Rose Water\nS3,ROSE WATER!\n", ExistingMode::Skip);
    assert_eq!(stats.created, 3);

    assert_eq!(product_by_sku(&conn, "S1").slug, "rose-water");
    assert_eq!(product_by_sku(&conn, "S2").slug, "rose-water-1");
    assert_eq!(product_by_sku(&conn, "S3").slug, "rose-water-2");
}

#[test]
fn csv_slug_is_kept_verbatim() {
    let conn = open_memory().unwrap();
    run(&conn, "sku,name,slug\nS1,YC Milk F/Wash,yc-milk-f/wash\n", ExistingMode::Skip);

    let p = product_by_sku(&conn, "S1");
    assert_eq!(p.slug, "yc-milk-f/wash");
    assert!(!validate(&p.slug).is_valid());
}

#[test]
fn skip_mode_leaves_existing_untouched() {
    let conn = open_memory().unwrap();
    run(&conn, "sku,name,retail_price\nS1,Soap,10\n", ExistingMode::Skip);
    let stats = run(&conn, "sku,name,retail_price\nS1,Soap Bar,20\n", ExistingMode::Skip);

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.updated, 0);
    let p = product_by_sku(&conn, "S1");
    assert_eq!(p.name, "Soap");
    assert_eq!(p.retail_price, 10.0);
}

#[test]
fn update_mode_preserves_stored_fields() {
    let conn = open_memory().unwrap();
    run(
        &conn,
        "sku,name,description,brand,stock_quantity,tags,weight,status\n\
         S1,Soap,Gentle bar,Dove,40,bath,0.1,available\n",
        ExistingMode::Skip,
    );
    let before = product_by_sku(&conn, "S1");

    let stats = run(&conn, "sku,name,retail_price\nS1,Soap Bar,20\n", ExistingMode::Update);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.created, 0);

    let after = product_by_sku(&conn, "S1");
    assert_eq!(after.id, before.id);
    assert_eq!(after.name, "Soap Bar");
    assert_eq!(after.slug, "soap-bar");
    assert_eq!(after.retail_price, 20.0);
    // always overwritten
    assert_eq!(after.status, ProductStatus::Draft);
    // preserved
    assert_eq!(after.description.as_deref(), Some("Gentle bar"));
    assert_eq!(after.brand_id, before.brand_id);
    assert_eq!(after.stock_quantity, 40);
    assert_eq!(after.tags, vec!["bath"]);
    assert_eq!(after.weight, Some(0.1));
}

#[test]
fn update_keeps_own_slug() {
    let conn = open_memory().unwrap();
    run(&conn, "sku,name\nS1,Soap\n", ExistingMode::Skip);
    run(&conn, "sku,name\nS1,Soap\n", ExistingMode::Update);
    assert_eq!(product_by_sku(&conn, "S1").slug, "soap");
}

#[test]
fn taxonomy_is_reused_across_rows_and_runs() {
    let conn = open_memory().unwrap();
    let mut ctx = ImportContext::new(Normalizer::default());
    let stats = run_with(
        &conn,
        &mut ctx,
        "sku,name,category\nS1,Soap,Bath & Body\nS2,Gel,BATH & BODY\n",
        ExistingMode::Skip,
    );
    assert_eq!(stats.categories_created, 1);

    // a fresh context finds the stored row by slug
    let stats = run(&conn, "sku,name,category\nS3,Salt,Bath & Body\n", ExistingMode::Skip);
    assert_eq!(stats.categories_created, 0);

    let categories = list_taxonomy(&conn, Taxonomy::Category).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug, "bath-and-body");
    assert_eq!(product_by_sku(&conn, "S3").category_id.as_deref(), Some(categories[0].id.as_str()));
}

#[test]
fn failed_row_is_rolled_back() {
    let conn = open_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_broken BEFORE INSERT ON product_images
         WHEN NEW.image_url = 'broken'
         BEGIN SELECT RAISE(ABORT, 'bad image'); END;",
    )
    .unwrap();

    let stats = run(
        &conn,
        "sku,name,image_url\nS1,Soap,broken\nS2,Gel,https://cdn.example/gel.jpg\n",
        ExistingMode::Skip,
    );
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.created, 1);
    assert_eq!(stats.failures[0].name, "Soap");
    assert!(find_product_by_sku(&conn, "S1").unwrap().is_none());
    assert!(find_product_by_sku(&conn, "S2").unwrap().is_some());
}

#[test]
fn imports_from_file() {
    let conn = open_memory().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "sku,name,status").unwrap();
    writeln!(file, "S1,Soap,draft").unwrap();
    writeln!(file, "S2,Gel,archived").unwrap();

    let reader = std::fs::File::open(file.path()).unwrap();
    let mut ctx = ImportContext::new(Normalizer::default());
    let stats =
        import_products_csv(&conn, reader, &mut ctx, &ImportOptions::default(), Some(&SilentProgress))
            .unwrap();
    assert_eq!(stats.created, 2);
    assert_eq!(product_by_sku(&conn, "S2").status, ProductStatus::Archived);
}
