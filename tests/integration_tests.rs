use jumpscare_segments::{
    CatalogItem, JsonStateRepository, SegmentService, SegmentTuning, TICKS_PER_SECOND,
};
use jumpscare_segments::catalog::{StaticCatalog, PROVIDER_IMDB, PROVIDER_TMDB};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

const HEADER: &str = "ItemName,IMDb,TMDb,Timestamp,Intensity,Description,Type";

fn catalog() -> Arc<StaticCatalog> {
    let mut weapons_ids = HashMap::new();
    weapons_ids.insert(PROVIDER_IMDB.to_string(), "tt26581740".to_string());
    weapons_ids.insert(PROVIDER_TMDB.to_string(), "1078605".to_string());

    Arc::new(StaticCatalog::new(vec![
        CatalogItem {
            id: "item-weapons".to_string(),
            name: "Weapons".to_string(),
            production_year: Some(2025),
            provider_ids: weapons_ids,
        },
        CatalogItem {
            id: "item-conjuring".to_string(),
            name: "The Conjuring".to_string(),
            production_year: Some(2013),
            provider_ids: HashMap::new(),
        },
    ]))
}

async fn fresh_service() -> (SegmentService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let repository = Arc::new(JsonStateRepository::new(temp_dir.path().join("state.json")));
    let service = SegmentService::initialize(catalog(), repository)
        .await
        .unwrap();
    (service, temp_dir)
}

#[tokio::test]
async fn test_end_to_end_external_id_row() {
    let (service, _guard) = fresh_service().await;

    // The external-id path must win here even though the name carries a year
    let csv = format!(
        "{}\nWeapons (2025),tt26581740,1078605,00:11:51,Minor,Ghost appears,Visual",
        HEADER
    );
    let summary = service.import_csv(&csv).await.unwrap();
    assert!(summary.success);
    assert_eq!(summary.imported_count, 1);
    assert_eq!(summary.total_rows, 1);

    let segments = service.segments_for_item("item-weapons").await;
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].item_id, "item-weapons");
    assert_eq!(segments[0].start_ticks, 709 * TICKS_PER_SECOND);
    assert_eq!(segments[0].end_ticks, 713 * TICKS_PER_SECOND);
}

#[tokio::test]
async fn test_partially_matchable_import_succeeds_with_skip_count() {
    let (service, _guard) = fresh_service().await;

    let csv = format!(
        "{}\n\
         Weapons,,,00:30,Major,Loud bang,Audio\n\
         Nowhere To Be Found,,,01:00,Minor,,Visual\n\
         The Conjuring,,,02:00,Minor,Hands clap,Combined",
        HEADER
    );
    let summary = service.import_csv(&csv).await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.imported_count, 2);
    assert_eq!(summary.skipped_count, 1);
    assert!(summary.message.contains("2 of 3"));
}

#[tokio::test]
async fn test_import_is_idempotent() {
    let (service, _guard) = fresh_service().await;

    let csv = format!(
        "{}\nWeapons,,,00:30,Major,,Visual\nWeapons,,,01:30,Minor,,Audio",
        HEADER
    );

    let first = service.import_csv(&csv).await.unwrap();
    assert_eq!(first.imported_count, 2);
    assert_eq!(first.skipped_count, 0);

    let second = service.import_csv(&csv).await.unwrap();
    assert_eq!(second.imported_count, 0);
    assert_eq!(second.skipped_count, 2);

    assert_eq!(service.statistics().await.total_records, 2);
}

#[tokio::test]
async fn test_statistics_aggregation() {
    let (service, _guard) = fresh_service().await;

    let mut csv = HEADER.to_string();
    for i in 0..3 {
        csv.push_str(&format!("\nWeapons,,,{:02}:{:02},Major,,Visual", i, i * 7 % 60));
    }
    for i in 0..14 {
        csv.push_str(&format!("\nWeapons,,,{:02}:{:02},Minor,,Visual", i + 10, i * 3 % 60));
    }

    let summary = service.import_csv(&csv).await.unwrap();
    assert_eq!(summary.imported_count, 17);

    let stats = service.statistics().await;
    assert_eq!(stats.total_records, 17);
    assert_eq!(stats.distinct_items, 1);
    assert_eq!(stats.major_count, 3);
    assert_eq!(stats.minor_count, 14);
}

#[tokio::test]
async fn test_query_untouched_item_is_empty_success() {
    let (service, _guard) = fresh_service().await;
    assert!(service.segments_for_item("item-conjuring").await.is_empty());
    assert!(service.segments_for_item("never-seen").await.is_empty());
}

#[tokio::test]
async fn test_empty_import_is_a_single_fatal_error() {
    let (service, _guard) = fresh_service().await;
    assert!(service.import_csv("").await.is_err());
    assert!(service.import_csv(HEADER).await.is_err());
    assert_eq!(service.statistics().await.total_records, 0);
}

#[tokio::test]
async fn test_record_near_zero_gets_clamped_interval() {
    let (service, _guard) = fresh_service().await;

    let csv = format!("{}\nWeapons,,,00:00,Minor,Opening jolt,Visual", HEADER);
    service.import_csv(&csv).await.unwrap();

    let segments = service.segments_for_item("item-weapons").await;
    assert_eq!(segments.len(), 1);
    // Clamp rule, not the flat one-second window
    assert_eq!(segments[0].start_ticks, 0);
    assert_eq!(segments[0].end_ticks, 2 * TICKS_PER_SECOND);
}

#[tokio::test]
async fn test_tuning_survives_restart_and_applies_on_query() {
    let temp_dir = TempDir::new().unwrap();
    let repository = Arc::new(JsonStateRepository::new(temp_dir.path().join("state.json")));

    {
        let service = SegmentService::initialize(catalog(), repository.clone())
            .await
            .unwrap();
        let csv = format!("{}\nWeapons,,,01:40,Major,,Visual", HEADER);
        service.import_csv(&csv).await.unwrap();
        service
            .update_tuning(SegmentTuning {
                start_delta_seconds: -4,
                end_delta_seconds: 6,
            })
            .await
            .unwrap();
    }

    let revived = SegmentService::initialize(catalog(), repository)
        .await
        .unwrap();
    let segments = revived.segments_for_item("item-weapons").await;
    assert_eq!(segments[0].start_ticks, 96 * TICKS_PER_SECOND);
    assert_eq!(segments[0].end_ticks, 106 * TICKS_PER_SECOND);
}

#[tokio::test]
async fn test_clear_is_destructive_and_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let repository = Arc::new(JsonStateRepository::new(temp_dir.path().join("state.json")));

    {
        let service = SegmentService::initialize(catalog(), repository.clone())
            .await
            .unwrap();
        let csv = format!("{}\nWeapons,,,00:30,Major,,Visual", HEADER);
        service.import_csv(&csv).await.unwrap();
        assert_eq!(service.clear_all().await.unwrap(), 1);
    }

    let revived = SegmentService::initialize(catalog(), repository)
        .await
        .unwrap();
    assert_eq!(revived.statistics().await.total_records, 0);
}

#[tokio::test]
async fn test_lenient_enum_defaults_flow_through() {
    let (service, _guard) = fresh_service().await;

    let csv = format!("{}\nWeapons,,,00:45,terrifying,,holographic", HEADER);
    let summary = service.import_csv(&csv).await.unwrap();
    assert_eq!(summary.imported_count, 1);

    let stats = service.statistics().await;
    // Unrecognized intensity text defaults to Minor
    assert_eq!(stats.minor_count, 1);
    assert_eq!(stats.major_count, 0);
}
