//! Integration tests for cascading selector loading through the driver.
//!
//! - Root levels load together on mount
//! - Parent changes never leak stale child options
//! - A failing level leaves its siblings usable
//! - Refresh recovers a failed level

mod common;

use common::TestHarness;
use fastman_client::{ClientError, HttpReply, Method};
use fastman_forms::reports::failure::{EQUIPMENT, FAULT, GROUP, SHIFT};
use fastman_forms::reports::{checklist, ChecklistReport, FailureReport};
use fastman_forms::{CascadeDriver, LevelStatus, ReportForm};
use fastman_forms::cascade::Resolution;
use serde_json::json;

#[tokio::test]
async fn test_mount_loads_every_root_level() {
    let harness = TestHarness::signed_in();
    harness.plant_catalog();
    let mut report = FailureReport::new();

    CascadeDriver::new(&harness.client)
        .mount(report.selection_mut())
        .await;

    let form = report.selection();
    assert_eq!(form.status(SHIFT), Some(&LevelStatus::Ready));
    assert_eq!(form.status(GROUP), Some(&LevelStatus::Ready));
    assert_eq!(form.status(EQUIPMENT), Some(&LevelStatus::Idle));
    assert_eq!(form.options(SHIFT)[0].label, "Mañana");
    assert_eq!(harness.mock.call_count(), 2);
}

#[tokio::test]
async fn test_changing_group_never_leaks_previous_equipment() {
    let harness = TestHarness::signed_in();
    harness.plant_catalog();
    let driver = CascadeDriver::new(&harness.client);
    let mut report = FailureReport::new();
    driver.mount(report.selection_mut()).await;

    // G1's fetch is issued, then the user switches to G2 before it lands.
    let for_g1 = report.selection_mut().select(GROUP, 10).unwrap();
    let for_g2 = report.selection_mut().select(GROUP, 20).unwrap();

    harness.get_once("/equipo/", json!([{"id": 200, "nombre": "Molino SAG"}]));
    harness.get_once("/equipo/", json!([{"id": 100, "nombre": "Chancador primario"}]));

    let applied = driver.run(report.selection_mut(), for_g2).await;
    let late = driver.run(report.selection_mut(), for_g1).await;

    assert_eq!(applied, vec![Resolution::Applied]);
    assert_eq!(late, vec![Resolution::Stale]);

    let ids: Vec<_> = report
        .selection()
        .options(EQUIPMENT)
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![200]);

    let equipment_calls = harness.mock.calls_to("/equipo/");
    assert_eq!(equipment_calls, 2);
}

#[tokio::test]
async fn test_failed_level_does_not_block_siblings() {
    let harness = TestHarness::signed_in();
    harness.plant_catalog();
    harness.mock.route(
        Method::Get,
        "/turno/",
        HttpReply::json(500, json!({"detail": "Base de datos no disponible"})),
    );
    let mut report = FailureReport::new();

    CascadeDriver::new(&harness.client)
        .mount(report.selection_mut())
        .await;

    let form = report.selection();
    assert_eq!(
        form.status(SHIFT),
        Some(&LevelStatus::Error("Base de datos no disponible".into()))
    );
    assert_eq!(form.status(GROUP), Some(&LevelStatus::Ready));
}

#[tokio::test]
async fn test_refresh_recovers_failed_level() {
    let harness = TestHarness::signed_in();
    harness.plant_catalog();
    harness
        .mock
        .fail(Method::Get, "/grupoequipo/", ClientError::Timeout);
    let driver = CascadeDriver::new(&harness.client);
    let mut report = FailureReport::new();
    driver.mount(report.selection_mut()).await;

    assert_eq!(
        report.selection().level(GROUP).unwrap().error(),
        Some("Request timed out")
    );

    harness.get("/grupoequipo/", json!([{"id": 10, "nombre": "Chancado"}]));
    driver.refresh(report.selection_mut(), GROUP).await.unwrap();

    assert_eq!(report.selection().status(GROUP), Some(&LevelStatus::Ready));
    assert_eq!(report.selection().options(GROUP).len(), 1);
}

#[tokio::test]
async fn test_fault_selection_fills_description() {
    let harness = TestHarness::signed_in();
    harness.plant_catalog();
    let driver = CascadeDriver::new(&harness.client);
    let mut report = FailureReport::new();
    driver.mount(report.selection_mut()).await;

    driver.select(report.selection_mut(), GROUP, 10).await.unwrap();
    driver.select(report.selection_mut(), EQUIPMENT, 100).await.unwrap();
    driver.select(report.selection_mut(), FAULT, 7).await.unwrap();

    assert_eq!(
        report.selection().text("description"),
        "Ruido anormal en rodamiento"
    );
    let fault_query = &harness.mock.last_call().unwrap().query;
    assert!(fault_query.contains(&("id_equipo".to_string(), "100".to_string())));
}

#[tokio::test]
async fn test_checklist_group_change_resets_equipment_and_checklist() {
    let harness = TestHarness::signed_in();
    harness.plant_catalog();
    harness.get("/revision/", json!([{"id": 4, "nombre": "Inspección diaria"}]));
    let driver = CascadeDriver::new(&harness.client);
    let mut report = ChecklistReport::new();
    driver.mount(report.selection_mut()).await;
    driver.select(report.selection_mut(), checklist::GROUP, 10).await.unwrap();
    driver.select(report.selection_mut(), checklist::EQUIPMENT, 100).await.unwrap();
    driver.select(report.selection_mut(), checklist::CHECKLIST, 4).await.unwrap();

    harness.get("/equipo/", json!([{"id": 200, "nombre": "Molino SAG"}]));
    harness.get("/revision/", json!([{"id": 5, "nombre": "Revisión semanal"}]));
    driver.select(report.selection_mut(), checklist::GROUP, 20).await.unwrap();

    let form = report.selection();
    assert_eq!(form.selected(checklist::EQUIPMENT), None);
    assert_eq!(form.selected(checklist::CHECKLIST), None);
    assert_eq!(form.options(checklist::EQUIPMENT)[0].id, 200);
    assert_eq!(form.options(checklist::CHECKLIST)[0].id, 5);

    let group_20 = ("id_grupoequipo".to_string(), "20".to_string());
    let calls = harness.mock.calls();
    for suffix in ["/equipo/", "/revision/"] {
        let last = calls.iter().rev().find(|c| c.url.ends_with(suffix)).unwrap();
        assert!(last.query.contains(&group_20), "{} refetched for group 20", suffix);
    }
}
