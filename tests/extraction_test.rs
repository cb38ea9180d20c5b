use approx::assert_relative_eq;
use chrono::NaiveDate;
use safer_snapshot::{
    CompanyResult, CrashSummary, InspectionSummary, SaferError, SafetyRating, parse_search_page,
    parse_snapshot_page,
};

const SNAPSHOT: &str = include_str!("fixtures/snapshot.html");
const OUT_OF_SERVICE: &str = include_str!("fixtures/snapshot_out_of_service.html");
const NOT_FOUND: &str = include_str!("fixtures/snapshot_not_found.html");
const SEARCH: &str = include_str!("fixtures/search_results.html");

fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn assert_inspections(actual: &InspectionSummary, expected: (u64, u64, f64, f64)) {
    let (inspections, out_of_service, pct, national_average) = expected;
    assert_eq!(actual.inspections, inspections);
    assert_eq!(actual.out_of_service, out_of_service);
    assert_relative_eq!(actual.out_of_service_pct, pct);
    assert_relative_eq!(actual.national_average, national_average);
}

#[test]
fn test_full_snapshot() {
    let s = parse_snapshot_page(SNAPSHOT).expect("snapshot page parses");

    assert_eq!(s.legal_name, "SCHNEIDER NATIONAL CARRIERS INC");
    assert_eq!(s.dba_name, "");
    assert_eq!(s.entity_type, "CARRIER/CARGO TANK/BROKER");
    assert_eq!(s.operating_status, "AUTHORIZED");
    assert_eq!(s.out_of_service_date, None);
    assert_eq!(s.physical_address, "3101 S PACKERLAND DR GREEN BAY, WI 54313");
    assert_eq!(s.phone, "(800) 558-6767");
    assert_eq!(s.mailing_address, "PO BOX 2545 GREEN BAY, WI 54306-2545");
    assert_eq!(s.dot_number, "264184");
    assert_eq!(s.state_carrier_id, "");
    assert_eq!(s.mc_mx_ff_numbers, vec!["MC-133655"]);
    assert_eq!(s.duns_number, "15-730-4676");
    assert_eq!(s.power_units, 10_884);
    assert_eq!(s.drivers, 12_239);
    assert_eq!(s.mcs150_form_date, ymd(2021, 4, 19));
    assert_eq!(s.mcs150_mileage, 1_100_158_928);
    assert_eq!(s.mcs150_year, "2020");
    assert_eq!(s.latest_update_date, ymd(2021, 8, 14));

    assert_eq!(s.operation_classification, vec!["Auth. For Hire"]);
    assert_eq!(s.carrier_operation, vec!["Interstate"]);
    assert_eq!(
        s.cargo_carried,
        vec![
            "General Freight",
            "Logs, Poles, Beams, Lumber",
            "Building Materials",
            "Fresh Produce",
            "Intermodal Cont.",
            "Meat",
            "Chemicals",
            "Commodities Dry Bulk",
            "Refrigerated Food",
            "Beverages",
            "Paper Products",
        ]
    );

    assert_inspections(&s.us_vehicle_inspections, (7_276, 991, 0.136, 0.2084));
    assert_inspections(&s.us_driver_inspections, (13_728, 71, 0.005, 0.0545));
    assert_inspections(&s.us_hazmat_inspections, (426, 6, 0.014, 0.0441));
    assert_inspections(&s.us_iep_inspections, (2, 0, 0.0, 0.0));
    assert_eq!(
        s.us_crashes,
        CrashSummary { fatal: 15, injury: 248, tow: 574, total: 837 }
    );

    assert_inspections(&s.canada_vehicle_inspections, (24, 8, 0.333, 0.0));
    assert_inspections(&s.canada_driver_inspections, (30, 8, 0.267, 0.0));
    assert_eq!(
        s.canada_crashes,
        CrashSummary { fatal: 0, injury: 0, tow: 1, total: 1 }
    );

    assert_eq!(s.safety.rating_date, ymd(2003, 2, 20));
    assert_eq!(s.safety.review_date, ymd(2020, 10, 14));
    assert_eq!(s.safety.rating, "Satisfactory");
    assert_eq!(s.safety.rating_type, "Non-Ratable");
}

#[test]
fn test_out_of_service_snapshot() {
    let s = parse_snapshot_page(OUT_OF_SERVICE).expect("snapshot page parses");

    assert_eq!(s.dot_number, "1003306");
    assert_eq!(s.legal_name, "RIVERSIDE HAULING LLC");
    assert_eq!(s.dba_name, "RIVERSIDE EXPRESS");
    assert_eq!(s.operating_status, "OUT-OF-SERVICE");
    assert_eq!(s.out_of_service_date, ymd(2021, 3, 22));
    assert_eq!(s.state_carrier_id, "TX-55210");

    assert_eq!(s.physical_address, "");
    assert_eq!(s.mailing_address, "");
    assert_eq!(s.phone, "");
    assert!(s.mc_mx_ff_numbers.is_empty());
    assert_eq!(s.duns_number, "");

    assert_eq!(s.power_units, 2);
    assert_eq!(s.drivers, 1);
    assert_eq!(s.mcs150_mileage, 25_000);
    assert_eq!(s.mcs150_year, "2019");

    assert_eq!(s.operation_classification, vec!["Private(Property)"]);
    assert_eq!(s.carrier_operation, vec!["Intrastate Only (Non-HM)"]);
    assert_eq!(s.cargo_carried, vec!["General Freight", "FARM SUPPLIES"]);

    assert_inspections(&s.us_vehicle_inspections, (3, 2, 0.667, 0.2084));
    assert_eq!(s.us_crashes.total, 1);

    // No Canadian or safety rating blocks on this page.
    assert_eq!(s.canada_vehicle_inspections, InspectionSummary::default());
    assert_eq!(s.canada_crashes, CrashSummary::default());
    assert_eq!(s.safety, SafetyRating::default());
    assert_eq!(s.latest_update_date, ymd(2021, 9, 2));
}

#[test]
fn test_not_found_page() {
    let err = parse_snapshot_page(NOT_FOUND).unwrap_err();
    assert!(matches!(err, SaferError::CompanyNotFound));
    assert!(err.is_not_found());
}

#[test]
fn test_extraction_is_idempotent() {
    let first = parse_snapshot_page(SNAPSHOT).unwrap();
    let second = parse_snapshot_page(SNAPSHOT).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    assert_eq!(parse_search_page(SEARCH), parse_search_page(SEARCH));
}

#[test]
fn test_snapshot_json_shape() {
    let s = parse_snapshot_page(SNAPSHOT).unwrap();
    let json = serde_json::to_value(&s).unwrap();

    assert_eq!(json["dot_number"], "264184");
    assert_eq!(json["mcs_150_form_date"], "2021-04-19");
    assert_eq!(json["mcs_150_mileage"], 1_100_158_928u64);
    assert_eq!(json["mcs_150_year"], "2020");
    assert_eq!(json["safety"]["type"], "Non-Ratable");
    assert_eq!(json["us_crashes"]["total"], 837);
    assert!(json["out_of_service_date"].is_null());
}

#[test]
fn test_search_results() {
    let results = parse_search_page(SEARCH);

    assert_eq!(results.len(), 4);
    assert_eq!(
        results[0],
        CompanyResult {
            name: "SCHNEIDER NATIONAL CARRIERS INC".into(),
            dot_number: "264184".into(),
            location: "GREEN BAY, WI".into(),
        }
    );

    let dots: Vec<&str> = results.iter().map(|r| r.dot_number.as_str()).collect();
    assert_eq!(dots, vec!["264184", "2247505", "1008547", "87659"]);
    assert!(results.iter().all(|r| r.location == "GREEN BAY, WI"));
}

#[test]
fn test_snapshot_page_is_not_a_listing() {
    assert!(parse_search_page(SNAPSHOT).is_empty());
}

/// The fixture page with the table carrying `summary` cut out.
fn without_table(html: &str, summary: &str) -> String {
    let marker = format!(r#"summary="{summary}""#);
    let at = html.find(&marker).expect("fixture has the table");
    let start = html[..at].rfind("<table").expect("summary sits on a table tag");
    let end = at + html[at..].find("</table>").expect("table is closed") + "</table>".len();
    format!("{}{}", &html[..start], &html[end..])
}

#[test]
fn test_missing_us_inspections_leave_other_regions_in_place() {
    let page = without_table(SNAPSHOT, "Inspections");
    let s = parse_snapshot_page(&page).unwrap();

    assert_eq!(s.us_vehicle_inspections, InspectionSummary::default());
    assert_eq!(s.us_driver_inspections, InspectionSummary::default());
    assert_eq!(s.us_hazmat_inspections, InspectionSummary::default());
    assert_eq!(s.us_iep_inspections, InspectionSummary::default());

    assert_eq!(
        s.us_crashes,
        CrashSummary { fatal: 15, injury: 248, tow: 574, total: 837 }
    );
    assert_inspections(&s.canada_vehicle_inspections, (24, 8, 0.333, 0.0));
    assert_eq!(s.canada_crashes.total, 1);
    assert_eq!(s.safety.rating, "Satisfactory");
    assert_eq!(s.legal_name, "SCHNEIDER NATIONAL CARRIERS INC");
    assert_eq!(s.cargo_carried.len(), 11);
}

#[test]
fn test_missing_canada_inspections_keep_crashes_and_rating() {
    let full = parse_snapshot_page(SNAPSHOT).unwrap();
    let page = without_table(SNAPSHOT, "Canadian Inspections");
    let s = parse_snapshot_page(&page).unwrap();

    assert_eq!(s.canada_vehicle_inspections, InspectionSummary::default());
    assert_eq!(s.canada_driver_inspections, InspectionSummary::default());
    assert_eq!(
        s.canada_crashes,
        CrashSummary { fatal: 0, injury: 0, tow: 1, total: 1 }
    );
    assert_eq!(s.safety, full.safety);
    assert_eq!(s.us_crashes, full.us_crashes);
    assert_eq!(s.us_hazmat_inspections, full.us_hazmat_inspections);
}

#[test]
fn test_extra_tables_do_not_shift_regions() {
    let page = SNAPSHOT
        .replace(
            r#"<tr><td colspan="4">&nbsp;</td></tr>"#,
            r#"<tr><td colspan="4"><table><tr><td>Hazmat permit on file</td></tr></table></td></tr>"#,
        )
        .replace(
            "<center><h4>Carrier Safety Rating:</h4></center>",
            "<center><h4>Carrier Safety Rating:</h4>\
             <table summary=\"Notice\"><tr><td>Rating under review</td></tr></table></center>",
        );
    assert_ne!(page, SNAPSHOT);

    let shifted = parse_snapshot_page(&page).unwrap();
    let full = parse_snapshot_page(SNAPSHOT).unwrap();
    assert_eq!(shifted, full);
}
