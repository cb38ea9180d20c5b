use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Search result ─────────────────────────────────────────────────────────────

/// One row of a name search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyResult {
    pub name: String,
    pub dot_number: String,
    pub location: String,
}

// ── Company snapshot ──────────────────────────────────────────────────────────

/// Company snapshot as published on the SAFER "Company Snapshot" page.
///
/// Every field has a neutral default: counts are 0, strings and lists are empty and
/// dates are `None` when the page does not carry them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompanySnapshot {
    pub us_vehicle_inspections: InspectionSummary,
    pub us_driver_inspections: InspectionSummary,
    pub us_hazmat_inspections: InspectionSummary,
    pub us_iep_inspections: InspectionSummary,
    pub canada_vehicle_inspections: InspectionSummary,
    pub canada_driver_inspections: InspectionSummary,
    pub us_crashes: CrashSummary,
    pub canada_crashes: CrashSummary,
    pub safety: SafetyRating,
    pub latest_update_date: Option<NaiveDate>,
    pub out_of_service_date: Option<NaiveDate>,
    #[serde(rename = "mcs_150_form_date")]
    pub mcs150_form_date: Option<NaiveDate>,
    pub operation_classification: Vec<String>,
    pub carrier_operation: Vec<String>,
    pub cargo_carried: Vec<String>,
    pub legal_name: String,
    pub dba_name: String,
    pub entity_type: String,
    pub physical_address: String,
    pub phone: String,
    pub mailing_address: String,
    pub dot_number: String,
    pub state_carrier_id: String,
    pub mc_mx_ff_numbers: Vec<String>,
    pub duns_number: String,
    #[serde(rename = "mcs_150_mileage")]
    pub mcs150_mileage: u64,
    #[serde(rename = "mcs_150_year")]
    pub mcs150_year: String,
    pub operating_status: String,
    pub power_units: u64,
    pub drivers: u64,
}

// ── Safety metrics ────────────────────────────────────────────────────────────

/// Inspections over the 24 months before `latest_update_date`.
///
/// Percentages are fractions of 1. Canadian summaries have no national average, so
/// `national_average` stays 0 for them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct InspectionSummary {
    pub inspections: u64,
    pub out_of_service: u64,
    pub out_of_service_pct: f64,
    pub national_average: f64,
}

/// Crashes over the 24 months before `latest_update_date`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrashSummary {
    pub fatal: u64,
    pub injury: u64,
    pub tow: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetyRating {
    pub rating_date: Option<NaiveDate>,
    pub review_date: Option<NaiveDate>,
    pub rating: String,
    #[serde(rename = "type")]
    pub rating_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_serialises_empty_lists_and_null_dates() {
        let json = serde_json::to_value(CompanySnapshot::default()).unwrap();

        assert_eq!(json["mc_mx_ff_numbers"], serde_json::json!([]));
        assert_eq!(json["cargo_carried"], serde_json::json!([]));
        assert!(json["out_of_service_date"].is_null());
        assert_eq!(json["mcs_150_mileage"], 0);
        assert_eq!(json["canada_vehicle_inspections"]["national_average"], 0.0);
        assert_eq!(json["safety"]["type"], "");
    }

    #[test]
    fn test_snapshot_dates_use_iso_format() {
        let snapshot = CompanySnapshot {
            mcs150_form_date: NaiveDate::from_ymd_opt(2021, 4, 19),
            ..Default::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["mcs_150_form_date"], "2021-04-19");
    }
}
