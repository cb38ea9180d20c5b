//! Field mappers for the tables of the Company Snapshot page.
//!
//! The snapshot body is a run of `<center>` blocks below the anchor cell. Each region
//! is found through its own path from the anchor ([`Region::path`]), so a block that
//! is missing or an extra table elsewhere on the page never moves another region.
//! Regions keep their historical table ordinals; [`Region::from_index`] maps an
//! ordinal back to its region and yields `None` for the rest.
//!
//! Each mapper only fills what it finds. A missing row or cell leaves the field at
//! its default.

use super::cleaner::{
    clean_duns, parse_address, parse_date, parse_int, parse_mileage_year, parse_pct,
};
use super::navigator::Navigator;
use crate::models::{CompanySnapshot, CrashSummary, InspectionSummary, SafetyRating};
use once_cell::sync::Lazy;
use scraper::Selector;

// ── Checkbox tables ───────────────────────────────────────────────────────────

/// Rows of the three checkbox columns inside a classification block.
const CHECKBOX_ROWS: &str = "tbody/tr[2]/td/table/tbody/tr";
/// Label of a checked row in the usual layout.
const CHECKBOX_LABEL: &str = "td/font";
/// Label of a checked row without `<font>` (extra entries such as "Other").
const CHECKBOX_LABEL_FALLBACK: &str = "td[2]";
const CHECKED: &str = "X";

static QUERYFIELD: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td.queryfield").expect("queryfield selector is hardcoded and valid")
});

// ── Region paths, relative to the anchor cell ─────────────────────────────────

const PATH_GENERAL_INFO: &str = "center[1]/table";
const PATH_OPERATION_CLASS: &str = "center[1]/table/tbody/tr[14]/td/table";
const PATH_CARRIER_OP: &str = "center[1]/table/tbody/tr[16]/td/table";
const PATH_CARGO_CARRIED: &str = "center[1]/table/tbody/tr[19]/td/table";
const PATH_US_INSPECTIONS: &str = "center[3]/table";
const PATH_US_CRASHES: &str = "center[4]/table";
const PATH_CANADA_INSPECTIONS: &str = "center[6]/table";
const PATH_CANADA_CRASHES: &str = "center[7]/table";
const PATH_SAFETY_RATING: &str = "center[9]/table";

// ── Region ordinals ───────────────────────────────────────────────────────────

const IDX_GENERAL_INFO: usize = 4;
const IDX_OPERATION_CLASS: usize = 5;
const IDX_CARRIER_OP: usize = 9;
const IDX_CARGO_CARRIED: usize = 13;
const IDX_US_INSPECTIONS: usize = 17;
const IDX_US_CRASHES: usize = 18;
const IDX_CANADA_INSPECTIONS: usize = 19;
const IDX_CANADA_CRASHES: usize = 20;
const IDX_SAFETY_RATING: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    GeneralInfo,
    OperationClassification,
    CarrierOperation,
    CargoCarried,
    UsInspections,
    UsCrashes,
    CanadaInspections,
    CanadaCrashes,
    SafetyRating,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::GeneralInfo,
        Region::OperationClassification,
        Region::CarrierOperation,
        Region::CargoCarried,
        Region::UsInspections,
        Region::UsCrashes,
        Region::CanadaInspections,
        Region::CanadaCrashes,
        Region::SafetyRating,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            IDX_GENERAL_INFO => Some(Region::GeneralInfo),
            IDX_OPERATION_CLASS => Some(Region::OperationClassification),
            IDX_CARRIER_OP => Some(Region::CarrierOperation),
            IDX_CARGO_CARRIED => Some(Region::CargoCarried),
            IDX_US_INSPECTIONS => Some(Region::UsInspections),
            IDX_US_CRASHES => Some(Region::UsCrashes),
            IDX_CANADA_INSPECTIONS => Some(Region::CanadaInspections),
            IDX_CANADA_CRASHES => Some(Region::CanadaCrashes),
            IDX_SAFETY_RATING => Some(Region::SafetyRating),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Region::GeneralInfo => IDX_GENERAL_INFO,
            Region::OperationClassification => IDX_OPERATION_CLASS,
            Region::CarrierOperation => IDX_CARRIER_OP,
            Region::CargoCarried => IDX_CARGO_CARRIED,
            Region::UsInspections => IDX_US_INSPECTIONS,
            Region::UsCrashes => IDX_US_CRASHES,
            Region::CanadaInspections => IDX_CANADA_INSPECTIONS,
            Region::CanadaCrashes => IDX_CANADA_CRASHES,
            Region::SafetyRating => IDX_SAFETY_RATING,
        }
    }

    /// Where the region's `<table>` sits below the anchor cell.
    pub const fn path(self) -> &'static str {
        match self {
            Region::GeneralInfo => PATH_GENERAL_INFO,
            Region::OperationClassification => PATH_OPERATION_CLASS,
            Region::CarrierOperation => PATH_CARRIER_OP,
            Region::CargoCarried => PATH_CARGO_CARRIED,
            Region::UsInspections => PATH_US_INSPECTIONS,
            Region::UsCrashes => PATH_US_CRASHES,
            Region::CanadaInspections => PATH_CANADA_INSPECTIONS,
            Region::CanadaCrashes => PATH_CANADA_CRASHES,
            Region::SafetyRating => PATH_SAFETY_RATING,
        }
    }

    /// Fill the fields this region carries. `table` is the region's `<table>`.
    pub fn apply(self, table: Navigator<'_>, snapshot: &mut CompanySnapshot) {
        match self {
            Region::GeneralInfo => map_general_info(table, snapshot),
            Region::OperationClassification => {
                snapshot.operation_classification.extend(checked_labels(table))
            }
            Region::CarrierOperation => snapshot.carrier_operation.extend(checked_labels(table)),
            Region::CargoCarried => snapshot.cargo_carried.extend(checked_labels(table)),
            Region::UsInspections => {
                let [vehicle, driver, hazmat, iep] = inspection_columns::<4>(table, true);
                snapshot.us_vehicle_inspections = vehicle;
                snapshot.us_driver_inspections = driver;
                snapshot.us_hazmat_inspections = hazmat;
                snapshot.us_iep_inspections = iep;
            }
            Region::UsCrashes => snapshot.us_crashes = crash_row(table),
            Region::CanadaInspections => {
                let [vehicle, driver] = inspection_columns::<2>(table, false);
                snapshot.canada_vehicle_inspections = vehicle;
                snapshot.canada_driver_inspections = driver;
            }
            Region::CanadaCrashes => snapshot.canada_crashes = crash_row(table),
            Region::SafetyRating => snapshot.safety = safety_rating(table),
        }
    }
}

// ── Mappers ───────────────────────────────────────────────────────────────────

fn map_general_info(table: Navigator<'_>, s: &mut CompanySnapshot) {
    let Some(body) = table.at("tbody") else { return };

    s.entity_type = body.text("tr[2]/td");

    if let Some(tr) = body.at("tr[3]") {
        s.operating_status = tr.text("td[1]");
        if s.operating_status.is_empty() {
            // OUT-OF-SERVICE is printed in bold red instead of plain text.
            s.operating_status = tr.text("td[1]/font/b");
        }
        s.out_of_service_date = parse_date(&tr.text("td[2]"));
    }

    s.legal_name = body.text("tr[4]/td");
    s.dba_name = body.text("tr[5]/td");
    s.physical_address = parse_address(&body.texts("tr[6]/td"));
    s.phone = body.text("tr[7]/td");
    s.mailing_address = parse_address(&body.texts("tr[8]/td"));

    if let Some(tr) = body.at("tr[9]") {
        s.dot_number = tr.text("td[1]");
        s.state_carrier_id = tr.text("td[2]");
    }
    if let Some(tr) = body.at("tr[10]") {
        s.mc_mx_ff_numbers = tr.texts("td[1]/a");
        s.duns_number = clean_duns(tr.text("td[2]"));
    }
    if let Some(tr) = body.at("tr[11]") {
        s.power_units = parse_int(&tr.text("td[1]"));
        s.drivers = parse_int(&tr.text("td[2]/font/b"));
    }
    if let Some(tr) = body.at("tr[12]") {
        s.mcs150_form_date = parse_date(&tr.text("td[1]"));
        (s.mcs150_mileage, s.mcs150_year) = parse_mileage_year(&tr.text("td[2]/font/b"));
    }
}

/// Labels of the checked rows of a checkbox block, in document order.
fn checked_labels(table: Navigator<'_>) -> Vec<String> {
    table
        .find_all(CHECKBOX_ROWS)
        .into_iter()
        .filter(|row| {
            row.select(&QUERYFIELD)
                .any(|cell| Navigator::new(cell).text("") == CHECKED)
        })
        .filter_map(|row| {
            let row = Navigator::new(row);
            let label = row.text(CHECKBOX_LABEL);
            let label = if label.is_empty() { row.text(CHECKBOX_LABEL_FALLBACK) } else { label };
            (!label.is_empty()).then_some(label)
        })
        .collect()
}

/// One summary per column: counts on rows 2 and 3, OOS % on row 4 and, for US
/// tables only, the national average on row 5.
fn inspection_columns<const N: usize>(
    table: Navigator<'_>,
    with_national_average: bool,
) -> [InspectionSummary; N] {
    std::array::from_fn(|i| {
        let col = i + 1;
        InspectionSummary {
            inspections: parse_int(&table.text(&format!("tbody/tr[2]/td[{col}]"))),
            out_of_service: parse_int(&table.text(&format!("tbody/tr[3]/td[{col}]"))),
            out_of_service_pct: parse_pct(&table.text(&format!("tbody/tr[4]/td[{col}]"))),
            national_average: if with_national_average {
                parse_pct(&table.text(&format!("tbody/tr[5]/td[{col}]/font")))
            } else {
                0.0
            },
        }
    })
}

fn crash_row(table: Navigator<'_>) -> CrashSummary {
    let cell = |col: usize| parse_int(&table.text(&format!("tbody/tr[2]/td[{col}]")));
    CrashSummary {
        fatal: cell(1),
        injury: cell(2),
        tow: cell(3),
        total: cell(4),
    }
}

fn safety_rating(table: Navigator<'_>) -> SafetyRating {
    SafetyRating {
        rating_date: parse_date(&table.text("tbody/tr[2]/td[1]")),
        review_date: parse_date(&table.text("tbody/tr[2]/td[2]")),
        rating: table.text("tbody/tr[3]/td[1]"),
        rating_type: table.text("tbody/tr[3]/td[2]"),
    }
}
