use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::auth::UserProfile;

// Archive record models shared with the backend. Field names follow the
// server's JSON tags; date-only fields travel as YYYY-MM-DD strings.
// `id` and the server-managed fields are optional so a create payload can
// omit them.

/// Test item received for a study (chemicals, formulations, reference items).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub test_item_name: String,
    pub test_item_code: String,
    pub company_name: String,
    pub date_of_receipt: Option<NaiveDate>,
    pub batch_no: String,
    pub arc_no: String,
    pub rack_no: String,
    pub index_no: String,
    pub storage: String,
    pub expiry_date: Option<NaiveDate>,
    pub retest_date: Option<NaiveDate>,
    pub quantity: String,
    pub date_of_archive: Option<NaiveDate>,
    pub archived_by: String,
    pub disposed_or_returned: String,
    pub sponsor_approval_date: Option<NaiveDate>,
    pub remark: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Study record: archival indexes for raw data, reports, blocks/slides,
/// tissues and carcasses, plus the electronic-archive flags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Study {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub study_number: String,
    pub study_code: String,
    pub test_item_code: String,
    pub sd_or_pi_name: String,
    pub study_plan_page_no: String,
    pub study_plan_amendment_pages: String,
    pub date_of_receipt: Option<NaiveDate>,
    pub rd_index: String,
    pub fr_index: String,
    pub block_slides_index: String,
    pub tissues_index: String,
    pub carcass_index: String,
    pub raw_data_count: i32,
    pub final_or_terminated_report: String,
    pub amendment_to_final_report: String,
    pub others: String,
    pub electronic_data_archived_using_archive_system: bool,
    pub manually_archiving_data: bool,
    pub provantis_data: bool,
    pub empower_data: bool,
    pub other_electronic_if_any: bool,
    pub details_of_electronic_data_archived_through: String,
    pub block_slides_name_box_no: String,
    pub block_slides_no_of_box: String,
    pub tissue_box_name_box_no: String,
    pub tissue_box_no_of_box: String,
    pub carcass_box_name_box_no: String,
    pub carcass_box_no_of_box: String,
    pub study_completion_date: Option<NaiveDate>,
    pub remarks: String,
    /// JSON-encoded list of raw data items, stored opaque by the server.
    pub raw_data_items: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Facility document (SOPs, qualification records, correspondence).
/// The `admin_*` fields are only editable by admin users.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub dept_section: String,
    pub date: Option<NaiveDate>,
    pub particulars: String,
    pub total_no_of_pages: Option<i32>,
    pub submitted_by: String,
    pub admin_index_no: String,
    pub admin_date_of_receipt: Option<NaiveDate>,
    pub admin_date_of_indexing: Option<NaiveDate>,
    pub admin_remarks: String,
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
