use serde::{Deserialize, Serialize};

use crate::domain::Employee;

pub const GET_RECORDS_ROUTE: &str = "/api/Record/GetRecords";
pub const SAVE_RECORDS_ROUTE: &str = "/api/Record/SaveRecords";

/// Response envelope of `GetRecords`. Only `Data` is read; every other
/// field the backend adds is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsEnvelope {
    #[serde(rename = "Data", default)]
    pub data: Option<Vec<Employee>>,
}

impl RecordsEnvelope {
    pub fn into_records(self) -> Vec<Employee> {
        self.data.unwrap_or_default()
    }
}

/// Acknowledgement body of `SaveRecords`. Passed through uninterpreted.
pub type SaveAck = serde_json::Value;
