use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Stats {
    pub users: u64,
    pub tests: u64,
    pub results: u64,
}
