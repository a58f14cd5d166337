// Run window

use chrono::NaiveDateTime;

/// Start and end of the run, captured once each
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}
