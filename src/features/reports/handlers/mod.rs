pub mod report_handler;

pub use report_handler::{
    __path_assign_team, __path_create_report, __path_delete_report, __path_list_reports,
    __path_update_status, assign_team, create_report, delete_report, list_reports, update_status,
};
