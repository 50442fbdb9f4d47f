mod catalog_vm;
mod error_vm;
mod history_vm;
mod quiz_vm;
mod review_vm;
pub mod time_fmt;

pub use catalog_vm::{DepartmentCardVm, HomeVm, YearLinkVm, YearPageVm, start_href};
pub use error_vm::ErrorVm;
pub use history_vm::{DepartmentStatsVm, HistoryRowVm, HistoryVm};
pub use quiz_vm::{
    CountOptionVm, FeedbackVm, OptionVm, QuestionVm, ResultVm, ReviewItemVm, StartVm,
    count_options, grade_message,
};
pub use review_vm::{MANY_MISSES, ReviewGroupVm, ReviewListVm, ReviewRowVm};
