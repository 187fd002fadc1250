pub mod chapter_fold;
pub mod course_list;
pub mod curriculum;
pub mod endpoints;
pub mod errors;
pub mod models;
pub mod stream_selector;
pub mod utils;

pub use course_list::CourseLister;
pub use curriculum::CurriculumResolver;
