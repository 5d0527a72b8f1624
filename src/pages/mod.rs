//! Public pages and forms, plus the family report viewer

pub mod application;
pub mod content;
pub mod inquiry;
pub mod reports;

pub use application::{submit_application, ApplicationForm, CvUpload};
pub use content::{content_page, ContentPage};
pub use inquiry::{submit_inquiry, InquiryForm, Program};
pub use reports::{children_of, reports_for};
