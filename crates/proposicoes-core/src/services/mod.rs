//! Services module

pub mod download;
pub mod export;
pub mod filter_form;

pub use download::{DownloadTrigger, EXPORT_FILE_NAME};
pub use export::ExportClient;
pub use filter_form::{
    FieldError, FilterForm, FormField, FormState, FormValues, Toast,
    DEFAULT_CATEGORY, DEFAULT_MUNICIPALITY_ID,
};
