//! UI Components
//!
//! Generic Leptos components shared by every collection page.

mod collection_view;
mod create_form;
mod edit_modal;
mod notice_banner;
mod record_table;

pub use collection_view::CollectionView;
pub use create_form::CreateForm;
pub use edit_modal::EditModal;
pub use notice_banner::NoticeBanner;
pub use record_table::{RecordRow, RecordTable};
