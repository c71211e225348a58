//! Client-side services: API access, file intake, mapping edits, search

pub mod api_client;
pub mod intake;
pub mod mapping_editor;
pub mod part_search;

pub use api_client::ApiClient;
pub use intake::IntakeFile;
pub use mapping_editor::MappingEditor;
pub use part_search::Debouncer;
