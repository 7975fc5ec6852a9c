pub mod activation;
pub mod entity;
pub mod entry;
pub mod logging;
pub mod repository;
pub mod session;
pub mod settings;
pub mod store;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use activation::{ensure_loader, loader_path, ActivationError, LoaderSpec};
pub use entity::{Entity, EntityError, EntityField, MetaField, PropertyMap};
pub use entry::{Entry, EntryId, EntryStatus, FieldKey, FormId, UserId, Value};
pub use logging::{init_logging, install_panic_hook, parse_rotation, LogConfig};
pub use repository::{
    Direction, FieldFilter, Filter, Paging, Repository, RepositoryError, SearchCriteria, Sorting,
};
pub use session::{FixedSession, Session};
pub use settings::{load_settings, save_settings, Settings, SettingsError};
pub use store::{FormsApi, MemoryFormsApi, RestFormsApi, StoreError};
pub use telemetry::{LogEvent, TelemetryError, TelemetrySink};
