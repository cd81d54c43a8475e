pub mod catalog;
pub mod engine;
pub mod menu;
pub mod presence;
pub mod queue;
pub mod resolver;
pub mod session;
pub mod sink;
pub mod verify;

pub use catalog::{CATALOG, CatalogRow, Placement, rows};
pub use engine::{Engine, EngineOptions, ExportFile};
pub use menu::{GenerationTag, MenuEntry, MenuItem, build as build_menu};
pub use presence::scan;
pub use queue::{DeferredQueue, Task, TaskQueue, ThreadPoolQueue};
pub use resolver::{resolve, resolve_in};
pub use session::{Selection, Session};
pub use sink::{ExportTarget, NullSink, RenderSink};
pub use verify::{
    ErcaKeys, LogSink, SignatureVerifier, VerificationDispatcher, VerificationOutcome,
    VerificationSink, VerifyError,
};
