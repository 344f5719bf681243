pub mod canonical;
pub mod config;
pub mod cooldown;
pub mod discovery;
pub mod dom;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod queue;
pub mod store;
pub mod submit;
pub mod utils;

pub use canonical::Canonicalizer;
pub use config::{ArchiverConfig, ArchiverConfigBuilder, SiteProfile, SiteRules, SubmitMethod};
pub use cooldown::CooldownLedger;
pub use discovery::{ContentDiscoverer, wait_for_element};
pub use dom::{ClickEvent, InMemoryDom, PageDom};
pub use error::{ArchiveError, ArchiveResult, ConfigError, StoreError, StoreResult};
pub use notify::{ChannelNotifier, LogNotifier, NoOpNotifier, Notification, Notifier};
pub use queue::{ArchiveQueue, DrainReport, DrainStatus, QueueTask};
pub use store::{JsonFileStore, KvStore, KvStoreExt, MemoryStore};
pub use submit::{SubmitOutcome, Submitter, WaybackClient};

// Navigation monitor
pub use monitor::{
    Archiver, ArchiverContext, ArchiverStatus, Collaborators, MonitorState, NavigationSignal,
    PageChange,
};
