//! Runtime loading of remote modules behind single-flight fetch guards.

mod guard;
mod loader;
mod platform;
mod props;
mod service;
mod view;

pub use guard::{Admission, FetchGuard, FetchSnapshot, FetchState, SettleHooks};
pub use loader::RemoteModuleLoader;
pub use platform::{DEFAULT_PLATFORM, HelContext, PlatformConfig, PlatformRegistry};
pub use props::{FetchOptions, RemoteModuleProps, ResolvedProps};
pub use service::RemoteAppService;
pub use view::{EmittedModule, ModuleSlot, RemoteModuleView};
