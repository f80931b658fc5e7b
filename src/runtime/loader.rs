//! Per-component loading state for a remote module.

use std::sync::Arc;

use super::guard::{FetchGuard, FetchState, SettleHooks};
use super::platform::PlatformRegistry;
use super::props::{FetchOptions, RemoteModuleProps, ResolvedProps};
use super::service::RemoteAppService;
use super::view::{EmittedModule, RemoteModuleView};
use crate::error::RetrievalError;

const STYLE_FETCH_ERROR: &str = "err occurred while fetch component style";
const MODULE_FETCH_ERROR: &str = "err occurred while fetch component";

/// Loading state for one mounted remote module.
///
/// Each retrieval variant has its own guard, so a style fetch never blocks a module fetch.
/// Every `fetch_*` call returns the placeholder view; the host re-renders from [`poll`]
/// once a hook fires or a subscription changes.
///
/// [`poll`]: RemoteModuleLoader::poll
pub struct RemoteModuleLoader<S> {
  service: Arc<S>,
  props: ResolvedProps,
  options: FetchOptions,
  style_by_urls: FetchGuard<String>,
  style_by_name: FetchGuard<String>,
  module: FetchGuard<EmittedModule>,
}

impl<S: RemoteAppService> RemoteModuleLoader<S> {
  /// Create a loader for `props`, resolving defaults and the platform.
  pub fn new(service: Arc<S>, props: &RemoteModuleProps, platforms: &PlatformRegistry) -> Self {
    let props = props.ensure_defaults();
    let options = FetchOptions::from_props(&props, platforms);
    let name = props.name.clone();
    Self {
      service,
      style_by_urls: FetchGuard::new(format!("{name}/style-urls"), STYLE_FETCH_ERROR),
      style_by_name: FetchGuard::new(format!("{name}/style"), STYLE_FETCH_ERROR),
      module: FetchGuard::new(name, MODULE_FETCH_ERROR),
      props,
      options,
    }
  }

  /// Props with defaults applied.
  pub fn props(&self) -> &ResolvedProps {
    &self.props
  }

  /// Options forwarded to every retrieval.
  pub fn options(&self) -> &FetchOptions {
    &self.options
  }

  /// Guard tracking the module bundle.
  pub fn module_guard(&self) -> &FetchGuard<EmittedModule> {
    &self.module
  }

  /// Fetch style text for an explicit list of stylesheet URLs.
  pub fn fetch_local_comp_style_str(
    &self,
    style_url_list: &[String],
    hooks: SettleHooks<String>,
  ) -> RemoteModuleView {
    let service = Arc::clone(&self.service);
    let urls = style_url_list.to_vec();
    self.style_by_urls.request(
      move || async move { service.fetch_style_by_url_list(&urls).await },
      hooks,
    );
    RemoteModuleView::fetching()
  }

  /// Fetch the style text registered for this module.
  pub fn fetch_remote_module_style(&self, hooks: SettleHooks<String>) -> RemoteModuleView {
    let service = Arc::clone(&self.service);
    let name = self.props.name.clone();
    let options = self.options.clone();
    self.style_by_name.request(
      move || async move { service.fetch_style_str(&name, &options).await },
      hooks,
    );
    RemoteModuleView::fetching()
  }

  /// Fetch the module bundle, as a lib or an app depending on the props.
  ///
  /// A retrieval that emits nothing is reported as [`RetrievalError::Empty`].
  pub fn fetch_remote_module(&self, hooks: SettleHooks<EmittedModule>) -> RemoteModuleView {
    let service = Arc::clone(&self.service);
    let name = self.props.name.clone();
    let options = self.options.clone();
    let is_lib = self.props.is_lib;
    self.module.request(
      move || async move {
        let emitted = if is_lib {
          service.prefetch_lib(&name, &options).await
        } else {
          service.prefetch_app(&name, &options).await
        };
        emitted.and_then(|module| module.ok_or(RetrievalError::Empty))
      },
      hooks,
    );
    RemoteModuleView::fetching()
  }

  /// Fold the current guard states into a render result.
  ///
  /// Any recorded failure wins; otherwise the module is ready once its bundle has loaded.
  pub fn poll(&self) -> RemoteModuleView {
    let module = self.module.snapshot();
    let by_name = self.style_by_name.snapshot();
    let by_urls = self.style_by_urls.snapshot();

    if let Some(message) = module
      .error
      .as_ref()
      .or(by_name.error.as_ref())
      .or(by_urls.error.as_ref())
    {
      return RemoteModuleView::error(message.clone());
    }

    if by_name.is_loading() || by_urls.is_loading() {
      return RemoteModuleView::fetching();
    }

    match module.payload {
      Some(emitted) if module.status == FetchState::Loaded => {
        let style_str = [by_name.payload, by_urls.payload]
          .into_iter()
          .flatten()
          .collect::<Vec<_>>()
          .join("\n");
        RemoteModuleView::ready(emitted, style_str, self.options.extra_css_url_list.clone())
      }
      _ => RemoteModuleView::fetching(),
    }
  }

  /// Wait until none of the guards has a retrieval in flight.
  pub async fn settled(&self) -> RemoteModuleView {
    self.module.settled().await;
    self.style_by_name.settled().await;
    self.style_by_urls.settled().await;
    self.poll()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use async_trait::async_trait;

  use super::*;
  use crate::runtime::view::ModuleSlot;

  #[derive(Default)]
  struct FakeService {
    app_calls: AtomicUsize,
    lib_calls: AtomicUsize,
    style_calls: AtomicUsize,
    emit_nothing: bool,
    fail_style: bool,
  }

  fn emitted(name: &str, options: &FetchOptions, is_lib: bool) -> EmittedModule {
    EmittedModule {
      name: name.to_string(),
      platform: options.platform.clone(),
      version_id: options.version_id.clone(),
      is_lib,
    }
  }

  #[async_trait]
  impl RemoteAppService for FakeService {
    async fn fetch_style_by_url_list(&self, urls: &[String]) -> Result<String, RetrievalError> {
      self.style_calls.fetch_add(1, Ordering::SeqCst);
      Ok(urls.join(";"))
    }

    async fn fetch_style_str(
      &self,
      name: &str,
      _options: &FetchOptions,
    ) -> Result<String, RetrievalError> {
      self.style_calls.fetch_add(1, Ordering::SeqCst);
      if self.fail_style {
        return Err(RetrievalError::failed(""));
      }
      Ok(format!(".{name} {{}}"))
    }

    async fn prefetch_app(
      &self,
      name: &str,
      options: &FetchOptions,
    ) -> Result<Option<EmittedModule>, RetrievalError> {
      self.app_calls.fetch_add(1, Ordering::SeqCst);
      if self.emit_nothing {
        return Ok(None);
      }
      Ok(Some(emitted(name, options, false)))
    }

    async fn prefetch_lib(
      &self,
      name: &str,
      options: &FetchOptions,
    ) -> Result<Option<EmittedModule>, RetrievalError> {
      self.lib_calls.fetch_add(1, Ordering::SeqCst);
      Ok(Some(emitted(name, options, true)))
    }
  }

  fn build_loader(
    service: FakeService,
    props: RemoteModuleProps,
  ) -> (Arc<FakeService>, RemoteModuleLoader<FakeService>) {
    let service = Arc::new(service);
    let loader =
      RemoteModuleLoader::new(Arc::clone(&service), &props, &PlatformRegistry::default());
    (service, loader)
  }

  #[tokio::test]
  async fn repeated_renders_fetch_the_module_once() {
    let (service, loader) = build_loader(FakeService::default(), RemoteModuleProps::named("dashboard"));
    let settled = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
      let counter = Arc::clone(&settled);
      let view = loader.fetch_remote_module(SettleHooks::none().on_settled(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
      }));
      assert_eq!(view, RemoteModuleView::fetching());
    }

    let view = loader.settled().await;
    assert_eq!(service.app_calls.load(Ordering::SeqCst), 1);
    assert_eq!(settled.load(Ordering::SeqCst), 1);
    assert!(view.module_ready);
    assert!(matches!(view.remote_module, ModuleSlot::Ready(ref module) if module.name == "dashboard" && module.platform == "unpkg"));
  }

  #[tokio::test]
  async fn libraries_are_prefetched_as_libs() {
    let props = RemoteModuleProps {
      is_lib: Some(true),
      ..RemoteModuleProps::named("utils")
    };
    let (service, loader) = build_loader(FakeService::default(), props);

    loader.fetch_remote_module(SettleHooks::none());
    let view = loader.settled().await;

    assert_eq!(service.lib_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.app_calls.load(Ordering::SeqCst), 0);
    assert!(matches!(view.remote_module, ModuleSlot::Ready(ref module) if module.is_lib));
  }

  #[tokio::test]
  async fn empty_module_result_is_an_error() {
    let service = FakeService {
      emit_nothing: true,
      ..FakeService::default()
    };
    let (_, loader) = build_loader(service, RemoteModuleProps::named("ghost"));
    let errors = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);

    loader.fetch_remote_module(SettleHooks::none().on_error(move |message| {
      sink.lock().unwrap().push(message);
    }));
    let view = loader.settled().await;

    assert_eq!(loader.module_guard().state(), FetchState::Loaded);
    assert_eq!(errors.lock().unwrap().as_slice(), ["no component fetched".to_string()]);
    assert_eq!(view, RemoteModuleView::error("no component fetched"));
  }

  #[tokio::test]
  async fn style_failures_use_the_generic_message() {
    let service = FakeService {
      fail_style: true,
      ..FakeService::default()
    };
    let (_, loader) = build_loader(service, RemoteModuleProps::named("dashboard"));

    loader.fetch_remote_module(SettleHooks::none());
    loader.fetch_remote_module_style(SettleHooks::none());
    let view = loader.settled().await;

    assert_eq!(
      view.error_banner().as_deref(),
      Some("Hel MicroComp error: err occurred while fetch component style")
    );
  }

  #[tokio::test]
  async fn style_text_is_joined_into_the_ready_view() {
    let props = RemoteModuleProps {
      shadow: Some(true),
      set_style_as_string: Some(true),
      extra_css_url_list: vec!["https://cdn.x/extra.css".into()],
      ..RemoteModuleProps::named("dashboard")
    };
    let (service, loader) = build_loader(FakeService::default(), props);

    loader.fetch_remote_module(SettleHooks::none());
    loader.fetch_remote_module_style(SettleHooks::none());
    loader.fetch_remote_module_style(SettleHooks::none());
    loader.fetch_local_comp_style_str(
      &["https://cdn.x/a.css".to_string(), "https://cdn.x/b.css".to_string()],
      SettleHooks::none(),
    );
    let view = loader.settled().await;

    assert_eq!(service.style_calls.load(Ordering::SeqCst), 2);
    assert!(!loader.props().append_css);
    assert!(view.module_ready);
    assert_eq!(view.style_str, ".dashboard {}\nhttps://cdn.x/a.css;https://cdn.x/b.css");
    assert_eq!(view.style_url_list, vec!["https://cdn.x/extra.css".to_string()]);
  }

  #[test]
  fn idle_loader_polls_as_placeholder() {
    let (_, loader) = build_loader(FakeService::default(), RemoteModuleProps::named("dashboard"));
    assert_eq!(loader.poll(), RemoteModuleView::fetching());
  }
}
