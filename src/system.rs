//! Logger factory bound to a category set

use crate::appenders::{ConsoleAppender, MemoryStore};
use crate::config::{self, Config, Output, ENV_LEVEL, ENV_PRETTY};
use crate::core::{
    context, Backend, Decorator, Fields, LogEntry, Logger, Result, Sink, SinkFactory,
};
use parking_lot::RwLock;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

enum Destination {
    Memory(MemoryStore),
    Backend(Arc<Backend>),
    Custom(SinkFactory),
}

impl Destination {
    fn sink_for(&self, category: &str) -> Sink {
        match self {
            Destination::Memory(store) => store.sink_for(category),
            Destination::Backend(backend) => backend.sink_for(category),
            Destination::Custom(factory) => factory(category),
        }
    }
}

struct Installed {
    destination: Destination,
    decorator: Arc<Decorator>,
}

/// Log system for a set of categories
///
/// `C` is the caller's category type (an enum implementing `AsRef<str>`, or
/// plain strings), so `logger` only accepts categories from that set.
///
/// Each [`Logger`] keeps the sink it was created with. Calling [`init`] again
/// affects loggers obtained afterwards; [`generation`] tells the two apart.
///
/// [`init`]: LogSystem::init
/// [`generation`]: LogSystem::generation
///
/// # Example
///
/// ```
/// use rust_topic_logger::prelude::*;
/// use rust_topic_logger::fields;
///
/// enum Category {
///     Startup,
///     Users,
/// }
///
/// impl AsRef<str> for Category {
///     fn as_ref(&self) -> &str {
///         match self {
///             Category::Startup => "startup",
///             Category::Users => "api.users",
///         }
///     }
/// }
///
/// let system: LogSystem<Category> = LogSystem::new();
/// system.init(Config::test()).unwrap();
///
/// let logger = system.logger(Category::Users).unwrap();
/// logger.info("Created user", fields! { "id" => 42 }).unwrap();
/// system.logger(Category::Startup).unwrap().info("Ready", fields! {}).unwrap();
///
/// let entries = system.test_entries();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].fields["$topics"], FieldValue::from(vec!["api.users", "api"]));
/// ```
pub struct LogSystem<C = String> {
    installed: RwLock<Option<Arc<Installed>>>,
    generation: AtomicU64,
    _categories: PhantomData<fn(C)>,
}

impl<C: AsRef<str>> LogSystem<C> {
    pub fn new() -> Self {
        Self {
            installed: RwLock::new(None),
            generation: AtomicU64::new(0),
            _categories: PhantomData,
        }
    }

    /// Install `config`, falling back to the process environment for unset
    /// options
    pub fn init(&self, config: Config) -> Result<()> {
        self.init_with_lookup(config, &config::env_lookup)
    }

    /// Install `config`, reading unset options through `lookup`
    pub fn init_with_lookup(
        &self,
        config: Config,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<()> {
        let installed = Arc::new(Self::install(config, lookup)?);
        *self.installed.write() = Some(installed);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Logger for `category`, initializing from the environment on first use
    pub fn logger(&self, category: C) -> Result<Logger> {
        let installed = self.installed()?;
        let category = category.as_ref();
        Ok(Logger::decorated(
            category,
            installed.destination.sink_for(category),
            Arc::clone(&installed.decorator),
        ))
    }

    pub fn is_initialized(&self) -> bool {
        self.installed.read().is_some()
    }

    /// Number of completed initializations
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Captured entries in memory mode, empty otherwise
    pub fn test_entries(&self) -> Vec<LogEntry> {
        match self.memory_store() {
            Some(store) => store.entries(),
            None => Vec::new(),
        }
    }

    /// Discard captured entries; no-op outside memory mode
    pub fn clear_test_entries(&self) {
        if let Some(store) = self.memory_store() {
            store.clear();
        }
    }

    /// See [`context::with_context`]
    pub fn with_context<T, F>(&self, patch: Fields, body: F) -> T
    where
        F: FnOnce() -> T,
    {
        context::with_context(patch, body)
    }

    pub fn current_context(&self) -> Option<context::Context> {
        context::current_context()
    }

    pub fn require_context(&self) -> Result<context::Context> {
        context::require_context()
    }

    fn memory_store(&self) -> Option<MemoryStore> {
        match self.installed.read().as_deref() {
            Some(Installed {
                destination: Destination::Memory(store),
                ..
            }) => Some(store.clone()),
            _ => None,
        }
    }

    fn installed(&self) -> Result<Arc<Installed>> {
        if let Some(installed) = self.installed.read().as_ref() {
            return Ok(Arc::clone(installed));
        }

        let mut slot = self.installed.write();
        if let Some(installed) = slot.as_ref() {
            return Ok(Arc::clone(installed));
        }
        let installed = Arc::new(Self::install(Config::default(), &config::env_lookup)?);
        *slot = Some(Arc::clone(&installed));
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(installed)
    }

    fn install(config: Config, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Installed> {
        let Config {
            output,
            level,
            pretty,
            show_metadata,
            default_fields,
        } = config;

        let mut decorator = Decorator::new();
        if let Some(defaults) = default_fields {
            decorator = decorator.with_defaults(defaults);
        }

        let min_level = || level.map_or_else(|| config::level_from(lookup), Ok);

        let destination = match output {
            Output::Memory => Destination::Memory(MemoryStore::new()),
            Output::Custom(factory) => Destination::Custom(factory),
            Output::Backend(backend) => {
                if lookup(ENV_LEVEL).is_some() || lookup(ENV_PRETTY).is_some() {
                    eprintln!(
                        "[LOGGER WARNING] {} and {} are ignored when a custom backend \
                         is configured",
                        ENV_LEVEL, ENV_PRETTY
                    );
                }
                Destination::Backend(backend)
            }
            Output::Appenders(appenders) => Destination::Backend(Arc::new(
                Backend::builder()
                    .min_level(min_level()?)
                    .boxed_appenders(appenders)
                    .build(),
            )),
            Output::Console => {
                let pretty = match pretty {
                    Some(pretty) => pretty,
                    None => config::pretty_from(lookup)?,
                };
                let show_metadata = match show_metadata {
                    Some(show_metadata) => show_metadata,
                    None => config::show_metadata_from(lookup)?,
                };
                Destination::Backend(Arc::new(
                    Backend::builder()
                        .min_level(min_level()?)
                        .appender(ConsoleAppender::for_mode(pretty, show_metadata))
                        .build(),
                ))
            }
        };

        Ok(Installed {
            destination,
            decorator: Arc::new(decorator),
        })
    }
}

impl<C: AsRef<str>> Default for LogSystem<C> {
    fn default() -> Self {
        Self::new()
    }
}
